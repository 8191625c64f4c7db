//! Data models for the invoice splitting pipeline.

pub mod config;
pub mod invoice;
pub mod record;
pub mod source;
