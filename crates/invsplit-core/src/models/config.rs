//! Configuration structures for the splitting pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Main configuration for the invsplit pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Credential for the classifier service.
    pub api_key: String,

    /// Directory holding the scanned source files.
    pub folder_path: PathBuf,

    /// Root directory for per-invoice artifacts.
    pub output_dir: PathBuf,

    /// Splitting configuration.
    pub split: SplitConfig,

    /// Classifier service configuration.
    pub classifier: ClassifierConfig,

    /// Metadata store configuration.
    pub store: StoreConfig,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            folder_path: PathBuf::from("pdfs"),
            output_dir: PathBuf::from("invoice_pages"),
            split: SplitConfig::default(),
            classifier: ClassifierConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// PDF and image splitting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// PDFs with fewer pages are skipped without classification.
    pub min_pdf_pages: u32,

    /// Resolution assumed when placing an image on a PDF page.
    pub image_pdf_dpi: f32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            min_pdf_pages: 3,
            image_pdf_dpi: 100.0,
        }
    }
}

/// Generative Language API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// API base URL (without the model path).
    pub endpoint: String,

    /// Model name.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling threshold.
    pub top_p: f32,

    /// Upper bound on the response size.
    pub max_output_tokens: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-pro".to_string(),
            temperature: 0.1,
            top_p: 1.0,
            max_output_tokens: 2048,
            timeout_secs: 120,
        }
    }
}

/// Which metadata sink receives the file records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// MongoDB collection.
    #[default]
    Mongo,
    /// Append-only JSON lines file.
    Jsonl,
}

/// Metadata store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Selected backend.
    pub backend: StoreKind,

    /// MongoDB connection string.
    pub uri: String,

    /// MongoDB database name.
    pub database: String,

    /// Collection shared by every source file and run.
    pub collection: String,

    /// Output file for the JSON lines backend.
    pub jsonl_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreKind::Mongo,
            uri: "mongodb://localhost:27017/".to_string(),
            database: "invoice_db".to_string(),
            collection: "all_invoices".to_string(),
            jsonl_path: PathBuf::from("invoice_records.jsonl"),
        }
    }
}

impl SplitterConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that the required options are present and usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }
        if self.folder_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing("folder_path"));
        }
        let dpi = self.split.image_pdf_dpi;
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(ConfigError::Invalid("split.image_pdf_dpi"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = SplitterConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("invoice_pages"));
        assert_eq!(config.split.min_pdf_pages, 3);
        assert_eq!(config.classifier.model, "gemini-1.5-pro");
        assert_eq!(config.classifier.max_output_tokens, 2048);
        assert_eq!(config.store.database, "invoice_db");
        assert_eq!(config.store.collection, "all_invoices");
        assert_eq!(config.store.backend, StoreKind::Mongo);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: SplitterConfig = serde_json::from_str(
            r#"{"api_key": "k", "store": {"backend": "jsonl"}}"#,
        )
        .unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.store.backend, StoreKind::Jsonl);
        assert_eq!(config.store.collection, "all_invoices");
        assert_eq!(config.folder_path, PathBuf::from("pdfs"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = SplitterConfig::default();
        config.api_key = "secret".to_string();
        config.split.min_pdf_pages = 5;
        config.save(&path).unwrap();

        let loaded = SplitterConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api_key, "secret");
        assert_eq!(loaded.split.min_pdf_pages, 5);
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = SplitterConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("api_key"))));

        let config = SplitterConfig {
            api_key: "k".to_string(),
            folder_path: PathBuf::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Missing("folder_path"))));
    }

    #[test]
    fn test_validate_rejects_unusable_dpi() {
        let mut config = SplitterConfig {
            api_key: "k".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        for dpi in [0.0, -72.0, f32::NAN, f32::INFINITY] {
            config.split.image_pdf_dpi = dpi;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::Invalid("split.image_pdf_dpi"))
            ));
        }
    }
}
