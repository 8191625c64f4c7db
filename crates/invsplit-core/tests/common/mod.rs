//! Shared fixtures for pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use image::{Rgb, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use invsplit_core::store::Result as StoreResult;
use invsplit_core::{
    ClassificationError, DetectedInvoice, DocumentClassifier, FileRecord, MetadataStore, StoreError,
};

/// Canned classifier answers keyed by file name.
#[derive(Default)]
pub struct StubClassifier {
    answers: HashMap<String, Result<Vec<DetectedInvoice>, String>>,
    calls: Mutex<Vec<String>>,
}

impl StubClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, file_name: &str, invoices: Vec<DetectedInvoice>) -> Self {
        self.answers.insert(file_name.to_string(), Ok(invoices));
        self
    }

    pub fn answer_json(self, file_name: &str, json: &str) -> Self {
        let invoices = invsplit_core::parse_invoice_response(json).unwrap();
        self.answer(file_name, invoices)
    }

    pub fn fail(mut self, file_name: &str, message: &str) -> Self {
        self.answers.insert(file_name.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl DocumentClassifier for StubClassifier {
    async fn classify(&self, path: &Path) -> Result<Vec<DetectedInvoice>, ClassificationError> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        self.calls.lock().unwrap().push(name.clone());

        match self.answers.get(&name) {
            Some(Ok(invoices)) => Ok(invoices.clone()),
            Some(Err(message)) => Err(ClassificationError::Api {
                status: 401,
                message: message.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Keeps inserted records in memory.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<FileRecord>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<FileRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl MetadataStore for MemoryStore {
    async fn insert(&self, record: &FileRecord) -> StoreResult<String> {
        if self.unavailable {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "store offline",
            )));
        }
        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        Ok(records.len().to_string())
    }
}

/// Write a PDF whose page N draws the text "Page N".
pub fn write_numbered_pdf(path: &Path, pages: u32) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for number in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", number))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Text label of each page of the PDF at `path`.
pub fn page_labels(path: &Path) -> Vec<String> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .values()
        .map(|id| {
            let content = String::from_utf8_lossy(&doc.get_page_content(*id).unwrap()).into_owned();
            let start = content.find("(Page ").unwrap() + 1;
            let end = start + content[start..].find(')').unwrap();
            content[start..end].to_string()
        })
        .collect()
}

/// Write a PNG whose top `split` rows are red and the rest blue.
pub fn write_two_tone_png(path: &Path, width: u32, height: u32, split: u32) {
    RgbImage::from_fn(width, height, |_, y| {
        if y < split { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
    })
    .save(path)
    .unwrap();
}
