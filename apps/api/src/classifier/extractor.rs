//! Raw text extraction from uploaded resume documents.
//!
//! Supported: `.txt` (UTF-8, verbatim), `.pdf` (pdf-extract), `.docx` (docx-rs).
//! Structured formats are flattened to their text runs joined by single spaces.

use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::debug;

use crate::classifier::error::{ClassifierError, ClassifierResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Case-insensitive lookup; accepts the extension with or without a leading dot.
    pub fn from_extension(extension: &str) -> ClassifierResult<Self> {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "txt" => Ok(DocumentFormat::Text),
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ClassifierError::UnsupportedFormat {
                extension: format!(".{normalized}"),
            }),
        }
    }

    pub fn from_path(path: &Path) -> ClassifierResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Text => "txt",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

/// Extracts text from the file at `path`; the extension selects the format.
pub fn extract_file(path: &Path) -> ClassifierResult<String> {
    let format = DocumentFormat::from_path(path)?;
    let source_name = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|e| ClassifierError::extraction(&source_name, e))?;
    debug!(path = %source_name, bytes = bytes.len(), ?format, "extracting document");
    extract_bytes(format, &bytes, &source_name)
}

/// Extracts text from an in-memory document.
pub fn extract_bytes(
    format: DocumentFormat,
    bytes: &[u8],
    source_name: &str,
) -> ClassifierResult<String> {
    match format {
        DocumentFormat::Text => String::from_utf8(bytes.to_vec())
            .map_err(|e| ClassifierError::extraction(source_name, e)),
        DocumentFormat::Pdf => extract_pdf(bytes, source_name),
        DocumentFormat::Docx => extract_docx(bytes, source_name),
    }
}

fn extract_pdf(bytes: &[u8], source_name: &str) -> ClassifierResult<String> {
    // pdf-extract panics on some malformed fonts and streams.
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| ClassifierError::extraction(source_name, "PDF parser panicked"))?
        .map_err(|e| ClassifierError::extraction(source_name, e))?;
    Ok(join_runs(text.lines()))
}

fn extract_docx(bytes: &[u8], source_name: &str) -> ClassifierResult<String> {
    let docx =
        docx_rs::read_docx(bytes).map_err(|e| ClassifierError::extraction(source_name, e))?;

    let paragraphs = docx.document.children.iter().filter_map(|child| match child {
        DocumentChild::Paragraph(paragraph) => Some(
            paragraph
                .children
                .iter()
                .filter_map(|pc| match pc {
                    ParagraphChild::Run(run) => Some(run_text(&run.children)),
                    _ => None,
                })
                .collect::<String>(),
        ),
        _ => None,
    });

    Ok(join_runs(paragraphs))
}

fn run_text(children: &[RunChild]) -> String {
    children
        .iter()
        .filter_map(|rc| match rc {
            RunChild::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}

/// Joins non-blank runs with a single space, in document order.
fn join_runs<I, S>(runs: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    runs.into_iter()
        .filter_map(|run| {
            let trimmed = run.as_ref().trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
