//! # Contract PDF Generation
//!
//! Line-oriented layout of finalized contract text into a paginated PDF with a
//! digital signature section.
//!
//! The pipeline is split in three stages:
//!
//! - [`formatter`] classifies lines (`# `, `## `, paragraphs) and builds blocks
//! - [`layout`] wraps and paginates blocks with an explicit cursor
//! - [`writer`] serializes the laid-out pages with lopdf
//!
//! [`generate_document`] runs the whole pipeline on a blocking worker thread and
//! yields either the complete byte buffer or an error, never partial output.

pub mod formatter;
pub mod layout;
pub mod metrics;
pub mod writer;

use thiserror::Error;
use tracing::{debug, error};

pub use formatter::{
    classify_line, document_filename, strip_emphasis, DocumentFormatter, DocumentHeader,
    DocumentMetadata, DocumentRequest, LineKind, SignatureBlock, PDF_CONTENT_TYPE,
};
pub use layout::{LaidOutDocument, LayoutEngine, LineRole, PageGeometry};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Content stream encoding failed: {0}")]
    Encoding(String),

    #[error("PDF serialization failed: {0}")]
    Serialization(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Document generation task failed: {0}")]
    TaskFailed(String),
}

/// Render a contract document off the async runtime
pub async fn generate_document(
    formatter: DocumentFormatter,
    request: DocumentRequest,
) -> Result<Vec<u8>, PdfError> {
    let subject = request.metadata.title.clone();

    let result = tokio::task::spawn_blocking(move || formatter.render(&request))
        .await
        .map_err(|e| PdfError::TaskFailed(e.to_string()))?;

    match &result {
        Ok(bytes) => debug!(document = %subject, size = bytes.len(), "Generated contract PDF"),
        Err(e) => error!(document = %subject, error = %e, "Contract PDF generation failed"),
    }

    result
}
