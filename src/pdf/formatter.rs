//! # Document Formatter
//!
//! Turns finalized contract text into a laid-out document: an optional header,
//! the body classified line by line, and the digital signature section.
//!
//! Line classification is a pure function of the line text; all pagination
//! is delegated to [`LayoutEngine`].

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::layout::{
    Alignment, Block, BlockStyle, LaidOutDocument, LayoutEngine, LineRole, PageGeometry,
};
use super::metrics::FontFace;
use super::writer::write_document;
use super::PdfError;
use crate::rendering::IndonesianLocale;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub const DEFAULT_HEADER_TITLE: &str = "KONTRAK DIGITAL TRADESTATION";
pub const DEFAULT_AUTHOR: &str = "TradeStation Kontrak Digital";
pub const DEFAULT_CREATOR: &str = "TradeStation System";

const SIGNATURE_HEADING: &str = "TANDA TANGAN DIGITAL";
const SIGNATURE_CONFIRMATION: &str = "KONTRAK TELAH DITANDATANGANI SECARA DIGITAL";

const HEADING_STYLE: BlockStyle = BlockStyle {
    font: FontFace::Bold,
    size: 14.0,
    alignment: Alignment::Center,
    line_gap: 0.0,
    space_after: 0.5,
};

const SUBHEADING_STYLE: BlockStyle = BlockStyle {
    font: FontFace::Bold,
    size: 12.0,
    alignment: Alignment::Left,
    line_gap: 0.0,
    space_after: 0.3,
};

const PARAGRAPH_STYLE: BlockStyle = BlockStyle {
    font: FontFace::Regular,
    size: 10.0,
    alignment: Alignment::Justify,
    line_gap: 2.0,
    space_after: 0.2,
};

/// Kind of a non-empty body line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `# ` prefix
    Heading(String),
    /// `## ` prefix
    Subheading(String),
    /// Anything else, with `**bold**` markers removed
    Paragraph(String),
}

/// Classify one trimmed line; `None` for blank lines
pub fn classify_line(line: &str) -> Option<LineKind> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let kind = if let Some(rest) = line.strip_prefix("# ") {
        LineKind::Heading(rest.to_string())
    } else if let Some(rest) = line.strip_prefix("## ") {
        LineKind::Subheading(rest.to_string())
    } else {
        LineKind::Paragraph(strip_emphasis(line))
    };
    Some(kind)
}

/// Replace every `**text**` with `text`
pub fn strip_emphasis(line: &str) -> String {
    static EMPHASIS: OnceLock<Regex> = OnceLock::new();
    let pattern = EMPHASIS
        .get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("emphasis pattern is valid"));
    pattern.replace_all(line, "$1").into_owned()
}

/// `Kontrak_<number>.pdf`
pub fn document_filename(contract_number: &str) -> String {
    format!("Kontrak_{contract_number}.pdf")
}

/// Header printed above the body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub title: String,
    pub contract_number: String,
    pub created_at: DateTime<Utc>,
}

/// Signer details for the signature section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureBlock {
    pub signer_name: String,
    pub trading_id: String,
    pub signature_present: bool,
    pub signed_at: Option<DateTime<Utc>>,
}

impl SignatureBlock {
    /// Confirmation details are printed only with both a payload and a timestamp
    pub fn signed_at_if_complete(&self) -> Option<DateTime<Utc>> {
        if self.signature_present {
            self.signed_at
        } else {
            None
        }
    }
}

/// PDF Info dictionary entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub creator: String,
}

impl DocumentMetadata {
    pub fn for_contract(contract_number: &str, contract_title: &str) -> Self {
        Self {
            title: format!("Kontrak {contract_number}"),
            author: DEFAULT_AUTHOR.to_string(),
            subject: contract_title.to_string(),
            creator: DEFAULT_CREATOR.to_string(),
        }
    }
}

/// Everything needed to produce one contract PDF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub finalized_text: String,
    pub header: Option<DocumentHeader>,
    pub signature: SignatureBlock,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFormatter {
    locale: IndonesianLocale,
    geometry: PageGeometry,
}

impl DocumentFormatter {
    pub fn new(locale: IndonesianLocale) -> Self {
        Self {
            locale,
            geometry: PageGeometry::LETTER,
        }
    }

    pub fn locale(&self) -> &IndonesianLocale {
        &self.locale
    }

    /// Lay the request out without serializing it
    pub fn layout(&self, request: &DocumentRequest) -> LaidOutDocument {
        let mut engine = LayoutEngine::new(self.geometry);

        if let Some(header) = &request.header {
            self.emit_header(&mut engine, header);
        }

        for kind in request.finalized_text.split('\n').filter_map(classify_line) {
            let block = match kind {
                LineKind::Heading(text) => Block::new(text, HEADING_STYLE, LineRole::Heading),
                LineKind::Subheading(text) => {
                    Block::new(text, SUBHEADING_STYLE, LineRole::Subheading)
                }
                LineKind::Paragraph(text) => {
                    Block::new(text, PARAGRAPH_STYLE, LineRole::Paragraph)
                }
            };
            engine.emit(&block);
        }

        self.emit_signature(&mut engine, &request.signature);
        engine.finish()
    }

    /// Lay out and serialize to PDF bytes
    pub fn render(&self, request: &DocumentRequest) -> Result<Vec<u8>, PdfError> {
        let laid_out = self.layout(request);
        write_document(&laid_out, &self.geometry, &request.metadata)
    }

    fn emit_header(&self, engine: &mut LayoutEngine, header: &DocumentHeader) {
        let centered = |font, size, space_after| BlockStyle {
            font,
            size,
            alignment: Alignment::Center,
            line_gap: 0.0,
            space_after,
        };

        engine.emit(&Block::new(
            header.title.as_str(),
            centered(FontFace::Bold, 18.0, 0.3),
            LineRole::DocumentTitle,
        ));
        engine.emit(&Block::new(
            format!("Nomor Kontrak: {}", header.contract_number),
            centered(FontFace::Regular, 12.0, 0.0),
            LineRole::HeaderDetail,
        ));
        engine.emit(&Block::new(
            format!("Dibuat pada: {}", self.locale.format_date(header.created_at)),
            centered(FontFace::Regular, 10.0, 1.0),
            LineRole::HeaderDetail,
        ));
    }

    fn emit_signature(&self, engine: &mut LayoutEngine, signature: &SignatureBlock) {
        engine.move_down(2.0, PARAGRAPH_STYLE.size);

        engine.emit(&Block::new(
            SIGNATURE_HEADING,
            BlockStyle {
                font: FontFace::Bold,
                size: 12.0,
                alignment: Alignment::Center,
                line_gap: 0.0,
                space_after: 0.5,
            },
            LineRole::SignatureHeading,
        ));

        let Some(signed_at) = signature.signed_at_if_complete() else {
            return;
        };

        engine.emit(&Block::new(
            SIGNATURE_CONFIRMATION,
            BlockStyle {
                font: FontFace::Bold,
                size: 10.0,
                alignment: Alignment::Center,
                line_gap: 0.0,
                space_after: 0.3,
            },
            LineRole::SignatureConfirmation,
        ));

        let detail = BlockStyle {
            font: FontFace::Regular,
            size: 10.0,
            alignment: Alignment::Center,
            line_gap: 0.0,
            space_after: 0.0,
        };
        for text in [
            format!("Ditandatangani oleh: {}", signature.signer_name),
            format!("Trading ID: {}", signature.trading_id),
            format!("Tanggal: {}", self.locale.format_datetime(signed_at)),
        ] {
            engine.emit(&Block::new(text, detail, LineRole::SignatureDetail));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn unsigned() -> SignatureBlock {
        SignatureBlock {
            signer_name: "Herman Zaldivar".to_string(),
            trading_id: "TRD001".to_string(),
            signature_present: false,
            signed_at: None,
        }
    }

    fn request(text: &str, signature: SignatureBlock) -> DocumentRequest {
        DocumentRequest {
            finalized_text: text.to_string(),
            header: None,
            signature,
            metadata: DocumentMetadata::for_contract("TSC202401150001", "Perjanjian"),
        }
    }

    #[test]
    fn test_classify_line_priority() {
        assert_eq!(classify_line("# Judul"), Some(LineKind::Heading("Judul".into())));
        assert_eq!(classify_line("## Pasal 1"), Some(LineKind::Subheading("Pasal 1".into())));
        assert_eq!(
            classify_line("  Hello **world**  "),
            Some(LineKind::Paragraph("Hello world".into()))
        );
        assert_eq!(classify_line("#NoSpace"), Some(LineKind::Paragraph("#NoSpace".into())));
        assert_eq!(classify_line("   "), None);
    }

    #[test]
    fn test_strip_emphasis_multiple_spans() {
        assert_eq!(strip_emphasis("**a** dan **b**"), "a dan b");
        assert_eq!(strip_emphasis("tanpa penekanan"), "tanpa penekanan");
        assert_eq!(strip_emphasis("**terbuka"), "**terbuka");
    }

    #[test]
    fn test_document_filename() {
        assert_eq!(document_filename("TSC202401150042"), "Kontrak_TSC202401150042.pdf");
    }

    #[test]
    fn test_signature_details_require_timestamp_and_payload() {
        let formatter = DocumentFormatter::default();
        let mut signature = unsigned();
        signature.signature_present = true;
        let doc = formatter.layout(&request("Isi", signature.clone()));
        assert_eq!(doc.lines_with_role(LineRole::SignatureConfirmation).count(), 0);

        signature.signed_at = Some(Utc.with_ymd_and_hms(2024, 1, 20, 7, 0, 0).unwrap());
        let doc = formatter.layout(&request("Isi", signature));
        assert_eq!(doc.lines_with_role(LineRole::SignatureConfirmation).count(), 1);
        let details: Vec<_> = doc
            .lines_with_role(LineRole::SignatureDetail)
            .map(|line| line.text.clone())
            .collect();
        assert_eq!(
            details,
            vec![
                "Ditandatangani oleh: Herman Zaldivar".to_string(),
                "Trading ID: TRD001".to_string(),
                "Tanggal: 20/1/2024, 14.00.00".to_string(),
            ]
        );
    }

    #[test]
    fn test_header_lines() {
        let formatter = DocumentFormatter::default();
        let mut req = request("", unsigned());
        req.header = Some(DocumentHeader {
            title: DEFAULT_HEADER_TITLE.to_string(),
            contract_number: "TSC202401150001".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 1, 0, 0).unwrap(),
        });
        let doc = formatter.layout(&req);
        let texts: Vec<_> = doc.lines().map(|line| line.text.as_str()).collect();
        assert_eq!(texts[0], DEFAULT_HEADER_TITLE);
        assert_eq!(texts[1], "Nomor Kontrak: TSC202401150001");
        assert_eq!(texts[2], "Dibuat pada: 15/1/2024");
        assert_eq!(texts[3], SIGNATURE_HEADING);
    }

    #[test]
    fn test_metadata_for_contract() {
        let metadata = DocumentMetadata::for_contract("TSC1", "Judul Kontrak");
        assert_eq!(metadata.title, "Kontrak TSC1");
        assert_eq!(metadata.subject, "Judul Kontrak");
        assert_eq!(metadata.author, DEFAULT_AUTHOR);
        assert_eq!(metadata.creator, DEFAULT_CREATOR);
    }
}
