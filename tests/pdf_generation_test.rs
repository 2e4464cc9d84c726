//! Contract document layout and PDF output

mod common;

use chrono::{TimeZone, Utc};
use common::{document_request, with_header, CONTRACT_NUMBER};
use kontrak_core::pdf::{generate_document, DocumentFormatter, LineRole, PageGeometry};
use kontrak_core::rendering::IndonesianLocale;

fn formatter() -> DocumentFormatter {
    DocumentFormatter::new(IndonesianLocale::wib())
}

fn texts(document: &kontrak_core::pdf::LaidOutDocument, role: LineRole) -> Vec<String> {
    document
        .lines_with_role(role)
        .map(|line| line.text.clone())
        .collect()
}

#[test]
fn test_empty_body_yields_signature_section_only() {
    let document = formatter().layout(&document_request("", None));

    assert_eq!(document.page_count(), 1);
    let roles: Vec<LineRole> = document.lines().map(|line| line.role).collect();
    assert_eq!(roles, vec![LineRole::SignatureHeading]);
    assert_eq!(
        texts(&document, LineRole::SignatureHeading),
        vec!["TANDA TANGAN DIGITAL"]
    );
}

#[test]
fn test_markdown_like_lines_are_classified() {
    let document = formatter().layout(&document_request("# Title\n## Sub\nHello **world**", None));

    assert_eq!(texts(&document, LineRole::Heading), vec!["Title"]);
    assert_eq!(texts(&document, LineRole::Subheading), vec!["Sub"]);
    assert_eq!(texts(&document, LineRole::Paragraph), vec!["Hello world"]);

    let heading = document.lines_with_role(LineRole::Heading).next().unwrap();
    let subheading = document.lines_with_role(LineRole::Subheading).next().unwrap();
    let geometry = PageGeometry::LETTER;
    assert!(heading.x > geometry.margin, "headings are centered");
    assert_eq!(subheading.x, geometry.margin);
    assert!(heading.top < subheading.top);
}

#[test]
fn test_blank_lines_are_skipped() {
    let document = formatter().layout(&document_request("Satu\n\n   \nDua", None));
    assert_eq!(texts(&document, LineRole::Paragraph), vec!["Satu", "Dua"]);
}

#[test]
fn test_unsigned_document_has_no_confirmation() {
    let document = formatter().layout(&document_request("Isi kontrak", None));

    assert_eq!(document.lines_with_role(LineRole::SignatureHeading).count(), 1);
    assert_eq!(document.lines_with_role(LineRole::SignatureConfirmation).count(), 0);
    assert_eq!(document.lines_with_role(LineRole::SignatureDetail).count(), 0);
}

#[test]
fn test_signed_document_prints_signer_details() {
    let signed_at = Utc.with_ymd_and_hms(2024, 1, 16, 7, 30, 5).unwrap();
    let document = formatter().layout(&document_request("Isi kontrak", Some(signed_at)));

    assert_eq!(
        texts(&document, LineRole::SignatureConfirmation),
        vec!["KONTRAK TELAH DITANDATANGANI SECARA DIGITAL"]
    );
    assert_eq!(
        texts(&document, LineRole::SignatureDetail),
        vec![
            "Ditandatangani oleh: Herman Zaldivar",
            "Trading ID: TRD001",
            "Tanggal: 16/1/2024, 14.30.05",
        ]
    );
}

#[test]
fn test_signature_flag_without_timestamp_is_incomplete() {
    let mut request = document_request("Isi kontrak", None);
    request.signature.signature_present = true;

    let document = formatter().layout(&request);
    assert_eq!(document.lines_with_role(LineRole::SignatureConfirmation).count(), 0);
}

#[test]
fn test_header_precedes_body() {
    let request = with_header(document_request("# PERJANJIAN\nIsi", None));
    let document = formatter().layout(&request);

    let first: Vec<String> = document.lines().take(3).map(|line| line.text.clone()).collect();
    assert_eq!(
        first,
        vec![
            "KONTRAK DIGITAL TRADESTATION".to_string(),
            format!("Nomor Kontrak: {CONTRACT_NUMBER}"),
            "Dibuat pada: 15/1/2024".to_string(),
        ]
    );
}

#[test]
fn test_long_body_flows_across_pages() {
    let paragraph = "Pihak Pertama dan Pihak Kedua sepakat untuk melaksanakan perjanjian ini \
                     dengan itikad baik serta mematuhi seluruh ketentuan yang berlaku di \
                     wilayah Republik Indonesia tanpa pengecualian apa pun.";
    let body = vec![paragraph; 120].join("\n");

    let document = formatter().layout(&document_request(&body, None));
    let geometry = PageGeometry::LETTER;

    assert!(document.page_count() >= 2);
    assert!(document.pages.iter().all(|page| !page.is_empty()));
    for line in document.lines() {
        assert!(line.top >= geometry.margin);
        assert!(line.top + line.size * 1.156 <= geometry.bottom() + 0.01);
    }

    let justified = document
        .lines_with_role(LineRole::Paragraph)
        .filter(|line| line.word_spacing > 0.0)
        .count();
    assert!(justified > 0, "wrapped paragraph lines are justified");
}

#[test]
fn test_rendered_pdf_is_loadable() {
    let signed_at = Utc.with_ymd_and_hms(2024, 1, 16, 7, 30, 5).unwrap();
    let body = vec!["## Pasal\nIsi pasal yang cukup panjang untuk dibaca."; 80].join("\n");
    let request = with_header(document_request(&body, Some(signed_at)));

    let formatter = formatter();
    let expected_pages = formatter.layout(&request).page_count();
    let bytes = formatter.render(&request).unwrap();

    assert!(bytes.starts_with(b"%PDF-1.5"));
    let document = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(document.get_pages().len(), expected_pages);
}

#[tokio::test]
async fn test_generate_document_runs_off_the_async_runtime() {
    let bytes = generate_document(formatter(), document_request("Isi", None))
        .await
        .unwrap();
    let document = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(document.get_pages().len(), 1);
}

#[test]
fn test_currency_in_rendered_body() {
    let renderer = kontrak_core::TemplateRenderer::new(IndonesianLocale::wib());
    let text = renderer.render(
        "Nilai kontrak: {{AMOUNT}}",
        &common::herman_bindings(),
        &kontrak_core::ContractVariables::new(),
    );
    let document = formatter().layout(&document_request(&text, None));
    assert_eq!(
        texts(&document, LineRole::Paragraph),
        vec!["Nilai kontrak: Rp50.000.000"]
    );
}
