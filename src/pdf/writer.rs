//! Serializes a [`LaidOutDocument`] into PDF bytes with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::formatter::DocumentMetadata;
use super::layout::{LaidOutDocument, LaidOutPage, PageGeometry, PlacedLine};
use super::metrics::{encode_win_ansi, FontFace, ASCENDER};
use super::PdfError;

const PDF_VERSION: &str = "1.5";

pub fn write_document(
    laid_out: &LaidOutDocument,
    geometry: &PageGeometry,
    metadata: &DocumentMetadata,
) -> Result<Vec<u8>, PdfError> {
    if laid_out.pages.is_empty() {
        return Err(PdfError::InvalidLayout(
            "document has no pages".to_string(),
        ));
    }

    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(FontFace::Regular));
    let bold_id = doc.add_object(font_dictionary(FontFace::Bold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FontFace::Regular.resource_name() => regular_id,
            FontFace::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(laid_out.pages.len());
    for page in &laid_out.pages {
        let page_id = add_page(&mut doc, page, geometry, pages_id, resources_id)?;
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "MediaBox" => vec![
                0_i64.into(),
                0_i64.into(),
                geometry.width.into(),
                geometry.height.into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(&metadata.title),
        "Author" => text_string(&metadata.author),
        "Subject" => text_string(&metadata.subject),
        "Creator" => text_string(&metadata.creator),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfError::Serialization(e.to_string()))?;
    Ok(buffer)
}

fn add_page(
    doc: &mut Document,
    page: &LaidOutPage,
    geometry: &PageGeometry,
    pages_id: ObjectId,
    resources_id: ObjectId,
) -> Result<ObjectId, PdfError> {
    let operations: Vec<Operation> = page
        .lines
        .iter()
        .flat_map(|line| line_operations(line, geometry))
        .collect();

    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| PdfError::Encoding(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    }))
}

fn line_operations(line: &PlacedLine, geometry: &PageGeometry) -> Vec<Operation> {
    let baseline = geometry.height - (line.top + ASCENDER / 1000.0 * line.size);

    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), line.size.into()],
        ),
        Operation::new("Tw", vec![line.word_spacing.into()]),
        Operation::new("Td", vec![line.x.into(), baseline.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn font_dictionary(face: FontFace) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => face.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn text_string(value: &str) -> Object {
    Object::String(encode_win_ansi(value), StringFormat::Literal)
}
