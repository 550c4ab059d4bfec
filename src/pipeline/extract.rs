//! Text extraction: PDF bytes → one flat text blob.
//!
//! Parsing is pure Rust via `lopdf` — no native bindings, no shared
//! library to locate at runtime. The parsed document lives only inside
//! [`extract`]; it is dropped on return, success or failure, so no
//! resource outlives the call.
//!
//! Per-page failures are tolerated: a page with no extractable text
//! (vector art, embedded images) contributes an empty segment and the
//! remaining pages still make it into the blob. Only a document where
//! *every* page comes back empty is rejected — that is almost always a
//! scanned document, which needs OCR rather than text extraction.

use crate::error::ExtractionError;
use lopdf::Document;
use tracing::{debug, warn};

/// Extracted document text plus the page count it came from.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    /// Per-page text concatenated in page order.
    pub text: String,
    /// Number of pages in the document.
    pub pages: usize,
}

/// Extract the full text of a PDF held in memory.
///
/// `source_name` is only used in error messages (path, URL, or label).
///
/// # Errors
/// - [`ExtractionError::CorruptDocument`] — `lopdf` cannot parse the bytes
/// - [`ExtractionError::Encrypted`] — password-protected document
/// - [`ExtractionError::EmptyPageTree`] — document with zero pages
/// - [`ExtractionError::NoExtractableText`] — every page came back empty
pub fn extract(bytes: &[u8], source_name: &str) -> Result<ExtractedText, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::CorruptDocument {
        source_name: source_name.to_string(),
        detail: e.to_string(),
    })?;

    if doc.is_encrypted() {
        return Err(ExtractionError::Encrypted {
            source_name: source_name.to_string(),
        });
    }

    // BTreeMap keyed by 1-based page number: iteration is page order.
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(ExtractionError::EmptyPageTree {
            source_name: source_name.to_string(),
        });
    }

    let page_count = pages.len();
    let mut text = String::new();
    let mut pages_with_text = 0usize;

    for &page_num in pages.keys() {
        // A page that fails to decode contributes an empty segment, not
        // an error — the rest of the document is still usable.
        let page_text = match doc.extract_text(&[page_num]) {
            Ok(t) => t,
            Err(e) => {
                warn!(page = page_num, error = %e, "page yielded no text");
                String::new()
            }
        };
        if !page_text.trim().is_empty() {
            pages_with_text += 1;
        }
        text.push_str(&page_text);
    }

    if pages_with_text == 0 {
        return Err(ExtractionError::NoExtractableText {
            source_name: source_name.to_string(),
            pages: page_count,
        });
    }

    debug!(
        pages = page_count,
        chars = text.len(),
        "extracted document text"
    );

    Ok(ExtractedText {
        text,
        pages: page_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a minimal PDF with one page per entry; an empty entry makes
    /// a page with no text operations.
    fn pdf_with_pages(page_texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_text in page_texts {
            let mut operations = Vec::new();
            if !page_text.is_empty() {
                operations.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                    Operation::new("ET", vec![]),
                ]);
            }
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn pages_concatenate_in_page_order() {
        let bytes = pdf_with_pages(&["First page text", "Second page text", "Third page text"]);
        let extracted = extract(&bytes, "three.pdf").unwrap();

        assert_eq!(extracted.pages, 3);
        let first = extracted.text.find("First page text").unwrap();
        let second = extracted.text.find("Second page text").unwrap();
        let third = extracted.text.find("Third page text").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn empty_page_contributes_empty_segment_not_an_error() {
        let bytes = pdf_with_pages(&["Before the gap", "", "After the gap"]);
        let extracted = extract(&bytes, "gap.pdf").unwrap();

        assert_eq!(extracted.pages, 3);
        assert!(extracted.text.contains("Before the gap"));
        assert!(extracted.text.contains("After the gap"));
    }

    #[test]
    fn all_pages_empty_is_an_error() {
        let bytes = pdf_with_pages(&["", "", ""]);
        let err = extract(&bytes, "scan.pdf").unwrap_err();
        match err {
            ExtractionError::NoExtractableText { pages, .. } => assert_eq!(pages, 3),
            other => panic!("expected NoExtractableText, got {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_are_a_corrupt_document() {
        let err = extract(b"%PDF-1.5 but nothing else", "junk.pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::CorruptDocument { .. }));
    }
}
