//! Page text extraction from PDF files.

use std::path::Path;

use tracing::warn;

use crate::error::{RagError, Result};

fn pdf_error(path: &Path, e: lopdf::Error) -> RagError {
    RagError::PdfError { path: path.to_path_buf(), message: e.to_string() }
}

/// Extract the text of every page as `(page number, text)`, in page order.
///
/// A page whose text cannot be decoded is logged and yields no text; a file
/// that cannot be parsed at all is an error.
pub fn extract_pages(path: &Path) -> Result<Vec<(usize, String)>> {
    let document = lopdf::Document::load(path).map_err(|e| pdf_error(path, e))?;

    let pages = document
        .get_pages()
        .into_keys()
        .map(|number| {
            let text = document.extract_text(&[number]).unwrap_or_else(|e| {
                warn!(path = %path.display(), page = number, error = %e, "skipping unreadable page");
                String::new()
            });
            (number as usize, text)
        })
        .collect();
    Ok(pages)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;

    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Write a PDF with one Courier text line per page.
    pub(crate) fn write_pdf(path: &Path, pages: &[&str]) {
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

        let kids: Vec<Object> = pages
            .iter()
            .map(|text| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*text)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }
}
