//! Loading source documents from a directory.
//!
//! Every `.pdf` (with the `pdf` feature), `.txt`, `.md` or `.markdown` file
//! directly inside the source directory is read into one [`Document`] per
//! page. PDF pages come from the file itself; in text files form-feed
//! characters (the page separator emitted by PDF-to-text exporters) split
//! pages.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{RagError, Result};

const PAGE_SEPARATOR: char = '\x0c';

fn format_of(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|ext| ext.to_str()) {
        #[cfg(feature = "pdf")]
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => Some("pdf"),
        Some("txt") => Some("text"),
        Some("md") | Some("markdown") => Some("markdown"),
        _ => None,
    }
}

/// One document per non-blank page, numbered from 1 in `pages` order.
fn page_documents<'a>(
    path: &Path,
    format: &'static str,
    pages: impl IntoIterator<Item = (usize, &'a str)>,
) -> Vec<Document> {
    let source = path.display().to_string();
    pages
        .into_iter()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(page_number, page)| {
            let mut document = Document::new(format!("{source}#page={page_number}"), page)
                .with_metadata("source", source.clone())
                .with_metadata("page", page_number.to_string())
                .with_metadata("format", format);
            document.source_uri = Some(source.clone());
            document
        })
        .collect()
}

/// List the eligible files directly inside `dir`, sorted by path.
pub fn discover_source_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(RagError::SourceNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(RagError::SourceNotDirectory(dir.to_path_buf()));
    }

    let mut files = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| format_of(entry.path()).is_some())
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();

    files.sort();
    Ok(files)
}

/// Read one file into a document per non-blank page.
pub fn load_file(path: &Path) -> Result<Vec<Document>> {
    let documents = match format_of(path).unwrap_or("text") {
        #[cfg(feature = "pdf")]
        "pdf" => {
            let pages = crate::pdf::extract_pages(path)?;
            page_documents(path, "pdf", pages.iter().map(|(n, text)| (*n, text.as_str())))
        }
        format => {
            let content = std::fs::read_to_string(path).map_err(|e| RagError::io(path, e))?;
            page_documents(
                path,
                format,
                content.split(PAGE_SEPARATOR).enumerate().map(|(i, page)| (i + 1, page)),
            )
        }
    };

    debug!(source = %path.display(), pages = documents.len(), "loaded source file");
    Ok(documents)
}

/// Load every eligible document under `dir`.
///
/// # Errors
///
/// - [`RagError::SourceNotFound`] if `dir` does not exist
/// - [`RagError::SourceNotDirectory`] if `dir` is not a directory
/// - [`RagError::NoDocuments`] if no file yields a non-blank page
pub fn load_documents(dir: impl AsRef<Path>) -> Result<Vec<Document>> {
    let dir = dir.as_ref();
    let mut documents = Vec::new();
    for path in discover_source_files(dir)? {
        documents.extend(load_file(&path)?);
    }

    if documents.is_empty() {
        return Err(RagError::NoDocuments(dir.to_path_buf()));
    }

    info!(dir = %dir.display(), document_count = documents.len(), "loaded documents");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn loads_pages_in_path_order() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("b.md"), "# Second").unwrap();
        fs::write(root.join("a.txt"), "page one\x0cpage two\x0c  \n").unwrap();
        fs::write(root.join("notes.docx"), "binary").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested/c.txt"), "ignored").unwrap();

        let docs = load_documents(root).unwrap();
        let texts: Vec<_> = docs.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["page one", "page two", "# Second"]);
        assert_eq!(docs[1].metadata["page"], "2");
        assert_eq!(docs[2].metadata["format"], "markdown");
        assert!(docs[0].id.ends_with("a.txt#page=1"));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn pdf_pages_become_documents() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("guide.pdf");
        crate::pdf::fixtures::write_pdf(&path, &["Zebras are striped.", "X is a thing."]);

        let docs = load_documents(temp.path()).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].text.contains("Zebras are striped."));
        assert_eq!(docs[0].metadata["source"], path.display().to_string());
        assert_eq!(docs[0].metadata["page"], "1");
        assert_eq!(docs[1].metadata["page"], "2");
        assert_eq!(docs[1].metadata["format"], "pdf");
        assert!(docs[1].id.ends_with("guide.pdf#page=2"));
    }

    #[test]
    fn missing_directory_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_documents(temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, RagError::SourceNotFound(_)));
    }

    #[test]
    fn file_instead_of_directory_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("doc.txt");
        fs::write(&file, "text").unwrap();
        assert!(matches!(load_documents(&file), Err(RagError::SourceNotDirectory(_))));
    }

    #[test]
    fn empty_directory_has_no_documents() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("blank.txt"), "   ").unwrap();
        assert!(matches!(load_documents(temp.path()), Err(RagError::NoDocuments(_))));
    }
}
