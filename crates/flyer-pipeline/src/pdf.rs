//! Multi-page PDF assembly from a folder of downloaded flyer pages.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use thiserror::Error;

/// File name suffixes treated as images (matched case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to re-encode {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("PDF build error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write error: {0}")]
    Write(#[from] std::io::Error),
}

/// An in-memory PDF built from a folder's images.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Lists the files in `dir` whose names end in one of [`IMAGE_EXTENSIONS`].
///
/// Files are ordered by the trailing number in their stem (`image_2` before
/// `image_10`), then by name, so pages follow download order.
///
/// # Errors
///
/// Returns [`PdfError::ReadDir`] if `dir` cannot be listed.
pub fn collect_image_files(dir: &Path) -> Result<Vec<PathBuf>, PdfError> {
    let read_dir_err = |source: std::io::Error| PdfError::ReadDir {
        path: dir.display().to_string(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let lower = name.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|path| page_order_key(path));
    Ok(files)
}

/// Unnumbered files sort after numbered ones.
fn page_order_key(path: &Path) -> (u64, String) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    let number = digits_start.and_then(|i| stem[i..].parse::<u64>().ok());
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (number.unwrap_or(u64::MAX), name)
}

/// Builds one PDF page per qualifying image file in `dir`.
///
/// Images are decoded by content, not extension, since every download is
/// saved as `.jpg` regardless of its real format.
///
/// Returns `Ok(None)` when the folder has no qualifying image files.
///
/// # Errors
///
/// Returns [`PdfError`] if the folder cannot be listed, a qualifying file
/// cannot be read or decoded, or the PDF cannot be written.
pub fn assemble_pdf(dir: &Path, file_name: String) -> Result<Option<PdfArtifact>, PdfError> {
    let files = collect_image_files(dir)?;
    if files.is_empty() {
        return Ok(None);
    }

    let mut builder = PageBuilder::new();
    for path in &files {
        let bytes = std::fs::read(path).map_err(|source| PdfError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let img = image::load_from_memory(&bytes).map_err(|source| PdfError::Decode {
            path: path.display().to_string(),
            source,
        })?;
        builder.add_image_page(path, &img)?;
    }

    let page_count = builder.page_count();
    let bytes = builder.finish()?;
    tracing::info!(file_name = %file_name, page_count, size = bytes.len(), "PDF created in memory");
    Ok(Some(PdfArtifact {
        file_name,
        bytes,
        page_count,
    }))
}

/// Accumulates one full-bleed image page at a time.
struct PageBuilder {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl PageBuilder {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    fn page_count(&self) -> usize {
        self.kids.len()
    }

    fn add_image_page(&mut self, path: &Path, img: &DynamicImage) -> Result<(), PdfError> {
        let rgb = img.to_rgb8();
        let (width, height) = (i64::from(rgb.width()), i64::from(rgb.height()));

        let mut jpeg = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .map_err(|source| PdfError::Encode {
                path: path.display().to_string(),
                source,
            })?;

        let image_id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "DCTDecode",
            },
            jpeg,
        ));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .doc
            .add_object(Stream::new(lopdf::Dictionary::new(), content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
        });
        self.kids.push(page_id.into());
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, PdfError> {
        let count = i64::try_from(self.kids.len()).unwrap_or(i64::MAX);
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png_as(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    #[test]
    fn returns_none_for_folder_without_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let result = assemble_pdf(dir.path(), "x_0.pdf".to_owned()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn returns_none_for_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(assemble_pdf(dir.path(), "x_0.pdf".to_owned())
            .unwrap()
            .is_none());
    }

    #[test]
    fn page_count_matches_image_files() {
        let dir = tempfile::tempdir().unwrap();
        // PNG bytes under a .jpg name: decoded by content.
        write_png_as(&dir.path().join("image_1.jpg"), 4, 6);
        write_png_as(&dir.path().join("image_2.jpg"), 8, 3);
        write_png_as(&dir.path().join("cover.PNG"), 2, 2);
        std::fs::write(dir.path().join("readme.md"), "skip").unwrap();

        let artifact = assemble_pdf(dir.path(), "Big_Weekly_123.pdf".to_owned())
            .unwrap()
            .expect("pdf should be produced");

        assert_eq!(artifact.file_name, "Big_Weekly_123.pdf");
        assert_eq!(artifact.page_count, 3);
        assert_eq!(
            artifact.page_count,
            collect_image_files(dir.path()).unwrap().len()
        );
        assert!(artifact.bytes.starts_with(b"%PDF-1.5"));

        let parsed = Document::load_mem(&artifact.bytes).expect("pdf should parse");
        assert_eq!(parsed.get_pages().len(), 3);
    }

    #[test]
    fn undecodable_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_png_as(&dir.path().join("image_1.jpg"), 4, 4);
        std::fs::write(dir.path().join("image_2.jpg"), b"<html>not an image</html>").unwrap();

        match assemble_pdf(dir.path(), "t_0.pdf".to_owned()) {
            Err(PdfError::Decode { path, .. }) => assert!(path.ends_with("image_2.jpg")),
            other => panic!("expected Decode error, got: {other:?}"),
        }
    }

    #[test]
    fn collect_image_files_orders_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["image_10.jpg", "image_2.jpg", "image_1.jpg", "z.webp", "a.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let names: Vec<String> = collect_image_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["image_1.jpg", "image_2.jpg", "image_10.jpg", "z.webp"]
        );
    }

    #[test]
    fn collect_image_files_errors_for_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_image_files(&dir.path().join("gone")),
            Err(PdfError::ReadDir { .. })
        ));
    }
}
