//! Paginated PDF assembly
//!
//! A thin composer over `lopdf`: US-letter pages, the built-in Helvetica and
//! Courier fonts, and RGB image XObjects for chart bitmaps. A vertical cursor
//! is tracked per page; [`PageComposer::ensure_space`] is consulted before
//! every block so content never runs off the bottom edge.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::{Error, Result};

/// Page width in points (US letter)
pub const PAGE_WIDTH: f64 = 612.0;
/// Page height in points (US letter)
pub const PAGE_HEIGHT: f64 = 792.0;
/// Page margin in points
pub const MARGIN: f64 = 40.0;

const FONT_REGULAR: &[u8] = b"F1";
const FONT_BOLD: &[u8] = b"F2";
const FONT_MONO: &[u8] = b"F3";

#[allow(clippy::cast_possible_truncation)]
fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

/// Incremental builder for a paginated document
pub struct PageComposer {
    doc: Document,
    pages_id: ObjectId,
    font_regular: ObjectId,
    font_bold: ObjectId,
    font_mono: ObjectId,
    kids: Vec<ObjectId>,
    ops: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
    image_serial: usize,
    cursor: f64,
}

impl Default for PageComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageComposer {
    /// Create a composer with an empty first page
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica"
        });
        let font_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold"
        });
        let font_mono = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier"
        });
        Self {
            doc,
            pages_id,
            font_regular,
            font_bold,
            font_mono,
            kids: Vec::new(),
            ops: Vec::new(),
            images: Vec::new(),
            image_serial: 0,
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Vertical space left on the current page
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.cursor - MARGIN
    }

    /// Start a new page if less than `needed` points remain.
    ///
    /// # Errors
    ///
    /// Returns an error if the finished page's content stream cannot be encoded.
    pub fn ensure_space(&mut self, needed: f64) -> Result<()> {
        if self.remaining() < needed {
            self.new_page()?;
        }
        Ok(())
    }

    /// Close the current page and start a fresh one.
    ///
    /// # Errors
    ///
    /// Returns an error if the finished page's content stream cannot be encoded.
    pub fn new_page(&mut self) -> Result<()> {
        self.flush_page()
    }

    /// Draw a left-aligned text line at the cursor and advance past it.
    ///
    /// The page-break check runs before the line is drawn.
    ///
    /// # Errors
    ///
    /// Propagates page-flush errors.
    pub fn line(&mut self, text: &str, size: f64, font: TextFont, indent: f64) -> Result<()> {
        let leading = size * 1.4;
        self.ensure_space(leading)?;
        self.cursor -= leading;
        self.text_at(MARGIN + indent, self.cursor, size, font, text);
        Ok(())
    }

    /// Draw a horizontally centered text line at the cursor and advance.
    ///
    /// # Errors
    ///
    /// Propagates page-flush errors.
    pub fn centered(&mut self, text: &str, size: f64, font: TextFont) -> Result<()> {
        let leading = size * 1.4;
        self.ensure_space(leading)?;
        self.cursor -= leading;
        // Approximate Helvetica advance width at 0.5 em per glyph
        #[allow(clippy::cast_precision_loss)]
        let width = text.chars().count() as f64 * size * 0.5;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.text_at(x, self.cursor, size, font, text);
        Ok(())
    }

    /// Move the cursor down without drawing
    pub fn space(&mut self, dy: f64) {
        self.cursor = (self.cursor - dy).max(MARGIN);
    }

    /// Embed a PNG/bitmap image and draw it at the cursor, left-aligned.
    ///
    /// The page-break check runs before the image is placed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChartRender`] if the file cannot be decoded; the
    /// caller omits the image and continues.
    pub fn image(&mut self, path: &Path, width: f64, height: f64) -> Result<()> {
        let decoded = image::open(path)
            .map_err(|e| Error::ChartRender(format!("{}: {e}", path.display())))?
            .to_rgb8();
        let (px_w, px_h) = decoded.dimensions();

        self.ensure_space(height + 6.0)?;

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(px_w),
                "Height" => i64::from(px_h),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8
            },
            decoded.into_raw(),
        );
        let image_id = self.doc.add_object(stream);
        let name = format!("Im{}", self.image_serial);
        self.image_serial += 1;
        self.images.push((name.clone(), image_id));

        let y = self.cursor - height;
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                real(width),
                real(0.0),
                real(0.0),
                real(height),
                real(MARGIN),
                real(y),
            ],
        ));
        self.ops
            .push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        self.ops.push(Operation::new("Q", vec![]));
        self.cursor = y - 6.0;
        Ok(())
    }

    /// Finish the document and return its bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if content encoding or document serialization fails.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.flush_page()?;

        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        #[allow(clippy::cast_possible_wrap)]
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }

    fn text_at(&mut self, x: f64, y: f64, size: f64, font: TextFont, text: &str) {
        let resource = match font {
            TextFont::Regular => FONT_REGULAR,
            TextFont::Bold => FONT_BOLD,
            TextFont::Mono => FONT_MONO,
        };
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(resource.to_vec()), real(size)],
        ));
        self.ops
            .push(Operation::new("Td", vec![real(x), real(y)]));
        self.ops
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn flush_page(&mut self) -> Result<()> {
        // Skip the trailing empty page a final new_page would otherwise leave
        if self.ops.is_empty() && !self.kids.is_empty() {
            self.cursor = PAGE_HEIGHT - MARGIN;
            return Ok(());
        }

        let operations = std::mem::take(&mut self.ops);
        let images = std::mem::take(&mut self.images);

        let encoded = Content { operations }.encode()?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), encoded));

        let mut resources = dictionary! {
            "Font" => dictionary! {
                "F1" => self.font_regular,
                "F2" => self.font_bold,
                "F3" => self.font_mono
            }
        };
        if !images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, id) in images {
                xobjects.set(name.into_bytes(), Object::Reference(id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(PAGE_WIDTH),
                real(PAGE_HEIGHT)
            ]
        });
        self.kids.push(page_id);
        self.cursor = PAGE_HEIGHT - MARGIN;
        Ok(())
    }
}

/// Which built-in font a text line uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFont {
    /// Helvetica
    Regular,
    /// Helvetica-Bold
    Bold,
    /// Courier (fixed-width, for the row preview table)
    Mono,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_one_page() {
        let bytes = PageComposer::new().finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }

    #[test]
    fn test_lines_paginate_when_page_fills() {
        let mut composer = PageComposer::new();
        // Far more lines than fit on a single letter page
        for i in 0..120 {
            composer
                .line(&format!("row {i}"), 10.0, TextFont::Regular, 0.0)
                .unwrap();
        }
        let remaining = composer.remaining();
        assert!(remaining >= 0.0);
        let bytes = composer.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_new_page_resets_cursor() {
        let mut composer = PageComposer::new();
        composer
            .line("cover", 20.0, TextFont::Bold, 0.0)
            .unwrap();
        let before = composer.remaining();
        composer.new_page().unwrap();
        assert!(composer.remaining() > before);
    }

    #[test]
    fn test_image_rejects_missing_file() {
        let mut composer = PageComposer::new();
        let err = composer
            .image(Path::new("/nonexistent/chart.png"), 360.0, 240.0)
            .unwrap_err();
        assert!(matches!(err, Error::ChartRender(_)));
    }
}
