//! PDF content stream generation for the ticket page.
//!
//! This module provides:
//! - The `Canvas` drawing surface (text, rectangles, rounded rectangles,
//!   circles, plain and dashed lines, embedded RGB images)
//! - WinAnsi string encoding with PDF literal escaping
//! - Flate compression for image XObjects

use anyhow::Result;
use image::RgbImage;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::io::Write;

use super::fonts::StandardFont;
use super::layout::Rgb;

/// Kappa constant for approximating quarter circles with cubic Béziers.
const BEZIER_ARC: f64 = 0.5523;

/// Horizontal text alignment relative to the given x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Accumulates content stream fragments and image XObjects for one page.
///
/// Every fragment is wrapped in `q … Q` so no graphics state leaks between
/// draw calls. Coordinates are PDF points with the origin at the bottom-left
/// corner of the page; text coordinates are baselines.
pub struct Canvas {
    content_parts: Vec<String>,
    pub xobjects: Dictionary,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            content_parts: Vec::new(),
            xobjects: Dictionary::new(),
        }
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) {
        self.content_parts.push(format!(
            "q {} {} {} {} {} re f Q ",
            fill(color),
            num(x),
            num(y),
            num(w),
            num(h)
        ));
    }

    /// Fill a rectangle with circular corners of radius `r`.
    pub fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, r: f64, color: Rgb) {
        let k = BEZIER_ARC * r;
        let (x1, y1) = (x + w, y + h);
        let mut path = String::new();
        path.push_str(&format!("{} {} m ", num(x + r), num(y)));
        path.push_str(&format!("{} {} l ", num(x1 - r), num(y)));
        path.push_str(&curve(x1 - r + k, y, x1, y + r - k, x1, y + r));
        path.push_str(&format!("{} {} l ", num(x1), num(y1 - r)));
        path.push_str(&curve(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1));
        path.push_str(&format!("{} {} l ", num(x + r), num(y1)));
        path.push_str(&curve(x + r - k, y1, x, y1 - r + k, x, y1 - r));
        path.push_str(&format!("{} {} l ", num(x), num(y + r)));
        path.push_str(&curve(x, y + r - k, x + r - k, y, x + r, y));
        self.content_parts
            .push(format!("q {} {}f Q ", fill(color), path));
    }

    /// Fill a circle centered at (`cx`, `cy`).
    pub fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Rgb) {
        let k = BEZIER_ARC * r;
        let mut path = String::new();
        path.push_str(&format!("{} {} m ", num(cx + r), num(cy)));
        path.push_str(&curve(cx + r, cy + k, cx + k, cy + r, cx, cy + r));
        path.push_str(&curve(cx - k, cy + r, cx - r, cy + k, cx - r, cy));
        path.push_str(&curve(cx - r, cy - k, cx - k, cy - r, cx, cy - r));
        path.push_str(&curve(cx + k, cy - r, cx + r, cy - k, cx + r, cy));
        self.content_parts
            .push(format!("q {} {}f Q ", fill(color), path));
    }

    /// Stroke a straight line.
    pub fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Rgb) {
        self.content_parts.push(format!(
            "q {} {} w {} {} m {} {} l S Q ",
            stroke(color),
            num(width),
            num(x1),
            num(y1),
            num(x2),
            num(y2)
        ));
    }

    /// Stroke a dashed line with the given on/off pattern lengths.
    pub fn stroke_dashed_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        dash: (f64, f64),
        color: Rgb,
    ) {
        self.content_parts.push(format!(
            "q {} {} w [{} {}] 0 d {} {} m {} {} l S Q ",
            stroke(color),
            num(width),
            num(dash.0),
            num(dash.1),
            num(x1),
            num(y1),
            num(x2),
            num(y2)
        ));
    }

    /// Draw a single line of text with its baseline at (`x`, `y`).
    ///
    /// `Center` and `Right` alignment shift the start position using the
    /// font's metric width, matching the anchor semantics of the layout.
    pub fn text(
        &mut self,
        value: &str,
        font: StandardFont,
        size: f64,
        x: f64,
        y: f64,
        color: Rgb,
        align: TextAlign,
    ) {
        let width = font.text_width(value, size);
        let start_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };
        self.content_parts.push(format!(
            "q {} BT /{} {} Tf {} {} Td ({}) Tj ET Q ",
            fill(color),
            font.resource_name(),
            num(size),
            num(start_x),
            num(y),
            encode_text(value)
        ));
    }

    /// Embed an RGB image as a Flate-compressed XObject and draw it in the
    /// rectangle (`x`, `y`, `w`, `h`).
    pub fn draw_image(
        &mut self,
        doc: &mut Document,
        img: &RgbImage,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    ) -> Result<()> {
        let (px_w, px_h) = img.dimensions();
        let compressed = compress_data(img.as_raw())?;

        let img_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(px_w),
            "Height" => i64::from(px_h),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "FlateDecode",
        };
        let img_id = doc.add_object(Stream::new(img_dict, compressed));

        let img_name = format!("Im{}", img_id.0);
        self.xobjects.set(img_name.clone(), Object::Reference(img_id));

        self.content_parts.push(format!(
            "q {} 0 0 {} {} {} cm /{} Do Q ",
            num(w),
            num(h),
            num(x),
            num(y),
            img_name
        ));
        Ok(())
    }

    /// Build the final content stream bytes.
    pub fn build_content_bytes(&self) -> Vec<u8> {
        self.content_parts.join("").into_bytes()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

fn num(value: f64) -> String {
    format!("{:.2}", value)
}

fn fill((r, g, b): Rgb) -> String {
    format!("{} {} {} rg", num(r), num(g), num(b))
}

fn stroke((r, g, b): Rgb) -> String {
    format!("{} {} {} RG", num(r), num(g), num(b))
}

fn curve(c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> String {
    format!(
        "{} {} {} {} {} {} c ",
        num(c1x),
        num(c1y),
        num(c2x),
        num(c2y),
        num(x),
        num(y)
    )
}

/// Encode text as a WinAnsi PDF literal string, escapes included.
///
/// ASCII passes through with `(`, `)` and `\` escaped; Latin-1 characters
/// map to their WinAnsi byte as an octal escape; anything else degrades to
/// `?` (the ticket faces carry no wider encoding).
pub fn encode_text(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '(' => result.push_str(r"\("),
            ')' => result.push_str(r"\)"),
            '\\' => result.push_str(r"\\"),
            '\n' => result.push_str(r"\n"),
            '\r' => result.push_str(r"\r"),
            '\t' => result.push_str(r"\t"),
            c if (c as u32) < 0x80 => result.push(c),
            c if (0xA0..=0xFF).contains(&(c as u32)) => {
                result.push_str(&format!("\\{:03o}", c as u32));
            }
            _ => result.push('?'),
        }
    }
    result
}

/// Compress data using zlib/flate2.
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_text_escapes() {
        assert_eq!(encode_text("hello"), "hello");
        assert_eq!(encode_text("(hello)"), r"\(hello\)");
        assert_eq!(encode_text(r"a\b"), r"a\\b");
        assert_eq!(encode_text("line1\nline2"), r"line1\nline2");
    }

    #[test]
    fn test_encode_text_latin1_and_beyond() {
        // é is 0xE9 in WinAnsi
        assert_eq!(encode_text("é"), "\\351");
        // outside WinAnsi degrades to '?'
        assert_eq!(encode_text("日"), "?");
    }

    #[test]
    fn test_canvas_starts_empty() {
        let canvas = Canvas::new();
        assert!(canvas.build_content_bytes().is_empty());
        assert!(canvas.xobjects.is_empty());
    }

    #[test]
    fn test_fill_rect_operators() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(10.0, 20.0, 30.0, 40.0, (1.0, 0.5, 0.0));
        let content = String::from_utf8(canvas.build_content_bytes()).unwrap();
        assert_eq!(content, "q 1.00 0.50 0.00 rg 10.00 20.00 30.00 40.00 re f Q ");
    }

    #[test]
    fn test_round_rect_uses_beziers() {
        let mut canvas = Canvas::new();
        canvas.fill_round_rect(0.0, 0.0, 100.0, 50.0, 5.0, (0.0, 0.0, 0.0));
        let content = String::from_utf8(canvas.build_content_bytes()).unwrap();
        // four corners, four curves
        assert_eq!(content.matches(" c ").count(), 4);
        assert!(content.ends_with("f Q "));
    }

    #[test]
    fn test_circle_is_closed_path() {
        let mut canvas = Canvas::new();
        canvas.fill_circle(50.0, 50.0, 10.0, (1.0, 1.0, 1.0));
        let content = String::from_utf8(canvas.build_content_bytes()).unwrap();
        assert_eq!(content.matches(" c ").count(), 4);
        assert!(content.contains("60.00 50.00 m"));
    }

    #[test]
    fn test_dashed_line_pattern() {
        let mut canvas = Canvas::new();
        canvas.stroke_dashed_line(0.0, 5.0, 100.0, 5.0, 0.5, (3.0, 2.0), (0.9, 0.9, 0.9));
        let content = String::from_utf8(canvas.build_content_bytes()).unwrap();
        assert!(content.contains("[3.00 2.00] 0 d"));
        assert!(content.contains("RG"));
        assert!(content.contains("S Q"));
    }

    #[test]
    fn test_text_alignment_shifts_start() {
        let mut left = Canvas::new();
        left.text("SEAT", StandardFont::Helvetica, 10.0, 100.0, 50.0, (0.0, 0.0, 0.0), TextAlign::Left);
        let mut centered = Canvas::new();
        centered.text("SEAT", StandardFont::Helvetica, 10.0, 100.0, 50.0, (0.0, 0.0, 0.0), TextAlign::Center);
        let left_content = String::from_utf8(left.build_content_bytes()).unwrap();
        let centered_content = String::from_utf8(centered.build_content_bytes()).unwrap();
        assert!(left_content.contains("100.00 50.00 Td"));
        assert!(!centered_content.contains("100.00 50.00 Td"));
        assert!(centered_content.contains("(SEAT) Tj"));
    }

    #[test]
    fn test_text_uses_font_resource() {
        let mut canvas = Canvas::new();
        canvas.text("GAB", StandardFont::HelveticaBold, 24.0, 0.0, 0.0, (0.0, 0.0, 0.0), TextAlign::Left);
        let content = String::from_utf8(canvas.build_content_bytes()).unwrap();
        assert!(content.contains("/F2 24.00 Tf"));
    }

    #[test]
    fn test_draw_image_registers_xobject() {
        let mut doc = Document::with_version("1.5");
        let mut canvas = Canvas::new();
        let img = RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
        canvas.draw_image(&mut doc, &img, 10.0, 10.0, 80.0, 80.0).unwrap();
        assert_eq!(canvas.xobjects.len(), 1);
        let content = String::from_utf8(canvas.build_content_bytes()).unwrap();
        assert!(content.contains("cm /Im"));
        assert!(content.contains(" Do Q"));
    }
}
