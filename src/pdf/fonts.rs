use lopdf::{Document, ObjectId, dictionary};

/// Standard PDF Type1 fonts used on the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

/// Advance width used for characters outside the metric tables.
const DEFAULT_WIDTH: u16 = 556;

/// Helvetica advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
/// Values are the standard Adobe AFM metrics.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 0x20..=0x7E, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl StandardFont {
    /// PDF BaseFont name.
    pub fn base_font_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name the font is registered under in the page dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
        }
    }

    fn advance(&self, c: char) -> u16 {
        let table = match self {
            StandardFont::Helvetica => &HELVETICA_WIDTHS,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        let code = c as u32;
        if (0x20..=0x7E).contains(&code) {
            table[(code - 0x20) as usize]
        } else {
            DEFAULT_WIDTH
        }
    }

    /// Width of `text` in points at the given font size.
    ///
    /// Characters outside printable ASCII are measured at a nominal width;
    /// the ticket centers only Latin text so this is exact in practice.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.advance(c))).sum();
        f64::from(units) * size / 1000.0
    }
}

/// Register a standard font in the document and return its object id.
pub fn create_font(doc: &mut Document, font: StandardFont) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font_name(),
        "Encoding" => "WinAnsiEncoding",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_font_names() {
        assert_eq!(StandardFont::Helvetica.base_font_name(), "Helvetica");
        assert_eq!(StandardFont::HelveticaBold.base_font_name(), "Helvetica-Bold");
    }

    #[test]
    fn test_resource_names_distinct() {
        assert_ne!(
            StandardFont::Helvetica.resource_name(),
            StandardFont::HelveticaBold.resource_name()
        );
    }

    #[test]
    fn test_text_width_empty() {
        assert_eq!(StandardFont::Helvetica.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_text_width_known_metrics() {
        // 'A' is 667/1000 em in Helvetica; digits are 556.
        assert!((StandardFont::Helvetica.text_width("A", 1000.0) - 667.0).abs() < 1e-9);
        assert!((StandardFont::Helvetica.text_width("0", 10.0) - 5.56).abs() < 1e-9);
        // space differs from 'W'
        let space = StandardFont::Helvetica.text_width(" ", 12.0);
        let wide = StandardFont::Helvetica.text_width("W", 12.0);
        assert!(space < wide);
    }

    #[test]
    fn test_bold_wider_than_regular() {
        let regular = StandardFont::Helvetica.text_width("PASSENGER", 10.0);
        let bold = StandardFont::HelveticaBold.text_width("PASSENGER", 10.0);
        assert!(bold > regular);
    }

    #[test]
    fn test_non_ascii_uses_default_width() {
        let w = StandardFont::Helvetica.text_width("é", 1000.0);
        assert_eq!(w, f64::from(DEFAULT_WIDTH));
    }

    #[test]
    fn test_create_font_registers_object() {
        let mut doc = Document::with_version("1.5");
        let id = create_font(&mut doc, StandardFont::HelveticaBold);
        let dict = doc.get_dictionary(id).unwrap();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");
    }
}
