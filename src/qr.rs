//! QR payload encoding for ticket verification.
//!
//! The scannable payload is the minimal versioned structure
//! `{"ref": <booking_reference>, "v": 1}`. Encoding is capability-gated
//! behind the default-on `qr` feature; with the feature off, or when the
//! symbol encoder rejects the data, `encode` returns `None` and the
//! renderer falls back to placeholder text. This function never aborts a
//! render.

use image::RgbImage;
use serde::Serialize;

/// Current payload format version.
pub const PAYLOAD_VERSION: u32 = 1;

/// Minimal verification payload embedded in the QR image.
#[derive(Debug, Serialize)]
pub struct QrPayload<'a> {
    #[serde(rename = "ref")]
    pub reference: &'a str,
    pub v: u32,
}

impl<'a> QrPayload<'a> {
    pub fn new(reference: &'a str) -> Self {
        Self {
            reference,
            v: PAYLOAD_VERSION,
        }
    }
}

/// Encode the payload as a QR image, dark modules in the brand primary.
///
/// Error-correction level M, 10x10-pixel modules, standard quiet zone.
#[cfg(feature = "qr")]
pub fn encode(payload: &QrPayload) -> Option<RgbImage> {
    use crate::pdf::layout::PRIMARY_RGB8;
    use image::Luma;
    use qrcode::{EcLevel, QrCode};

    let json = serde_json::to_string(payload).ok()?;
    let code = QrCode::with_error_correction_level(json.as_bytes(), EcLevel::M).ok()?;
    let gray = code
        .render::<Luma<u8>>()
        .module_dimensions(10, 10)
        .light_color(Luma([255u8]))
        .dark_color(Luma([0u8]))
        .build();

    let mut img = RgbImage::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        let rgb = if pixel[0] < 128 {
            PRIMARY_RGB8
        } else {
            [255, 255, 255]
        };
        img.put_pixel(x, y, image::Rgb(rgb));
    }
    Some(img)
}

/// No-op encoder selected when the `qr` feature is disabled.
#[cfg(not(feature = "qr"))]
pub fn encode(_payload: &QrPayload) -> Option<RgbImage> {
    None
}
