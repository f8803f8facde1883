//! Ticket layout constants.
//!
//! Every measurement on the ticket lives here, in millimeters, so the fixed
//! single-page layout stays auditable in one place. Vertical anchors are
//! measured from the top edge of the page (the order the sections are drawn
//! in); the footer is anchored from the bottom edge.

/// RGB color with components on a 0-1 scale.
pub type Rgb = (f64, f64, f64);

// A5 page
pub const PAGE_WIDTH_MM: f64 = 148.0;
pub const PAGE_HEIGHT_MM: f64 = 210.0;
pub const MARGIN_MM: f64 = 10.0;

// Header band
pub const HEADER_BAND_MM: f64 = 35.0;
pub const BRAND_BASELINE_MM: f64 = 18.0;
pub const TAGLINE_BASELINE_MM: f64 = 24.0;
pub const ETICKET_BADGE_W_MM: f64 = 25.0;
pub const ETICKET_BADGE_H_MM: f64 = 10.0;
pub const ETICKET_BADGE_TOP_MM: f64 = 22.0;
pub const ETICKET_BADGE_RADIUS_MM: f64 = 2.0;
pub const ETICKET_TEXT_TOP_MM: f64 = 16.0;

// Route band
pub const ROUTE_ANCHOR_MM: f64 = 55.0;
pub const ROUTE_CODE_INSET_MM: f64 = 20.0;
pub const ROUTE_NAME_DROP_MM: f64 = 6.0;
pub const ROUTE_LINE_INSET_MM: f64 = 40.0;
pub const ROUTE_LINE_RISE_MM: f64 = 3.0;
pub const ROUTE_MARKER_RADIUS_MM: f64 = 4.0;
pub const ROUTE_MARKER_TEXT_RISE_MM: f64 = 1.5;

// Date / departure boxes
pub const SCHEDULE_ANCHOR_MM: f64 = 80.0;
pub const SCHEDULE_BOX_W_MM: f64 = 50.0;
pub const SCHEDULE_BOX_H_MM: f64 = 18.0;
pub const SCHEDULE_BOX_RADIUS_MM: f64 = 3.0;
pub const SCHEDULE_CAPTION_RISE_MM: f64 = 13.0;
pub const SCHEDULE_PAD_MM: f64 = 4.0;
pub const DATE_VALUE_RISE_MM: f64 = 5.0;
pub const TIME_VALUE_RISE_MM: f64 = 4.0;

// Perforation divider
pub const DIVIDER_ANCHOR_MM: f64 = 105.0;
// dash lengths are in points, not millimeters
pub const DIVIDER_DASH_ON_PT: f64 = 3.0;
pub const DIVIDER_DASH_OFF_PT: f64 = 2.0;
pub const CUTOUT_RADIUS_MM: f64 = 5.0;

// Passenger block
pub const PASSENGER_ANCHOR_MM: f64 = 125.0;
pub const PASSENGER_CAPTION_RISE_MM: f64 = 8.0;
pub const PHONE_CAPTION_DROP_MM: f64 = 10.0;
pub const PHONE_VALUE_DROP_MM: f64 = 17.0;
pub const SEAT_BADGE_W_MM: f64 = 25.0;
pub const SEAT_BADGE_H_MM: f64 = 18.0;
pub const SEAT_BADGE_RADIUS_MM: f64 = 3.0;
pub const SEAT_BADGE_DROP_MM: f64 = 12.0;
pub const SEAT_TEXT_DROP_MM: f64 = 5.0;

// Booking reference block
pub const REFERENCE_ANCHOR_MM: f64 = 155.0;
pub const REFERENCE_CAPTION_RISE_MM: f64 = 5.0;
pub const REFERENCE_VALUE_DROP_MM: f64 = 5.0;
pub const STATUS_BADGE_W_MM: f64 = 20.0;
pub const STATUS_BADGE_H_MM: f64 = 8.0;
pub const STATUS_BADGE_RADIUS_MM: f64 = 2.0;
pub const STATUS_TEXT_RISE_MM: f64 = 2.5;

// Amount block and QR region
pub const AMOUNT_ANCHOR_MM: f64 = 190.0;
pub const AMOUNT_CAPTION_RISE_MM: f64 = 15.0;
pub const AMOUNT_VALUE_RISE_MM: f64 = 3.0;
pub const METHOD_DROP_MM: f64 = 5.0;
pub const QR_SIZE_MM: f64 = 28.0;
pub const QR_RIGHT_INSET_MM: f64 = 30.0;
pub const QR_DROP_MM: f64 = 5.0;
pub const QR_BACKING_PAD_MM: f64 = 2.0;
pub const QR_BACKING_RADIUS_MM: f64 = 3.0;
pub const QR_PLACEHOLDER_SPREAD_MM: f64 = 2.0;

// Footer (anchored from the bottom edge)
pub const FOOTER_ANCHOR_MM: f64 = 15.0;
pub const FOOTER_RULE_RISE_MM: f64 = 8.0;
pub const FOOTER_CONTACT_RISE_MM: f64 = 3.0;
pub const FOOTER_NOTICE_DROP_MM: f64 = 2.0;

// Brand palette
pub const PRIMARY: Rgb = (0.106, 0.302, 0.290); // #1B4D4A
pub const ACCENT: Rgb = (0.961, 0.651, 0.137); // #F5A623
pub const SUCCESS: Rgb = (0.133, 0.773, 0.369); // #22C55E
pub const GRAY: Rgb = (0.392, 0.455, 0.545); // #64748B
pub const LIGHT_GRAY: Rgb = (0.945, 0.961, 0.976); // #F1F5F9
pub const WHITE: Rgb = (1.0, 1.0, 1.0);
pub const BLACK: Rgb = (0.059, 0.090, 0.165); // #0F172A

/// The primary color as 8-bit RGB, for pixel images.
pub const PRIMARY_RGB8: [u8; 3] = [27, 77, 74];

// Brand strings
pub const COMPANY_NAME: &str = "GOGOBUS";
pub const TAGLINE: &str = "Travel with Confidence";
pub const PHONE: &str = "+267 12 345 678";
pub const EMAIL: &str = "support@gogobus.co.bw";
pub const WEBSITE: &str = "www.gogobus.co.bw";
pub const BOARDING_NOTICE: &str =
    "Please arrive at the station 30 minutes before departure. This ticket is non-transferable.";

/// Convert millimeters to points (1 inch = 72 points).
pub fn mm(value: f64) -> f64 {
    value * 72.0 / 25.4
}

/// Page width in points.
pub fn page_width() -> f64 {
    mm(PAGE_WIDTH_MM)
}

/// Page height in points.
pub fn page_height() -> f64 {
    mm(PAGE_HEIGHT_MM)
}

/// Vertical anchor in points for a section measured from the top edge.
pub fn from_top(mm_from_top: f64) -> f64 {
    mm(PAGE_HEIGHT_MM - mm_from_top)
}
