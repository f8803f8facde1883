//! Fixed-layout A5 ticket rendering.
//!
//! One call builds one single-page document: eight sections drawn top to
//! bottom at the coordinates in `layout`, finalized to a byte buffer. Every
//! section is always drawn; only the text content varies with the booking.

use anyhow::{Context, Result};
use image::RgbImage;
use lopdf::{Document, Object, Stream, dictionary};

use super::canvas::{Canvas, TextAlign};
use super::fonts::{StandardFont, create_font};
use super::layout::{self as l, mm};
use crate::booking::ResolvedTicket;

use StandardFont::{Helvetica, HelveticaBold};
use TextAlign::{Center, Left, Right};

/// Render a resolved booking as PDF bytes.
///
/// The QR image is optional; without one the QR region carries placeholder
/// text instead. Output is byte-identical for identical inputs.
pub fn render_ticket(ticket: &ResolvedTicket, qr_image: Option<&RgbImage>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = create_font(&mut doc, Helvetica);
    let bold_id = create_font(&mut doc, HelveticaBold);

    let mut canvas = Canvas::new();
    draw_header(&mut canvas);
    draw_route(&mut canvas, ticket);
    draw_schedule(&mut canvas, ticket);
    draw_divider(&mut canvas);
    draw_passenger(&mut canvas, ticket);
    draw_reference(&mut canvas, ticket);
    draw_amount_and_qr(&mut canvas, &mut doc, ticket, qr_image)?;
    draw_footer(&mut canvas);

    let content_id = doc.add_object(Stream::new(dictionary! {}, canvas.build_content_bytes()));

    let mut resources = dictionary! {
        "Font" => dictionary! {
            Helvetica.resource_name() => regular_id,
            HelveticaBold.resource_name() => bold_id,
        },
    };
    if !canvas.xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(canvas.xobjects.clone()));
    }
    let resources_id = doc.add_object(resources);

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), (l::page_width() as f32).into(), (l::page_height() as f32).into()],
        "Contents" => content_id,
        "Resources" => resources_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(format!("{} Ticket - {}", l::COMPANY_NAME, ticket.reference)),
        "Author" => Object::string_literal(l::COMPANY_NAME),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .with_context(|| "Failed to serialize ticket PDF")?;
    Ok(buffer)
}

/// Brand band across the top: company name, tagline, E-TICKET badge.
fn draw_header(canvas: &mut Canvas) {
    let band_top = l::page_height();
    let band_h = mm(l::HEADER_BAND_MM);
    canvas.fill_rect(0.0, band_top - band_h, l::page_width(), band_h, l::PRIMARY);

    canvas.text(
        l::COMPANY_NAME,
        HelveticaBold,
        20.0,
        mm(l::MARGIN_MM),
        l::from_top(l::BRAND_BASELINE_MM),
        l::WHITE,
        Left,
    );
    canvas.text(
        l::TAGLINE,
        Helvetica,
        8.0,
        mm(l::MARGIN_MM),
        l::from_top(l::TAGLINE_BASELINE_MM),
        l::WHITE,
        Left,
    );

    let badge_x = l::page_width() - mm(l::MARGIN_MM) - mm(l::ETICKET_BADGE_W_MM);
    canvas.fill_round_rect(
        badge_x,
        l::from_top(l::ETICKET_BADGE_TOP_MM),
        mm(l::ETICKET_BADGE_W_MM),
        mm(l::ETICKET_BADGE_H_MM),
        mm(l::ETICKET_BADGE_RADIUS_MM),
        l::ACCENT,
    );
    canvas.text(
        "E-TICKET",
        HelveticaBold,
        7.0,
        badge_x + mm(l::ETICKET_BADGE_W_MM) / 2.0,
        l::from_top(l::ETICKET_TEXT_TOP_MM),
        l::WHITE,
        Center,
    );
}

/// Origin and destination codes with full names, joined by the route line
/// and the midpoint marker.
fn draw_route(canvas: &mut Canvas, ticket: &ResolvedTicket) {
    let y = l::from_top(l::ROUTE_ANCHOR_MM);
    let origin_x = mm(l::MARGIN_MM) + mm(l::ROUTE_CODE_INSET_MM);
    let dest_x = l::page_width() - mm(l::MARGIN_MM) - mm(l::ROUTE_CODE_INSET_MM);

    canvas.text(&ticket.origin_code, HelveticaBold, 24.0, origin_x, y, l::BLACK, Center);
    canvas.text(
        &ticket.origin,
        Helvetica,
        9.0,
        origin_x,
        y - mm(l::ROUTE_NAME_DROP_MM),
        l::GRAY,
        Center,
    );

    let line_y = y + mm(l::ROUTE_LINE_RISE_MM);
    canvas.stroke_line(
        mm(l::MARGIN_MM) + mm(l::ROUTE_LINE_INSET_MM),
        line_y,
        l::page_width() - mm(l::MARGIN_MM) - mm(l::ROUTE_LINE_INSET_MM),
        line_y,
        1.0,
        l::LIGHT_GRAY,
    );

    let mid_x = l::page_width() / 2.0;
    canvas.fill_circle(mid_x, line_y, mm(l::ROUTE_MARKER_RADIUS_MM), l::ACCENT);
    canvas.text(
        "BUS",
        HelveticaBold,
        5.0,
        mid_x,
        y + mm(l::ROUTE_MARKER_TEXT_RISE_MM),
        l::WHITE,
        Center,
    );

    canvas.text(&ticket.destination_code, HelveticaBold, 24.0, dest_x, y, l::BLACK, Center);
    canvas.text(
        &ticket.destination,
        Helvetica,
        9.0,
        dest_x,
        y - mm(l::ROUTE_NAME_DROP_MM),
        l::GRAY,
        Center,
    );
}

/// The date and departure-time boxes.
fn draw_schedule(canvas: &mut Canvas, ticket: &ResolvedTicket) {
    let y = l::from_top(l::SCHEDULE_ANCHOR_MM);
    let box_w = mm(l::SCHEDULE_BOX_W_MM);
    let box_h = mm(l::SCHEDULE_BOX_H_MM);
    let radius = mm(l::SCHEDULE_BOX_RADIUS_MM);
    let pad = mm(l::SCHEDULE_PAD_MM);

    let date_x = mm(l::MARGIN_MM);
    canvas.fill_round_rect(date_x, y, box_w, box_h, radius, l::LIGHT_GRAY);
    canvas.text(
        "DATE",
        Helvetica,
        7.0,
        date_x + pad,
        y + mm(l::SCHEDULE_CAPTION_RISE_MM),
        l::GRAY,
        Left,
    );
    canvas.text(
        &ticket.date_display,
        HelveticaBold,
        10.0,
        date_x + pad,
        y + mm(l::DATE_VALUE_RISE_MM),
        l::BLACK,
        Left,
    );

    let time_x = l::page_width() - mm(l::MARGIN_MM) - box_w;
    canvas.fill_round_rect(time_x, y, box_w, box_h, radius, l::LIGHT_GRAY);
    canvas.text(
        "DEPARTURE",
        Helvetica,
        7.0,
        time_x + pad,
        y + mm(l::SCHEDULE_CAPTION_RISE_MM),
        l::GRAY,
        Left,
    );
    canvas.text(
        &ticket.time_display,
        HelveticaBold,
        16.0,
        time_x + pad,
        y + mm(l::TIME_VALUE_RISE_MM),
        l::PRIMARY,
        Left,
    );
}

/// Perforation: dashed rule with white cut-out circles at both edges.
fn draw_divider(canvas: &mut Canvas) {
    let y = l::from_top(l::DIVIDER_ANCHOR_MM);
    canvas.stroke_dashed_line(
        mm(l::MARGIN_MM),
        y,
        l::page_width() - mm(l::MARGIN_MM),
        y,
        0.5,
        (l::DIVIDER_DASH_ON_PT, l::DIVIDER_DASH_OFF_PT),
        l::LIGHT_GRAY,
    );
    canvas.fill_circle(0.0, y, mm(l::CUTOUT_RADIUS_MM), l::WHITE);
    canvas.fill_circle(l::page_width(), y, mm(l::CUTOUT_RADIUS_MM), l::WHITE);
}

/// Passenger name, phone, and the seat badge.
fn draw_passenger(canvas: &mut Canvas, ticket: &ResolvedTicket) {
    let y = l::from_top(l::PASSENGER_ANCHOR_MM);
    let left = mm(l::MARGIN_MM);

    canvas.text(
        "PASSENGER",
        Helvetica,
        7.0,
        left,
        y + mm(l::PASSENGER_CAPTION_RISE_MM),
        l::GRAY,
        Left,
    );
    canvas.text(
        &ticket.passenger_name.to_uppercase(),
        HelveticaBold,
        12.0,
        left,
        y,
        l::BLACK,
        Left,
    );

    canvas.text(
        "PHONE",
        Helvetica,
        7.0,
        left,
        y - mm(l::PHONE_CAPTION_DROP_MM),
        l::GRAY,
        Left,
    );
    canvas.text(
        &ticket.passenger_phone,
        Helvetica,
        10.0,
        left,
        y - mm(l::PHONE_VALUE_DROP_MM),
        l::BLACK,
        Left,
    );

    let badge_x = l::page_width() - mm(l::MARGIN_MM) - mm(l::SEAT_BADGE_W_MM);
    canvas.text(
        "SEAT",
        Helvetica,
        7.0,
        badge_x,
        y + mm(l::PASSENGER_CAPTION_RISE_MM),
        l::GRAY,
        Left,
    );
    canvas.fill_round_rect(
        badge_x,
        y - mm(l::SEAT_BADGE_DROP_MM),
        mm(l::SEAT_BADGE_W_MM),
        mm(l::SEAT_BADGE_H_MM),
        mm(l::SEAT_BADGE_RADIUS_MM),
        l::PRIMARY,
    );
    canvas.text(
        &ticket.seat_number,
        HelveticaBold,
        16.0,
        badge_x + mm(l::SEAT_BADGE_W_MM) / 2.0,
        y - mm(l::SEAT_TEXT_DROP_MM),
        l::WHITE,
        Center,
    );
}

/// Booking reference and the payment-status badge.
fn draw_reference(canvas: &mut Canvas, ticket: &ResolvedTicket) {
    let y = l::from_top(l::REFERENCE_ANCHOR_MM);
    let left = mm(l::MARGIN_MM);

    canvas.text(
        "BOOKING REFERENCE",
        Helvetica,
        7.0,
        left,
        y + mm(l::REFERENCE_CAPTION_RISE_MM),
        l::GRAY,
        Left,
    );
    canvas.text(
        &ticket.reference,
        HelveticaBold,
        18.0,
        left,
        y - mm(l::REFERENCE_VALUE_DROP_MM),
        l::PRIMARY,
        Left,
    );

    let badge_color = if ticket.is_paid() { l::SUCCESS } else { l::ACCENT };
    let badge_x = l::page_width() - mm(l::MARGIN_MM) - mm(l::STATUS_BADGE_W_MM);
    canvas.fill_round_rect(
        badge_x,
        y,
        mm(l::STATUS_BADGE_W_MM),
        mm(l::STATUS_BADGE_H_MM),
        mm(l::STATUS_BADGE_RADIUS_MM),
        badge_color,
    );
    canvas.text(
        &ticket.payment_status.to_uppercase(),
        HelveticaBold,
        6.0,
        badge_x + mm(l::STATUS_BADGE_W_MM) / 2.0,
        y + mm(l::STATUS_TEXT_RISE_MM),
        l::WHITE,
        Center,
    );
}

/// Amount and payment method on the left, QR region on the right.
fn draw_amount_and_qr(
    canvas: &mut Canvas,
    doc: &mut Document,
    ticket: &ResolvedTicket,
    qr_image: Option<&RgbImage>,
) -> Result<()> {
    let y = l::from_top(l::AMOUNT_ANCHOR_MM);
    let left = mm(l::MARGIN_MM);

    canvas.text(
        "AMOUNT PAID",
        Helvetica,
        7.0,
        left,
        y + mm(l::AMOUNT_CAPTION_RISE_MM),
        l::GRAY,
        Left,
    );
    canvas.text(
        &ticket.amount_display,
        HelveticaBold,
        20.0,
        left,
        y + mm(l::AMOUNT_VALUE_RISE_MM),
        l::BLACK,
        Left,
    );
    canvas.text(
        &format!("via {}", ticket.payment_method_label),
        Helvetica,
        8.0,
        left,
        y - mm(l::METHOD_DROP_MM),
        l::GRAY,
        Left,
    );

    let qr_size = mm(l::QR_SIZE_MM);
    let qr_x = l::page_width() - mm(l::MARGIN_MM) - mm(l::QR_RIGHT_INSET_MM);
    let qr_y = y - mm(l::QR_DROP_MM);
    let pad = mm(l::QR_BACKING_PAD_MM);

    canvas.fill_round_rect(
        qr_x - pad,
        qr_y - pad,
        qr_size + 2.0 * pad,
        qr_size + 2.0 * pad,
        mm(l::QR_BACKING_RADIUS_MM),
        l::LIGHT_GRAY,
    );

    match qr_image {
        Some(img) => canvas.draw_image(doc, img, qr_x, qr_y, qr_size, qr_size)?,
        None => {
            let center_x = qr_x + qr_size / 2.0;
            let center_y = qr_y + qr_size / 2.0;
            let spread = mm(l::QR_PLACEHOLDER_SPREAD_MM);
            canvas.text("SCAN TO", Helvetica, 6.0, center_x, center_y + spread, l::GRAY, Center);
            canvas.text("VERIFY", Helvetica, 6.0, center_x, center_y - spread, l::GRAY, Center);
        }
    }
    Ok(())
}

/// Contact row and the fixed boarding notice.
fn draw_footer(canvas: &mut Canvas) {
    let y = mm(l::FOOTER_ANCHOR_MM);
    let left = mm(l::MARGIN_MM);
    let right = l::page_width() - mm(l::MARGIN_MM);

    canvas.stroke_line(left, y + mm(l::FOOTER_RULE_RISE_MM), right, y + mm(l::FOOTER_RULE_RISE_MM), 0.3, l::LIGHT_GRAY);

    let contact_y = y + mm(l::FOOTER_CONTACT_RISE_MM);
    canvas.text(l::PHONE, Helvetica, 6.0, left, contact_y, l::GRAY, Left);
    canvas.text(l::EMAIL, Helvetica, 6.0, l::page_width() / 2.0, contact_y, l::GRAY, Center);
    canvas.text(l::WEBSITE, Helvetica, 6.0, right, contact_y, l::GRAY, Right);

    canvas.text(
        l::BOARDING_NOTICE,
        Helvetica,
        5.0,
        l::page_width() / 2.0,
        y - mm(l::FOOTER_NOTICE_DROP_MM),
        l::GRAY,
        Center,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{self, BookingRecord};
    use serde_json::json;

    fn resolve(value: serde_json::Value) -> ResolvedTicket {
        let record: BookingRecord = serde_json::from_value(value).unwrap();
        booking::resolve(&record).unwrap()
    }

    fn render_text(ticket: &ResolvedTicket, qr: Option<&RgbImage>) -> String {
        let bytes = render_ticket(ticket, qr).unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_render_produces_pdf_signature() {
        let bytes = render_ticket(&resolve(json!({})), None).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_render_is_byte_identical() {
        let ticket = resolve(json!({"booking_reference": "BK3F8A2C"}));
        let first = render_ticket(&ticket, None).unwrap();
        let second = render_ticket(&ticket, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_has_single_a5_page() {
        let bytes = render_ticket(&resolve(json!({})), None).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page = doc.get_dictionary(*pages.values().next().unwrap()).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert!((media_box[2].as_float().unwrap() as f64 - 419.53).abs() < 0.01);
        assert!((media_box[3].as_float().unwrap() as f64 - 595.28).abs() < 0.01);
    }

    #[test]
    fn test_missing_departure_renders_placeholders() {
        let content = render_text(&resolve(json!({})), None);
        assert!(content.contains("Date TBC"));
        assert!(content.contains("--:--"));
    }

    #[test]
    fn test_route_abbreviation_rendered() {
        let ticket = resolve(json!({"origin": "Gaborone", "destination": "Maun"}));
        let content = render_text(&ticket, None);
        assert!(content.contains("(GAB) Tj"));
        assert!(content.contains("(MAU) Tj"));
        assert!(content.contains("(Gaborone) Tj"));
    }

    #[test]
    fn test_nested_trip_price_renders_as_amount() {
        let ticket = resolve(json!({"trips": {"price": 450}}));
        let content = render_text(&ticket, None);
        assert!(content.contains("(P450.00) Tj"));
    }

    #[test]
    fn test_paid_badge_uses_success_color() {
        let success = "0.13 0.77 0.37 rg";
        let paid = render_text(&resolve(json!({"payment_status": "paid"})), None);
        assert!(paid.contains(success));
        assert!(paid.contains("(PAID) Tj"));

        // any other value, including upper-case, gets the attention color
        let pending = render_text(&resolve(json!({"payment_status": "PAID"})), None);
        assert!(!pending.contains(success));
    }

    #[test]
    fn test_qr_absent_renders_placeholder() {
        let content = render_text(&resolve(json!({})), None);
        assert!(content.contains("(SCAN TO) Tj"));
        assert!(content.contains("(VERIFY) Tj"));
        assert!(!content.contains(" Do Q"));
    }

    #[test]
    fn test_qr_image_embedded_when_present() {
        let img = RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        let content = render_text(&resolve(json!({})), Some(&img));
        assert!(content.contains(" Do Q"));
        assert!(!content.contains("(SCAN TO) Tj"));
    }

    #[test]
    fn test_every_section_always_drawn() {
        let content = render_text(&resolve(json!({})), None);
        for fixed in [
            "(GOGOBUS) Tj",
            "(E-TICKET) Tj",
            "(BUS) Tj",
            "(DATE) Tj",
            "(DEPARTURE) Tj",
            "(PASSENGER) Tj",
            "(PHONE) Tj",
            "(SEAT) Tj",
            "(BOOKING REFERENCE) Tj",
            "(AMOUNT PAID) Tj",
            "(www.gogobus.co.bw) Tj",
        ] {
            assert!(content.contains(fixed), "missing section text: {fixed}");
        }
    }

    #[test]
    fn test_document_metadata() {
        let ticket = resolve(json!({"booking_reference": "BK3F8A2C"}));
        let content = render_text(&ticket, None);
        assert!(content.contains("GOGOBUS Ticket - BK3F8A2C"));
    }
}
