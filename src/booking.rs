//! Booking records and field resolution.
//!
//! This module handles:
//! - Deserializing the loosely-typed booking JSON (all fields optional,
//!   amounts carried as raw JSON values)
//! - Resolving a record into the fully-defaulted `ResolvedTicket` view the
//!   renderer draws, with the documented fallback chains
//! - The built-in sample record used when no JSON file is supplied

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Value, json};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const PLACEHOLDER_DATE: &str = "Date TBC";
const PLACEHOLDER_TIME: &str = "--:--";

/// One booking as it arrives from the outside world. Every field is
/// optional; `resolve` supplies the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingRecord {
    pub booking_reference: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_time: Option<Value>,
    pub passenger_name: Option<String>,
    pub passenger_phone: Option<String>,
    pub seat_number: Option<String>,
    pub total_amount: Option<Value>,
    pub price: Option<Value>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub trips: Option<TripInfo>,
}

/// Nested trip details, when the booking carries them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripInfo {
    pub departure_time: Option<Value>,
    pub price: Option<Value>,
    pub routes: Option<RouteInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteInfo {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

/// The flattened, defaulted view the renderer draws. Computed once per
/// render, never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTicket {
    pub reference: String,
    pub origin: String,
    pub destination: String,
    pub origin_code: String,
    pub destination_code: String,
    pub date_display: String,
    pub time_display: String,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub seat_number: String,
    pub amount_display: String,
    pub payment_status: String,
    pub payment_method_label: String,
}

impl ResolvedTicket {
    /// The binary badge policy: success color iff the status is exactly
    /// `"paid"` (case-sensitive).
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }
}

/// Resolve a booking record into the render-ready view.
///
/// Missing optional fields and unparsable dates degrade to placeholders.
/// The one fatal case is an amount value that is present but not numeric.
pub fn resolve(record: &BookingRecord) -> Result<ResolvedTicket> {
    let routes = record.trips.as_ref().and_then(|t| t.routes.as_ref());
    let origin = routes
        .and_then(|r| r.origin.clone())
        .or_else(|| record.origin.clone())
        .unwrap_or_else(|| "ORIGIN".to_string());
    let destination = routes
        .and_then(|r| r.destination.clone())
        .or_else(|| record.destination.clone())
        .unwrap_or_else(|| "DESTINATION".to_string());

    let departure = record
        .trips
        .as_ref()
        .and_then(|t| present(&t.departure_time))
        .or_else(|| present(&record.departure_time));
    let (date_display, time_display) = departure
        .and_then(format_departure)
        .unwrap_or_else(|| (PLACEHOLDER_DATE.to_string(), PLACEHOLDER_TIME.to_string()));

    let amount = resolve_amount(record)?;

    let method = record.payment_method.as_deref().unwrap_or("N/A");

    Ok(ResolvedTicket {
        reference: record
            .booking_reference
            .clone()
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        origin_code: abbreviate(&origin),
        destination_code: abbreviate(&destination),
        origin,
        destination,
        date_display,
        time_display,
        passenger_name: record
            .passenger_name
            .clone()
            .unwrap_or_else(|| "PASSENGER".to_string()),
        passenger_phone: record
            .passenger_phone
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
        seat_number: record
            .seat_number
            .clone()
            .unwrap_or_else(|| "--".to_string()),
        amount_display: format!("P{:.2}", amount),
        payment_status: record
            .payment_status
            .clone()
            .unwrap_or_else(|| "pending".to_string()),
        payment_method_label: method_label(method),
    })
}

/// Load a booking record from a JSON file.
pub fn load_booking(path: &Path) -> Result<BookingRecord> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open booking file at {:?}", path))?;
    let reader = BufReader::new(file);
    let record: BookingRecord = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse booking file at {:?}", path))?;
    Ok(record)
}

/// Built-in sample record for the CLI's no-JSON path, departing today at
/// 06:00 from Gaborone to Maun.
pub fn sample(reference: &str) -> BookingRecord {
    let departure = format!("{}T06:00:00", Local::now().date_naive().format("%Y-%m-%d"));

    BookingRecord {
        booking_reference: Some(reference.to_string()),
        passenger_name: Some("Thabo Molefe".to_string()),
        passenger_phone: Some("+267 71 234 567".to_string()),
        seat_number: Some("2A".to_string()),
        total_amount: Some(json!(472.50)),
        payment_status: Some("paid".to_string()),
        payment_method: Some("card".to_string()),
        trips: Some(TripInfo {
            departure_time: Some(json!(departure)),
            price: Some(json!(450)),
            routes: Some(RouteInfo {
                origin: Some("Gaborone".to_string()),
                destination: Some("Maun".to_string()),
            }),
        }),
        ..Default::default()
    }
}

/// First 3 characters, upper-cased. Shorter strings truncate naturally.
fn abbreviate(name: &str) -> String {
    name.chars().take(3).collect::<String>().to_uppercase()
}

/// A JSON `null` counts as absent everywhere a field is optional.
fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

/// Display label for a payment method code. Unknown codes pass through.
fn method_label(code: &str) -> String {
    match code {
        "card" => "Credit/Debit Card".to_string(),
        "orange_money" => "Orange Money".to_string(),
        "myzaka" => "MyZaka".to_string(),
        "cash" => "Cash".to_string(),
        "bank_transfer" => "Bank Transfer".to_string(),
        other => other.to_string(),
    }
}

/// First present amount among `total_amount`, `price`, `trips.price`;
/// 0 when all are absent. A present but non-numeric value is an error.
fn resolve_amount(record: &BookingRecord) -> Result<f64> {
    let candidate = present(&record.total_amount)
        .or_else(|| present(&record.price))
        .or_else(|| record.trips.as_ref().and_then(|t| present(&t.price)));
    match candidate {
        Some(value) => amount_value(value),
        None => Ok(0.0),
    }
}

fn amount_value(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| anyhow!("Amount out of range: {}", n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow!("Invalid amount value: {:?}", s)),
        other => Err(anyhow!("Invalid amount value: {}", other)),
    }
}

/// Format a departure value as (`"%a, %d %b %Y"`, `"%H:%M"`).
///
/// Strings are parsed as naive date-times with any timezone suffix
/// truncated first; numbers are unix seconds. `None` on anything else.
fn format_departure(value: &Value) -> Option<(String, String)> {
    let departure: NaiveDateTime = match value {
        Value::String(s) => parse_naive_datetime(s)?,
        Value::Number(n) => DateTime::from_timestamp(n.as_i64()?, 0)?.naive_utc(),
        _ => return None,
    };
    Some((
        departure.format("%a, %d %b %Y").to_string(),
        departure.format("%H:%M").to_string(),
    ))
}

/// Parse an ISO-8601 string, keeping only the naive date-time portion.
///
/// A trailing `Z` is stripped and the string is cut at the first `+` or `-`
/// after the date/time separator, so offsets are discarded rather than
/// applied. Lossy, but deterministic.
fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    let naive = match trimmed.find(['T', ' ']) {
        Some(sep) => match trimmed[sep + 1..].find(['+', '-']) {
            Some(offset) => &trimmed[..sep + 1 + offset],
            None => trimmed,
        },
        None => trimmed,
    };

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(parsed);
        }
    }
    None
}
