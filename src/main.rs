mod booking;
mod pdf;
mod qr;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Generate a GOGOBUS PDF ticket from a booking record.
#[derive(Parser, Debug)]
#[command(name = "ticket_print")]
#[command(about = "Generate a GOGOBUS PDF ticket from a booking record.", long_about = None)]
struct Args {
    /// Booking reference; used as the displayed reference when no JSON
    /// record is supplied
    #[arg(short, long)]
    booking_ref: String,

    /// Output file path
    #[arg(short, long, default_value = "ticket.pdf")]
    output: PathBuf,

    /// Path to a JSON file containing the full booking record
    #[arg(short, long)]
    json: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let record = match &args.json {
        Some(path) => {
            println!("Loading booking record from {:?}...", path);
            booking::load_booking(path)?
        }
        None => booking::sample(&args.booking_ref),
    };

    let ticket = booking::resolve(&record)?;

    let qr_image = qr::encode(&qr::QrPayload::new(&ticket.reference));
    if qr_image.is_none() {
        println!("Warning: QR encoding unavailable; rendering placeholder text.");
    }

    println!("Rendering ticket {}...", ticket.reference);
    let bytes = pdf::render_ticket(&ticket, qr_image.as_ref())?;

    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    println!("Ticket saved to: {:?}", args.output);

    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
