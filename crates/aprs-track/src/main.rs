use std::{fs, path::PathBuf};

use aprs_track::{
    kml::{self, KmlOptions},
    pipeline::DecodePipeline,
    protocol::AprsDecoder,
    scrape, stats, ATResult, Error,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "APRS position tracks: decode, export to KML, summarize")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a saved aprs.fi raw packet page into a KML track.
    Kml {
        /// HTML file saved from aprs.fi ("raw packets" view).
        html: PathBuf,
        /// Callsign for the document name and output file name.
        #[arg(long)]
        callsign: Option<String>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Decode at most this many packets from the top of the page.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print per-leg statistics of a prediction track (.csv or .kml).
    Stats {
        path: PathBuf,
        /// Epoch seconds of the first KML point. Defaults to now.
        #[arg(long)]
        start: Option<f64>,
    },
}

fn main() -> ATResult<()> {
    tracing_subscriber::fmt::init();
    match Cli::parse().command {
        Command::Kml {
            html,
            callsign,
            out_dir,
            limit,
        } => kml_command(html, callsign, out_dir, limit),
        Command::Stats { path, start } => stats_command(path, start),
    }
}

fn kml_command(
    html: PathBuf,
    callsign: Option<String>,
    out_dir: PathBuf,
    limit: Option<usize>,
) -> ATResult<()> {
    info!("processing downloaded HTML {}", html.display());
    let mut payloads = scrape::payloads(&fs::read_to_string(&html)?);
    if let Some(limit) = limit {
        payloads.truncate(limit);
    }

    let points = DecodePipeline::new(AprsDecoder).track(&payloads);
    if points.is_empty() {
        println!("No points found, aborting");
        return Ok(());
    }

    let file_name = kml::track_file_name(callsign.as_deref(), Utc::now());
    let out_path = out_dir.join(file_name);
    let opts = KmlOptions {
        name: callsign.as_deref().unwrap_or(kml::DEFAULT_NAME),
        ..Default::default()
    };
    let file = fs::File::create(&out_path)?;
    kml::write_track(file, &points, &opts)?;
    println!("Saved {} points to {}", points.len(), out_path.display());
    Ok(())
}

fn stats_command(path: PathBuf, start: Option<f64>) -> ATResult<()> {
    let text = fs::read_to_string(&path)?;
    let samples = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => stats::samples_from_csv(&text)?,
        Some("kml") => {
            let start = start.unwrap_or_else(|| Utc::now().timestamp() as f64);
            stats::samples_from_prediction_kml(&text, start)?
        }
        _ => {
            return Err(Error::ParseError(format!(
                "unknown file type {}",
                path.display()
            )))
        }
    };
    let report = stats::analyze(&samples)?;

    println!("Time, speed m/s, direction d, distance m, altitude m");
    for (i, leg) in report.legs.iter().enumerate() {
        if report.burst_leg == Some(i) {
            print!("burst ");
        }
        if let Some(landing) = report.landing.filter(|l| l.leg == i) {
            println!(
                "landing below {:.0}m at {},{}, {:.0}m {:.0}° from final point",
                landing.launch_altitude_m,
                landing.sample.lat_deg,
                landing.sample.lon_deg,
                landing.distance_from_final_m,
                landing.direction_from_final.0
            );
        }
        println!("{leg}");
    }
    println!(
        "{}, {}",
        report.final_sample.lat_deg, report.final_sample.lon_deg
    );
    Ok(())
}
