/// APRS position tracking library.
///
/// *Protocols* decode raw APRS payloads into [`protocol::aprs::PositionReport`]s; a
/// [`pipeline::DecodePipeline`] runs any [`protocol::PositionDecoder`] over a batch of payloads.
/// The remaining modules move data in and out: [`scrape`] pulls payloads out of an aprs.fi raw
/// packet page, [`kml`] writes and reads tracks, and [`stats`] summarizes prediction tracks.
use std::sync::Once;

use thiserror::Error;

pub mod coord;
pub mod kml;
pub mod pipeline;
pub mod protocol;
pub mod scrape;
pub mod stats;

pub use protocol::aprs::DecodeError;

/// Result type for this library
pub type ATResult<T> = std::result::Result<T, Error>;

/// Error type for this library
#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid coordinate: {0}")]
    InvalidCoord(String),
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("XML error: {0}")]
    Xml(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Expected ascent rate {expected} m/s but saw {actual} m/s")]
    AscentRateMismatch { expected: f64, actual: f64 },
    #[error("Track has no points")]
    EmptyTrack,
}

impl From<nom::error::Error<&str>> for Error {
    fn from(err: nom::error::Error<&str>) -> Self {
        Error::ParseError(format!("{:?}", err))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Test binary helper to init tracing. This is usually the responsibility of the consumer of the
/// library crate.
pub fn lazy_init_tracing() {
    {
        static INIT: Once = Once::new();
        &INIT
    }
    .call_once(|| {
        tracing_subscriber::fmt::init();
    });
}
