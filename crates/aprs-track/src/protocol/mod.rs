pub mod aprs;
pub mod base91;

use aprs::{DecodeError, PositionReport};

/// Trait implemented by position report decoders.
///
/// The built-in [`AprsDecoder`] is the default; any `Fn(&str) -> Result<PositionReport,
/// DecodeError>` closure can stand in for it.
pub trait PositionDecoder: Send + Sync {
    fn decode(&self, payload: &str) -> Result<PositionReport, DecodeError>;
}

/// Decoder for verbose and compressed APRS position reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct AprsDecoder;

impl PositionDecoder for AprsDecoder {
    fn decode(&self, payload: &str) -> Result<PositionReport, DecodeError> {
        aprs::decode(payload)
    }
}

impl<F> PositionDecoder for F
where
    F: Fn(&str) -> Result<PositionReport, DecodeError> + Send + Sync,
{
    fn decode(&self, payload: &str) -> Result<PositionReport, DecodeError> {
        self(payload)
    }
}
