/// Batch decoding of raw payloads with an injected decoder.
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    coord::TrackPoint,
    protocol::{
        aprs::{DecodeError, PositionReport},
        AprsDecoder, PositionDecoder,
    },
};

/// Runs a [`PositionDecoder`] over payloads. Each payload is decoded on its own, so one bad
/// payload never affects the others.
#[derive(Debug, Clone, Default)]
pub struct DecodePipeline<D = AprsDecoder> {
    decoder: D,
}

impl<D> DecodePipeline<D>
where
    D: PositionDecoder,
{
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    pub fn decode_one(&self, payload: &str) -> Result<PositionReport, DecodeError> {
        self.decoder.decode(payload)
    }

    /// Decode every payload in parallel. Results line up with `payloads` by index.
    pub fn decode_batch<S>(&self, payloads: &[S]) -> Vec<Result<PositionReport, DecodeError>>
    where
        S: AsRef<str> + Sync,
    {
        payloads
            .par_iter()
            .map(|payload| self.decoder.decode(payload.as_ref()))
            .collect()
    }

    /// Track points of every payload that decodes, in input order. Failures are logged and
    /// skipped; an empty result means no data, not an error.
    pub fn track<S>(&self, payloads: &[S]) -> Vec<TrackPoint>
    where
        S: AsRef<str> + Sync,
    {
        let results = self.decode_batch(payloads);
        let points: Vec<TrackPoint> = results
            .iter()
            .zip(payloads)
            .enumerate()
            .filter_map(|(idx, (result, payload))| match result {
                Ok(report) => Some(TrackPoint::from(report)),
                Err(e) => {
                    let payload: &str = payload.as_ref();
                    warn!("dropping payload {} {:?}: {}", idx, payload, e);
                    None
                }
            })
            .collect();
        debug!("decoded {} of {} payloads", points.len(), payloads.len());
        points
    }
}
