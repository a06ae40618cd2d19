/// Leg by leg statistics for balloon launch prediction tracks.
///
/// Samples come from a CSV of `seconds,lat,lon,alt` rows, or from a prediction KML whose
/// coordinates are spaced [`KML_SAMPLE_INTERVAL_S`] apart.
use std::fmt;

use nom::{
    bytes::complete::{tag, take_until},
    character::complete::{char, space0},
    combinator::all_consuming,
    number::complete::double,
    sequence::{delimited, preceded, terminated, tuple},
    Finish, IResult,
};
use tracing::debug;

use crate::{
    coord::{self, Heading, Point2d},
    kml, ATResult, Error,
};

/// Prediction KMLs carry no timestamps; their points are this far apart.
pub const KML_SAMPLE_INTERVAL_S: f64 = 50.0;

const ASCENT_RATE_TOLERANCE_MPS: f64 = 0.001;

//  _____
// |_   _|   _ _ __   ___  ___
//   | || | | | '_ \ / _ \/ __|
//   | || |_| | |_) |  __/\__ \
//   |_| \__, | .__/ \___||___/
//       |___/|_|

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sample {
    pub seconds: f64,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
}

impl Sample {
    fn point(&self) -> Point2d {
        Point2d(self.lat_deg, self.lon_deg)
    }
}

/// Movement between two consecutive samples.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Leg {
    /// Time of the leg's end since the first sample.
    pub elapsed_s: f64,
    pub speed_mps: f64,
    pub direction: Heading,
    pub distance_m: f64,
    /// Altitude at the leg's end.
    pub altitude_m: f64,
}

/// First sample below the launch altitude.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Landing {
    /// Index into the report's legs of the leg ending at `sample`.
    pub leg: usize,
    pub sample: Sample,
    pub launch_altitude_m: f64,
    pub distance_from_final_m: f64,
    pub direction_from_final: Heading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryReport {
    pub legs: Vec<Leg>,
    /// Index into `legs` of the first descending leg.
    pub burst_leg: Option<usize>,
    pub landing: Option<Landing>,
    pub final_sample: Sample,
}

//  ___                   _
// |_ _|_ __  _ __  _   _| |_
//  | || '_ \| '_ \| | | | __|
//  | || | | | |_) | |_| | |_
// |___|_| |_| .__/ \__,_|\__|
//           |_|

fn csv_field(input: &str) -> IResult<&str, f64> {
    delimited(space0, double, space0)(input)
}

fn csv_row(input: &str) -> IResult<&str, Sample> {
    let (rest, (seconds, lat_deg, lon_deg, alt_m)) = tuple((
        terminated(csv_field, char(',')),
        terminated(csv_field, char(',')),
        terminated(csv_field, char(',')),
        csv_field,
    ))(input)?;
    Ok((
        rest,
        Sample {
            seconds,
            lat_deg,
            lon_deg,
            alt_m,
        },
    ))
}

/// Samples from `seconds,lat,lon,alt` rows. Blank lines are skipped.
pub fn samples_from_csv(text: &str) -> ATResult<Vec<Sample>> {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(|line| -> ATResult<Sample> {
            let (_, sample) = all_consuming(csv_row)(line).finish()?;
            coord::validate_lat(sample.lat_deg)?;
            coord::validate_lon(sample.lon_deg)?;
            Ok(sample)
        })
        .collect()
}

fn ascent_rate(input: &str) -> IResult<&str, f64> {
    preceded(
        tuple((take_until("Ascent rate: "), tag("Ascent rate: "))),
        terminated(double, tag("m/s")),
    )(input)
}

/// Samples from a prediction KML, the first starting at `start_seconds`.
///
/// When a description states `Ascent rate: <x>m/s`, the climb over the first interval must
/// match it.
pub fn samples_from_prediction_kml(text: &str, start_seconds: f64) -> ATResult<Vec<Sample>> {
    let track = kml::read_track(text)?;
    let samples = track
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| -> ATResult<Sample> {
            let alt_m = p.alt_m.ok_or_else(|| {
                Error::ParseError(format!("coordinate {i} has no altitude"))
            })?;
            Ok(Sample {
                seconds: start_seconds + i as f64 * KML_SAMPLE_INTERVAL_S,
                lat_deg: p.lat_deg,
                lon_deg: p.lon_deg,
                alt_m,
            })
        })
        .collect::<ATResult<Vec<_>>>()?;

    let expected = track
        .descriptions
        .iter()
        .find_map(|d| ascent_rate(d).ok().map(|(_, rate)| rate));
    if let (Some(expected), [first, second, ..]) = (expected, samples.as_slice()) {
        let actual = (second.alt_m - first.alt_m) / KML_SAMPLE_INTERVAL_S;
        if (actual - expected).abs() > ASCENT_RATE_TOLERANCE_MPS {
            return Err(Error::AscentRateMismatch { expected, actual });
        }
    }
    Ok(samples)
}

//     _                _           _
//    / \   _ __   __ _| |_   _ ___(_)___
//   / _ \ | '_ \ / _` | | | | / __| / __|
//  / ___ \| | | | (_| | | |_| \__ \ \__ \
// /_/   \_\_| |_|\__,_|_|\__, |___/_|___/
//                        |___/

/// Flat local projection anchored at one sample: meters north and east of it.
struct LocalFrame {
    origin: Point2d,
    m_per_deg_lat: f64,
    m_per_deg_lon: f64,
}

impl LocalFrame {
    fn new(origin: &Sample) -> ATResult<Self> {
        Ok(Self {
            origin: origin.point(),
            m_per_deg_lat: coord::meter_per_deg_lat(origin.lat_deg)?,
            m_per_deg_lon: coord::meter_per_deg_lon(origin.lat_deg)?,
        })
    }

    /// (north, east) in meters.
    fn offset(&self, s: &Sample) -> (f64, f64) {
        (
            (s.lat_deg - self.origin.0) * self.m_per_deg_lat,
            (s.lon_deg - self.origin.1) * self.m_per_deg_lon,
        )
    }

    /// Distance and heading from `a` to `b`.
    fn displacement(&self, a: &Sample, b: &Sample) -> (f64, Heading) {
        let (n1, e1) = self.offset(a);
        let (n2, e2) = self.offset(b);
        let (dn, de) = (n2 - n1, e2 - e1);
        (dn.hypot(de), Heading::from_offsets(dn, de))
    }
}

pub fn analyze(samples: &[Sample]) -> ATResult<TrajectoryReport> {
    let (first, final_sample) = match samples {
        [first, .., last] => (first, *last),
        [only] => (only, *only),
        [] => return Err(Error::EmptyTrack),
    };
    let frame = LocalFrame::new(first)?;

    let mut legs = Vec::with_capacity(samples.len().saturating_sub(1));
    let mut burst_leg = None;
    let mut landing = None;
    for (i, pair) in samples.windows(2).enumerate() {
        let (p1, p2) = (&pair[0], &pair[1]);
        let (distance_m, direction) = frame.displacement(p1, p2);
        let duration_s = p2.seconds - p1.seconds;
        let speed_mps = if duration_s > 0.0 {
            distance_m / duration_s
        } else {
            0.0
        };

        if burst_leg.is_none() && p2.alt_m < p1.alt_m {
            debug!("burst after {} s at {} m", p1.seconds - first.seconds, p1.alt_m);
            burst_leg = Some(i);
        }
        if landing.is_none() && p2.alt_m < first.alt_m {
            let (_, direction_from_final) = frame.displacement(&final_sample, p2);
            landing = Some(Landing {
                leg: i,
                sample: *p2,
                launch_altitude_m: first.alt_m,
                distance_from_final_m: coord::haversine_m(p2.point(), final_sample.point()),
                direction_from_final,
            });
        }

        legs.push(Leg {
            elapsed_s: p2.seconds - first.seconds,
            speed_mps,
            direction,
            distance_m,
            altitude_m: p2.alt_m,
        });
    }

    Ok(TrajectoryReport {
        legs,
        burst_leg,
        landing,
        final_sample,
    })
}

/// `m:ss,speed,direction,distance,altitude`
impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = self.elapsed_s as i64;
        write!(
            f,
            "{}:{:02},{:.1}m/s,{:.0}°,{:.1}m,{:.0}m",
            elapsed / 60,
            elapsed % 60,
            self.speed_mps,
            self.direction.0,
            self.distance_m,
            self.altitude_m
        )
    }
}
