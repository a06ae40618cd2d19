/// APRS position report decoding.
///
/// Two incompatible encodings carry the same position data:
///
/// * *Verbose*: `DDDDDDh` time, `DDMM.mmN` latitude, `/`, `DDDMM.mmW` longitude, symbol code and
///   free text which must contain an `A=<digits>` altitude marker somewhere after the position.
///   The position may appear anywhere in the payload.
/// * *Compressed*: a 13 byte header at the start of the payload,
///   `[table][lat x4][lon x4][symbol][c][s][T]`, with coordinates in base-91 and the csT
///   group carrying one of course/speed, altitude or radio range.
///
/// [`sniff`] classifies a payload without converting anything; [`decode`] then extracts the
/// fields of whichever shape matched.
use nom::{
    bytes::complete::{tag, take_while_m_n},
    character::{
        complete::{char, digit1, one_of},
        is_digit,
    },
    combinator::recognize,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;
use tracing::trace;

use super::base91::{self, Base91Error};
use crate::{coord, ATResult};

/// Fixed length of the compressed position header.
pub const COMPRESSED_HEADER_LEN: usize = 13;

/// Divisor turning base-91 latitude digits into degrees south of the north pole.
const LAT_SCALE: f64 = 380926.0;
/// Divisor turning base-91 longitude digits into degrees east of the antimeridian.
const LON_SCALE: f64 = 190463.0;

const FEET_TO_METERS: f64 = 0.3048;
const KNOTS_TO_KPH: f64 = 1.852;
const MILES_TO_KM: f64 = 1.609344;

//  _____
// |_   _|   _ _ __   ___  ___
//   | || | | | '_ \ / _ \/ __|
//   | || |_| | |_) |  __/\__ \
//   |_| \__, | .__/ \___||___/
//       |___/|_|

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("byte {byte:#04x} in {field} is outside the base-91 alphabet")]
    InvalidCharacter { byte: u8, field: &'static str },
    #[error("compressed packet is {len} bytes, need at least {min}", min = COMPRESSED_HEADER_LEN)]
    InvalidPacket { len: usize },
    #[error("payload matches neither the verbose nor the compressed position format")]
    UnrecognizedFormat,
    #[error("malformed {field}: {text:?}")]
    MalformedNumeric { field: &'static str, text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Verbose,
    Compressed,
}

/// Raw APRS symbol: table identifier (or overlay) and symbol code. Not interpreted further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub table: char,
    pub code: char,
}

/// Optional data carried alongside the position. Course/speed and radio range never appear
/// together in one report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extension {
    /// Course 1..=360 degrees (360 is north), speed in km/h.
    CourseSpeed { course_deg: f64, speed_kph: f64 },
    RadioRange { range_km: f64 },
}

/// A successfully decoded position report.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: Option<f64>,
    extension: Option<Extension>,
    symbol: Option<Symbol>,
    gps_fix_status: Option<u8>,
    format: PayloadFormat,
}

impl PositionReport {
    /// Build a report from already decoded values, for use by alternative decoders.
    pub fn new(latitude_deg: f64, longitude_deg: f64, format: PayloadFormat) -> ATResult<Self> {
        coord::validate_lat(latitude_deg)?;
        coord::validate_lon(longitude_deg)?;
        Ok(Self::bare(latitude_deg, longitude_deg, format))
    }

    fn bare(latitude_deg: f64, longitude_deg: f64, format: PayloadFormat) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m: None,
            extension: None,
            symbol: None,
            gps_fix_status: None,
            format,
        }
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension = Some(extension);
        self
    }

    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn altitude_m(&self) -> Option<f64> {
        self.altitude_m
    }

    pub fn extension(&self) -> Option<Extension> {
        self.extension
    }

    pub fn course_deg(&self) -> Option<f64> {
        match self.extension {
            Some(Extension::CourseSpeed { course_deg, .. }) => Some(course_deg),
            _ => None,
        }
    }

    pub fn speed_kph(&self) -> Option<f64> {
        match self.extension {
            Some(Extension::CourseSpeed { speed_kph, .. }) => Some(speed_kph),
            _ => None,
        }
    }

    pub fn radio_range_km(&self) -> Option<f64> {
        match self.extension {
            Some(Extension::RadioRange { range_km }) => Some(range_km),
            _ => None,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    /// Compressed reports without course/speed flag whether the fix is current (1) or old (0).
    pub fn gps_fix_status(&self) -> Option<u8> {
        self.gps_fix_status
    }

    pub fn format(&self) -> PayloadFormat {
        self.format
    }
}

/// Shape of a verbose position, borrowed from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerboseFields<'a> {
    pub latitude: &'a [u8],
    pub lat_hemisphere: char,
    pub longitude: &'a [u8],
    pub lon_hemisphere: char,
    pub symbol_code: Option<u8>,
    pub altitude: &'a [u8],
}

/// Leading bytes of a compressed payload, at most [`COMPRESSED_HEADER_LEN`] long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedHeader<'a>(pub &'a [u8]);

/// Result of format sniffing. Only the matched variant carries fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniffed<'a> {
    Verbose(VerboseFields<'a>),
    Compressed(CompressedHeader<'a>),
    Unrecognized,
}

//  ____        _  __  __ _
// / ___| _ __ (_)/ _|/ _(_)_ __   __ _
// \___ \| '_ \| | |_| |_| | '_ \ / _` |
//  ___) | | | | |  _|  _| | | | | (_| |
// |____/|_| |_|_|_| |_| |_|_| |_|\__, |
//                                |___/

/// Classify a payload. The verbose shape wins when both could apply.
pub fn sniff(payload: &str) -> Sniffed<'_> {
    let bytes = payload.as_bytes();
    if let Some(fields) = sniff_verbose(bytes) {
        return Sniffed::Verbose(fields);
    }
    if let Some(header) = sniff_compressed(bytes) {
        return Sniffed::Compressed(header);
    }
    Sniffed::Unrecognized
}

fn sniff_verbose(bytes: &[u8]) -> Option<VerboseFields<'_>> {
    (0..bytes.len()).find_map(|start| {
        let (rest, (latitude, lat_hemisphere, _, longitude, lon_hemisphere)) =
            verbose_position(&bytes[start..]).ok()?;
        let altitude = trailing_altitude(rest)?;
        Some(VerboseFields {
            latitude,
            lat_hemisphere,
            longitude,
            lon_hemisphere,
            symbol_code: rest.first().copied().filter(u8::is_ascii_graphic),
            altitude,
        })
    })
}

type VerbosePosition<'a> = (&'a [u8], char, char, &'a [u8], char);

fn verbose_position(input: &[u8]) -> IResult<&[u8], VerbosePosition<'_>> {
    preceded(
        time_of_day,
        tuple((
            latitude_digits,
            one_of("NSns"),
            char('/'),
            longitude_digits,
            one_of("EWew"),
        )),
    )(input)
}

fn time_of_day(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(take_while_m_n(6, 6, is_digit), char('h'))(input)
}

/// `DDMM.mm`
fn latitude_digits(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((
        take_while_m_n(4, 4, is_digit),
        char('.'),
        take_while_m_n(2, 2, is_digit),
    )))(input)
}

/// `DDDMM.mm`
fn longitude_digits(input: &[u8]) -> IResult<&[u8], &[u8]> {
    recognize(tuple((
        take_while_m_n(5, 5, is_digit),
        char('.'),
        take_while_m_n(2, 2, is_digit),
    )))(input)
}

fn altitude_marker(input: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(tag("A="), digit1)(input)
}

/// Digits of the last `A=<digits>` marker on the same line, with at least one byte between the
/// position and the marker.
fn trailing_altitude(rest: &[u8]) -> Option<&[u8]> {
    let line = rest.split(|&b| b == b'\n').next().unwrap_or(rest);
    (1..line.len())
        .rev()
        .find_map(|start| altitude_marker(&line[start..]).ok())
        .map(|(_, digits)| digits)
}

fn sniff_compressed(bytes: &[u8]) -> Option<CompressedHeader<'_>> {
    let header = &bytes[..bytes.len().min(COMPRESSED_HEADER_LEN)];
    let fits = !header.is_empty()
        && header
            .iter()
            .enumerate()
            .all(|(pos, &byte)| compressed_byte_fits(pos, byte));
    fits.then_some(CompressedHeader(header))
}

fn compressed_byte_fits(pos: usize, byte: u8) -> bool {
    match pos {
        0 => matches!(byte, b'/' | b'\\' | b'A'..=b'J' | b'a'..=b'j'),
        // coordinates; '|' passes the shape check and fails base-91 decoding
        1..=8 => (0x21..=0x7c).contains(&byte),
        9 => matches!(byte, 0x21..=0x7b | 0x7d),
        // csT, where ' ' marks an absent field
        _ => (0x20..=0x7c).contains(&byte),
    }
}

//  ____                     _
// |  _ \  ___  ___ ___   __| | ___
// | | | |/ _ \/ __/ _ \ / _` |/ _ \
// | |_| |  __/ (_| (_) | (_| |  __/
// |____/ \___|\___\___/ \__,_|\___|

/// Decode one payload into a position report.
pub fn decode(payload: &str) -> Result<PositionReport, DecodeError> {
    match sniff(payload) {
        Sniffed::Verbose(fields) => {
            trace!("verbose position: {:?}", payload);
            fields.decode()
        }
        Sniffed::Compressed(header) => {
            trace!("compressed position: {:?}", payload);
            header.decode()
        }
        Sniffed::Unrecognized => Err(DecodeError::UnrecognizedFormat),
    }
}

impl VerboseFields<'_> {
    pub fn decode(&self) -> Result<PositionReport, DecodeError> {
        let mut latitude_deg = degrees_minutes(self.latitude, "latitude")?;
        let mut longitude_deg = degrees_minutes(self.longitude, "longitude")?;
        if self.lat_hemisphere.eq_ignore_ascii_case(&'S') {
            latitude_deg = -latitude_deg;
        }
        if self.lon_hemisphere.eq_ignore_ascii_case(&'W') {
            longitude_deg = -longitude_deg;
        }
        check_range(latitude_deg, 90.0, self.latitude, "latitude")?;
        check_range(longitude_deg, 180.0, self.longitude, "longitude")?;
        let altitude_m = parse_number(self.altitude, "altitude")?;

        let mut report = PositionReport::bare(latitude_deg, longitude_deg, PayloadFormat::Verbose)
            .with_altitude(altitude_m);
        if let Some(code) = self.symbol_code {
            report = report.with_symbol(Symbol {
                table: '/',
                code: code as char,
            });
        }
        Ok(report)
    }
}

impl CompressedHeader<'_> {
    pub fn decode(&self) -> Result<PositionReport, DecodeError> {
        let header = self.0;
        if header.len() < COMPRESSED_HEADER_LEN {
            return Err(DecodeError::InvalidPacket { len: header.len() });
        }

        let lat_digits = &header[1..5];
        let lon_digits = &header[5..9];
        let latitude_deg = 90.0 - base91_field(lat_digits, "latitude")? as f64 / LAT_SCALE;
        let longitude_deg = -180.0 + base91_field(lon_digits, "longitude")? as f64 / LON_SCALE;
        check_range(latitude_deg, 90.0, lat_digits, "latitude")?;
        check_range(longitude_deg, 180.0, lon_digits, "longitude")?;

        let mut report =
            PositionReport::bare(latitude_deg, longitude_deg, PayloadFormat::Compressed)
                .with_symbol(Symbol {
                    table: header[0] as char,
                    code: header[9] as char,
                });

        // Each csT byte is shifted on its own; -1 (a space) means the field is absent.
        let [c, s, comp_type] = [header[10], header[11], header[12]].map(|b| b as i32 - 0x21);
        if c == -1 {
            report.gps_fix_status = Some(u8::from(comp_type & 0x20 == 0x20));
        }
        if c == -1 || s == -1 {
            return Ok(report);
        }

        if comp_type & 0x18 == 0x10 {
            report.altitude_m = Some(1.002f64.powi(c * 91 + s) * FEET_TO_METERS);
        } else if (0..=89).contains(&c) {
            let course_deg = if c == 0 { 360.0 } else { (c * 4) as f64 };
            let speed_kph = (1.08f64.powi(s) - 1.0) * KNOTS_TO_KPH;
            report.extension = Some(Extension::CourseSpeed {
                course_deg,
                speed_kph,
            });
        } else if c == 90 {
            let range_km = 2.0 * 1.08f64.powi(s) * MILES_TO_KM;
            report.extension = Some(Extension::RadioRange { range_km });
        } else {
            trace!("csT course byte {} carries no known field", c);
        }
        Ok(report)
    }
}

fn base91_field(digits: &[u8], field: &'static str) -> Result<u64, DecodeError> {
    base91::decode(digits).map_err(|e| match e {
        Base91Error::InvalidCharacter { byte, .. } => DecodeError::InvalidCharacter { byte, field },
        Base91Error::Overflow { .. } => malformed(digits, field),
    })
}

/// `DDMM.mm` or `DDDMM.mm` to decimal degrees. Two degree digits when the integer part is four
/// digits long, three otherwise.
fn degrees_minutes(token: &[u8], field: &'static str) -> Result<f64, DecodeError> {
    let text = std::str::from_utf8(token).map_err(|_| malformed(token, field))?;
    let whole = text.split('.').next().unwrap_or(text);
    let split = if whole.len() == 4 { 2 } else { 3 };
    let (degrees, minutes) = text
        .split_at_checked(split)
        .ok_or_else(|| malformed(token, field))?;
    let degrees: f64 = degrees.parse().map_err(|_| malformed(token, field))?;
    let minutes: f64 = minutes.parse().map_err(|_| malformed(token, field))?;
    Ok(degrees + minutes / 60.0)
}

fn parse_number(token: &[u8], field: &'static str) -> Result<f64, DecodeError> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or_else(|| malformed(token, field))
}

fn check_range(value: f64, limit: f64, token: &[u8], field: &'static str) -> Result<(), DecodeError> {
    if (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(malformed(token, field))
    }
}

fn malformed(token: &[u8], field: &'static str) -> DecodeError {
    DecodeError::MalformedNumeric {
        field,
        text: String::from_utf8_lossy(token).into_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lazy_init_tracing;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} is not within {tolerance} of {expected}"
        );
    }

    #[test]
    fn test_verbose_position() {
        lazy_init_tracing();
        let report = decode("092345h4903.50N/07201.75W>088/036/A=001234").unwrap();
        assert_eq!(report.format(), PayloadFormat::Verbose);
        assert_close(report.latitude_deg(), 49.0583, 1e-4);
        assert_close(report.longitude_deg(), -72.0292, 1e-4);
        assert_eq!(report.altitude_m(), Some(1234.0));
        assert_eq!(
            report.symbol(),
            Some(Symbol {
                table: '/',
                code: '>'
            })
        );
        assert_eq!(report.extension(), None);
        assert_eq!(report.gps_fix_status(), None);
    }

    #[test]
    fn test_verbose_hemispheres() {
        lazy_init_tracing();
        let cases = [
            ("N", "E", 1.0, 1.0),
            ("S", "E", -1.0, 1.0),
            ("N", "W", 1.0, -1.0),
            ("s", "w", -1.0, -1.0),
        ];
        for (ns, ew, lat_sign, lon_sign) in cases {
            let payload = format!("/123456h3330.00{ns}/11115.00{ew}Ocomment A=000050");
            let report = decode(&payload).unwrap();
            assert_close(report.latitude_deg(), lat_sign * 33.5, 1e-9);
            assert_close(report.longitude_deg(), lon_sign * 111.25, 1e-9);
            assert_eq!(report.altitude_m(), Some(50.0));
        }
    }

    #[test]
    fn test_verbose_inside_packet() {
        lazy_init_tracing();
        let payload = "KE0FZV-11>APLIGA,WIDE2-1,qAR,N0CALL:/201508h3958.71N/10509.53WO/A=005000 wind A=005321";
        let report = decode(payload).unwrap();
        assert_eq!(report.format(), PayloadFormat::Verbose);
        assert_close(report.latitude_deg(), 39.9785, 1e-4);
        assert_close(report.longitude_deg(), -105.15883, 1e-4);
        // last marker wins
        assert_eq!(report.altitude_m(), Some(5321.0));
        assert_eq!(report.symbol().map(|s| s.code), Some('O'));
    }

    #[test]
    fn test_verbose_requires_altitude() {
        lazy_init_tracing();
        assert_eq!(
            decode("092345h4903.50N/07201.75W>no altitude"),
            Err(DecodeError::UnrecognizedFormat)
        );
        // marker on the next line does not count
        assert_eq!(
            decode("092345h4903.50N/07201.75W>\nA=001234"),
            Err(DecodeError::UnrecognizedFormat)
        );
        // marker directly after the hemisphere leaves no symbol byte
        assert_eq!(
            decode("092345h4903.50N/07201.75WA=001234"),
            Err(DecodeError::UnrecognizedFormat)
        );
    }

    #[test]
    fn test_verbose_out_of_range() {
        lazy_init_tracing();
        assert_eq!(
            decode("092345h9903.50N/07201.75W>A=1"),
            Err(DecodeError::MalformedNumeric {
                field: "latitude",
                text: "9903.50".to_string()
            })
        );
        assert!(matches!(
            decode("092345h4903.50N/18101.75W>A=1"),
            Err(DecodeError::MalformedNumeric {
                field: "longitude",
                ..
            })
        ));
    }

    #[test]
    fn test_degrees_minutes_split() {
        assert_close(degrees_minutes(b"4903.50", "lat").unwrap(), 49.058333, 1e-6);
        assert_close(degrees_minutes(b"07201.75", "lon").unwrap(), 72.029166, 1e-6);
        assert_eq!(
            degrees_minutes(b"49x3.50", "lat"),
            Err(DecodeError::MalformedNumeric {
                field: "lat",
                text: "49x3.50".to_string()
            })
        );
        assert!(degrees_minutes(b"4", "lat").is_err());
    }

    #[test]
    fn test_compressed_course_speed() {
        lazy_init_tracing();
        // 49.5N 72.75W, course 88, speed 36.2 knots
        let report = decode("/5L!!<*e7>7P[").unwrap();
        assert_eq!(report.format(), PayloadFormat::Compressed);
        assert_close(report.latitude_deg(), 49.5, 1e-6);
        assert_close(report.longitude_deg(), -72.75, 1e-4);
        assert_eq!(
            report.symbol(),
            Some(Symbol {
                table: '/',
                code: '>'
            })
        );
        assert_eq!(report.course_deg(), Some(88.0));
        // s = 'P' - 33 = 47
        assert_close(report.speed_kph().unwrap(), (1.08f64.powi(47) - 1.0) * 1.852, 1e-9);
        assert_close(report.speed_kph().unwrap() / 1.852, 36.2, 0.1);
        assert_eq!(report.radio_range_km(), None);
        assert_eq!(report.altitude_m(), None);
        assert_eq!(report.gps_fix_status(), None);
    }

    #[test]
    fn test_compressed_course_north() {
        lazy_init_tracing();
        let report = decode("/5L!!<*e7>!\"[").unwrap();
        assert_eq!(report.course_deg(), Some(360.0));
        assert_close(report.speed_kph().unwrap(), 0.08 * 1.852, 1e-9);
    }

    #[test]
    fn test_compressed_altitude() {
        lazy_init_tracing();
        // cs = "S]" -> 50 * 91 + 60 = 4610, T = 'S' = 50 has 0x10 set and 0x08 clear
        let report = decode("/5L!!<*e7OS]S").unwrap();
        let feet = 1.002f64.powi(50 * 91 + 60);
        assert_close(report.altitude_m().unwrap(), feet * 0.3048, 1e-6);
        assert_close(feet, 10004.0, 1.0);
        assert_eq!(report.extension(), None);
    }

    #[test]
    fn test_compressed_radio_range() {
        lazy_init_tracing();
        // c = '{' = 90, s = '?' = 30
        let report = decode("/5L!!<*e7>{?!").unwrap();
        let range = report.radio_range_km().unwrap();
        assert_close(range, 2.0 * 1.08f64.powi(30) * 1.609344, 1e-9);
        assert_close(range / 1.609344, 20.12, 0.01);
        assert_eq!(report.course_deg(), None);
        assert_eq!(report.speed_kph(), None);
    }

    #[test]
    fn test_compressed_absent_cst() {
        lazy_init_tracing();
        // c == -1 with GPS fix bit set in T
        let report = decode("\\5L!!<*e7#  A").unwrap();
        assert_eq!(report.gps_fix_status(), Some(1));
        assert_eq!(report.extension(), None);
        assert_eq!(report.altitude_m(), None);
        assert_eq!(
            report.symbol(),
            Some(Symbol {
                table: '\\',
                code: '#'
            })
        );

        let report = decode("A5L!!<*e7#  !").unwrap();
        assert_eq!(report.gps_fix_status(), Some(0));

        // only s absent: no fix status, no fields
        let report = decode("/5L!!<*e7>7 [").unwrap();
        assert_eq!(report.gps_fix_status(), None);
        assert_eq!(report.extension(), None);
        assert_eq!(report.altitude_m(), None);
    }

    #[test]
    fn test_compressed_unknown_course_byte() {
        lazy_init_tracing();
        // c = '|' = 91 is past the radio range marker
        let report = decode("/5L!!<*e7>|!!").unwrap();
        assert_eq!(report.extension(), None);
        assert_eq!(report.altitude_m(), None);
    }

    #[test]
    fn test_compressed_bounds() {
        lazy_init_tracing();
        let report = decode("/!!!!!!!!>  !").unwrap();
        assert_close(report.latitude_deg(), 90.0, 1e-12);
        assert_close(report.longitude_deg(), -180.0, 1e-12);
        // digits past the valid range decode outside the globe
        assert!(matches!(
            decode("/{{{{!!!!>  !"),
            Err(DecodeError::MalformedNumeric {
                field: "latitude",
                ..
            })
        ));
        assert!(matches!(
            decode("/!!!!{{{{>  !"),
            Err(DecodeError::MalformedNumeric {
                field: "longitude",
                ..
            })
        ));
    }

    #[test]
    fn test_compressed_invalid_character() {
        lazy_init_tracing();
        assert_eq!(
            decode("/5L|!<*e7>7P["),
            Err(DecodeError::InvalidCharacter {
                byte: b'|',
                field: "latitude"
            })
        );
        assert_eq!(
            decode("/5L!!<*|7>7P["),
            Err(DecodeError::InvalidCharacter {
                byte: b'|',
                field: "longitude"
            })
        );
    }

    #[test]
    fn test_compressed_too_short() {
        lazy_init_tracing();
        assert_eq!(decode("/5L!!<*e7>7P"), Err(DecodeError::InvalidPacket { len: 12 }));
        assert_eq!(decode("/5L!"), Err(DecodeError::InvalidPacket { len: 4 }));
    }

    #[test]
    fn test_unrecognized() {
        lazy_init_tracing();
        for payload in [
            "",
            "Hello world, this is prose",
            ">status text",
            "/5L !<*e7>7P[",
            "K/5L!!<*e7>7P[",
        ] {
            assert_eq!(decode(payload), Err(DecodeError::UnrecognizedFormat), "{payload:?}");
        }
    }

    #[test]
    fn test_sniff_variants() {
        assert!(matches!(
            sniff("092345h4903.50N/07201.75W>A=001234"),
            Sniffed::Verbose(VerboseFields {
                lat_hemisphere: 'N',
                lon_hemisphere: 'W',
                symbol_code: Some(b'>'),
                ..
            })
        ));
        assert_eq!(
            sniff("/5L!!<*e7>7P[ trailing comment"),
            Sniffed::Compressed(CompressedHeader(b"/5L!!<*e7>7P["))
        );
        assert_eq!(sniff("no position here"), Sniffed::Unrecognized);
    }

    #[test]
    fn test_report_constructor() {
        let report = PositionReport::new(45.0, -122.0, PayloadFormat::Verbose)
            .unwrap()
            .with_altitude(100.0)
            .with_extension(Extension::RadioRange { range_km: 5.0 });
        assert_eq!(report.altitude_m(), Some(100.0));
        assert_eq!(report.radio_range_km(), Some(5.0));
        assert!(PositionReport::new(91.0, 0.0, PayloadFormat::Verbose).is_err());
        assert!(PositionReport::new(0.0, -180.5, PayloadFormat::Compressed).is_err());
    }
}
