/// KML 2.2 tracks: one extruded `LineString` of `lon,lat[,alt]` coordinates.
use std::io::Write;

use chrono::{DateTime, Utc};
use nom::{
    character::complete::char,
    combinator::{all_consuming, opt},
    number::complete::double,
    sequence::{preceded, tuple},
    Finish, IResult,
};
use quick_xml::{
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};
use tracing::debug;

use crate::{coord, coord::TrackPoint, ATResult, Error};

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
pub const DEFAULT_NAME: &str = "APRS path";

const TRACK_STYLE: &str = "yellowPoly";
const LINE_COLOR: &str = "7f00ffff";
const LINE_WIDTH: &str = "4";
const POLY_COLOR: &str = "7f00ff00";

#[derive(Debug, Clone)]
pub struct KmlOptions<'a> {
    /// Document name, usually the callsign.
    pub name: &'a str,
    pub description: &'a str,
    pub placemark: &'a str,
}

impl Default for KmlOptions<'_> {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME,
            description: DEFAULT_NAME,
            placemark: "Flight path",
        }
    }
}

/// What [`read_track`] recovers from a KML document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KmlTrack {
    pub name: Option<String>,
    pub descriptions: Vec<String>,
    /// Points of the first `coordinates` element.
    pub points: Vec<TrackPoint>,
}

/// Write `points` as a KML track and hand back the writer.
pub fn write_track<W: Write>(out: W, points: &[TrackPoint], opts: &KmlOptions) -> ATResult<W> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    start(&mut writer, BytesStart::new("kml").with_attributes([("xmlns", KML_NAMESPACE)]))?;
    start(&mut writer, BytesStart::new("Document"))?;
    text_element(&mut writer, "name", opts.name)?;
    start(&mut writer, BytesStart::new("description"))?;
    writer.write_event(Event::CData(BytesCData::new(opts.description)))?;
    end(&mut writer, "description")?;

    start(&mut writer, BytesStart::new("Style").with_attributes([("id", TRACK_STYLE)]))?;
    start(&mut writer, BytesStart::new("LineStyle"))?;
    text_element(&mut writer, "color", LINE_COLOR)?;
    text_element(&mut writer, "width", LINE_WIDTH)?;
    end(&mut writer, "LineStyle")?;
    start(&mut writer, BytesStart::new("PolyStyle"))?;
    text_element(&mut writer, "color", POLY_COLOR)?;
    end(&mut writer, "PolyStyle")?;
    end(&mut writer, "Style")?;

    start(&mut writer, BytesStart::new("Placemark"))?;
    text_element(&mut writer, "name", opts.placemark)?;
    text_element(&mut writer, "styleUrl", &format!("#{TRACK_STYLE}"))?;
    start(&mut writer, BytesStart::new("LineString"))?;
    text_element(&mut writer, "extrude", "1")?;
    text_element(&mut writer, "tessellate", "1")?;
    text_element(&mut writer, "altitudeMode", "absolute")?;
    let rows: Vec<String> = points.iter().map(coordinate_row).collect();
    text_element(&mut writer, "coordinates", &rows.join("\n"))?;
    end(&mut writer, "LineString")?;
    end(&mut writer, "Placemark")?;

    end(&mut writer, "Document")?;
    end(&mut writer, "kml")?;
    debug!("wrote {} point KML track {:?}", points.len(), opts.name);
    Ok(writer.into_inner())
}

pub fn track_to_string(points: &[TrackPoint], opts: &KmlOptions) -> ATResult<String> {
    let bytes = write_track(Vec::new(), points, opts)?;
    String::from_utf8(bytes).map_err(|e| Error::Xml(e.to_string()))
}

fn coordinate_row(p: &TrackPoint) -> String {
    match p.alt_m {
        Some(alt) => format!("{},{},{}", p.lon_deg, p.lat_deg, alt),
        None => format!("{},{}", p.lon_deg, p.lat_deg),
    }
}

fn start<W: Write>(writer: &mut Writer<W>, elem: BytesStart) -> std::io::Result<()> {
    writer.write_event(Event::Start(elem))
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> std::io::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> std::io::Result<()> {
    start(writer, BytesStart::new(name))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    end(writer, name)
}

/// Read the document name, every description and the first coordinate list.
pub fn read_track(kml: &str) -> ATResult<KmlTrack> {
    let mut reader = Reader::from_str(kml);
    reader.config_mut().trim_text(true);
    let mut track = KmlTrack::default();
    let mut path: Vec<String> = Vec::new();
    let mut have_coordinates = false;
    loop {
        let text = match reader.read_event()? {
            Event::Start(e) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                continue;
            }
            Event::End(_) => {
                if path.pop().as_deref() == Some("coordinates") {
                    have_coordinates = true;
                }
                continue;
            }
            Event::Text(t) => t.unescape()?.into_owned(),
            Event::CData(c) => String::from_utf8_lossy(&c).into_owned(),
            Event::Eof => break,
            _ => continue,
        };
        if text.is_empty() {
            continue;
        }
        let parent = path.len().checked_sub(2).and_then(|i| path.get(i));
        match path.last().map(String::as_str) {
            Some("name") if parent.is_some_and(|p| p == "Document") && track.name.is_none() => {
                track.name = Some(text);
            }
            Some("description") => track.descriptions.push(text),
            Some("coordinates") if !have_coordinates => {
                for row in text.split_whitespace() {
                    track.points.push(parse_coordinate(row)?);
                }
            }
            _ => {}
        }
    }
    Ok(track)
}

fn coordinate(input: &str) -> IResult<&str, TrackPoint> {
    let (rest, (lon_deg, _, lat_deg, alt_m)) = tuple((
        double,
        char(','),
        double,
        opt(preceded(char(','), double)),
    ))(input)?;
    Ok((
        rest,
        TrackPoint {
            lat_deg,
            lon_deg,
            alt_m,
        },
    ))
}

/// One `lon,lat[,alt]` row.
pub fn parse_coordinate(row: &str) -> ATResult<TrackPoint> {
    let (_, point) = all_consuming(coordinate)(row).finish()?;
    coord::validate_lat(point.lat_deg)?;
    coord::validate_lon(point.lon_deg)?;
    Ok(point)
}

/// `<callsign>-YYYY-MM-DD-HH-MM.kml`, or just the time stamp without a callsign.
pub fn track_file_name(callsign: Option<&str>, at: DateTime<Utc>) -> String {
    let stamp = at.format("%Y-%m-%d-%H-%M");
    match callsign {
        Some(callsign) => format!("{callsign}-{stamp}.kml"),
        None => format!("{stamp}.kml"),
    }
}
