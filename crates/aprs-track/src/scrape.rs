/// Raw packet extraction from a saved aprs.fi "raw packets" page.
///
/// Each packet sits on its own line inside `<span class='raw_line'>` (or `raw_line_error`). With
/// markup removed the line reads `<date> <time> <zone>: <packet> [notes]`.
use nom::{
    branch::alt,
    bytes::complete::{is_not, take_till1},
    character::complete::char,
    combinator::value,
    multi::fold_many0,
    sequence::delimited,
    IResult,
};
use tracing::debug;

const RAW_LINE_PREFIX: &str = "<span class='raw_line";

/// Index of the packet among the space separated words of a raw line.
const PACKET_WORD: usize = 3;

/// Full packets (`SRC>DST,PATH:payload`), in page order.
pub fn raw_packets(html: &str) -> Vec<String> {
    html.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(RAW_LINE_PREFIX))
        .filter_map(|line| {
            let text = strip_tags(line);
            let packet = text.split(' ').nth(PACKET_WORD);
            if packet.is_none() {
                debug!("skipping short raw line {:?}", text);
            }
            packet.map(unescape)
        })
        .collect()
}

/// Payloads ready for decoding: packets with their address framing and any `!`/`=` data type
/// identifier removed.
pub fn payloads(html: &str) -> Vec<String> {
    raw_packets(html)
        .iter()
        .map(|packet| strip_position_dti(information_field(packet)).to_string())
        .collect()
}

/// Text after the `SRC>DST,PATH:` header, or the whole packet when there is no header.
pub fn information_field(packet: &str) -> &str {
    match packet.split_once(':') {
        Some((header, info)) if header.contains('>') => info,
        _ => packet,
    }
}

/// Drop the data type identifier of a position report without timestamp. Timestamped reports
/// keep theirs; the verbose form is found anywhere in the payload.
pub fn strip_position_dti(info: &str) -> &str {
    info.strip_prefix(|c: char| c == '!' || c == '=').unwrap_or(info)
}

fn markup(input: &str) -> IResult<&str, &str> {
    delimited(char('<'), is_not(">"), char('>'))(input)
}

fn text(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == '<')(input)
}

/// Drop `<...>` tags, keeping the text between them. An unterminated `<` is kept as text.
fn strip_tags(line: &str) -> String {
    let result: IResult<&str, String> = fold_many0(
        alt((value("", markup), text)),
        String::new,
        |mut acc, piece| {
            acc.push_str(piece);
            acc
        },
    )(line);
    match result {
        Ok((rest, mut stripped)) => {
            stripped.push_str(rest);
            stripped
        }
        Err(_) => line.to_string(),
    }
}

fn unescape(word: &str) -> String {
    word.replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace('\u{a0}', " ")
        .replace("&amp;", "&")
}
