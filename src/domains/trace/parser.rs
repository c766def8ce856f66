use std::borrow::Cow;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::model::{EntityKind, EntityRecord, Timestep, Trace};
use crate::common::{TraceError, TraceResult};

/// Position of the reader inside the document. Each scope lists the only
/// child elements it accepts; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Document,
    Root,
    Timestep,
    Entity(EntityKind),
}

impl Scope {
    fn name<'a>(&self, root: &'a str) -> &'a str {
        match self {
            Scope::Document => "document",
            Scope::Root => root,
            Scope::Timestep => "timestep",
            Scope::Entity(kind) => kind.tag(),
        }
    }

    fn parent(&self) -> Scope {
        match self {
            Scope::Entity(_) => Scope::Timestep,
            Scope::Timestep => Scope::Root,
            Scope::Root | Scope::Document => Scope::Document,
        }
    }
}

/// Decode a floating car data export into a [`Trace`].
///
/// The root element may have any name. It holds `timestep` elements, which
/// in turn hold `vehicle` and `person` elements. Unknown attributes are
/// ignored; unknown elements fail the whole parse. After the root closes
/// only whitespace, comments and processing instructions may follow.
pub fn parse(bytes: &[u8]) -> TraceResult<Trace> {
    let mut reader = Reader::from_reader(bytes);
    let mut scope = Scope::Document;
    let mut root = String::new();
    let mut timesteps: Vec<Timestep> = Vec::new();
    let mut closed = false;

    loop {
        match reader.read_event()? {
            Event::Start(start) | Event::Empty(start) if closed => {
                return Err(outside_root(&start));
            }
            Event::Start(start) => {
                scope = enter(scope, &start, &mut root, &mut timesteps)?;
            }
            Event::Empty(start) => {
                enter(scope, &start, &mut root, &mut timesteps)?;
                closed = scope == Scope::Document;
            }
            Event::End(_) => {
                closed = scope == Scope::Root;
                scope = scope.parent();
            }
            Event::Text(text) if closed => {
                if !text.iter().all(|b| b.is_ascii_whitespace()) {
                    return Err(TraceError::TrailingContent(
                        String::from_utf8_lossy(&text).trim().to_string(),
                    ));
                }
            }
            Event::CData(_) if closed => {
                return Err(TraceError::TrailingContent("CDATA section".to_string()));
            }
            Event::Eof if closed => break,
            Event::Eof => {
                return Err(match scope {
                    Scope::Document => TraceError::Empty,
                    open => TraceError::Truncated(open.name(&root).to_string()),
                });
            }
            _ => {}
        }
    }

    Ok(Trace::new(timesteps))
}

fn enter(
    scope: Scope,
    start: &BytesStart<'_>,
    root: &mut String,
    timesteps: &mut Vec<Timestep>,
) -> TraceResult<Scope> {
    let local = start.local_name();
    match (scope, local.as_ref()) {
        (Scope::Document, tag) => {
            *root = String::from_utf8_lossy(tag).into_owned();
            Ok(Scope::Root)
        }
        (Scope::Root, b"timestep") => {
            timesteps.push(decode_timestep(start)?);
            Ok(Scope::Timestep)
        }
        (Scope::Timestep, b"vehicle") => push_entity(start, EntityKind::Vehicle, timesteps),
        (Scope::Timestep, b"person") => push_entity(start, EntityKind::Person, timesteps),
        (scope, tag) => Err(TraceError::UnexpectedElement {
            element: String::from_utf8_lossy(tag).into_owned(),
            parent: scope.name(root).to_string(),
        }),
    }
}

/// Only one root element is allowed.
fn outside_root(start: &BytesStart<'_>) -> TraceError {
    TraceError::UnexpectedElement {
        element: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
        parent: Scope::Document.name("").to_string(),
    }
}

fn push_entity(
    start: &BytesStart<'_>,
    kind: EntityKind,
    timesteps: &mut [Timestep],
) -> TraceResult<Scope> {
    let record = decode_entity(start, kind)?;
    if let Some(current) = timesteps.last_mut() {
        current.push(record);
    }
    Ok(Scope::Entity(kind))
}

fn decode_timestep(start: &BytesStart<'_>) -> TraceResult<Timestep> {
    let mut timestep = Timestep::default();
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"time" {
            timestep.time = number("timestep", "time", &attr.unescape_value()?)?;
        }
    }
    Ok(timestep)
}

fn decode_entity(start: &BytesStart<'_>, kind: EntityKind) -> TraceResult<EntityRecord> {
    let element = kind.tag();
    let mut record = EntityRecord::new(kind);
    for attr in start.attributes() {
        let attr = attr?;
        let value: Cow<'_, str> = attr.unescape_value()?;
        match attr.key.local_name().as_ref() {
            b"id" => record.label = value.into_owned(),
            b"x" => record.x = number(element, "x", &value)?,
            b"y" => record.y = number(element, "y", &value)?,
            b"z" => record.z = number(element, "z", &value)?,
            b"angle" => record.angle = number(element, "angle", &value)?,
            b"type" => record.entity_type = value.into_owned(),
            b"speed" => record.speed = number(element, "speed", &value)?,
            b"pos" => record.pos = number(element, "pos", &value)?,
            b"lane" => record.lane = value.into_owned(),
            b"slope" => record.slope = number(element, "slope", &value)?,
            b"signals" => record.signals = number(element, "signals", &value)?,
            b"distance" => record.distance = number(element, "distance", &value)?,
            b"acceleration" => record.acceleration = number(element, "acceleration", &value)?,
            b"accelerationLat" => {
                record.acceleration_lat = number(element, "accelerationLat", &value)?
            }
            _ => {}
        }
    }
    Ok(record)
}

/// Blank values decode as zero.
fn number<T: FromStr + Default>(element: &str, attribute: &str, raw: &str) -> TraceResult<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    trimmed.parse().map_err(|_| TraceError::InvalidAttribute {
        element: element.to_string(),
        attribute: attribute.to_string(),
        value: raw.to_string(),
    })
}
