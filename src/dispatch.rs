//! Identification: the manufacturer stage followed by the ordered
//! per-manufacturer rule tables. The first rule that matches wins.

use log::debug;

use crate::error::Result;
use crate::format::{BankFormat, CompositeFormat, Format, VoiceFormat};
use crate::framing;
use crate::manufacturer::{self, Manufacturer, Originator};
use crate::message::{Kind, Message};
use crate::pattern::{self, Template};
use crate::universal;
use crate::{behringer, roland, yamaha};

/// One entry of a manufacturer's rule table.
pub enum Rule {
    /// A header template with an optional exact total length.
    Header {
        template: &'static Template,
        length: Option<usize>,
        device: &'static str,
        label: Option<&'static str>,
    },
    /// A decodable single record.
    Voice(&'static VoiceFormat),
    /// A decodable container.
    Bank(&'static BankFormat),
    /// Anything a template cannot express.
    Custom(fn(&[u8]) -> Option<Kind>),
}

impl Rule {
    /// Classifies `data`, or returns `None` to let the next rule try.
    pub fn apply(&self, data: &[u8]) -> Option<Kind> {
        match self {
            Rule::Header {
                template,
                length,
                device,
                label,
            } => {
                let fits = length.map_or(true, |n| data.len() == n);
                (fits && pattern::matches(data, template, 0)).then_some(Kind::Known {
                    device: *device,
                    label: *label,
                })
            }
            Rule::Voice(f) => f.matches(data).then_some(Kind::Voice(*f)),
            Rule::Bank(f) => f.matches(data).then_some(Kind::Bank(*f)),
            Rule::Custom(test) => test(data),
        }
    }
}

fn rules_for(manufacturer: Manufacturer) -> &'static [Rule] {
    match manufacturer {
        manufacturer::YAMAHA => yamaha::RULES.as_slice(),
        manufacturer::ROLAND => roland::RULES.as_slice(),
        manufacturer::BEHRINGER => behringer::RULES.as_slice(),
        _ => &[],
    }
}

fn composites_for(manufacturer: Manufacturer) -> &'static [&'static CompositeFormat] {
    match manufacturer {
        manufacturer::YAMAHA => yamaha::COMPOSITES.as_slice(),
        _ => &[],
    }
}

/// Identifies a single or composite message.
pub fn parse(data: &[u8], name: Option<&str>) -> Result<Message> {
    framing::check_framing(data)?;
    if framing::count_segments(data) > 1 {
        parse_composite(data, name)
    } else {
        parse_single(data, name)
    }
}

/// Identifies one framed message.
pub fn parse_single(data: &[u8], name: Option<&str>) -> Result<Message> {
    framing::check_framing(data)?;
    let originator = Originator::from_message(data)?;
    let kind = classify(originator, data);
    Ok(Message::from_parts(
        data.to_vec(),
        name.map(str::to_string),
        originator,
        kind,
    ))
}

fn classify(originator: Originator, data: &[u8]) -> Kind {
    let manufacturer = match originator {
        Originator::Universal(kind) => {
            let label = universal::describe(kind, data);
            debug!("universal message: {}", label);
            return Kind::Universal { kind, label };
        }
        Originator::Manufacturer(m) => m,
    };

    debug!("manufacturer: {}", manufacturer);
    for rule in rules_for(manufacturer) {
        if let Some(kind) = rule.apply(data) {
            debug!("matched rule: {:?}", kind_summary(&kind));
            return kind;
        }
    }
    debug!("no rule matched, generic message");
    Kind::Generic
}

fn parse_composite(data: &[u8], name: Option<&str>) -> Result<Message> {
    let segments = framing::segments(data)?;
    let originator = Originator::from_message(data)?;
    debug!("composite of {} segments", segments.len());

    if let Some(manufacturer) = originator.manufacturer() {
        for &composite in composites_for(manufacturer) {
            if composite_matches(composite, &segments) {
                debug!("matched composite: {} {}", composite.device, composite.label);
                return Message::from_format(data, Format::Composite(composite), name);
            }
        }
    }

    let parts = segments
        .into_iter()
        .map(|segment| parse_single(segment, None))
        .collect::<Result<Vec<_>>>()?;
    Ok(Message::from_parts(
        data.to_vec(),
        name.map(str::to_string),
        originator,
        Kind::Composite { parts, format: None },
    ))
}

fn composite_matches(composite: &CompositeFormat, segments: &[&[u8]]) -> bool {
    segments.len() == composite.parts.len()
        && composite
            .parts
            .iter()
            .zip(segments)
            .all(|(part, segment)| part.matches(segment))
}

fn kind_summary(kind: &Kind) -> (&str, &str) {
    match kind {
        Kind::Known { device, label } => (*device, label.unwrap_or("")),
        Kind::Voice(f) => (f.device, f.label),
        Kind::Bank(f) => (f.device, f.label),
        Kind::Composite { format: Some(c), .. } => (c.device, c.label),
        _ => ("", ""),
    }
}
