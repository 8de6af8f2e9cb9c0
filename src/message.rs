//! The typed message: raw bytes plus the classification the dispatcher
//! gave them, and the operations tools use to inspect and rebuild them.

use std::collections::HashMap;

use log::warn;

use crate::error::{MalformedInput, Result, SysexError};
use crate::field::{Field, ValidationFailure, Value};
use crate::format::{BankFormat, CompositeFormat, Format, VoiceFormat};
use crate::framing;
use crate::manufacturer::{Manufacturer, Originator};
use crate::universal::{self, UniversalKind};

/// What a message was identified as.
#[derive(Clone, Debug)]
pub enum Kind {
    /// Nothing more is known than the manufacturer.
    Generic,

    /// A manufacturer-independent message.
    Universal { kind: UniversalKind, label: String },

    /// A recognised device and type without a parameter layout.
    Known {
        device: &'static str,
        label: Option<&'static str>,
    },

    /// A single record that decodes into parameters.
    Voice(&'static VoiceFormat),

    /// A container of fixed-size item records.
    Bank(&'static BankFormat),

    /// Several framed messages sent together. `format` is set when the
    /// parts form a known multi-part type.
    Composite {
        parts: Vec<Message>,
        format: Option<&'static CompositeFormat>,
    },
}

/// A MIDI System Exclusive message. The message owns its bytes and never
/// changes after construction; derived messages are new instances.
#[derive(Clone, Debug)]
pub struct Message {
    data: Vec<u8>,
    name: Option<String>,
    originator: Originator,
    kind: Kind,
}

impl Message {
    /// Identifies `data` and creates a message from a copy of it.
    pub fn new(data: &[u8]) -> Result<Self> {
        crate::dispatch::parse(data, None)
    }

    /// Like `new`, with a display name such as the file name.
    pub fn with_name(data: &[u8], name: &str) -> Result<Self> {
        crate::dispatch::parse(data, Some(name))
    }

    pub(crate) fn from_parts(data: Vec<u8>, name: Option<String>, originator: Originator, kind: Kind) -> Self {
        let message = Message {
            data,
            name,
            originator,
            kind,
        };
        if message.verify_checksum() == Some(false) {
            warn!(
                "checksum mismatch in {} {}",
                message.device().unwrap_or("unknown device"),
                message.type_name().unwrap_or("message")
            );
        }
        message
    }

    /// Reads `data` as the given format, without identification. Useful
    /// when two types share a header and the caller knows which one it is.
    pub fn from_format(data: &[u8], format: Format, name: Option<&str>) -> Result<Self> {
        framing::check_framing(data)?;
        let originator = Originator::from_message(data)?;
        let kind = match format {
            Format::Voice(f) => {
                format.check(data)?;
                Kind::Voice(f)
            }
            Format::Bank(f) => {
                format.check(data)?;
                Kind::Bank(f)
            }
            Format::Composite(c) => {
                let segments = framing::segments(data)?;
                if segments.len() != c.parts.len() {
                    return Err(MalformedInput::LengthMismatch {
                        expected: c.parts.len(),
                        actual: segments.len(),
                    }
                    .into());
                }
                let parts = segments
                    .into_iter()
                    .zip(&c.parts)
                    .map(|(segment, &part)| Message::from_format(segment, Format::Voice(part), None))
                    .collect::<Result<Vec<_>>>()?;
                Kind::Composite {
                    parts,
                    format: Some(c),
                }
            }
        };
        Ok(Message::from_parts(
            data.to_vec(),
            name.map(str::to_string),
            originator,
            kind,
        ))
    }

    /// Builds a message from a value for every parameter of `format`,
    /// with freshly computed checksums.
    pub fn from_values(format: Format, values: &HashMap<String, Value>) -> Result<Self> {
        let data = match format {
            Format::Voice(f) => f.build(values)?,
            Format::Composite(c) => c.build(values)?,
            Format::Bank(_) => return Err(SysexError::Unsupported("building a bank from values")),
        };
        Message::from_format(&data, format, None)
    }

    /// A copy of this message with some parameter values replaced.
    pub fn with_values(&self, changes: &HashMap<String, Value>) -> Result<Self> {
        let format = self.format().ok_or(SysexError::NotParseable)?;
        let mut values = self.to_map()?;
        for (name, value) in changes {
            if !values.contains_key(name) {
                return Err(SysexError::UnknownParameter(name.clone()));
            }
            values.insert(name.clone(), value.clone());
        }
        let mut message = Message::from_values(format, &values)?;
        message.name = self.name.clone();
        Ok(message)
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The decodable layout of this message, if it has one.
    pub fn format(&self) -> Option<Format> {
        match &self.kind {
            Kind::Voice(f) => Some(Format::Voice(f)),
            Kind::Bank(f) => Some(Format::Bank(f)),
            Kind::Composite { format: Some(c), .. } => Some(Format::Composite(c)),
            _ => None,
        }
    }

    /// Converts the message into bytes for MIDI messaging.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes, including the initiator and terminator.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// MD5 digest of the raw bytes, for spotting duplicates.
    pub fn digest(&self) -> md5::Digest {
        md5::compute(&self.data)
    }

    /// The name stored in the data (e.g. a voice name), otherwise the
    /// name given at construction.
    pub fn name(&self) -> Option<String> {
        let stored = match &self.kind {
            Kind::Voice(f) => stored_name(f, &self.data),
            Kind::Composite {
                parts,
                format: Some(c),
            } => c.name_part.and_then(|i| parts.get(i)).and_then(|p| p.name()),
            _ => None,
        };
        stored.or_else(|| self.name.clone())
    }

    pub fn originator(&self) -> Originator {
        self.originator
    }

    /// The manufacturer, or `None` for a universal message.
    pub fn manufacturer(&self) -> Option<Manufacturer> {
        self.originator.manufacturer()
    }

    /// Identifier bytes (one or three) following the initiator.
    pub fn manufacturer_id(&self) -> Vec<u8> {
        self.originator.to_bytes()
    }

    pub fn manufacturer_name(&self) -> Option<&'static str> {
        self.manufacturer().and_then(|m| m.name())
    }

    pub fn device(&self) -> Option<&str> {
        match &self.kind {
            Kind::Known { device, .. } => Some(device),
            Kind::Voice(f) => Some(f.device),
            Kind::Bank(f) => Some(f.device),
            Kind::Composite { format: Some(c), .. } => Some(c.device),
            _ => None,
        }
    }

    /// The message type, e.g. "32-voice bank".
    pub fn type_name(&self) -> Option<&str> {
        match &self.kind {
            Kind::Universal { label, .. } => Some(label),
            Kind::Known { label, .. } => *label,
            Kind::Voice(f) => Some(f.label),
            Kind::Bank(f) => Some(f.label),
            Kind::Composite { format: Some(c), .. } => Some(c.label),
            _ => None,
        }
    }

    pub fn is_known_type(&self) -> bool {
        self.type_name().is_some()
    }

    pub fn is_universal(&self) -> bool {
        matches!(self.kind, Kind::Universal { .. })
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, Kind::Composite { .. })
    }

    /// The framed messages of a composite; empty otherwise.
    pub fn parts(&self) -> &[Message] {
        match &self.kind {
            Kind::Composite { parts, .. } => parts,
            _ => &[],
        }
    }

    /// Checks the trailing checksum(s), where the type defines one.
    pub fn verify_checksum(&self) -> Option<bool> {
        let stored = self.data[self.data.len().checked_sub(2)?];
        match &self.kind {
            Kind::Voice(f) => Some(f.checksum.verify(&self.data[f.checksum_range()], stored)),
            Kind::Bank(f) => Some(f.checksum.verify(&self.data[f.checksum_range()], stored)),
            Kind::Composite { parts, format: Some(_) } => {
                Some(parts.iter().all(|p| p.verify_checksum() != Some(false)))
            }
            Kind::Universal { kind, .. } => universal::verify_sample_data_packet(*kind, &self.data),
            _ => None,
        }
    }

    // Parameters

    /// Voice records that hold this message's parameters, with their bytes.
    fn records(&self) -> Option<Vec<(&'static VoiceFormat, &[u8])>> {
        match &self.kind {
            Kind::Voice(f) => Some(vec![(*f, self.data.as_slice())]),
            Kind::Composite { parts, format: Some(c) } => Some(
                c.parts
                    .iter()
                    .zip(parts)
                    .map(|(&f, p)| (f, p.as_bytes()))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// True if the message decodes into named parameter values.
    pub fn is_parseable(&self) -> bool {
        self.records().is_some()
    }

    /// Parameter names in layout order; empty if not parseable.
    pub fn parameter_names(&self) -> Vec<&str> {
        match &self.kind {
            Kind::Voice(f) => f.fields.names().collect(),
            Kind::Composite { format: Some(c), .. } => {
                c.parts.iter().flat_map(|f| f.fields.names()).collect()
            }
            _ => Vec::new(),
        }
    }

    fn locate(&self, name: &str) -> Result<(&Field, &[u8], usize)> {
        let records = self.records().ok_or(SysexError::NotParseable)?;
        records
            .into_iter()
            .find_map(|(f, data)| f.fields.get(name).map(|field| (field, data, f.header_length())))
            .ok_or_else(|| SysexError::UnknownParameter(name.to_string()))
    }

    /// The current value of a parameter. Does not validate it.
    pub fn value(&self, name: &str) -> Result<Value> {
        let (field, data, offset) = self.locate(name)?;
        field.get(data, offset)
    }

    /// All parameter values, in layout order.
    pub fn values(&self) -> Result<Vec<(String, Value)>> {
        let records = self.records().ok_or(SysexError::NotParseable)?;
        let mut values = Vec::new();
        for (f, data) in records {
            values.extend(f.fields.values(data, f.header_length())?);
        }
        Ok(values)
    }

    /// All parameter values by name. This is the input `from_values` takes.
    pub fn to_map(&self) -> Result<HashMap<String, Value>> {
        Ok(self.values()?.into_iter().collect())
    }

    /// Every parameter whose value is outside its legal domain.
    pub fn validation_failures(&self) -> Result<Vec<ValidationFailure>> {
        let records = self.records().ok_or(SysexError::NotParseable)?;
        let mut failures = Vec::new();
        for (f, data) in records {
            failures.extend(f.fields.failures(data, f.header_length())?);
        }
        Ok(failures)
    }

    /// Fails with the first out-of-domain parameter.
    pub fn validate(&self) -> Result<()> {
        match self.validation_failures()?.into_iter().next() {
            Some(failure) => Err(failure.into()),
            None => Ok(()),
        }
    }

    /// Identification and parameters as a JSON document.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut parameters = serde_json::Map::new();
        for (name, value) in self.values()? {
            parameters.insert(name, value.to_json());
        }
        Ok(serde_json::json!({
            "manufacturer": self.manufacturer_name(),
            "device": self.device(),
            "type": self.type_name(),
            "name": self.name(),
            "parameters": parameters,
        }))
    }

    // Items

    fn bank(&self) -> Result<&'static BankFormat> {
        match &self.kind {
            Kind::Bank(f) => Ok(f),
            _ => Err(SysexError::NotContainer),
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, Kind::Bank(_))
    }

    /// Number of items; zero if this is not a container.
    pub fn item_count(&self) -> usize {
        self.bank().map_or(0, |f| f.item_count)
    }

    /// Byte offset of an item's record from the start of the message.
    pub fn item_offset(&self, index: usize) -> Result<usize> {
        let bank = self.bank()?;
        if index >= bank.item_count {
            return Err(SysexError::ItemOutOfRange {
                index,
                count: bank.item_count,
            });
        }
        Ok(bank.item_offset(index))
    }

    /// Name of an item, if items of this type are named.
    pub fn item_name(&self, index: usize) -> Result<Option<String>> {
        let bank = self.bank()?;
        let offset = self.item_offset(index)?;
        match bank.item_name_field.and_then(|n| bank.item_fields.get(n)) {
            Some(field) => Ok(field.get(&self.data, offset)?.as_text().map(str::to_string)),
            None => Ok(None),
        }
    }

    /// Names of all items, or `None` if items of this type are unnamed.
    pub fn item_names(&self) -> Result<Option<Vec<String>>> {
        let bank = self.bank()?;
        if bank.item_name_field.is_none() {
            return Ok(None);
        }
        (0..bank.item_count)
            .map(|i| Ok(self.item_name(i)?.unwrap_or_default()))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Parameter values of one item, in layout order.
    pub fn item_values(&self, index: usize) -> Result<Vec<(String, Value)>> {
        let bank = self.bank()?;
        let offset = self.item_offset(index)?;
        bank.item_fields.values(&self.data, offset)
    }

    /// Creates a standalone message for one item, with its own header
    /// and checksum. The result never shares bytes with the bank.
    pub fn extract_item(&self, index: usize) -> Result<Message> {
        let bank = self.bank()?;
        let values = self.item_values(index)?.into_iter().collect::<HashMap<_, _>>();
        Message::from_values(bank.item_format, &values)
    }
}

fn stored_name(format: &VoiceFormat, data: &[u8]) -> Option<String> {
    let field = format.fields.get(format.name_field?)?;
    match field.get(data, format.header_length()) {
        Ok(Value::Text(name)) => Some(name),
        _ => None,
    }
}
