//! Named parameter fields over the parameter data of a message.
//!
//! A field never owns data. It only describes where a value lives:
//! a byte offset, plus either a bit range inside that byte (numeric)
//! or a fixed length (text). Several numeric fields may share a byte
//! at disjoint bit ranges, which is how packed voice data is encoded.
//!
//! Offsets are relative to the start of the parameter data. Callers pass
//! the position of that data as `extra_offset` (the header length for a
//! single voice, the item offset for a bank item).

use std::collections::HashMap;
use std::fmt;

use bit::BitIndex;
use thiserror::Error;

use crate::error::{Result, SysexError};

/// A parameter value.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Value {
    Number(i32),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<i32> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Number(n) => serde_json::Value::from(*n),
            Value::Text(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n)
    }
}

impl From<u8> for Value {
    fn from(n: u8) -> Self {
        Value::Number(n as i32)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// A value outside the legal domain of its field, with a corrected value
/// that the caller may substitute.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value for \"{field}\": {reason} (suggested: {suggestion})")]
pub struct ValidationFailure {
    pub field: String,
    pub reason: String,
    pub suggestion: Value,
}

/// Numeric (integer) parameter occupying `bit_count` bits of one byte,
/// starting `bit_offset` bits from the least significant end.
#[derive(Clone, Debug)]
pub struct NumericField {
    name: String,
    offset: usize,
    min: u8,
    max: u8,
    bit_count: u8,
    bit_offset: u8,
}

impl NumericField {
    /// A field that uses the seven data bits of its byte.
    pub fn new(offset: usize, name: impl Into<String>, min: u8, max: u8) -> Self {
        Self::packed(offset, name, min, max, 7, 0)
    }

    /// A field that shares its byte with other fields.
    pub fn packed(
        offset: usize,
        name: impl Into<String>,
        min: u8,
        max: u8,
        bit_count: u8,
        bit_offset: u8,
    ) -> Self {
        assert!((1..=8).contains(&bit_count));
        assert!(bit_count + bit_offset <= 8);
        assert!(min <= max);
        NumericField {
            name: name.into(),
            offset,
            min,
            max,
            bit_count,
            bit_offset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn range(&self) -> (u8, u8) {
        (self.min, self.max)
    }

    pub fn bit_count(&self) -> u8 {
        self.bit_count
    }

    pub fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    fn mask(&self) -> u8 {
        ((1u16 << self.bit_count) - 1) as u8
    }

    fn index(&self, data: &[u8], extra_offset: usize) -> Result<usize> {
        let index = self.offset + extra_offset;
        if index >= data.len() {
            return Err(SysexError::FieldOutOfBounds {
                field: self.name.clone(),
                offset: index,
                length: data.len(),
            });
        }
        Ok(index)
    }

    /// Reads the value. Does not validate it.
    pub fn get(&self, data: &[u8], extra_offset: usize) -> Result<u8> {
        let byte = data[self.index(data, extra_offset)?];
        let mut value = 0u8;
        for i in 0..self.bit_count as usize {
            value.set_bit(i, byte.bit(self.bit_offset as usize + i));
        }
        Ok(value)
    }

    /// Writes the value, leaving the other bits of the byte untouched.
    /// Only the lowest `bit_count` bits of `value` are stored.
    pub fn set(&self, data: &mut [u8], value: i32, extra_offset: usize) -> Result<()> {
        let index = self.index(data, extra_offset)?;
        let bits = (value & self.mask() as i32) as u8;
        let byte = &mut data[index];
        for i in 0..self.bit_count as usize {
            byte.set_bit(self.bit_offset as usize + i, bits.bit(i));
        }
        Ok(())
    }

    pub fn validate(&self, value: i32) -> Result<(), ValidationFailure> {
        let (min, max) = (self.min as i32, self.max as i32);
        if value < min || value > max {
            return Err(ValidationFailure {
                field: self.name.clone(),
                reason: format!("{} is outside the range {}..={}", value, min, max),
                suggestion: Value::Number(value.clamp(min, max)),
            });
        }
        Ok(())
    }
}

/// Space-padded ASCII text of a fixed length.
#[derive(Clone, Debug)]
pub struct TextField {
    name: String,
    offset: usize,
    length: usize,
}

const PADDING: u8 = b' ';

fn is_printable(c: char) -> bool {
    (' '..='~').contains(&c)
}

impl TextField {
    pub fn new(offset: usize, name: impl Into<String>, length: usize) -> Self {
        TextField {
            name: name.into(),
            offset,
            length,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn span(&self, data_length: usize, extra_offset: usize) -> Result<std::ops::Range<usize>> {
        let start = self.offset + extra_offset;
        let end = start + self.length;
        if end > data_length {
            return Err(SysexError::FieldOutOfBounds {
                field: self.name.clone(),
                offset: start,
                length: data_length,
            });
        }
        Ok(start..end)
    }

    /// Reads the text with trailing padding removed. Bytes are taken as
    /// 7-bit ASCII; non-printable characters are kept so that the text
    /// round-trips, and are reported by `validate`.
    pub fn get(&self, data: &[u8], extra_offset: usize) -> Result<String> {
        let span = self.span(data.len(), extra_offset)?;
        let text: String = data[span].iter().map(|&b| (b & 0x7f) as char).collect();
        Ok(text.trim_end_matches(|c| c == ' ' || c == '\0').to_string())
    }

    /// Writes the text, padded with spaces to the field length.
    /// Characters outside ASCII are written as spaces.
    pub fn set(&self, data: &mut [u8], value: &str, extra_offset: usize) -> Result<()> {
        let count = value.chars().count();
        if count > self.length {
            return Err(SysexError::Validation(ValidationFailure {
                field: self.name.clone(),
                reason: format!("text is {} characters, at most {} allowed", count, self.length),
                suggestion: Value::Text(value.chars().take(self.length).collect()),
            }));
        }

        let span = self.span(data.len(), extra_offset)?;
        let mut chars = value.chars();
        for slot in &mut data[span] {
            *slot = match chars.next() {
                Some(c) if c.is_ascii() => c as u8,
                _ => PADDING,
            };
        }
        Ok(())
    }

    pub fn validate(&self, value: &str) -> Result<(), ValidationFailure> {
        let count = value.chars().count();
        let sanitized: String = value
            .chars()
            .take(self.length)
            .map(|c| if is_printable(c) { c } else { ' ' })
            .collect();

        if count > self.length {
            return Err(ValidationFailure {
                field: self.name.clone(),
                reason: format!("text is {} characters, at most {} allowed", count, self.length),
                suggestion: Value::Text(sanitized),
            });
        }
        if !value.chars().all(is_printable) {
            return Err(ValidationFailure {
                field: self.name.clone(),
                reason: "text contains non-printable characters".to_string(),
                suggestion: Value::Text(sanitized),
            });
        }
        Ok(())
    }
}

/// A parameter field of either kind.
#[derive(Clone, Debug)]
pub enum Field {
    Numeric(NumericField),
    Text(TextField),
}

impl From<NumericField> for Field {
    fn from(f: NumericField) -> Self {
        Field::Numeric(f)
    }
}

impl From<TextField> for Field {
    fn from(f: TextField) -> Self {
        Field::Text(f)
    }
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Numeric(f) => f.name(),
            Field::Text(f) => f.name(),
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Field::Numeric(f) => f.offset(),
            Field::Text(f) => f.offset(),
        }
    }

    pub fn get(&self, data: &[u8], extra_offset: usize) -> Result<Value> {
        match self {
            Field::Numeric(f) => f.get(data, extra_offset).map(Value::from),
            Field::Text(f) => f.get(data, extra_offset).map(Value::Text),
        }
    }

    pub fn set(&self, data: &mut [u8], value: &Value, extra_offset: usize) -> Result<()> {
        match (self, value) {
            (Field::Numeric(f), Value::Number(n)) => f.set(data, *n, extra_offset),
            (Field::Text(f), Value::Text(s)) => f.set(data, s, extra_offset),
            _ => Err(SysexError::WrongValueType {
                field: self.name().to_string(),
            }),
        }
    }

    /// Checks `value` against the field's domain. A value of the wrong
    /// kind fails with the field's default value as the suggestion.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationFailure> {
        match (self, value) {
            (Field::Numeric(f), Value::Number(n)) => f.validate(*n),
            (Field::Text(f), Value::Text(s)) => f.validate(s),
            (Field::Numeric(f), Value::Text(_)) => Err(ValidationFailure {
                field: f.name.clone(),
                reason: "expected a number".to_string(),
                suggestion: Value::Number(f.min as i32),
            }),
            (Field::Text(f), Value::Number(_)) => Err(ValidationFailure {
                field: f.name.clone(),
                reason: "expected text".to_string(),
                suggestion: Value::Text(String::new()),
            }),
        }
    }
}

/// An ordered list of fields, indexed by name.
#[derive(Clone, Debug, Default)]
pub struct FieldSet {
    fields: Vec<Field>,
    by_name: HashMap<String, usize>,
}

impl FieldSet {
    pub fn new(fields: Vec<Field>) -> Self {
        let by_name = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();
        assert_eq!(by_name.len(), fields.len(), "duplicate field name");
        FieldSet { fields, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads every field, in declaration order.
    pub fn values(&self, data: &[u8], extra_offset: usize) -> Result<Vec<(String, Value)>> {
        self.fields
            .iter()
            .map(|f| Ok((f.name().to_string(), f.get(data, extra_offset)?)))
            .collect()
    }

    /// Writes a value for every field. Every field must have a value.
    pub fn write(
        &self,
        data: &mut [u8],
        values: &HashMap<String, Value>,
        extra_offset: usize,
    ) -> Result<()> {
        for field in &self.fields {
            let value = values
                .get(field.name())
                .ok_or_else(|| SysexError::MissingParameter(field.name().to_string()))?;
            field.set(data, value, extra_offset)?;
        }
        Ok(())
    }

    /// Validates every field and collects the failures.
    pub fn failures(&self, data: &[u8], extra_offset: usize) -> Result<Vec<ValidationFailure>> {
        let mut failures = Vec::new();
        for field in &self.fields {
            if let Err(failure) = field.validate(&field.get(data, extra_offset)?) {
                failures.push(failure);
            }
        }
        Ok(failures)
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
