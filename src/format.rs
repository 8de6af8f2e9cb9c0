//! Static layouts of the message types that can be decoded into parameters.
//!
//! A layout is data, not behaviour: a header template, the size of the
//! parameter data, where the checksum starts, and the field list. The
//! dispatcher selects a layout and the message surface consults it.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use crate::checksum::Checksum;
use crate::error::{MalformedInput, Result, SysexError};
use crate::field::{FieldSet, Value};
use crate::pattern::{self, Template};
use crate::TERMINATOR;

/// A single-record message: header, parameter data, checksum, terminator.
#[derive(Debug)]
pub struct VoiceFormat {
    pub device: &'static str,
    pub label: &'static str,
    pub header: &'static Template,
    /// Bytes of parameter data following the header.
    pub data_length: usize,
    /// Where the checksummed range begins. Usually the header length,
    /// but some headers carry a signature that is checksummed as data.
    pub checksum_start: usize,
    pub checksum: Checksum,
    /// Offsets relative to the end of the header.
    pub fields: FieldSet,
    /// Field holding the display name, if the type has one.
    pub name_field: Option<&'static str>,
}

impl VoiceFormat {
    pub fn header_length(&self) -> usize {
        self.header.len()
    }

    /// Header, parameter data, checksum and terminator.
    pub fn total_length(&self) -> usize {
        self.header.len() + self.data_length + 2
    }

    pub fn checksum_range(&self) -> Range<usize> {
        self.checksum_start..self.total_length() - 2
    }

    /// Header matches and the length is exact.
    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() == self.total_length() && pattern::matches(data, self.header, 0)
    }

    /// Builds the raw bytes from a value for every field. Wildcard header
    /// positions are left at zero; the checksum is always recomputed.
    pub fn build(&self, values: &HashMap<String, Value>) -> Result<Vec<u8>> {
        let mut data = vec![0u8; self.total_length()];
        pattern::fill(self.header, &mut data);
        self.fields.write(&mut data, values, self.header_length())?;
        let checksum_index = data.len() - 2;
        data[checksum_index] = self.checksum.compute(&data[self.checksum_range()]);
        data[checksum_index + 1] = TERMINATOR;
        Ok(data)
    }
}

/// A container holding a fixed number of fixed-size item records.
pub struct BankFormat {
    pub device: &'static str,
    pub label: &'static str,
    pub header: &'static Template,
    pub item_count: usize,
    pub item_size: usize,
    pub checksum: Checksum,
    /// Offsets relative to the start of an item.
    pub item_fields: FieldSet,
    pub item_name_field: Option<&'static str>,
    /// The standalone type an extracted item becomes.
    pub item_format: Format,
    /// Extra shape test over the whole message, for banks that share
    /// their header with another type.
    pub shape: Option<fn(&[u8]) -> bool>,
}

impl fmt::Debug for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BankFormat")
            .field("device", &self.device)
            .field("label", &self.label)
            .field("item_count", &self.item_count)
            .field("item_size", &self.item_size)
            .finish_non_exhaustive()
    }
}

impl BankFormat {
    pub fn header_length(&self) -> usize {
        self.header.len()
    }

    pub fn total_length(&self) -> usize {
        self.header.len() + self.item_count * self.item_size + 2
    }

    pub fn checksum_range(&self) -> Range<usize> {
        self.header.len()..self.total_length() - 2
    }

    /// Byte offset of an item from the start of the message.
    pub fn item_offset(&self, index: usize) -> usize {
        self.header.len() + self.item_size * index
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        data.len() == self.total_length()
            && pattern::matches(data, self.header, 0)
            && self.shape.map_or(true, |shape| shape(data))
    }
}

/// A logical message sent as several independently framed parts.
#[derive(Debug)]
pub struct CompositeFormat {
    pub device: &'static str,
    pub label: &'static str,
    pub parts: Vec<&'static VoiceFormat>,
    /// Index of the part whose name field names the whole.
    pub name_part: Option<usize>,
}

impl CompositeFormat {
    /// Builds every part from the same set of values and joins them.
    pub fn build(&self, values: &HashMap<String, Value>) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        for part in &self.parts {
            data.extend(part.build(values)?);
        }
        Ok(data)
    }
}

/// Any of the decodable layouts.
#[derive(Copy, Clone, Debug)]
pub enum Format {
    Voice(&'static VoiceFormat),
    Bank(&'static BankFormat),
    Composite(&'static CompositeFormat),
}

impl Format {
    pub fn device(&self) -> &'static str {
        match self {
            Format::Voice(f) => f.device,
            Format::Bank(f) => f.device,
            Format::Composite(f) => f.device,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Format::Voice(f) => f.label,
            Format::Bank(f) => f.label,
            Format::Composite(f) => f.label,
        }
    }

    /// Checks that `data` has this format's header and exact length.
    pub fn check(&self, data: &[u8]) -> Result<()> {
        let (header, expected): (&Template, usize) = match self {
            Format::Voice(f) => (f.header, f.total_length()),
            Format::Bank(f) => (f.header, f.total_length()),
            Format::Composite(_) => {
                return Err(SysexError::Unsupported("checking a composite against its parts"))
            }
        };
        if data.len() != expected {
            return Err(MalformedInput::LengthMismatch {
                expected,
                actual: data.len(),
            }
            .into());
        }
        if !pattern::matches(data, header, 0) {
            return Err(MalformedInput::HeaderMismatch.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::NumericField;
    use crate::template;
    use lazy_static::lazy_static;

    lazy_static! {
        static ref TINY: VoiceFormat = VoiceFormat {
            device: "Tiny",
            label: "Single voice",
            header: template![0xf0, 0x43, _, 0x7f],
            data_length: 2,
            checksum_start: 4,
            checksum: Checksum::TwoComplement,
            fields: FieldSet::new(vec![
                NumericField::new(0, "A", 0, 99).into(),
                NumericField::packed(1, "B", 0, 7, 3, 4).into(),
                NumericField::packed(1, "C", 0, 1, 1, 0).into(),
            ]),
            name_field: None,
        };
        static ref TINY_BANK: BankFormat = BankFormat {
            device: "Tiny",
            label: "4-voice bank",
            header: template![0xf0, 0x43, _, 0x7e],
            item_count: 4,
            item_size: 3,
            checksum: Checksum::TwoComplement,
            item_fields: FieldSet::new(vec![NumericField::new(0, "A", 0, 99).into()]),
            item_name_field: None,
            item_format: Format::Voice(&TINY),
            shape: None,
        };
    }

    fn values(a: i32, b: i32, c: i32) -> HashMap<String, Value> {
        HashMap::from([
            ("A".to_string(), Value::Number(a)),
            ("B".to_string(), Value::Number(b)),
            ("C".to_string(), Value::Number(c)),
        ])
    }

    #[test]
    fn build_fills_header_fields_and_checksum() {
        let data = TINY.build(&values(10, 5, 1)).unwrap();
        assert_eq!(data.len(), TINY.total_length());
        assert_eq!(data[..4], [0xf0, 0x43, 0x00, 0x7f]);
        assert_eq!(data[4], 10);
        assert_eq!(data[5], 0b0101_0001);
        let sum = (10 + 0b0101_0001 + data[6] as u32) & 0x7f;
        assert_eq!(sum, 0);
        assert_eq!(data[7], TERMINATOR);
        assert!(TINY.matches(&data));
    }

    #[test]
    fn build_requires_every_value() {
        let mut partial = values(1, 2, 0);
        partial.remove("C");
        assert!(matches!(
            TINY.build(&partial),
            Err(SysexError::MissingParameter(name)) if name == "C"
        ));
    }

    #[test]
    fn bank_item_offsets_are_evenly_spaced() {
        for i in 0..TINY_BANK.item_count - 1 {
            assert_eq!(
                TINY_BANK.item_offset(i + 1) - TINY_BANK.item_offset(i),
                TINY_BANK.item_size
            );
        }
        assert_eq!(TINY_BANK.item_offset(0), 4);
        assert_eq!(TINY_BANK.total_length(), 4 + 12 + 2);
    }

    #[test]
    fn check_reports_length_and_header() {
        let data = TINY.build(&values(1, 1, 1)).unwrap();
        assert!(Format::Voice(&TINY).check(&data).is_ok());

        assert!(matches!(
            Format::Voice(&TINY).check(&data[1..]),
            Err(SysexError::Malformed(MalformedInput::LengthMismatch { expected: 8, actual: 7 }))
        ));

        let mut other = data.clone();
        other[3] = 0x7e;
        assert!(matches!(
            Format::Voice(&TINY).check(&other),
            Err(SysexError::Malformed(MalformedInput::HeaderMismatch))
        ));
    }
}
