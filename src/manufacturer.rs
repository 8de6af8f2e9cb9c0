//! Manufacturer identifiers and the manufacturer name table.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::error::{MalformedInput, Result};
use crate::universal::UniversalKind;
use crate::{DEVELOPMENT, NON_REAL_TIME, REAL_TIME};

pub const YAMAHA: Manufacturer = Manufacturer::Standard(0x43);
pub const ROLAND: Manufacturer = Manufacturer::Standard(0x41);
pub const KORG: Manufacturer = Manufacturer::Standard(0x42);
pub const BEHRINGER: Manufacturer = Manufacturer::Extended([0x00, 0x20, 0x32]);

/// MIDI manufacturer. The ID is either a single byte for standard IDs,
/// three bytes for extended IDs, or Development (non-commercial).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Manufacturer {
    Standard(u8),
    Extended([u8; 3]),
    Development,
}

/// Who a message is addressed from: a manufacturer, or nobody in
/// particular for the universal messages.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Originator {
    Universal(UniversalKind),
    Manufacturer(Manufacturer),
}

impl Originator {
    /// Reads the identifier that follows the initiator of a framed message.
    pub fn from_message(data: &[u8]) -> Result<Self> {
        // At least: initiator, one id byte, terminator.
        let first = match data.get(1) {
            Some(&b) if data.len() >= 3 => b,
            _ => return Err(MalformedInput::TooShort { length: data.len() }.into()),
        };
        if first > 0x7f {
            return Err(MalformedInput::InvalidManufacturer { id: first }.into());
        }

        Ok(match first {
            NON_REAL_TIME => Originator::Universal(UniversalKind::NonRealTime),
            REAL_TIME => Originator::Universal(UniversalKind::RealTime),
            DEVELOPMENT => Originator::Manufacturer(Manufacturer::Development),
            0x00 => {
                // Extended ids need all three bytes ahead of the terminator.
                if data.len() < 5 {
                    return Err(MalformedInput::TooShort { length: data.len() }.into());
                }
                Originator::Manufacturer(Manufacturer::Extended([data[1], data[2], data[3]]))
            }
            b => Originator::Manufacturer(Manufacturer::Standard(b)),
        })
    }

    /// The identifier bytes as they appear in the message.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Originator::Universal(UniversalKind::NonRealTime) => vec![NON_REAL_TIME],
            Originator::Universal(UniversalKind::RealTime) => vec![REAL_TIME],
            Originator::Manufacturer(m) => m.to_bytes(),
        }
    }

    pub fn manufacturer(&self) -> Option<Manufacturer> {
        match self {
            Originator::Manufacturer(m) => Some(*m),
            Originator::Universal(_) => None,
        }
    }
}

impl Manufacturer {
    /// Gets the manufacturer System Exclusive bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Manufacturer::Development => vec![DEVELOPMENT],
            Manufacturer::Standard(b) => vec![*b],
            Manufacturer::Extended(bs) => bs.to_vec(),
        }
    }

    /// Gets the manufacturer SysEx bytes as an uppercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.to_bytes())
    }

    /// Gets the name of this manufacturer, if it is in the table.
    pub fn name(&self) -> Option<&'static str> {
        if *self == Manufacturer::Development {
            return Some("Development / Non-commercial");
        }
        MANUFACTURER_NAMES.get(self.to_hex().as_str()).copied()
    }

    /// Gets the group of this manufacturer based on the identifier.
    pub fn group(&self) -> ManufacturerGroup {
        match self {
            Manufacturer::Development => ManufacturerGroup::Development,
            Manufacturer::Standard(b) => match b {
                0x01..=0x3f => ManufacturerGroup::NorthAmerican,
                0x40..=0x5f => ManufacturerGroup::Japanese,
                _ => ManufacturerGroup::EuropeanAndOther,
            },
            Manufacturer::Extended(bs) => {
                if bs[1] & 0x40 != 0 {
                    ManufacturerGroup::Japanese
                } else if bs[1] & 0x20 != 0 {
                    ManufacturerGroup::EuropeanAndOther
                } else {
                    ManufacturerGroup::NorthAmerican
                }
            }
        }
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Unknown manufacturer ({})", self.to_hex()),
        }
    }
}

/// Group of manufacturer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ManufacturerGroup {
    Development,
    NorthAmerican,
    EuropeanAndOther,
    Japanese,
}

lazy_static! {
    // Keyed by the uppercase hex of the id bytes.
    static ref MANUFACTURER_NAMES: HashMap<&'static str, &'static str> = {
        HashMap::from([
            ("01", "Sequential Circuits"),
            ("04", "Moog Music"),
            ("06", "Lexicon Inc."),
            ("07", "Kurzweil / Young Chang"),
            ("0F", "Ensoniq"),
            ("10", "Oberheim / Gibson Labs"),
            ("18", "E-mu"),
            ("1C", "Eventide"),
            ("29", "PPG (Germany)"),
            ("33", "Clavia Digital Instruments"),
            ("3E", "Waldorf Electronics GmbH"),
            ("3F", "Quasimidi"),

            ("00000E", "Alesis Studio Electronics"),
            ("000015", "KAT Inc."),
            ("00003B", "Mark Of The Unicorn"),
            ("000066", "Mackie Designs"),

            ("002008", "Evolution Synthesis, Ltd"),
            ("002029", "Focusrite/Novation"),
            ("002032", "Behringer"),
            ("002033", "Access Music Electronics"),
            ("00203C", "Elektron ESI AB"),
            ("00206B", "Arturia"),

            ("40", "Kawai"),
            ("41", "Roland"),
            ("42", "Korg"),
            ("43", "Yamaha"),
            ("44", "Casio"),
            ("46", "Kamiya Studio"),
            ("47", "Akai"),
            ("48", "Victor Company of Japan"),
            ("4B", "Fujitsu"),
            ("4C", "Sony"),
            ("4E", "Teac"),
            ("50", "Matsushita Electric Industrial"),
            ("51", "Fostex"),
            ("52", "Zoom"),
            ("54", "Matsushita Communication Industrial"),
            ("55", "Suzuki Musical Instruments"),

            ("004000", "Crimson Technology Inc."),
            ("004006", "Pioneer Corporation"),
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SysexError;

    #[test]
    fn standard_id() {
        let data = [0xf0, 0x43, 0x00, 0x09, 0x20, 0x00, 0xf7];
        let originator = Originator::from_message(&data).unwrap();
        assert_eq!(originator, Originator::Manufacturer(YAMAHA));
        assert_eq!(originator.to_bytes(), vec![0x43]);
        assert_eq!(YAMAHA.name(), Some("Yamaha"));
    }

    #[test]
    fn extended_id() {
        let data = [0xf0, 0x00, 0x20, 0x32, 0x00, 0x01, 0x24, 0x00, 0xf7];
        let originator = Originator::from_message(&data).unwrap();
        assert_eq!(originator, Originator::Manufacturer(BEHRINGER));
        assert_eq!(BEHRINGER.to_hex(), "002032");
        assert_eq!(BEHRINGER.name(), Some("Behringer"));
    }

    #[test]
    fn extended_id_needs_three_bytes() {
        let data = [0xf0, 0x00, 0x20, 0xf7];
        assert!(Originator::from_message(&data).is_err());
    }

    #[test]
    fn status_byte_is_not_a_manufacturer() {
        let data = [0xf0, 0x90, 0x43, 0x00, 0xf7];
        assert!(matches!(
            Originator::from_message(&data),
            Err(SysexError::Malformed(MalformedInput::InvalidManufacturer { id: 0x90 }))
        ));
    }

    #[test]
    fn universal_has_no_manufacturer() {
        let data = [0xf0, 0x7e, 0x00, 0x03, 0x01, 0x05, 0xf7];
        let originator = Originator::from_message(&data).unwrap();
        assert_eq!(originator, Originator::Universal(UniversalKind::NonRealTime));
        assert_eq!(originator.manufacturer(), None);

        let data = [0xf0, 0x7f, 0x7f, 0x04, 0x01, 0x00, 0x7f, 0xf7];
        let originator = Originator::from_message(&data).unwrap();
        assert_eq!(originator, Originator::Universal(UniversalKind::RealTime));
    }

    #[test]
    fn development_id() {
        let data = [0xf0, 0x7d, 0x01, 0xf7];
        let originator = Originator::from_message(&data).unwrap();
        assert_eq!(originator, Originator::Manufacturer(Manufacturer::Development));
        assert_eq!(Manufacturer::Development.group(), ManufacturerGroup::Development);
    }

    #[test]
    fn unknown_manufacturer_display() {
        let unknown = Manufacturer::Standard(0x5b);
        assert_eq!(unknown.name(), None);
        assert_eq!(format!("{}", unknown), "Unknown manufacturer (5B)");
        assert_eq!(format!("{}", ROLAND), "Roland");
    }

    #[test]
    fn groups() {
        assert_eq!(Manufacturer::Standard(0x01).group(), ManufacturerGroup::NorthAmerican);
        assert_eq!(KORG.group(), ManufacturerGroup::Japanese);
        assert_eq!(Manufacturer::Standard(0x60).group(), ManufacturerGroup::EuropeanAndOther);
        assert_eq!(BEHRINGER.group(), ManufacturerGroup::EuropeanAndOther);
        assert_eq!(
            Manufacturer::Extended([0x00, 0x40, 0x00]).group(),
            ManufacturerGroup::Japanese
        );
        assert_eq!(
            Manufacturer::Extended([0x00, 0x00, 0x0e]).group(),
            ManufacturerGroup::NorthAmerican
        );
    }
}
