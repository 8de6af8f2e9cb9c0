//! Yamaha DX/TX series: DX7, DX21/DX27/DX100 and TX81Z.

pub mod tables;

use lazy_static::lazy_static;

use crate::checksum::Checksum;
use crate::dispatch::Rule;
use crate::field::FieldSet;
use crate::format::{BankFormat, CompositeFormat, Format, VoiceFormat};
use crate::message::Kind;
use crate::pattern::{self, Template};
use crate::template;
use tables::{TX81Z_UNUSED_PITCH_EG, VOICE_NAME};

pub const BANK_VOICE_COUNT: usize = 32;
pub const PACKED_VOICE_SIZE: usize = 128;

const PARAMETER_CHANGE: &Template = template![0xf0, 0x43, 0x10, _, _, _, 0xf7];
const PARAMETER_CHANGE_LENGTH: usize = 7;

// Channel and format number, then the byte count (4096).
const FOUR_OP_BANK_HEADER: &Template = template![0xf0, 0x43, _, 0x04, 0x20, 0x00];

lazy_static! {
    pub static ref DX7_VOICE: VoiceFormat = VoiceFormat {
        device: "DX7",
        label: "Single voice",
        header: template![0xf0, 0x43, 0x00, 0x00, 0x01, 0x1b],
        data_length: 155,
        checksum_start: 6,
        checksum: Checksum::TwoComplement,
        fields: FieldSet::new(tables::dx7_single_voice()),
        name_field: Some(VOICE_NAME),
    };

    pub static ref DX7_BANK: BankFormat = BankFormat {
        device: "DX7",
        label: "32-voice bank",
        header: template![0xf0, 0x43, 0x00, 0x09, 0x20, 0x00],
        item_count: BANK_VOICE_COUNT,
        item_size: PACKED_VOICE_SIZE,
        checksum: Checksum::TwoComplement,
        item_fields: FieldSet::new(tables::dx7_packed_voice()),
        item_name_field: Some(VOICE_NAME),
        item_format: Format::Voice(&DX7_VOICE),
        shape: None,
    };

    pub static ref DX21_VOICE: VoiceFormat = VoiceFormat {
        device: "DX21/DX27/DX100",
        label: "Single voice",
        header: template![0xf0, 0x43, _, 0x03, 0x00, 0x5d],
        data_length: 93,
        checksum_start: 6,
        checksum: Checksum::TwoComplement,
        fields: FieldSet::new(tables::dx21_single_voice()),
        name_field: Some(VOICE_NAME),
    };

    pub static ref DX21_BANK: BankFormat = BankFormat {
        device: "DX21/DX27/DX100",
        label: "32-voice bank",
        header: FOUR_OP_BANK_HEADER,
        item_count: BANK_VOICE_COUNT,
        item_size: PACKED_VOICE_SIZE,
        checksum: Checksum::TwoComplement,
        item_fields: FieldSet::new(tables::dx21_packed_voice()),
        item_name_field: Some(VOICE_NAME),
        item_format: Format::Voice(&DX21_VOICE),
        shape: Some(is_dx21_bank),
    };

    /// ACED. The ASCII signature after the six header bytes is
    /// checksummed along with the parameter data.
    pub static ref TX81Z_ADDITIONAL_VOICE: VoiceFormat = VoiceFormat {
        device: "TX81Z",
        label: "Additional voice data",
        header: template![
            0xf0, 0x43, _, 0x7e, 0x00, 0x21,
            b'L', b'M', b' ', b' ', b'8', b'9', b'7', b'6', b'A', b'E',
        ],
        data_length: 23,
        checksum_start: 6,
        checksum: Checksum::TwoComplement,
        fields: FieldSet::new(tables::tx81z_additional_voice()),
        name_field: None,
    };

    /// ACED followed by VCED, named by the VCED part.
    pub static ref TX81Z_VOICE: CompositeFormat = CompositeFormat {
        device: "TX81Z",
        label: "Single voice",
        parts: vec![&*TX81Z_ADDITIONAL_VOICE, &*DX21_VOICE],
        name_part: Some(1),
    };

    pub static ref TX81Z_BANK: BankFormat = BankFormat {
        device: "TX81Z",
        label: "32-voice bank",
        header: FOUR_OP_BANK_HEADER,
        item_count: BANK_VOICE_COUNT,
        item_size: PACKED_VOICE_SIZE,
        checksum: Checksum::TwoComplement,
        item_fields: FieldSet::new(tables::tx81z_packed_voice()),
        item_name_field: Some(VOICE_NAME),
        item_format: Format::Composite(&TX81Z_VOICE),
        shape: Some(is_tx81z_bank),
    };

    pub static ref RULES: Vec<Rule> = vec![
        Rule::Bank(&DX7_BANK),
        Rule::Voice(&DX7_VOICE),
        Rule::Custom(parameter_change),
        Rule::Voice(&DX21_VOICE),
        Rule::Bank(&DX21_BANK),
        Rule::Bank(&TX81Z_BANK),
        Rule::Voice(&TX81Z_ADDITIONAL_VOICE),
    ];

    pub static ref COMPOSITES: Vec<&'static CompositeFormat> = vec![&*TX81Z_VOICE];
}

fn voice_offsets() -> impl Iterator<Item = usize> {
    (0..BANK_VOICE_COUNT).map(|i| FOUR_OP_BANK_HEADER.len() + i * PACKED_VOICE_SIZE)
}

/// DX21 and TX81Z banks share a header. DX21 voice records leave
/// everything after byte 73 zero.
fn is_dx21_bank(data: &[u8]) -> bool {
    voice_offsets().all(|offset| pattern::are_zero(data, offset + 73, 55))
}

/// TX81Z voice records carry a fixed unused pitch EG and the extended
/// operator data, then zeros from byte 84.
fn is_tx81z_bank(data: &[u8]) -> bool {
    voice_offsets().all(|offset| {
        data.get(offset + 67..offset + 73) == Some(&TX81Z_UNUSED_PITCH_EG[..])
            && pattern::are_zero(data, offset + 84, 44)
    })
}

/// DX7 parameter change. The group in the upper bits of the fourth byte
/// tells a voice parameter from a function parameter.
fn parameter_change(data: &[u8]) -> Option<Kind> {
    if data.len() != PARAMETER_CHANGE_LENGTH || !pattern::matches(data, PARAMETER_CHANGE, 0) {
        return None;
    }
    let label = match data[3] >> 2 {
        0 => "Parameter change (voice)",
        2 => "Parameter change (function)",
        _ => return None,
    };
    Some(Kind::Known {
        device: "DX7",
        label: Some(label),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::two_complement_7bit;
    use crate::dispatch::parse;
    use crate::field::Value;
    use crate::message::Message;
    use std::collections::HashMap;

    fn bank_bytes(format: &BankFormat, prepare: impl Fn(&mut [u8], usize)) -> Vec<u8> {
        let mut data = vec![0u8; format.total_length()];
        pattern::fill(format.header, &mut data);
        for i in 0..format.item_count {
            let offset = format.item_offset(i);
            prepare(&mut data, offset);
            let name = Value::from(format!("VOICE {:02}", i + 1));
            format
                .item_fields
                .get(VOICE_NAME)
                .unwrap()
                .set(&mut data, &name, offset)
                .unwrap();
        }
        let end = data.len() - 2;
        data[end] = two_complement_7bit(&data[format.header_length()..end]);
        data[end + 1] = 0xf7;
        data
    }

    fn tx81z_record(data: &mut [u8], offset: usize) {
        data[offset + 67..offset + 73].copy_from_slice(&TX81Z_UNUSED_PITCH_EG);
        data[offset + 73] = 0b0010_1010; // EG shift 2, fixed, range 2
    }

    #[test]
    fn dx7_bank() {
        let data = bank_bytes(&DX7_BANK, |_, _| {});
        assert_eq!(data.len(), 4104);

        let message = parse(&data, None).unwrap();
        assert_eq!(message.manufacturer_name(), Some("Yamaha"));
        assert_eq!(message.device(), Some("DX7"));
        assert_eq!(message.type_name(), Some("32-voice bank"));
        assert!(message.is_container());
        assert_eq!(message.item_count(), 32);
        assert_eq!(message.verify_checksum(), Some(true));

        let names = message.item_names().unwrap().unwrap();
        assert_eq!(names.len(), 32);
        assert_eq!(names[0], "VOICE 01");
        assert_eq!(names[31], "VOICE 32");
    }

    #[test]
    fn dx7_bank_item_becomes_single_voice() {
        let data = bank_bytes(&DX7_BANK, |data, offset| {
            data[offset + 110] = 21; // algorithm
            data[offset + 15] = (17 << 1) | 1; // OP 6 coarse 17, fixed
        });
        let bank = parse(&data, None).unwrap();
        let voice = bank.extract_item(4).unwrap();

        assert_eq!(voice.device(), Some("DX7"));
        assert_eq!(voice.type_name(), Some("Single voice"));
        assert_eq!(voice.len(), 163);
        assert_eq!(voice.name().as_deref(), Some("VOICE 05"));
        assert_eq!(voice.value("Algorithm").unwrap(), Value::Number(21));
        assert_eq!(voice.value("OP 6 Osc frequency coarse").unwrap(), Value::Number(17));
        assert_eq!(voice.value("OP 6 Osc mode").unwrap(), Value::Number(1));
        assert_eq!(voice.verify_checksum(), Some(true));

        let reparsed = parse(voice.as_bytes(), None).unwrap();
        assert_eq!(reparsed.type_name(), Some("Single voice"));
        assert_eq!(reparsed.as_bytes(), voice.as_bytes());
    }

    #[test]
    fn dx21_and_tx81z_banks_are_told_apart() {
        let dx21 = parse(&bank_bytes(&DX21_BANK, |_, _| {}), None).unwrap();
        assert_eq!(dx21.device(), Some("DX21/DX27/DX100"));
        assert_eq!(dx21.type_name(), Some("32-voice bank"));

        let tx81z = parse(&bank_bytes(&TX81Z_BANK, tx81z_record), None).unwrap();
        assert_eq!(tx81z.device(), Some("TX81Z"));
        assert_eq!(tx81z.type_name(), Some("32-voice bank"));

        let mut odd = bank_bytes(&DX21_BANK, |_, _| {});
        odd[DX21_BANK.item_offset(3) + 100] = 1;
        let odd = parse(&odd, None).unwrap();
        assert_eq!(odd.device(), None);
        assert!(!odd.is_container());
    }

    #[test]
    fn tx81z_bank_item_becomes_composite_voice() {
        let bank = parse(&bank_bytes(&TX81Z_BANK, tx81z_record), None).unwrap();
        let voice = bank.extract_item(0).unwrap();

        assert!(voice.is_composite());
        assert_eq!(voice.parts().len(), 2);
        assert_eq!(voice.device(), Some("TX81Z"));
        assert_eq!(voice.type_name(), Some("Single voice"));
        assert_eq!(voice.name().as_deref(), Some("VOICE 01"));
        assert_eq!(voice.value("OP 4 EG Shift").unwrap(), Value::Number(2));
        assert_eq!(voice.value("OP 4 Fixed Frequency").unwrap(), Value::Number(1));
        assert_eq!(voice.value("OP 4 Fixed Frequency Range").unwrap(), Value::Number(2));
        assert_eq!(voice.value("Pitch EG Rate 1").unwrap(), Value::Number(99));
        assert_eq!(voice.verify_checksum(), Some(true));

        let reparsed = parse(voice.as_bytes(), None).unwrap();
        assert_eq!(reparsed.device(), Some("TX81Z"));
        assert_eq!(reparsed.type_name(), Some("Single voice"));
        assert_eq!(reparsed.parts()[0].type_name(), Some("Additional voice data"));
        assert_eq!(reparsed.parts()[1].device(), Some("DX21/DX27/DX100"));
    }

    #[test]
    fn parameter_change_groups() {
        let voice = parse(&[0xf0, 0x43, 0x10, 0x01, 0x02, 0x03, 0xf7], None).unwrap();
        assert_eq!(voice.device(), Some("DX7"));
        assert_eq!(voice.type_name(), Some("Parameter change (voice)"));

        let function = parse(&[0xf0, 0x43, 0x10, 0x08, 0x40, 0x01, 0xf7], None).unwrap();
        assert_eq!(function.type_name(), Some("Parameter change (function)"));

        let other = parse(&[0xf0, 0x43, 0x10, 0x04, 0x02, 0x03, 0xf7], None).unwrap();
        assert_eq!(other.manufacturer_name(), Some("Yamaha"));
        assert_eq!(other.device(), None);
        assert_eq!(other.type_name(), None);
    }

    #[test]
    fn additional_voice_signature_is_checksummed() {
        let values: HashMap<String, Value> = TX81Z_ADDITIONAL_VOICE
            .fields
            .names()
            .map(|name| (name.to_string(), Value::Number(1)))
            .collect();
        let message = Message::from_values(Format::Voice(&TX81Z_ADDITIONAL_VOICE), &values).unwrap();
        let data = message.as_bytes();
        assert_eq!(data.len(), 41);
        assert_eq!(&data[6..16], b"LM  8976AE");
        assert_eq!(data[39], two_complement_7bit(&data[6..39]));
    }
}
