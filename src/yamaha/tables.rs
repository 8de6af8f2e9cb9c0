//! Parameter layouts of the DX/TX series. Offsets are relative to the
//! start of the parameter data (single voices) or of the voice record
//! (banks).
//!
//! Operator blocks are stored in reverse order: OP 6 (or OP 4) first.

use crate::field::{Field, NumericField, TextField};

pub const VOICE_NAME: &str = "Voice name";
pub const VOICE_NAME_LENGTH: usize = 10;

/// Offset, name, min, max, bit count, bit offset.
type Entry = (usize, &'static str, u8, u8, u8, u8);

fn push_entries(fields: &mut Vec<Field>, base: usize, prefix: &str, entries: &[Entry]) {
    for &(offset, name, min, max, bits, shift) in entries {
        fields.push(NumericField::packed(base + offset, format!("{}{}", prefix, name), min, max, bits, shift).into());
    }
}

fn push_operators(fields: &mut Vec<Field>, operators: usize, stride: usize, entries: &[Entry]) {
    for op in (1..=operators).rev() {
        let base = (operators - op) * stride;
        push_entries(fields, base, &format!("OP {} ", op), entries);
    }
}

// DX7

const DX7_SINGLE_OPERATOR: [Entry; 21] = [
    (0, "EG Rate 1", 0, 99, 7, 0),
    (1, "EG Rate 2", 0, 99, 7, 0),
    (2, "EG Rate 3", 0, 99, 7, 0),
    (3, "EG Rate 4", 0, 99, 7, 0),
    (4, "EG Level 1", 0, 99, 7, 0),
    (5, "EG Level 2", 0, 99, 7, 0),
    (6, "EG Level 3", 0, 99, 7, 0),
    (7, "EG Level 4", 0, 99, 7, 0),
    (8, "Keyboard level scale break point", 0, 99, 7, 0),
    (9, "Keyboard level scale left depth", 0, 99, 7, 0),
    (10, "Keyboard level scale right depth", 0, 99, 7, 0),
    (11, "Keyboard level scale left curve", 0, 3, 7, 0),
    (12, "Keyboard level scale right curve", 0, 3, 7, 0),
    (13, "Keyboard rate scaling", 0, 7, 7, 0),
    (14, "Amp mod sensitivity", 0, 3, 7, 0),
    (15, "Keyboard velocity sensitivity", 0, 7, 7, 0),
    (16, "Output level", 0, 99, 7, 0),
    (17, "Osc mode", 0, 1, 7, 0),
    (18, "Osc frequency coarse", 0, 31, 7, 0),
    (19, "Osc frequency fine", 0, 99, 7, 0),
    (20, "Osc detune", 0, 14, 7, 0),
];

const DX7_SINGLE_COMMON: [Entry; 19] = [
    (126, "Pitch EG Rate 1", 0, 99, 7, 0),
    (127, "Pitch EG Rate 2", 0, 99, 7, 0),
    (128, "Pitch EG Rate 3", 0, 99, 7, 0),
    (129, "Pitch EG Rate 4", 0, 99, 7, 0),
    (130, "Pitch EG Level 1", 0, 99, 7, 0),
    (131, "Pitch EG Level 2", 0, 99, 7, 0),
    (132, "Pitch EG Level 3", 0, 99, 7, 0),
    (133, "Pitch EG Level 4", 0, 99, 7, 0),
    (134, "Algorithm", 0, 31, 7, 0),
    (135, "Feedback", 0, 7, 7, 0),
    (136, "Oscillator sync", 0, 1, 7, 0),
    (137, "LFO Speed", 0, 99, 7, 0),
    (138, "LFO Delay", 0, 99, 7, 0),
    (139, "LFO Pitch mod depth", 0, 99, 7, 0),
    (140, "LFO Amp mod depth", 0, 99, 7, 0),
    (141, "LFO Sync", 0, 1, 7, 0),
    (142, "LFO Waveform", 0, 5, 7, 0),
    (143, "Pitch mod sensitivity", 0, 7, 7, 0),
    (144, "Transpose", 0, 48, 7, 0),
];

/// DX7 single voice (VCED), 155 bytes.
pub fn dx7_single_voice() -> Vec<Field> {
    let mut fields = Vec::new();
    push_operators(&mut fields, 6, 21, &DX7_SINGLE_OPERATOR);
    push_entries(&mut fields, 0, "", &DX7_SINGLE_COMMON);
    fields.push(TextField::new(145, VOICE_NAME, VOICE_NAME_LENGTH).into());
    fields
}

const DX7_PACKED_OPERATOR: [Entry; 21] = [
    (0, "EG Rate 1", 0, 99, 7, 0),
    (1, "EG Rate 2", 0, 99, 7, 0),
    (2, "EG Rate 3", 0, 99, 7, 0),
    (3, "EG Rate 4", 0, 99, 7, 0),
    (4, "EG Level 1", 0, 99, 7, 0),
    (5, "EG Level 2", 0, 99, 7, 0),
    (6, "EG Level 3", 0, 99, 7, 0),
    (7, "EG Level 4", 0, 99, 7, 0),
    (8, "Keyboard level scale break point", 0, 99, 7, 0),
    (9, "Keyboard level scale left depth", 0, 99, 7, 0),
    (10, "Keyboard level scale right depth", 0, 99, 7, 0),
    (11, "Keyboard level scale left curve", 0, 3, 2, 2),
    (11, "Keyboard level scale right curve", 0, 3, 2, 0),
    (12, "Osc detune", 0, 14, 4, 3),
    (12, "Keyboard rate scaling", 0, 7, 3, 0),
    (13, "Keyboard velocity sensitivity", 0, 7, 3, 2),
    (13, "Amp mod sensitivity", 0, 3, 2, 0),
    (14, "Output level", 0, 99, 7, 0),
    (15, "Osc frequency coarse", 0, 31, 5, 1),
    (15, "Osc mode", 0, 1, 1, 0),
    (16, "Osc frequency fine", 0, 99, 7, 0),
];

const DX7_PACKED_COMMON: [Entry; 19] = [
    (102, "Pitch EG Rate 1", 0, 99, 7, 0),
    (103, "Pitch EG Rate 2", 0, 99, 7, 0),
    (104, "Pitch EG Rate 3", 0, 99, 7, 0),
    (105, "Pitch EG Rate 4", 0, 99, 7, 0),
    (106, "Pitch EG Level 1", 0, 99, 7, 0),
    (107, "Pitch EG Level 2", 0, 99, 7, 0),
    (108, "Pitch EG Level 3", 0, 99, 7, 0),
    (109, "Pitch EG Level 4", 0, 99, 7, 0),
    (110, "Algorithm", 0, 31, 5, 0),
    (111, "Oscillator sync", 0, 1, 1, 3),
    (111, "Feedback", 0, 7, 3, 0),
    (112, "LFO Speed", 0, 99, 7, 0),
    (113, "LFO Delay", 0, 99, 7, 0),
    (114, "LFO Pitch mod depth", 0, 99, 7, 0),
    (115, "LFO Amp mod depth", 0, 99, 7, 0),
    (116, "Pitch mod sensitivity", 0, 7, 3, 4),
    (116, "LFO Waveform", 0, 5, 3, 1),
    (116, "LFO Sync", 0, 1, 1, 0),
    (117, "Transpose", 0, 48, 7, 0),
];

/// DX7 packed voice record (VMEM), 128 bytes.
pub fn dx7_packed_voice() -> Vec<Field> {
    let mut fields = Vec::new();
    push_operators(&mut fields, 6, 17, &DX7_PACKED_OPERATOR);
    push_entries(&mut fields, 0, "", &DX7_PACKED_COMMON);
    fields.push(TextField::new(118, VOICE_NAME, VOICE_NAME_LENGTH).into());
    fields
}

// DX21/DX27/DX100 and TX81Z

const FOUR_OP_SINGLE_OPERATOR: [Entry; 13] = [
    (0, "Attack Rate", 0, 31, 7, 0),
    (1, "Decay 1 Rate", 0, 31, 7, 0),
    (2, "Decay 2 Rate", 0, 31, 7, 0),
    (3, "Release Rate", 1, 15, 7, 0),
    (4, "Decay 1 Level", 0, 15, 7, 0),
    (5, "Level Scaling", 0, 99, 7, 0),
    (6, "Rate Scaling", 0, 3, 7, 0),
    (7, "EG Bias Sensitivity", 0, 7, 7, 0),
    (8, "Amplitude Modulation Enable", 0, 1, 7, 0),
    (9, "Key Velocity Sensitivity", 0, 7, 7, 0),
    (10, "Operator Output Level", 0, 99, 7, 0),
    (11, "Frequency", 0, 63, 7, 0),
    (12, "Detune", 0, 6, 7, 0),
];

const FOUR_OP_SINGLE_COMMON: [Entry; 25] = [
    (52, "Algorithm", 0, 7, 7, 0),
    (53, "Feedback", 0, 7, 7, 0),
    (54, "LFO Speed", 0, 99, 7, 0),
    (55, "LFO Delay", 0, 99, 7, 0),
    (56, "Pitch Modulation Depth", 0, 99, 7, 0),
    (57, "Amplitude Modulation Depth", 0, 99, 7, 0),
    (58, "LFO Sync", 0, 1, 7, 0),
    (59, "LFO Wave", 0, 3, 7, 0),
    (60, "Pitch Modulation Sensitivity", 0, 7, 7, 0),
    (61, "Amplitude Modulation Sensitivity", 0, 3, 7, 0),
    (62, "Transpose", 0, 48, 7, 0),
    (63, "Poly/Mono", 0, 1, 7, 0),
    (64, "Pitch Bend Range", 0, 12, 7, 0),
    (65, "Portamento Mode", 0, 1, 7, 0),
    (66, "Portamento Time", 0, 99, 7, 0),
    (67, "Foot Control Volume", 0, 99, 7, 0),
    (68, "Sustain", 0, 1, 7, 0),
    (69, "Portamento", 0, 1, 7, 0),
    (70, "Chorus", 0, 1, 7, 0),
    (71, "Modulation Wheel Pitch", 0, 99, 7, 0),
    (72, "Modulation Wheel Amplitude", 0, 99, 7, 0),
    (73, "Breath Control Pitch", 0, 99, 7, 0),
    (74, "Breath Control Amplitude", 0, 99, 7, 0),
    (75, "Breath Control Pitch Bias", 0, 99, 7, 0),
    (76, "Breath Control EG Bias", 0, 99, 7, 0),
];

// Not used by the TX81Z, which always sends 99 99 99 50 50 50 here.
const DX21_SINGLE_PITCH_EG: [Entry; 6] = [
    (87, "Pitch EG Rate 1", 0, 99, 7, 0),
    (88, "Pitch EG Rate 2", 0, 99, 7, 0),
    (89, "Pitch EG Rate 3", 0, 99, 7, 0),
    (90, "Pitch EG Level 1", 0, 99, 7, 0),
    (91, "Pitch EG Level 2", 0, 99, 7, 0),
    (92, "Pitch EG Level 3", 0, 99, 7, 0),
];

/// DX21/DX27/DX100 single voice (VCED), 93 bytes. Also the second part
/// of a TX81Z single voice.
pub fn dx21_single_voice() -> Vec<Field> {
    let mut fields = Vec::new();
    push_operators(&mut fields, 4, 13, &FOUR_OP_SINGLE_OPERATOR);
    push_entries(&mut fields, 0, "", &FOUR_OP_SINGLE_COMMON);
    fields.push(TextField::new(77, VOICE_NAME, VOICE_NAME_LENGTH).into());
    push_entries(&mut fields, 0, "", &DX21_SINGLE_PITCH_EG);
    fields
}

const TX81Z_ADDITIONAL_OPERATOR: [Entry; 5] = [
    (0, "Fixed Frequency", 0, 1, 7, 0),
    (1, "Fixed Frequency Range", 0, 7, 7, 0),
    (2, "Frequency Range Fine", 0, 15, 7, 0),
    (3, "Operator Waveform", 0, 7, 7, 0),
    (4, "EG Shift", 0, 3, 7, 0),
];

const TX81Z_ADDITIONAL_COMMON: [Entry; 3] = [
    (20, "Reverb Rate", 0, 7, 7, 0),
    (21, "Foot Controller Pitch", 0, 99, 7, 0),
    (22, "Foot Controller Amplitude", 0, 99, 7, 0),
];

/// TX81Z additional voice data (ACED), 23 bytes after the signature.
pub fn tx81z_additional_voice() -> Vec<Field> {
    let mut fields = Vec::new();
    push_operators(&mut fields, 4, 5, &TX81Z_ADDITIONAL_OPERATOR);
    push_entries(&mut fields, 0, "", &TX81Z_ADDITIONAL_COMMON);
    fields
}

const FOUR_OP_PACKED_OPERATOR: [Entry; 13] = [
    (0, "Attack Rate", 0, 31, 5, 0),
    (1, "Decay 1 Rate", 0, 31, 5, 0),
    (2, "Decay 2 Rate", 0, 31, 5, 0),
    (3, "Release Rate", 0, 15, 4, 0),
    (4, "Decay 1 Level", 0, 15, 4, 0),
    (5, "Level Scaling", 0, 99, 7, 0),
    (6, "Amplitude Modulation Enable", 0, 1, 1, 6),
    (6, "EG Bias Sensitivity", 0, 7, 3, 3),
    (6, "Key Velocity Sensitivity", 0, 7, 3, 0),
    (7, "Operator Output Level", 0, 99, 7, 0),
    (8, "Frequency", 0, 63, 6, 0),
    (9, "Rate Scaling", 0, 3, 2, 3),
    (9, "Detune", 0, 6, 3, 0),
];

const FOUR_OP_PACKED_COMMON: [Entry; 25] = [
    (40, "LFO Sync", 0, 1, 1, 6),
    (40, "Feedback", 0, 7, 3, 3),
    (40, "Algorithm", 0, 7, 3, 0),
    (41, "LFO Speed", 0, 99, 7, 0),
    (42, "LFO Delay", 0, 99, 7, 0),
    (43, "Pitch Modulation Depth", 0, 99, 7, 0),
    (44, "Amplitude Modulation Depth", 0, 99, 7, 0),
    (45, "Pitch Modulation Sensitivity", 0, 7, 3, 4),
    (45, "Amplitude Modulation Sensitivity", 0, 3, 2, 2),
    (45, "LFO Wave", 0, 3, 2, 0),
    (46, "Transpose", 0, 48, 6, 0),
    (47, "Pitch Bend Range", 0, 12, 4, 0),
    (48, "Chorus", 0, 1, 1, 4),
    (48, "Poly/Mono", 0, 1, 1, 3),
    (48, "Sustain", 0, 1, 1, 2),
    (48, "Portamento", 0, 1, 1, 1),
    (48, "Portamento Mode", 0, 1, 1, 0),
    (49, "Portamento Time", 0, 99, 7, 0),
    (50, "Foot Control Volume", 0, 99, 7, 0),
    (51, "Modulation Wheel Pitch", 0, 99, 7, 0),
    (52, "Modulation Wheel Amplitude", 0, 99, 7, 0),
    (53, "Breath Control Pitch", 0, 99, 7, 0),
    (54, "Breath Control Amplitude", 0, 99, 7, 0),
    (55, "Breath Control Pitch Bias", 0, 99, 7, 0),
    (56, "Breath Control EG Bias", 0, 99, 7, 0),
];

const FOUR_OP_PACKED_PITCH_EG: [Entry; 6] = [
    (67, "Pitch EG Rate 1", 0, 99, 7, 0),
    (68, "Pitch EG Rate 2", 0, 99, 7, 0),
    (69, "Pitch EG Rate 3", 0, 99, 7, 0),
    (70, "Pitch EG Level 1", 0, 99, 7, 0),
    (71, "Pitch EG Level 2", 0, 99, 7, 0),
    (72, "Pitch EG Level 3", 0, 99, 7, 0),
];

/// Unused pitch EG bytes of every TX81Z voice record, from offset 67.
pub const TX81Z_UNUSED_PITCH_EG: [u8; 6] = [0x63, 0x63, 0x63, 0x32, 0x32, 0x32];

const TX81Z_PACKED_OPERATOR: [Entry; 5] = [
    (0, "EG Shift", 0, 3, 2, 4),
    (0, "Fixed Frequency", 0, 1, 1, 3),
    (0, "Fixed Frequency Range", 0, 7, 3, 0),
    (1, "Operator Waveform", 0, 7, 3, 4),
    (1, "Frequency Range Fine", 0, 15, 4, 0),
];

const TX81Z_PACKED_COMMON: [Entry; 3] = [
    (81, "Reverb Rate", 0, 7, 3, 0),
    (82, "Foot Controller Pitch", 0, 99, 7, 0),
    (83, "Foot Controller Amplitude", 0, 99, 7, 0),
];

fn four_op_packed_voice() -> Vec<Field> {
    let mut fields = Vec::new();
    push_operators(&mut fields, 4, 10, &FOUR_OP_PACKED_OPERATOR);
    push_entries(&mut fields, 0, "", &FOUR_OP_PACKED_COMMON);
    fields.push(TextField::new(57, VOICE_NAME, VOICE_NAME_LENGTH).into());
    push_entries(&mut fields, 0, "", &FOUR_OP_PACKED_PITCH_EG);
    fields
}

/// DX21/DX27/DX100 packed voice record, 128 bytes (73 used).
pub fn dx21_packed_voice() -> Vec<Field> {
    four_op_packed_voice()
}

/// TX81Z packed voice record (VMEM), 128 bytes. Holds both the VCED and
/// the ACED parameters. The pitch EG bytes are kept so that an extracted
/// voice carries them into its VCED part.
pub fn tx81z_packed_voice() -> Vec<Field> {
    let mut fields = four_op_packed_voice();
    for op in (1..=4).rev() {
        let base = 73 + (4 - op) * 2;
        push_entries(&mut fields, base, &format!("OP {} ", op), &TX81Z_PACKED_OPERATOR);
    }
    push_entries(&mut fields, 0, "", &TX81Z_PACKED_COMMON);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSet;

    fn max_end(fields: &[Field]) -> usize {
        fields
            .iter()
            .map(|f| match f {
                Field::Numeric(n) => n.offset() + 1,
                Field::Text(t) => t.offset() + t.length(),
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn layouts_fit_their_records() {
        assert_eq!(max_end(&dx7_single_voice()), 155);
        assert_eq!(max_end(&dx7_packed_voice()), 128);
        assert_eq!(max_end(&dx21_single_voice()), 93);
        assert_eq!(max_end(&tx81z_additional_voice()), 23);
        assert_eq!(max_end(&dx21_packed_voice()), 73);
        assert_eq!(max_end(&tx81z_packed_voice()), 84);
    }

    #[test]
    fn names_are_unique() {
        // FieldSet::new rejects duplicates
        assert_eq!(FieldSet::new(dx7_single_voice()).len(), 6 * 21 + 19 + 1);
        assert_eq!(FieldSet::new(dx7_packed_voice()).len(), 6 * 21 + 19 + 1);
        assert_eq!(FieldSet::new(dx21_single_voice()).len(), 4 * 13 + 25 + 1 + 6);
        assert_eq!(FieldSet::new(tx81z_additional_voice()).len(), 4 * 5 + 3);
        assert_eq!(FieldSet::new(tx81z_packed_voice()).len(), 4 * 13 + 25 + 1 + 6 + 4 * 5 + 3);
    }

    #[test]
    fn packed_layouts_cover_single_layouts() {
        let packed = FieldSet::new(dx7_packed_voice());
        for field in dx7_single_voice() {
            assert!(packed.get(field.name()).is_some(), "{}", field.name());
        }

        let packed = FieldSet::new(tx81z_packed_voice());
        for field in dx21_single_voice().into_iter().chain(tx81z_additional_voice()) {
            assert!(packed.get(field.name()).is_some(), "{}", field.name());
        }
    }

    #[test]
    fn tx81z_extended_operators_do_not_overlap() {
        let fields = FieldSet::new(tx81z_packed_voice());
        assert_eq!(fields.get("OP 4 EG Shift").map(|f| f.offset()), Some(73));
        assert_eq!(fields.get("OP 1 Frequency Range Fine").map(|f| f.offset()), Some(80));
    }
}
