//! Roland headers.
//!
//! Older devices each used their own header layout, matched here in table
//! order with an optional exact length. Later devices share the layout
//! `F0 41 <device id> <model id...> <command id> ...` where the model id is
//! one to four bytes.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::dispatch::Rule;
use crate::message::Kind;
use crate::pattern::{self, Template};
use crate::template;

/// Position of the model id in the standard layout.
pub const MODEL_OFFSET: usize = 3;

fn legacy(
    template: &'static Template,
    length: Option<usize>,
    device: &'static str,
    label: &'static str,
) -> Rule {
    Rule::Header {
        template,
        length,
        device,
        label: Some(label),
    }
}

const STANDARD_HEADER: &Template = template![0xf0, 0x41, _, _, _];

fn model(id: &'static [u8], device: &'static str) -> (&'static [u8], &'static str) {
    (id, device)
}

lazy_static! {
    static ref COMMANDS: HashMap<u8, &'static str> = HashMap::from([
        (0x11, "Data request"),
        (0x12, "Data set"),
        (0x40, "Send request"),
        (0x41, "Data request"),
        (0x42, "Data set"),
        (0x43, "Acknowledge"),
        (0x45, "End-of-data"),
        (0x4e, "Communication error"),
        (0x4f, "Rejection"),
    ]);

    // Some ids are shared by several devices; the first listed wins.
    static ref MODELS: Vec<(&'static [u8], &'static str)> = vec![
        model(&[0x10], "S-10"),
        model(&[0x14], "D-50"),
        model(&[0x16], "D-20"),
        model(&[0x18], "S-50"),
        model(&[0x1d], "TR-626"),
        model(&[0x1e], "S-550"),
        model(&[0x28], "R-8"),
        model(&[0x2b], "U-110"),
        model(&[0x34], "S-770"),
        model(&[0x39], "D-70"),
        model(&[0x3a], "MC-307"),
        model(&[0x3d], "JD-800"),
        model(&[0x3d], "JX-1"),
        model(&[0x42], "GS"),
        model(&[0x45], "Display Data"),
        model(&[0x46], "JV-1000"),
        model(&[0x4d], "JV-30"),
        model(&[0x50], "R-70"),
        model(&[0x53], "DJ-70"),
        model(&[0x57], "JD-990"),
        model(&[0x5e], "R-8 MKII"),
        model(&[0x6a], "JV-1080"),
        model(&[0x7b], "XP-10"),
        model(&[0x00, 0x03], "MC-303"),
        model(&[0x00, 0x06], "JP-8000"),
        model(&[0x00, 0x0b], "JX-305"),
        model(&[0x00, 0x0d], "D2"),
        model(&[0x00, 0x10], "XV-3080"),
        model(&[0x00, 0x18], "EG-101"),
        model(&[0x00, 0x1d], "VP-9000"),
        model(&[0x00, 0x4a], "SH-32"),
        model(&[0x00, 0x4f], "MC-09"),
        model(&[0x00, 0x53], "V-Synth"),
        model(&[0x00, 0x59], "MC-909"),
        model(&[0x00, 0x64], "Juno-D"),
        model(&[0x00, 0x6b], "Fantom-S"),
        model(&[0x00, 0x00, 0x14], "MC-808"),
        model(&[0x00, 0x00, 0x15], "Juno-G"),
        model(&[0x00, 0x00, 0x16], "SH-201"),
        model(&[0x00, 0x00, 0x25], "Juno-Stage"),
        model(&[0x00, 0x00, 0x3a], "Juno-Di"),
        model(&[0x00, 0x00, 0x3b], "VP-770"),
        model(&[0x00, 0x00, 0x41], "Gaia SH-01"),
        model(&[0x00, 0x00, 0x55], "Jupiter-80"),
        model(&[0x00, 0x00, 0x00, 0x0f], "JD-XA"),
        model(&[0x00, 0x00, 0x00, 0x65], "Jupiter-X"),
    ];

    pub static ref RULES: Vec<Rule> = {
        let mut rules = vec![
            // TR-707, TR-727, TR-909
            legacy(template![0xf0, 0x41, 0x50, 0xf7], Some(4), "TR-707", "Want to send file"),
            legacy(template![0xf0, 0x41, 0x51, 0xf7], Some(4), "TR-707", "Request file"),
            legacy(template![0xf0, 0x41, 0x52, 0x01], Some(519), "TR-909", "Data"),
            legacy(template![0xf0, 0x41, 0x52, 0x02], Some(519), "TR-707", "Data"),
            legacy(template![0xf0, 0x41, 0x53, 0xf7], Some(4), "TR-707", "Acknowledge"),
            legacy(template![0xf0, 0x41, 0x54, 0xf7], Some(4), "TR-707", "Continue"),
            legacy(template![0xf0, 0x41, 0x70, 0xf7], Some(4), "TR-909", "Abort"),
            legacy(template![0xf0, 0x41, 0x71, 0xf7], Some(4), "TR-909", "Error"),

            // Juno-106
            legacy(template![0xf0, 0x41, 0x30], Some(24), "Juno-106", "Patch data"),
            legacy(template![0xf0, 0x41, 0x31], Some(24), "Juno-106", "Manual mode"),
            legacy(template![0xf0, 0x41, 0x32], Some(7), "Juno-106", "Control change"),

            // JX-8P: operation code, unit, format, level, group
            legacy(template![0xf0, 0x41, 0x34, _, 0x21, 0x20, 0x01], None, "JX-8P", "Program number"),
            legacy(template![0xf0, 0x41, 0x35, _, 0x21, 0x20, 0x01], None, "JX-8P", "All tone parameters"),
            legacy(template![0xf0, 0x41, 0x36, _, 0x21, 0x20, 0x01], None, "JX-8P", "Individual tone parameter"),
            legacy(template![0xf0, 0x41, 0x35, _, 0x21, 0x30, 0x01], None, "JX-8P", "All patch parameters"),
            legacy(template![0xf0, 0x41, 0x36, _, 0x21, 0x30, 0x01], None, "JX-8P", "Individual patch parameter"),

            // JX-10
            legacy(template![0xf0, 0x41, 0x40, _, 0x24], None, "JX-10", "Send request"),
            legacy(template![0xf0, 0x41, 0x41, _, 0x24], None, "JX-10", "Data request"),
            legacy(template![0xf0, 0x41, 0x42, _, 0x24], Some(135), "JX-10", "Data"),
            legacy(template![0xf0, 0x41, 0x43, _, 0x24], Some(6), "JX-10", "Acknowledge"),
            legacy(template![0xf0, 0x41, 0x45, _, 0x24], Some(6), "JX-10", "End-of-file"),
            legacy(template![0xf0, 0x41, 0x4e, _, 0x24], Some(6), "JX-10", "Communication error"),
            legacy(template![0xf0, 0x41, 0x4f, _, 0x24], Some(6), "JX-10", "Rejection"),

            // Alpha Juno-1 and -2
            legacy(template![0xf0, 0x41, 0x35, _, 0x23, 0x20, 0x01], Some(54), "Alpha Juno-1", "All tone parameters"),
            legacy(template![0xf0, 0x41, 0x35, _, 0x23, 0x20, 0x01], Some(44), "Alpha Juno-1", "All tone parameters (without tone name)"),
            legacy(template![0xf0, 0x41, 0x36, _, 0x23, 0x20, 0x01], None, "Alpha Juno-1", "Individual tone parameter"),
            legacy(template![0xf0, 0x41, 0x37, _, 0x23, 0x20, 0x01], None, "Alpha Juno-1", "Bulk dump"),

            // MKS-70: patch and tone variants share header and length
            legacy(template![0xf0, 0x41, 0x34, _, 0x24], Some(11), "MKS-70", "Program number (patch)"),
            legacy(template![0xf0, 0x41, 0x34, _, 0x24], Some(11), "MKS-70", "Program number (tone)"),
            legacy(template![0xf0, 0x41, 0x35, _, 0x24], Some(59), "MKS-70", "Patch data"),
            legacy(template![0xf0, 0x41, 0x35, _, 0x24], Some(67), "MKS-70", "Tone data"),
            legacy(template![0xf0, 0x41, 0x36, _, 0x24], Some(10), "MKS-70", "Patch parameter"),
            legacy(template![0xf0, 0x41, 0x36, _, 0x24], Some(10), "MKS-70", "Tone parameter"),
            legacy(template![0xf0, 0x41, 0x37, _, 0x24], Some(106), "MKS-70", "Patch bulk dump"),
            legacy(template![0xf0, 0x41, 0x37, _, 0x24], Some(69), "MKS-70", "Tone bulk dump"),

            // MKS-80
            legacy(template![0xf0, 0x41, 0x36, _, 0x20, 0x20], None, "MKS-80", "Individual tone parameter(s)"),
            legacy(template![0xf0, 0x41, 0x36, _, 0x20, 0x30], None, "MKS-80", "Individual patch parameter(s)"),
            legacy(template![0xf0, 0x41, 0x35, _, 0x20, 0x20], Some(56), "MKS-80", "All tone parameters"),
            legacy(template![0xf0, 0x41, 0x35, _, 0x20, 0x30], Some(23), "MKS-80", "All patch parameters"),
            legacy(template![0xf0, 0x41, 0x34, _, 0x20, 0x30], Some(11), "MKS-80", "Program number"),
        ];
        rules.push(Rule::Custom(standard));
        rules
    };
}

/// Identifies the model and command of a message in the standard layout.
fn standard(data: &[u8]) -> Option<Kind> {
    if !pattern::matches(data, STANDARD_HEADER, 0) {
        return None;
    }
    let (id, device) = MODELS
        .iter()
        .find(|(id, _)| data.get(MODEL_OFFSET..MODEL_OFFSET + id.len()) == Some(*id))?;

    // The command must come before the terminator.
    let command_index = MODEL_OFFSET + id.len();
    let label = if command_index < data.len() - 1 {
        COMMANDS.get(&data[command_index]).copied()
    } else {
        None
    };
    Some(Kind::Known {
        device: *device,
        label,
    })
}

#[cfg(test)]
mod tests {
    use crate::dispatch::parse;

    #[test]
    fn legacy_header_with_length() {
        let message = parse(&[0xf0, 0x41, 0x50, 0xf7], None).unwrap();
        assert_eq!(message.manufacturer_name(), Some("Roland"));
        assert_eq!(message.device(), Some("TR-707"));
        assert_eq!(message.type_name(), Some("Want to send file"));
    }

    #[test]
    fn legacy_ties_resolve_to_first_listed() {
        let mut data = vec![0xf0, 0x41, 0x34, 0x00, 0x24];
        data.resize(10, 0x00);
        data.push(0xf7);
        let message = parse(&data, None).unwrap();
        assert_eq!(message.device(), Some("MKS-70"));
        assert_eq!(message.type_name(), Some("Program number (patch)"));
    }

    #[test]
    fn legacy_length_selects_variant() {
        let mut data = vec![0xf0, 0x41, 0x35, 0x00, 0x23, 0x20, 0x01];
        data.resize(43, 0x00);
        data.push(0xf7);
        let message = parse(&data, None).unwrap();
        assert_eq!(message.device(), Some("Alpha Juno-1"));
        assert_eq!(message.type_name(), Some("All tone parameters (without tone name)"));
    }

    #[test]
    fn standard_single_byte_model() {
        // D-50 data set
        let data = [0xf0, 0x41, 0x10, 0x14, 0x12, 0x00, 0x00, 0x00, 0x01, 0x7f, 0xf7];
        let message = parse(&data, None).unwrap();
        assert_eq!(message.device(), Some("D-50"));
        assert_eq!(message.type_name(), Some("Data set"));
    }

    #[test]
    fn standard_multi_byte_model() {
        let data = [0xf0, 0x41, 0x10, 0x00, 0x00, 0x55, 0x11, 0x19, 0x00, 0x00, 0x00, 0x67, 0xf7];
        let message = parse(&data, None).unwrap();
        assert_eq!(message.device(), Some("Jupiter-80"));
        assert_eq!(message.type_name(), Some("Data request"));
    }

    #[test]
    fn shared_model_id_resolves_to_first_listed() {
        let data = [0xf0, 0x41, 0x10, 0x3d, 0x12, 0x00, 0x00, 0xf7];
        let message = parse(&data, None).unwrap();
        assert_eq!(message.device(), Some("JD-800"));
    }

    #[test]
    fn unknown_model_is_generic() {
        let data = [0xf0, 0x41, 0x10, 0x7a, 0x12, 0x00, 0xf7];
        let message = parse(&data, None).unwrap();
        assert_eq!(message.manufacturer_name(), Some("Roland"));
        assert_eq!(message.device(), None);
    }
}
