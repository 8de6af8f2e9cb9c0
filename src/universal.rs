//! Universal System Exclusive messages, defined by the MIDI association
//! rather than by a manufacturer.
//!
//! Format: `F0 7E|7F <device id> <sub-id #1> <sub-id #2> <data...> F7`

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::checksum::Checksum;

/// The kind of a Universal System Exclusive message.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UniversalKind {
    NonRealTime,
    RealTime,
}

impl UniversalKind {
    fn category(&self) -> &'static str {
        match self {
            UniversalKind::NonRealTime => "Non-realtime",
            UniversalKind::RealTime => "Realtime",
        }
    }
}

/// A sub-id #1 entry, with sub-types keyed by sub-id #2 where defined.
struct UniversalType {
    name: &'static str,
    subtypes: Option<HashMap<u8, &'static str>>,
}

fn plain(name: &'static str) -> UniversalType {
    UniversalType { name, subtypes: None }
}

fn with_subtypes<const N: usize>(name: &'static str, subtypes: [(u8, &'static str); N]) -> UniversalType {
    UniversalType {
        name,
        subtypes: Some(HashMap::from(subtypes)),
    }
}

lazy_static! {
    static ref NON_REAL_TIME_TYPES: HashMap<u8, UniversalType> = HashMap::from([
        (0x01, plain("Sample Dump Header")),
        (0x02, plain("Sample Data Packet")),
        (0x03, plain("Sample Dump Request")),
        (0x04, with_subtypes("MIDI Time Code", [
            (0x00, "Special"),
            (0x01, "Punch In Points"),
            (0x02, "Punch Out Points"),
            (0x03, "Delete Punch In Point"),
            (0x04, "Delete Punch Out Point"),
            (0x05, "Event Start Point"),
            (0x06, "Event Stop Point"),
            (0x07, "Event Start Points with additional info"),
            (0x08, "Event Stop Points with additional info"),
            (0x09, "Delete Event Start Point"),
            (0x0a, "Delete Event Stop Point"),
            (0x0b, "Cue Points"),
            (0x0c, "Cue Points with Additional Info"),
            (0x0d, "Delete Cue Point"),
            (0x0e, "Event Name in Additional Info"),
        ])),
        (0x05, with_subtypes("Sample Dump Extensions", [
            (0x01, "Loop Points Transmission"),
            (0x02, "Loop Points Request"),
            (0x03, "Sample Name Transmission"),
            (0x04, "Sample Name Request"),
            (0x05, "Extended Dump Header"),
            (0x06, "Extended Loop Points Transmission"),
            (0x07, "Extended Loop Points Request"),
        ])),
        (0x06, with_subtypes("General Information", [
            (0x01, "Identity Request"),
            (0x02, "Identity Reply"),
        ])),
        (0x07, with_subtypes("File Dump", [
            (0x01, "Header"),
            (0x02, "Data Packet"),
            (0x03, "Request"),
        ])),
        (0x08, with_subtypes("MIDI Tuning Standard", [
            (0x00, "Bulk Dump Request"),
            (0x01, "Bulk Dump Reply"),
            (0x03, "Tuning Dump Request"),
            (0x04, "Key-Based Tuning Dump"),
            (0x05, "Scale/Octave Tuning Dump, 1 byte format"),
            (0x06, "Scale/Octave Tuning Dump, 2 byte format"),
            (0x07, "Single Note Tuning Change with Bank Select"),
            (0x08, "Scale/Octave Tuning, 1 byte format"),
            (0x09, "Scale/Octave Tuning, 2 byte format"),
        ])),
        (0x09, with_subtypes("General MIDI", [
            (0x01, "General MIDI 1 System On"),
            (0x02, "General MIDI System Off"),
            (0x03, "General MIDI 2 System On"),
        ])),
        (0x0a, with_subtypes("Downloadable Sounds", [
            (0x01, "Turn DLS On"),
            (0x02, "Turn DLS Off"),
            (0x03, "Turn DLS Voice Allocation Off"),
            (0x04, "Turn DLS Voice Allocation On"),
        ])),
        (0x0b, with_subtypes("File Reference Message", [
            (0x01, "Open File"),
            (0x02, "Select or Reselect Contents"),
            (0x03, "Open File and Select Contents"),
            (0x04, "Close File"),
        ])),
        (0x0c, plain("MIDI Visual Control")),
        (0x0d, plain("MIDI Capability Inquiry")),
        (0x7b, plain("End of File")),
        (0x7c, plain("Wait")),
        (0x7d, plain("Cancel")),
        (0x7e, plain("NAK")),
        (0x7f, plain("ACK")),
    ]);

    static ref REAL_TIME_TYPES: HashMap<u8, UniversalType> = HashMap::from([
        (0x01, with_subtypes("MIDI Time Code", [
            (0x01, "Full Message"),
            (0x02, "User Bits"),
        ])),
        (0x02, plain("MIDI Show Control")),
        (0x03, with_subtypes("Notation Information", [
            (0x01, "Bar Number"),
            (0x02, "Time Signature (Immediate)"),
            (0x42, "Time Signature (Delayed)"),
        ])),
        (0x04, with_subtypes("Device Control", [
            (0x01, "Master Volume"),
            (0x02, "Master Balance"),
            (0x03, "Master Fine Tuning"),
            (0x04, "Master Coarse Tuning"),
            (0x05, "Global Parameter Control"),
        ])),
        (0x05, with_subtypes("Real Time MTC Cueing", [
            (0x00, "Special"),
            (0x01, "Punch In Points"),
            (0x02, "Punch Out Points"),
            (0x05, "Event Start Points"),
            (0x06, "Event Stop Points"),
            (0x07, "Event Start Points with additional info"),
            (0x08, "Event Stop Points with additional info"),
            (0x0b, "Cue Points"),
            (0x0c, "Cue Points with Additional Info"),
            (0x0e, "Event Name in Additional Info"),
        ])),
        (0x06, plain("MIDI Machine Control Commands")),
        (0x07, plain("MIDI Machine Control Responses")),
    ]);
}

/// Sub-id #1 of a Sample Data Packet.
pub const SAMPLE_DATA_PACKET: u8 = 0x02;

/// Describes a universal message, e.g. "Sample Dump Request" or
/// "General Information: Identity Request".
///
/// `data` is the complete message. Sub-id #2 is absent when the message
/// ends right after sub-id #1.
pub fn describe(kind: UniversalKind, data: &[u8]) -> String {
    let types = match kind {
        UniversalKind::NonRealTime => &*NON_REAL_TIME_TYPES,
        UniversalKind::RealTime => &*REAL_TIME_TYPES,
    };

    // The terminator is never an id.
    let body = &data[..data.len().saturating_sub(1)];
    let sub_id1 = body.get(3).copied();
    let sub_id2 = body.get(4).copied();

    match sub_id1.and_then(|id| types.get(&id)) {
        Some(entry) => match &entry.subtypes {
            Some(subtypes) => {
                let subtype = sub_id2
                    .and_then(|id| subtypes.get(&id).copied())
                    .unwrap_or("Unknown type");
                format!("{}: {}", entry.name, subtype)
            }
            None => entry.name.to_string(),
        },
        None => format!("Universal {}: Unknown type", kind.category()),
    }
}

/// Verifies the checksum of a Sample Data Packet:
/// `F0 7E <channel> 02 <packet #> <120 data bytes> <checksum> F7`.
/// The checksum is the 7-bit XOR of everything between the initiator
/// and the checksum. Returns `None` for any other message.
pub fn verify_sample_data_packet(kind: UniversalKind, data: &[u8]) -> Option<bool> {
    if kind != UniversalKind::NonRealTime || data.len() < 7 || data[3] != SAMPLE_DATA_PACKET {
        return None;
    }
    let checksum_index = data.len() - 2;
    Some(Checksum::Xor { start: 0 }.verify(&data[1..checksum_index], data[checksum_index]))
}
