//! Locating framed messages in a byte stream, splitting a multi-message
//! blob into messages and joining messages back into one blob.

use log::trace;

use crate::dispatch;
use crate::error::{MalformedInput, Result};
use crate::message::Message;
use crate::{INITIATOR, TERMINATOR};

/// Shortest framed message: initiator, id, one byte, terminator.
pub const MIN_LENGTH: usize = 4;

/// Checks the framing of a single or composite message. Initiators and
/// terminators may only appear as the boundaries of a segment, and each
/// segment must start right after the previous one ends.
pub fn check_framing(data: &[u8]) -> Result<()> {
    if data.len() < MIN_LENGTH {
        return Err(MalformedInput::TooShort { length: data.len() }.into());
    }
    if data[0] != INITIATOR {
        return Err(MalformedInput::MissingStart.into());
    }
    if data[data.len() - 1] != TERMINATOR {
        return Err(MalformedInput::MissingEnd.into());
    }

    let mut segment = 1;
    let mut inside = true;
    for &b in &data[1..] {
        match (inside, b) {
            (true, INITIATOR) => return Err(MalformedInput::UnterminatedSegment { segment }.into()),
            (true, TERMINATOR) => inside = false,
            (false, INITIATOR) => {
                segment += 1;
                inside = true;
            }
            (false, _) => {
                return Err(MalformedInput::MissingSegmentStart { segment: segment + 1 }.into())
            }
            (true, _) => {}
        }
    }
    Ok(())
}

/// Returns the number of System Exclusive messages in `data`,
/// based on the count of terminator bytes.
pub fn count_segments(data: &[u8]) -> usize {
    data.iter().filter(|&&b| b == TERMINATOR).count()
}

/// Offsets of the initiators that open each message.
pub fn segment_offsets(data: &[u8]) -> Vec<usize> {
    let mut offsets = Vec::new();
    let mut inside = false;
    for (i, &b) in data.iter().enumerate() {
        if !inside && b == INITIATOR {
            offsets.push(i);
            inside = true;
        }
        if inside && b == TERMINATOR {
            inside = false;
        }
    }
    offsets
}

/// Splits `data` into framed segments, terminator included. Each segment
/// must begin right where the previous one ended, with an initiator.
pub fn segments(data: &[u8]) -> Result<Vec<&[u8]>> {
    let mut parts = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &b) in data.iter().enumerate() {
        if start.is_none() {
            if b != INITIATOR {
                return Err(MalformedInput::MissingSegmentStart {
                    segment: parts.len() + 1,
                }
                .into());
            }
            start = Some(i);
        } else if b == INITIATOR {
            return Err(MalformedInput::UnterminatedSegment {
                segment: parts.len() + 1,
            }
            .into());
        }
        if b == TERMINATOR {
            if let Some(s) = start.take() {
                trace!("segment {} at {}..={}", parts.len() + 1, s, i);
                parts.push(&data[s..=i]);
            }
        }
    }

    if start.is_some() {
        return Err(MalformedInput::UnterminatedSegment {
            segment: parts.len() + 1,
        }
        .into());
    }
    Ok(parts)
}

/// Splits `data` and identifies every segment as a message of its own.
pub fn split(data: &[u8]) -> Result<Vec<Message>> {
    segments(data)?
        .into_iter()
        .map(|segment| dispatch::parse_single(segment, None))
        .collect()
}

/// Concatenates the raw bytes of `messages` in order.
pub fn join(messages: &[Message]) -> Vec<u8> {
    let mut data = Vec::new();
    for message in messages {
        data.extend_from_slice(message.as_bytes());
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SysexError;

    fn two_messages() -> Vec<u8> {
        vec![
            0xf0, 0x7e, 0x00, 0x03, 0x01, 0x05, 0xf7,
            0xf0, 0x43, 0x10, 0x01, 0x02, 0x03, 0xf7,
        ]
    }

    #[test]
    fn framing_checks() {
        assert!(check_framing(&[0xf0, 0x43, 0x00, 0xf7]).is_ok());
        assert!(matches!(
            check_framing(&[0xf0, 0xf7]),
            Err(SysexError::Malformed(MalformedInput::TooShort { length: 2 }))
        ));
        assert!(matches!(
            check_framing(&[0x90, 0x43, 0x00, 0xf7]),
            Err(SysexError::Malformed(MalformedInput::MissingStart))
        ));
        assert!(matches!(
            check_framing(&[0xf0, 0x43, 0x00, 0x00]),
            Err(SysexError::Malformed(MalformedInput::MissingEnd))
        ));
    }

    #[test]
    fn markers_inside_a_message_are_rejected() {
        assert!(matches!(
            check_framing(&[0xf0, 0xf0, 0x43, 0x00, 0xf7]),
            Err(SysexError::Malformed(MalformedInput::UnterminatedSegment { segment: 1 }))
        ));
        assert!(matches!(
            check_framing(&[0xf0, 0x43, 0x00, 0xf0, 0x43, 0x00, 0xf7]),
            Err(SysexError::Malformed(MalformedInput::UnterminatedSegment { segment: 1 }))
        ));
        assert!(matches!(
            check_framing(&[0xf0, 0x43, 0x00, 0xf7, 0x43, 0x00, 0xf7]),
            Err(SysexError::Malformed(MalformedInput::MissingSegmentStart { segment: 2 }))
        ));
        assert!(check_framing(&two_messages()).is_ok());
    }

    #[test]
    fn initiator_inside_a_segment_is_rejected() {
        let data = [
            0xf0, 0x7e, 0x00, 0x03, 0x01, 0x05, 0xf7,
            0xf0, 0x43, 0xf0, 0x01, 0x02, 0x03, 0xf7,
        ];
        assert!(matches!(
            segments(&data),
            Err(SysexError::Malformed(MalformedInput::UnterminatedSegment { segment: 2 }))
        ));
    }

    #[test]
    fn counts_and_offsets() {
        let data = two_messages();
        assert_eq!(count_segments(&data), 2);
        assert_eq!(segment_offsets(&data), vec![0, 7]);
    }

    #[test]
    fn raw_segments() {
        let data = two_messages();
        let parts = segments(&data).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], &data[..7]);
        assert_eq!(parts[1], &data[7..]);
    }

    #[test]
    fn gap_between_segments_is_rejected() {
        let mut data = two_messages();
        data.insert(7, 0x00);
        assert!(matches!(
            segments(&data),
            Err(SysexError::Malformed(MalformedInput::MissingSegmentStart { segment: 2 }))
        ));
    }

    #[test]
    fn unterminated_segment_is_rejected() {
        let mut data = two_messages();
        data.extend_from_slice(&[0xf0, 0x43, 0x00]);
        assert!(matches!(
            segments(&data),
            Err(SysexError::Malformed(MalformedInput::UnterminatedSegment { segment: 3 }))
        ));
    }

    #[test]
    fn split_then_join_is_identity() {
        let data = two_messages();
        let messages = split(&data).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].type_name(), Some("Sample Dump Request"));
        assert_eq!(messages[1].device(), Some("DX7"));
        assert_eq!(join(&messages), data);
    }
}
