//! Byte templates with wildcard positions, used for every identification decision.

/// A byte template. `None` positions are wildcards (channel, model bytes etc.).
pub type Template = [Option<u8>];

/// Builds a `&[Option<u8>]` template literal; `_` marks a wildcard.
///
/// ```
/// use syxkit::template;
/// use syxkit::pattern::{matches, Template};
///
/// const HEADER: &Template = template![0xf0, 0x43, _, 0x03];
/// assert!(matches(&[0xf0, 0x43, 0x05, 0x03, 0x00], HEADER, 0));
/// ```
#[macro_export]
macro_rules! template {
    (@byte _) => { None };
    (@byte $b:expr) => { Some($b) };
    ($($b:tt),* $(,)?) => { &[$($crate::template!(@byte $b)),*] };
}

/// Returns true if `data` contains `template` starting at `offset`.
/// Fails when the data is too short to hold the whole template.
pub fn matches(data: &[u8], template: &Template, offset: usize) -> bool {
    if data.len() < template.len() + offset {
        return false;
    }

    template
        .iter()
        .zip(&data[offset..])
        .all(|(expected, actual)| match expected {
            Some(b) => b == actual,
            None => true,
        })
}

/// Returns true if `length` bytes from `offset` are all zero.
/// Out-of-range spans never count as zero.
pub fn are_zero(data: &[u8], offset: usize, length: usize) -> bool {
    match data.get(offset..offset + length) {
        Some(span) => span.iter().all(|&b| b == 0),
        None => false,
    }
}

/// Copies the literal positions of `template` into the start of `data`,
/// leaving wildcard positions untouched.
pub fn fill(template: &Template, data: &mut [u8]) {
    for (slot, expected) in data.iter_mut().zip(template) {
        if let Some(b) = expected {
            *slot = *b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &Template = template![0xf0, 0x43, _, 0x03, 0x00, 0x5d];

    #[test]
    fn wildcard_matches_any_byte() {
        for channel in 0..16u8 {
            let data = [0xf0, 0x43, channel, 0x03, 0x00, 0x5d, 0xf7];
            assert!(matches(&data, HEADER, 0));
        }
    }

    #[test]
    fn literal_mismatch_fails() {
        let data = [0xf0, 0x43, 0x00, 0x04, 0x00, 0x5d, 0xf7];
        assert!(!matches(&data, HEADER, 0));
    }

    #[test]
    fn too_short_fails() {
        let data = [0xf0, 0x43, 0x00, 0x03, 0x00];
        assert!(!matches(&data, HEADER, 0));
    }

    #[test]
    fn offset_shifts_comparison() {
        let model: &Template = template![0x00, 0x06];
        let data = [0xf0, 0x41, 0x10, 0x00, 0x06, 0x12, 0xf7];
        assert!(matches(&data, model, 3));
        assert!(!matches(&data, model, 2));
        assert!(!matches(&data, model, 6));
    }

    #[test]
    fn empty_template_always_matches() {
        let empty: &Template = template![];
        assert!(matches(&[], empty, 0));
        assert!(!matches(&[], empty, 1));
    }

    #[test]
    fn zero_span() {
        let data = [1, 0, 0, 0, 2];
        assert!(are_zero(&data, 1, 3));
        assert!(!are_zero(&data, 0, 3));
        assert!(!are_zero(&data, 3, 5));
    }

    #[test]
    fn fill_skips_wildcards() {
        let mut data = [0x55u8; 7];
        fill(HEADER, &mut data);
        assert_eq!(data, [0xf0, 0x43, 0x55, 0x03, 0x00, 0x5d, 0x55]);
    }
}
