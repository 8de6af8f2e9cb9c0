//! Checksum algorithms used by device families for their trailing checksum byte.

/// Checksum algorithm of a device family.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Checksum {
    /// Two's complement of the 7-bit sum (Yamaha, Roland).
    TwoComplement,

    /// 7-bit XOR with an initial value (Sample Dump Standard).
    Xor { start: u8 },
}

impl Checksum {
    /// Computes the checksum of `data`.
    pub fn compute(&self, data: &[u8]) -> u8 {
        match self {
            Checksum::TwoComplement => two_complement_7bit(data),
            Checksum::Xor { start } => xor_7bit(data, *start),
        }
    }

    /// Returns true if `expected` is the checksum of `data`.
    pub fn verify(&self, data: &[u8], expected: u8) -> bool {
        self.compute(data) == expected
    }
}

/// Two's complement of the lower 7 bits of the sum of `data`.
/// Adding the result to the sum gives zero in the lower 7 bits.
pub fn two_complement_7bit(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u32, |acc, &b| acc + b as u32) & 0x7f;
    ((128 - sum) & 0x7f) as u8
}

/// Lower 7 bits of the XOR of `data`, starting from `start`.
pub fn xor_7bit(data: &[u8], start: u8) -> u8 {
    data.iter().fold(start, |acc, &b| acc ^ b) & 0x7f
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_complement_of_empty_is_zero() {
        assert_eq!(two_complement_7bit(&[]), 0);
    }

    #[test]
    fn two_complement_sums_to_zero() {
        let data = [0x63, 0x63, 0x63, 0x32, 0x32, 0x32, 0x00, 0x7f];
        let checksum = two_complement_7bit(&data);
        let total: u32 = data.iter().map(|&b| b as u32).sum::<u32>() + checksum as u32;
        assert_eq!(total & 0x7f, 0);
    }

    #[test]
    fn two_complement_stays_seven_bit() {
        // 0x01 sums to 1: 128 - 1 = 127, a full 0xF7 mask would give 0x77.
        assert_eq!(two_complement_7bit(&[0x01]), 0x7f);
        assert_eq!(two_complement_7bit(&[0x40, 0x40]), 0x00);
    }

    #[test]
    fn xor_with_start_value() {
        assert_eq!(xor_7bit(&[0x01, 0x02, 0x04], 0), 0x07);
        assert_eq!(xor_7bit(&[0x7e, 0x00, 0x02], 0), 0x7c);
        assert_eq!(xor_7bit(&[0x0f], 0x70), 0x7f);
        assert_eq!(xor_7bit(&[], 0xff), 0x7f);
    }

    #[test]
    fn verify_selected_algorithm() {
        let data = [0x10, 0x20, 0x30];
        let sum = Checksum::TwoComplement;
        assert!(sum.verify(&data, sum.compute(&data)));
        let xor = Checksum::Xor { start: 0 };
        assert!(xor.verify(&data, 0x00));
        assert!(!xor.verify(&data, 0x01));
    }
}
