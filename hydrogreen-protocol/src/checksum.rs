//! Frame checksum primitive
//!
//! The link protects each frame with a single checksum byte. The algorithm
//! is supplied by the board (a CRC peripheral, for example) through the
//! [`Checksum`] trait; [`Crc8`] is the software implementation used by
//! default and on the host.

/// One-byte checksum over a byte range
///
/// Implementations must be deterministic and order-sensitive: swapping two
/// bytes of the input should change the result.
pub trait Checksum {
    /// Compute the checksum of `bytes`
    fn checksum(&self, bytes: &[u8]) -> u8;
}

/// CRC-8 with polynomial 0x07, init 0x00, no reflection, no final xor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc8;

impl Crc8 {
    const POLY: u8 = 0x07;

    /// Create the checksum primitive
    pub const fn new() -> Self {
        Self
    }
}

impl Checksum for Crc8 {
    fn checksum(&self, bytes: &[u8]) -> u8 {
        let mut crc: u8 = 0x00;
        for &byte in bytes {
            crc ^= byte;
            for _ in 0..8 {
                crc = if crc & 0x80 != 0 {
                    (crc << 1) ^ Self::POLY
                } else {
                    crc << 1
                };
            }
        }
        crc
    }
}

impl<C: Checksum + ?Sized> Checksum for &C {
    fn checksum(&self, bytes: &[u8]) -> u8 {
        (**self).checksum(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_check_value() {
        // Standard check input for CRC-8/SMBUS
        assert_eq!(Crc8.checksum(b"123456789"), 0xF4);
    }

    #[test]
    fn test_crc8_empty() {
        assert_eq!(Crc8.checksum(&[]), 0x00);
    }

    #[test]
    fn test_crc8_order_sensitive() {
        let a = Crc8.checksum(&[0x01, 0x02, 0x03]);
        let b = Crc8.checksum(&[0x03, 0x02, 0x01]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_checksum_through_reference() {
        let crc = Crc8::new();
        let by_ref: &dyn Checksum = &crc;
        assert_eq!(by_ref.checksum(&[0xAA, 0x55]), crc.checksum(&[0xAA, 0x55]));
    }
}
