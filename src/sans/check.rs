//! Helper for computing cyclic redundancy checks.
//!
//! Documents carry a CRC-16 over their header and records, and optionally a
//! second one over the first 12 bytes of an extended header. A stored header
//! check of zero means the check was not computed.

const CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

/// Accumulate a slice of bytes into a cyclic redundancy check value.
pub fn compute_crc(init: u16, r: &[u8]) -> u16 {
    let mut crc = Crc(init);
    crc.update(r);
    crc.value()
}

/// A running cyclic redundancy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crc(u16);

impl Crc {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn update(&mut self, r: &[u8]) {
        for &b in r {
            // Low nibble first.
            for nibble in [b & 0xF, b >> 4] {
                let tmp = CRC_TABLE[(self.0 & 0xF) as usize];
                self.0 = ((self.0 >> 4) & 0x0FFF) ^ tmp ^ CRC_TABLE[nibble as usize];
            }
        }
    }

    pub const fn value(&self) -> u16 {
        self.0
    }
}
