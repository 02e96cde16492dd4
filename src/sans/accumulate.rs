//! State threaded between records of a document.
//!
//! Two kinds of values depend on earlier records: timestamps in compressed
//! record headers, which only carry the low five bits of the time, and
//! accumulated fields, which carry a rolling counter truncated to the width
//! of their base type. Both require records to be processed in order.

use alloc::collections::BTreeMap;

/// The field number of timestamps, common to all messages.
pub const TIMESTAMP_FIELD: u8 = 253;

const TIME_OFFSET_MASK: u32 = 0x1F;

/// The most recent timestamp of a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timeline {
    last: Option<u32>,
}

impl Timeline {
    /// Record a full timestamp.
    pub fn set(&mut self, timestamp: u32) {
        self.last = Some(timestamp);
    }

    pub const fn last(&self) -> Option<u32> {
        self.last
    }

    /// Resolve the time offset of a compressed header against the last
    /// timestamp, which it then replaces.
    ///
    /// Returns [`None`] if no full timestamp has been seen.
    pub fn resolve(&mut self, time_offset: u8) -> Option<u32> {
        let last = self.last?;
        let offset = u32::from(time_offset) & TIME_OFFSET_MASK;

        let mut timestamp = (last & !TIME_OFFSET_MASK) | offset;
        if offset < last & TIME_OFFSET_MASK {
            timestamp = timestamp.wrapping_add(TIME_OFFSET_MASK + 1);
        }

        self.last = Some(timestamp);
        Some(timestamp)
    }
}

/// Rolling counters of accumulated fields, keyed by global message and field
/// number.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    values: BTreeMap<(u16, u8), u64>,
}

impl Accumulator {
    /// Accumulate a raw value of `bits` width, returning the widened total.
    pub fn accumulate(&mut self, global: u16, field: u8, raw: u64, bits: u32) -> u64 {
        let mask = if bits >= 64 { u64::MAX } else { (1 << bits) - 1 };

        let value = self.values.entry((global, field)).or_insert(0);
        let delta = raw.wrapping_sub(*value & mask) & mask;
        *value = value.wrapping_add(delta);

        *value
    }

    pub fn get(&self, global: u16, field: u8) -> Option<u64> {
        self.values.get(&(global, field)).copied()
    }
}
