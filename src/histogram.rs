//! Printable character histogram.
//!
//! The server keeps one [`CharHistogram`] for its whole lifetime. Every session adds the
//! printable bytes it receives to the table, and the table is only reported once, when the
//! server shuts down.
//!
//! A byte is printable when it lies in `[32, 126]`; the 95 slots are indexed by
//! `byte - 32`, so iteration is always in ascending code point order.
use std::fmt;

/// Lowest printable ASCII code point (space).
pub const PRINTABLE_FIRST: u8 = 32;
/// Highest printable ASCII code point (`~`).
pub const PRINTABLE_LAST: u8 = 126;
/// Number of slots in the histogram.
pub const PRINTABLE_SLOTS: usize = (PRINTABLE_LAST - PRINTABLE_FIRST) as usize + 1;

/// Returns `true` if `byte` is a printable ASCII character.
pub fn is_printable(byte: u8) -> bool {
    (PRINTABLE_FIRST..=PRINTABLE_LAST).contains(&byte)
}

/// Occurrence counts for each printable ASCII character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharHistogram {
    slots: [u32; PRINTABLE_SLOTS],
}

impl Default for CharHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl CharHistogram {
    pub fn new() -> Self {
        Self {
            slots: [0; PRINTABLE_SLOTS],
        }
    }

    /// Records every printable byte in `bytes` and returns how many there were.
    ///
    /// Non-printable bytes are skipped. Slots saturate at `u32::MAX`.
    pub fn record(&mut self, bytes: &[u8]) -> u32 {
        let mut printable = 0u32;
        for &byte in bytes.iter().filter(|b| is_printable(**b)) {
            let slot = &mut self.slots[(byte - PRINTABLE_FIRST) as usize];
            *slot = slot.saturating_add(1);
            printable += 1;
        }
        printable
    }

    /// Count for a single character; `0` for anything non-printable.
    pub fn get(&self, byte: u8) -> u32 {
        if is_printable(byte) {
            self.slots[(byte - PRINTABLE_FIRST) as usize]
        } else {
            0
        }
    }

    /// Sum of all slots.
    pub fn total(&self) -> u64 {
        self.slots.iter().map(|&c| u64::from(c)).sum()
    }

    /// Adds every slot of `other` into `self`.
    pub fn merge(&mut self, other: &CharHistogram) {
        for (slot, count) in self.slots.iter_mut().zip(other.slots.iter()) {
            *slot = slot.saturating_add(*count);
        }
    }

    /// `(character, count)` pairs in ascending code point order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, &count)| (char::from(PRINTABLE_FIRST + i as u8), count))
    }
}

/// Shutdown report, one line per printable character.
impl fmt::Display for CharHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (c, count) in self.iter() {
            writeln!(f, "Character '{c}' occurred {count} times")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_records_printable_only() {
        let mut histogram = CharHistogram::new();

        let printable = histogram.record(b"AB\x01C");
        assert_eq!(printable, 3);
        assert_eq!(histogram.get(b'A'), 1);
        assert_eq!(histogram.get(b'B'), 1);
        assert_eq!(histogram.get(b'C'), 1);
        assert_eq!(histogram.get(0x01), 0);
        assert_eq!(histogram.total(), 3);
    }

    #[test]
    fn histogram_bounds() {
        let mut histogram = CharHistogram::new();

        let printable = histogram.record(&[31, 32, 126, 127, 0xff]);
        assert_eq!(printable, 2);
        assert_eq!(histogram.get(b' '), 1);
        assert_eq!(histogram.get(b'~'), 1);
        assert_eq!(histogram.get(127), 0);
    }

    #[test]
    fn histogram_empty_payload() {
        let mut histogram = CharHistogram::new();

        assert_eq!(histogram.record(&[]), 0);
        assert_eq!(histogram, CharHistogram::default());
    }

    #[test]
    fn histogram_merge_is_element_wise_sum() {
        let mut first = CharHistogram::new();
        first.record(b"aab");
        let mut second = CharHistogram::new();
        second.record(b"bcc~");

        first.merge(&second);
        assert_eq!(first.get(b'a'), 2);
        assert_eq!(first.get(b'b'), 2);
        assert_eq!(first.get(b'c'), 2);
        assert_eq!(first.get(b'~'), 1);
        assert_eq!(first.total(), 7);
    }

    #[test]
    fn histogram_saturates() {
        let mut histogram = CharHistogram::new();
        histogram.slots[0] = u32::MAX;

        histogram.record(b" ");
        assert_eq!(histogram.get(b' '), u32::MAX);
    }

    #[test]
    fn histogram_report_is_ascending() {
        let mut histogram = CharHistogram::new();
        histogram.record(b"~ ");

        let report = histogram.to_string();
        let lines = report.lines().collect::<Vec<&str>>();
        assert_eq!(lines.len(), PRINTABLE_SLOTS);
        assert_eq!(lines[0], "Character ' ' occurred 1 times");
        assert_eq!(lines[1], "Character '!' occurred 0 times");
        assert_eq!(lines[PRINTABLE_SLOTS - 1], "Character '~' occurred 1 times");
    }
}
