use bincode::{Decode, Encode};

/// Server reply: number of printable bytes in the session's payload.
#[derive(Debug, Clone, Copy, Encode, Decode, PartialEq, Eq)]
pub struct PrintableCount(pub u32);

impl PrintableCount {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for PrintableCount {
    fn from(value: u32) -> Self {
        PrintableCount(value)
    }
}
