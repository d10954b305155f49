use bincode::{Decode, Encode};

/// Client request header: exact byte length of the payload that follows it.
#[derive(Debug, Clone, Copy, Encode, Decode, PartialEq, Eq)]
pub struct LengthHeader(pub u32);

impl LengthHeader {
    pub fn len(&self) -> u32 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for LengthHeader {
    fn from(value: u32) -> Self {
        LengthHeader(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_header() {
        assert!(LengthHeader::from(0).is_empty());
        assert_eq!(LengthHeader::from(7).len(), 7);
    }
}
