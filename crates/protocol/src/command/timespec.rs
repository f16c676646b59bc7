use std::fmt;

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timespec {
    sec: u64,
    nsec: u32,
}

impl Timespec {
    /// Largest valid nanosecond component.
    pub const MAX_NSEC: u32 = 999_999_999;

    /// Builds a timestamp, rejecting nanosecond values of one second or more.
    #[must_use]
    pub const fn new(sec: u64, nsec: u32) -> Option<Self> {
        if nsec > Self::MAX_NSEC {
            return None;
        }
        Some(Self { sec, nsec })
    }

    /// Whole seconds.
    #[must_use]
    #[inline]
    pub const fn sec(self) -> u64 {
        self.sec
    }

    /// Sub-second nanoseconds.
    #[must_use]
    #[inline]
    pub const fn nsec(self) -> u32 {
        self.nsec
    }

    /// Encodes the timestamp as carried in an attribute value.
    #[must_use]
    pub fn encode(self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[..8].copy_from_slice(&self.sec.to_le_bytes());
        out[8..].copy_from_slice(&self.nsec.to_le_bytes());
        out
    }
}

impl fmt::Display for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.sec, self.nsec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_a_full_second_of_nanoseconds() {
        assert!(Timespec::new(1, Timespec::MAX_NSEC).is_some());
        assert!(Timespec::new(1, 1_000_000_000).is_none());
    }

    #[test]
    fn display_pads_nanoseconds() {
        let ts = Timespec::new(1_700_000_000, 5).unwrap();
        assert_eq!(ts.to_string(), "1700000000.000000005");
    }

    #[test]
    fn encode_is_little_endian() {
        let ts = Timespec::new(0x0102, 0x0304).unwrap();
        assert_eq!(ts.encode(), [2, 1, 0, 0, 0, 0, 0, 0, 4, 3, 0, 0]);
    }
}
