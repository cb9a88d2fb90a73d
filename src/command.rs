//! Control command encoding.
//!
//! The peripheral is configured by unacknowledged fixed-size frames of ten
//! 32-bit words, sent in native host byte order (40 bytes on the wire):
//!
//! | word | content |
//! |------|---------|
//! | 0    | reserved, always zero |
//! | 1    | decimation code |
//! | 2..9 | tuning word (frequency in integer Hz), replicated |
//!
//! Every frame carries the complete tuning state, so a single frame is
//! enough to configure the receiver from scratch.

/// Number of 32-bit words in a command frame.
pub const COMMAND_WORDS: usize = 10;

/// Encoded size of a command frame in bytes.
pub const COMMAND_BYTES: usize = COMMAND_WORDS * 4;

/// A single tuning/decimation command.
///
/// Pure value type, immutable once built. Carries no validation: the
/// decimation code is forwarded verbatim whether or not the peripheral
/// recognizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlCommand {
    rate_code: u32,
    frequency: u32,
}

impl ControlCommand {
    /// Build a command from a decimation code and an integer frequency word.
    pub fn new(rate_code: u32, frequency: u32) -> Self {
        Self {
            rate_code,
            frequency,
        }
    }

    /// Frame contents as ten 32-bit words.
    pub fn words(&self) -> [u32; COMMAND_WORDS] {
        let mut words = [self.frequency; COMMAND_WORDS];
        words[0] = 0;
        words[1] = self.rate_code;
        words
    }

    /// Frame contents as wire bytes, native byte order.
    pub fn to_bytes(&self) -> [u8; COMMAND_BYTES] {
        let mut bytes = [0u8; COMMAND_BYTES];
        for (i, word) in self.words().iter().enumerate() {
            bytes[i * 4..(i + 1) * 4].copy_from_slice(&word.to_ne_bytes());
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_layout() {
        let command = ControlCommand::new(2, 600_000);
        let words = command.words();
        assert_eq!(words[0], 0);
        assert_eq!(words[1], 2);
        for word in &words[2..] {
            assert_eq!(*word, 600_000);
        }
    }

    #[test]
    fn test_all_decimation_codes() {
        for code in 0..4u32 {
            let words = ControlCommand::new(code, 7_100_000).words();
            assert_eq!(words[1], code);
        }
    }

    #[test]
    fn test_out_of_range_code_forwarded_verbatim() {
        let words = ControlCommand::new(0xDEAD_BEEF, 1).words();
        assert_eq!(words[1], 0xDEAD_BEEF);
        assert_eq!(words[0], 0);
        assert_eq!(words[2], 1);
    }

    #[test]
    fn test_frame_size() {
        let bytes = ControlCommand::new(0, 48_000).to_bytes();
        assert_eq!(bytes.len(), 40);
        assert_eq!(COMMAND_BYTES, 40);
    }

    #[test]
    fn test_byte_encoding() {
        let command = ControlCommand::new(3, 30_000_000);
        let bytes = command.to_bytes();
        for (i, expected) in command.words().iter().enumerate() {
            let word = u32::from_ne_bytes(bytes[i * 4..(i + 1) * 4].try_into().unwrap());
            assert_eq!(word, *expected);
        }
    }

    #[test]
    fn test_extreme_frequency_words() {
        let words = ControlCommand::new(1, u32::MAX).words();
        assert_eq!(words[9], u32::MAX);
        let words = ControlCommand::new(1, 0).words();
        assert_eq!(words[2], 0);
    }
}
