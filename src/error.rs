use crate::boxes::FourCC;

/// Failure while decoding a box.
///
/// `Truncated` is structural: a read needed more bytes than the source holds.
/// `Malformed` is reported by payload kinds for semantic violations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: u32,
        needed: usize,
        available: usize,
    },
    #[error("malformed {box_type} box: {reason}")]
    Malformed { box_type: FourCC, reason: String },
}

impl DecodeError {
    pub fn malformed(box_type: FourCC, reason: impl Into<String>) -> Self {
        DecodeError::Malformed {
            box_type,
            reason: reason.into(),
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }
}

/// A string that is not exactly four bytes long was parsed as a type code.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("type code must be 4 bytes, got {len}")]
pub struct InvalidFourCC {
    pub len: usize,
}

pub type Result<T> = std::result::Result<T, DecodeError>;
