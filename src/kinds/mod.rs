//! Concrete payload kinds.
//!
//! Each kind bounds its reads by the declared end of its box and reports
//! semantic violations as `Malformed`.

mod frma;
mod ftyp;
mod pssh;
mod schm;
mod tenc;

pub use frma::OriginalFormat;
pub use ftyp::FileType;
pub use pssh::ProtectionSystem;
pub use schm::SchemeType;
pub use tenc::TrackEncryption;

use crate::boxes::{BoxHeader, FourCC};
use crate::error::{DecodeError, Result};
use crate::reader::ByteSource;

/// Declared end of a payload, used to keep kind decoders inside their box.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bounds {
    box_type: FourCC,
    end: u64,
}

impl Bounds {
    pub(crate) fn of<S: ByteSource + ?Sized>(header: &BoxHeader, source: &S) -> Result<Self> {
        Ok(Bounds {
            box_type: header.box_type(),
            end: header.payload_end(source.byte_len())?,
        })
    }

    pub(crate) fn remaining(&self, offset: u32) -> u64 {
        self.end.saturating_sub(offset as u64)
    }

    pub(crate) fn require(&self, offset: u32, needed: u64, what: &str) -> Result<()> {
        if self.remaining(offset) < needed {
            return Err(self.malformed(format!(
                "{what} needs {needed} bytes, {} left in box",
                self.remaining(offset)
            )));
        }
        Ok(())
    }

    pub(crate) fn malformed(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError::malformed(self.box_type, reason)
    }
}
