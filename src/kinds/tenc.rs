use super::Bounds;
use crate::boxes::{BoxHeader, FullBoxHeader, serialize_hex};
use crate::error::Result;
use crate::parser::FullBoxBody;
use crate::reader::{ByteSource, read_array, read_be, read_vec};
use serde::Serialize;

/// `tenc`: default encryption parameters for a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackEncryption {
    /// Encrypted blocks per pattern; 0 before version 1.
    pub default_crypt_byte_block: u8,
    /// Clear blocks per pattern; 0 before version 1.
    pub default_skip_byte_block: u8,
    pub default_is_protected: u8,
    pub default_per_sample_iv_size: u8,
    #[serde(serialize_with = "serialize_hex")]
    pub default_kid: [u8; 16],
    #[serde(serialize_with = "serialize_hex")]
    pub default_constant_iv: Vec<u8>,
}

impl TrackEncryption {
    pub fn is_protected(&self) -> bool {
        self.default_is_protected == 1
    }
}

impl FullBoxBody for TrackEncryption {
    fn decode<S: ByteSource + ?Sized>(
        header: &BoxHeader,
        full: &FullBoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self> {
        let bounds = Bounds::of(header, source)?;
        bounds.require(*offset, 20, "encryption defaults")?;

        let _reserved: u8 = read_be(source, offset)?;
        let pattern: u8 = read_be(source, offset)?;
        let (default_crypt_byte_block, default_skip_byte_block) = if full.version == 0 {
            (0, 0)
        } else {
            (pattern >> 4, pattern & 0x0f)
        };

        let default_is_protected: u8 = read_be(source, offset)?;
        if default_is_protected > 1 {
            return Err(bounds.malformed(format!(
                "is_protected must be 0 or 1, got {default_is_protected}"
            )));
        }
        let default_per_sample_iv_size: u8 = read_be(source, offset)?;
        if !matches!(default_per_sample_iv_size, 0 | 8 | 16) {
            return Err(bounds.malformed(format!(
                "per-sample IV size must be 0, 8 or 16, got {default_per_sample_iv_size}"
            )));
        }
        let default_kid = read_array::<16, _>(source, offset)?;

        let mut default_constant_iv = Vec::new();
        if default_is_protected == 1 && default_per_sample_iv_size == 0 {
            bounds.require(*offset, 1, "constant IV size")?;
            let len: u8 = read_be(source, offset)?;
            bounds.require(*offset, len as u64, "constant IV")?;
            default_constant_iv = read_vec(source, offset, len as usize)?;
        }

        Ok(TrackEncryption {
            default_crypt_byte_block,
            default_skip_byte_block,
            default_is_protected,
            default_per_sample_iv_size,
            default_kid,
            default_constant_iv,
        })
    }
}
