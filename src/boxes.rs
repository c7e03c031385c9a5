use crate::error::{DecodeError, InvalidFourCC, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Four-byte type identifier.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// Type code announcing a 16-byte extended type after the header.
    pub const USER_TYPE: FourCC = FourCC(*b"uuid");

    pub const fn new(code: &[u8; 4]) -> Self {
        FourCC(*code)
    }

    pub const fn from_u32(v: u32) -> Self {
        FourCC(v.to_be_bytes())
    }

    pub const fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}

impl From<u32> for FourCC {
    fn from(v: u32) -> Self {
        FourCC::from_u32(v)
    }
}

impl From<FourCC> for u32 {
    fn from(cc: FourCC) -> Self {
        cc.as_u32()
    }
}

impl std::str::FromStr for FourCC {
    type Err = InvalidFourCC;

    fn from_str(s: &str) -> std::result::Result<Self, InvalidFourCC> {
        let b: [u8; 4] = s
            .as_bytes()
            .try_into()
            .map_err(|_| InvalidFourCC { len: s.len() })?;
        Ok(FourCC(b))
    }
}

impl PartialEq<str> for FourCC {
    fn eq(&self, other: &str) -> bool {
        self.0.as_slice() == other.as_bytes()
    }
}

impl PartialEq<&str> for FourCC {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_str_lossy())
    }
}

/// Registry lookup key: a plain type code, or the extended type of a `uuid` box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxKey {
    FourCC(FourCC),
    Uuid([u8; 16]),
}

/// Decoded box header.
///
/// `size` is the full declared record length, or 0 when the box runs to the
/// end of its enclosing stream. Resolving 0 is left to whoever walks the
/// container; the header reports it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxHeader {
    pub(crate) start: u32,
    pub(crate) size: u64,
    #[serde(rename = "type")]
    pub(crate) box_type: FourCC,
    #[serde(rename = "uuid", serialize_with = "serialize_opt_hex")]
    pub(crate) extended_type: Option<[u8; 16]>,
    pub(crate) header_size: u8,
}

impl BoxHeader {
    /// Smallest possible header: 32-bit size plus type code.
    pub const MIN_SIZE: usize = 8;

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn box_type(&self) -> FourCC {
        self.box_type
    }

    /// Empty, or exactly 16 bytes for `uuid` boxes.
    pub fn extended_type(&self) -> &[u8] {
        match &self.extended_type {
            Some(uuid) => uuid,
            None => &[],
        }
    }

    pub fn uuid(&self) -> Option<&[u8; 16]> {
        self.extended_type.as_ref()
    }

    /// Encoded length of the header itself: 8, 16, 24 or 32.
    pub fn header_size(&self) -> u8 {
        self.header_size
    }

    pub fn is_unbounded(&self) -> bool {
        self.size == 0
    }

    pub fn key(&self) -> BoxKey {
        match self.extended_type {
            Some(uuid) => BoxKey::Uuid(uuid),
            None => BoxKey::FourCC(self.box_type),
        }
    }

    pub fn payload_start(&self) -> u64 {
        self.start as u64 + self.header_size as u64
    }

    /// Cursor one past the last payload byte a payload kind may read.
    ///
    /// Unbounded boxes end with the source. A declared size smaller than the
    /// header, or one whose end does not fit in 64 bits, is `Malformed`.
    pub fn payload_end(&self, source_len: usize) -> Result<u64> {
        if self.size == 0 {
            return Ok(source_len as u64);
        }
        if self.size < self.header_size as u64 {
            return Err(DecodeError::malformed(
                self.box_type,
                format!(
                    "declared size {} is smaller than its {}-byte header",
                    self.size, self.header_size
                ),
            ));
        }
        (self.start as u64).checked_add(self.size).ok_or_else(|| {
            DecodeError::malformed(
                self.box_type,
                format!(
                    "declared size {} at offset {} overflows 64 bits",
                    self.size, self.start
                ),
            )
        })
    }
}

/// Version and flags leading a full box payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FullBoxHeader {
    pub version: u8,
    /// 24-bit value; the top byte is always zero.
    pub flags: u32,
}

impl FullBoxHeader {
    pub fn has_flag(&self, mask: u32) -> bool {
        self.flags & mask != 0
    }
}

pub(crate) fn serialize_opt_hex<S: Serializer>(
    bytes: &Option<[u8; 16]>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match bytes {
        Some(b) => s.serialize_some(&hex::encode(b)),
        None => s.serialize_none(),
    }
}

pub(crate) fn serialize_hex<S: Serializer, B: AsRef<[u8]>>(
    bytes: &B,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(bytes))
}
