use super::Bounds;
use crate::boxes::{BoxHeader, FullBoxHeader, serialize_hex};
use crate::error::Result;
use crate::parser::FullBoxBody;
use crate::reader::{ByteSource, read_array, read_be, read_vec};
use serde::{Serialize, Serializer};
use tracing::debug;

const COMMON_SYSTEM_ID: [u8; 16] = hex_id(b"1077efecc0b24d02ace33c1e52e2fb4b");
const PLAYREADY_SYSTEM_ID: [u8; 16] = hex_id(b"9a04f07998404286ab92e65be0885f95");
const WIDEVINE_SYSTEM_ID: [u8; 16] = hex_id(b"edef8ba979d64acea3c827dcd51d21ed");
const FAIRPLAY_SYSTEM_ID: [u8; 16] = hex_id(b"94ce86fb07ff4f43adb893d2fa968ca2");

/// `pssh`: DRM system specific initialization data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectionSystem {
    #[serde(serialize_with = "serialize_hex")]
    pub system_id: [u8; 16],
    #[serde(serialize_with = "serialize_key_ids")]
    pub key_ids: Vec<[u8; 16]>,
    #[serde(serialize_with = "serialize_hex")]
    pub data: Vec<u8>,
}

impl ProtectionSystem {
    /// Name of a well-known DRM system, if `system_id` is one.
    pub fn system_name(&self) -> Option<&'static str> {
        match self.system_id {
            COMMON_SYSTEM_ID => Some("common"),
            PLAYREADY_SYSTEM_ID => Some("playready"),
            WIDEVINE_SYSTEM_ID => Some("widevine"),
            FAIRPLAY_SYSTEM_ID => Some("fairplay"),
            _ => None,
        }
    }
}

impl FullBoxBody for ProtectionSystem {
    fn decode<S: ByteSource + ?Sized>(
        header: &BoxHeader,
        full: &FullBoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self> {
        let bounds = Bounds::of(header, source)?;
        bounds.require(*offset, 16, "system id")?;
        let system_id = read_array::<16, _>(source, offset)?;

        let mut key_ids = Vec::new();
        if full.version > 0 {
            bounds.require(*offset, 4, "key id count")?;
            let count: u32 = read_be(source, offset)?;
            bounds.require(*offset, count as u64 * 16, "key ids")?;
            for _ in 0..count {
                key_ids.push(read_array::<16, _>(source, offset)?);
            }
        }

        bounds.require(*offset, 4, "data size")?;
        let data_size: u32 = read_be(source, offset)?;
        bounds.require(*offset, data_size as u64, "system data")?;
        let data = read_vec(source, offset, data_size as usize)?;

        debug!(
            system_id = %hex::encode(system_id),
            key_ids = key_ids.len(),
            data_size,
            "protection system header"
        );
        Ok(ProtectionSystem {
            system_id,
            key_ids,
            data,
        })
    }
}

fn serialize_key_ids<S: Serializer>(
    ids: &[[u8; 16]],
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_seq(ids.iter().map(hex::encode))
}

const fn hex_id(text: &[u8; 32]) -> [u8; 16] {
    const fn nibble(c: u8) -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            _ => panic!("invalid hex digit"),
        }
    }
    let mut out = [0u8; 16];
    let mut i = 0;
    while i < 16 {
        out[i] = (nibble(text[2 * i]) << 4) | nibble(text[2 * i + 1]);
        i += 1;
    }
    out
}
