//! Walking the sibling boxes of a flat buffer.

use crate::boxes::FourCC;
use crate::known_boxes;
use crate::parser::peek_box;
use crate::registry::{AnyBox, Registry};
use anyhow::bail;
use serde::Serialize;
use tracing::warn;

/// One sibling box visited by [`walk_siblings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkEntry {
    pub offset: u32,
    /// One past the last byte of the box, with size 0 resolved to the buffer end.
    pub end: u64,
    #[serde(rename = "type")]
    pub box_type: FourCC,
    pub name: &'static str,
    pub decoded: Option<AnyBox>,
    pub error: Option<String>,
}

impl WalkEntry {
    pub fn len(&self) -> u64 {
        self.end - self.offset as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walk sibling boxes from `offset` to the end of `data`.
///
/// A box declaring size 0 runs to the end of the buffer. Payload decode errors
/// are recorded on the entry and the walk continues at the next declared box.
/// A truncated header or a box running past the buffer stops the walk.
pub fn walk_siblings(
    reg: &Registry,
    data: &[u8],
    mut offset: u32,
    limit: Option<usize>,
) -> anyhow::Result<Vec<WalkEntry>> {
    if u32::try_from(data.len()).is_err() {
        bail!("{} bytes cannot be addressed with a 32-bit cursor", data.len());
    }
    let file_end = data.len() as u64;
    let mut entries = Vec::new();

    while (offset as u64) < file_end && limit.is_none_or(|n| entries.len() < n) {
        let Some((box_type, size)) = peek_box(data, offset) else {
            bail!("truncated box header at {offset:#x}");
        };
        let end = if size == 0 {
            file_end
        } else {
            match (offset as u64).checked_add(size) {
                Some(end) => end,
                None => bail!("{box_type} box at {offset:#x} declares {size} bytes, overflowing"),
            }
        };
        if end > file_end {
            bail!("{box_type} box at {offset:#x} declares {size} bytes, past end of buffer");
        }

        let mut cursor = offset;
        let (decoded, error) = match reg.decode(data, &mut cursor) {
            Ok(b) => (Some(b), None),
            Err(e) => {
                warn!(offset, %box_type, error = %e, "payload decode failed");
                (None, Some(e.to_string()))
            }
        };
        entries.push(WalkEntry {
            offset,
            end,
            box_type,
            name: known_boxes::full_name(box_type),
            decoded,
            error,
        });

        // `end` is bounded by the buffer length, checked above to fit in 32 bits.
        offset = end as u32;
    }
    Ok(entries)
}
