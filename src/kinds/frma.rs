use super::Bounds;
use crate::boxes::{BoxHeader, FourCC};
use crate::error::Result;
use crate::parser::BoxPayload;
use crate::reader::{ByteSource, read_be};
use serde::Serialize;

/// `frma`: the sample entry format a protected track had before encryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginalFormat {
    pub data_format: FourCC,
}

impl BoxPayload for OriginalFormat {
    fn decode<S: ByteSource + ?Sized>(
        header: &BoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self> {
        Bounds::of(header, source)?.require(*offset, 4, "data format")?;
        let data_format = FourCC::from(read_be::<u32, _>(source, offset)?);
        Ok(OriginalFormat { data_format })
    }
}
