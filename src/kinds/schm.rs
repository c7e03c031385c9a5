use super::Bounds;
use crate::boxes::{BoxHeader, FourCC, FullBoxHeader};
use crate::error::Result;
use crate::parser::FullBoxBody;
use crate::reader::{ByteSource, read_be, read_vec};
use serde::Serialize;

/// `schm`: which protection scheme a track uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemeType {
    pub scheme_type: FourCC,
    pub scheme_version: u32,
    pub scheme_uri: Option<String>,
}

impl SchemeType {
    pub const URI_PRESENT: u32 = 0x000001;

    pub const CENC: FourCC = FourCC(*b"cenc");
    pub const CENS: FourCC = FourCC(*b"cens");
    pub const CBC1: FourCC = FourCC(*b"cbc1");
    pub const CBCS: FourCC = FourCC(*b"cbcs");

    pub fn is_ctr_mode(&self) -> bool {
        self.scheme_type == Self::CENC || self.scheme_type == Self::CENS
    }

    pub fn is_cbc_mode(&self) -> bool {
        self.scheme_type == Self::CBC1 || self.scheme_type == Self::CBCS
    }
}

impl FullBoxBody for SchemeType {
    fn decode<S: ByteSource + ?Sized>(
        header: &BoxHeader,
        full: &FullBoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self> {
        let bounds = Bounds::of(header, source)?;
        bounds.require(*offset, 8, "scheme type and version")?;

        let scheme_type = FourCC::from(read_be::<u32, _>(source, offset)?);
        let scheme_version: u32 = read_be(source, offset)?;

        let scheme_uri = if full.has_flag(Self::URI_PRESENT) {
            let len = bounds.remaining(*offset) as usize;
            let mut raw = read_vec(source, offset, len)?;
            if let Some(nul) = raw.iter().position(|&b| b == 0) {
                raw.truncate(nul);
            }
            let uri = String::from_utf8(raw)
                .map_err(|_| bounds.malformed("scheme uri is not valid UTF-8"))?;
            Some(uri)
        } else {
            None
        };

        Ok(SchemeType {
            scheme_type,
            scheme_version,
            scheme_uri,
        })
    }
}
