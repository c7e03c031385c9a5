use super::Bounds;
use crate::boxes::{BoxHeader, FourCC};
use crate::error::Result;
use crate::parser::BoxPayload;
use crate::reader::{ByteSource, read_be};
use serde::Serialize;
use tracing::debug;

/// `ftyp` / `styp`: major brand, minor version and compatible brands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileType {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl FileType {
    pub fn is_compatible_with(&self, brand: FourCC) -> bool {
        self.major_brand == brand || self.compatible_brands.contains(&brand)
    }
}

impl BoxPayload for FileType {
    fn decode<S: ByteSource + ?Sized>(
        header: &BoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self> {
        let bounds = Bounds::of(header, source)?;
        bounds.require(*offset, 8, "major brand and minor version")?;

        let major_brand = FourCC::from(read_be::<u32, _>(source, offset)?);
        let minor_version: u32 = read_be(source, offset)?;

        let rest = bounds.remaining(*offset);
        if rest % 4 != 0 {
            return Err(bounds.malformed(format!(
                "{rest} trailing bytes do not form whole brands"
            )));
        }

        let mut compatible_brands = Vec::new();
        for _ in 0..rest / 4 {
            compatible_brands.push(FourCC::from(read_be::<u32, _>(source, offset)?));
        }

        debug!(
            major = %major_brand,
            minor_version,
            brands = compatible_brands.len(),
            "file type"
        );
        Ok(FileType {
            major_brand,
            minor_version,
            compatible_brands,
        })
    }
}
