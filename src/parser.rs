use crate::boxes::{BoxHeader, FourCC, FullBoxHeader};
use crate::error::Result;
use crate::reader::{ByteSource, Uint24, ensure_remaining, read_array, read_be};
use serde::Serialize;
use std::ops::Deref;
use tracing::trace;

/// Look at the header at `offset` without committing to a decode.
///
/// Returns the type code and the declared size (64-bit size when the 32-bit
/// field is 1, 0 passed through as-is).
pub fn peek_box<S: ByteSource + ?Sized>(source: &S, offset: u32) -> Option<(FourCC, u64)> {
    if source.remaining(offset) < BoxHeader::MIN_SIZE {
        return None;
    }
    let mut cursor = offset;
    let size32: u32 = read_be(source, &mut cursor).ok()?;
    let box_type = FourCC::from(read_be::<u32, _>(source, &mut cursor).ok()?);
    let size = match size32 {
        1 => read_be::<u64, _>(source, &mut cursor).ok()?,
        n => n as u64,
    };
    Some((box_type, size))
}

impl BoxHeader {
    /// Decode the header at `offset`, advancing past it.
    pub fn decode<S: ByteSource + ?Sized>(source: &S, offset: &mut u32) -> Result<Self> {
        ensure_remaining(source, *offset, Self::MIN_SIZE)?;
        let start = *offset;

        let size32: u32 = read_be(source, offset)?;
        let box_type = FourCC::from(read_be::<u32, _>(source, offset)?);
        let size = match size32 {
            1 => read_be::<u64, _>(source, offset)?,
            n => n as u64,
        };

        let extended_type = if box_type == FourCC::USER_TYPE {
            Some(read_array::<16, _>(source, offset)?)
        } else {
            None
        };

        let header = BoxHeader {
            start,
            size,
            box_type,
            extended_type,
            header_size: (*offset - start) as u8,
        };
        trace!(start, size, box_type = %box_type, "box header");
        Ok(header)
    }
}

/// Kind-specific payload decoding, run after the header.
///
/// Implementations must not read past `header.payload_end(..)`; nothing
/// upstream clips them.
pub trait BoxPayload: Sized {
    fn decode<S: ByteSource + ?Sized>(
        header: &BoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self>;
}

/// The bare box: consumes nothing.
impl BoxPayload for () {
    fn decode<S: ByteSource + ?Sized>(_: &BoxHeader, _: &S, _: &mut u32) -> Result<Self> {
        Ok(())
    }
}

/// A decoded box: its header merged with the payload kind's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IsoBox<P = ()> {
    #[serde(flatten)]
    header: BoxHeader,
    payload: P,
}

impl<P: BoxPayload> IsoBox<P> {
    /// Decode header then payload, advancing `offset` past everything consumed.
    pub fn decode<S: ByteSource + ?Sized>(source: &S, offset: &mut u32) -> Result<Self> {
        let header = BoxHeader::decode(source, offset)?;
        Self::from_header(header, source, offset)
    }

    /// Run the payload phase for an already decoded header.
    pub fn from_header<S: ByteSource + ?Sized>(
        header: BoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self> {
        let payload = P::decode(&header, source, offset)?;
        Ok(IsoBox { header, payload })
    }
}

impl<P> IsoBox<P> {
    pub fn header(&self) -> &BoxHeader {
        &self.header
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn into_parts(self) -> (BoxHeader, P) {
        (self.header, self.payload)
    }

    pub fn size(&self) -> u64 {
        self.header.size()
    }

    pub fn box_type(&self) -> FourCC {
        self.header.box_type()
    }

    pub fn extended_type(&self) -> &[u8] {
        self.header.extended_type()
    }
}

/// Payload of a full box, read after its version and flags.
pub trait FullBoxBody: Sized {
    fn decode<S: ByteSource + ?Sized>(
        header: &BoxHeader,
        full: &FullBoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self>;
}

impl FullBoxBody for () {
    fn decode<S: ByteSource + ?Sized>(
        _: &BoxHeader,
        _: &FullBoxHeader,
        _: &S,
        _: &mut u32,
    ) -> Result<Self> {
        Ok(())
    }
}

/// Payload that starts with a 1-byte version and 24-bit flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullBox<B = ()> {
    #[serde(flatten)]
    full: FullBoxHeader,
    body: B,
}

impl<B> FullBox<B> {
    pub fn version(&self) -> u8 {
        self.full.version
    }

    pub fn flags(&self) -> u32 {
        self.full.flags
    }

    pub fn full_header(&self) -> &FullBoxHeader {
        &self.full
    }

    pub fn body(&self) -> &B {
        &self.body
    }
}

impl<B> Deref for FullBox<B> {
    type Target = B;

    fn deref(&self) -> &B {
        &self.body
    }
}

impl<B: FullBoxBody> BoxPayload for FullBox<B> {
    fn decode<S: ByteSource + ?Sized>(
        header: &BoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self> {
        <() as BoxPayload>::decode(header, source, offset)?;

        ensure_remaining(source, *offset, 4)?;
        let version: u8 = read_be(source, offset)?;
        let flags = read_be::<Uint24, _>(source, offset)?.get();
        let full = FullBoxHeader { version, flags };

        let body = B::decode(header, &full, source, offset)?;
        Ok(FullBox { full, body })
    }
}
