use crate::boxes::{BoxHeader, BoxKey, FourCC};
use crate::error::Result;
use crate::known_boxes::KnownBox;
use crate::kinds::{FileType, OriginalFormat, ProtectionSystem, SchemeType, TrackEncryption};
use crate::parser::{BoxPayload, FullBox, IsoBox};
use crate::reader::ByteSource;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A box decoded through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyBox {
    FileType(IsoBox<FileType>),
    OriginalFormat(IsoBox<OriginalFormat>),
    SchemeType(IsoBox<FullBox<SchemeType>>),
    TrackEncryption(IsoBox<FullBox<TrackEncryption>>),
    ProtectionSystem(IsoBox<FullBox<ProtectionSystem>>),
    /// A registered full box whose body is not interpreted.
    Full(IsoBox<FullBox>),
    /// No decoder registered; only the header was read.
    Opaque(IsoBox),
}

impl AnyBox {
    pub fn header(&self) -> &BoxHeader {
        match self {
            AnyBox::FileType(b) => b.header(),
            AnyBox::OriginalFormat(b) => b.header(),
            AnyBox::SchemeType(b) => b.header(),
            AnyBox::TrackEncryption(b) => b.header(),
            AnyBox::ProtectionSystem(b) => b.header(),
            AnyBox::Full(b) => b.header(),
            AnyBox::Opaque(b) => b.header(),
        }
    }

    /// Version and flags, for boxes decoded as full boxes.
    pub fn version_and_flags(&self) -> Option<(u8, u32)> {
        match self {
            AnyBox::SchemeType(b) => Some((b.payload().version(), b.payload().flags())),
            AnyBox::TrackEncryption(b) => Some((b.payload().version(), b.payload().flags())),
            AnyBox::ProtectionSystem(b) => Some((b.payload().version(), b.payload().flags())),
            AnyBox::Full(b) => Some((b.payload().version(), b.payload().flags())),
            AnyBox::FileType(_) | AnyBox::OriginalFormat(_) | AnyBox::Opaque(_) => None,
        }
    }
}

/// Decodes the payload phase of one kind of box.
///
/// The header has already been read; `offset` points at the payload.
pub trait BoxDecoder: Send + Sync {
    fn decode(
        &self,
        header: BoxHeader,
        source: &dyn ByteSource,
        offset: &mut u32,
    ) -> Result<AnyBox>;
}

/// Adapts any [`BoxPayload`] into a [`BoxDecoder`] by wrapping the result.
pub struct PayloadDecoder<P> {
    wrap: fn(IsoBox<P>) -> AnyBox,
}

impl<P> PayloadDecoder<P> {
    pub fn new(wrap: fn(IsoBox<P>) -> AnyBox) -> Self {
        PayloadDecoder { wrap }
    }
}

impl<P: BoxPayload> BoxDecoder for PayloadDecoder<P> {
    fn decode(
        &self,
        header: BoxHeader,
        source: &dyn ByteSource,
        offset: &mut u32,
    ) -> Result<AnyBox> {
        IsoBox::<P>::from_header(header, source, offset).map(self.wrap)
    }
}

/// Registry of decoders keyed by `BoxKey` (4CC or UUID).
///
/// The registry is immutable once constructed; use [`Registry::with_decoder`]
/// to build it fluently.
pub struct Registry {
    map: HashMap<BoxKey, BoxDecoderEntry>,
}

struct BoxDecoderEntry {
    inner: Box<dyn BoxDecoder>,
    name: String,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Return a new registry with the given decoder added.
    ///
    /// `name` is human-readable and only used in log output.
    pub fn with_decoder(mut self, key: BoxKey, name: &str, dec: Box<dyn BoxDecoder>) -> Self {
        self.map.insert(
            key,
            BoxDecoderEntry {
                inner: dec,
                name: name.to_string(),
            },
        );
        self
    }

    /// Register a payload kind for a four-character code.
    pub fn with_kind<P>(self, code: &[u8; 4], name: &str, wrap: fn(IsoBox<P>) -> AnyBox) -> Self
    where
        P: BoxPayload + 'static,
    {
        self.with_decoder(
            BoxKey::FourCC(FourCC::new(code)),
            name,
            Box::new(PayloadDecoder::new(wrap)),
        )
    }

    pub fn contains(&self, key: &BoxKey) -> bool {
        self.map.contains_key(key)
    }

    /// Decode the box at `offset`: header first, then the registered payload kind.
    ///
    /// Unregistered keys yield [`AnyBox::Opaque`] with `offset` left just past
    /// the header.
    pub fn decode<S: ByteSource + ?Sized>(&self, source: &S, offset: &mut u32) -> Result<AnyBox> {
        let header = BoxHeader::decode(source, offset)?;
        self.decode_payload(header, &source, offset)
    }

    /// Run the payload phase for an already decoded header.
    pub fn decode_payload(
        &self,
        header: BoxHeader,
        source: &dyn ByteSource,
        offset: &mut u32,
    ) -> Result<AnyBox> {
        match self.map.get(&header.key()) {
            Some(entry) => {
                debug!(decoder = %entry.name, start = header.start(), "dispatching payload");
                entry.inner.decode(header, source, offset)
            }
            None => Ok(AnyBox::Opaque(IsoBox::<()>::from_header(
                header, source, offset,
            )?)),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_registry() -> Registry {
    let mut reg = Registry::new()
        .with_kind(b"ftyp", "ftyp", AnyBox::FileType)
        .with_kind(b"styp", "styp", AnyBox::FileType)
        .with_kind(b"frma", "frma", AnyBox::OriginalFormat)
        .with_kind(b"schm", "schm", AnyBox::SchemeType)
        .with_kind(b"tenc", "tenc", AnyBox::TrackEncryption)
        .with_kind(b"pssh", "pssh", AnyBox::ProtectionSystem);

    // Remaining known full boxes get their version and flags read, nothing more.
    for known in KnownBox::all().filter(|k| k.full_box) {
        let key = BoxKey::FourCC(known.code);
        if !reg.contains(&key) {
            reg = reg.with_kind(&known.code.0, known.full_name, AnyBox::Full);
        }
    }
    reg
}
