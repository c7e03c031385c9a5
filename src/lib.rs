//! Decoding of ISO base media style boxes over untrusted in-memory buffers.
//!
//! Decoding runs in two phases: [`BoxHeader::decode`] reads the size, type
//! code and optional extended type, then a [`BoxPayload`] kind reads its own
//! fields. [`IsoBox::decode`] runs both; [`Registry`] picks the kind by type
//! code at runtime.

pub mod boxes;
pub mod error;
pub mod kinds;
pub mod known_boxes;
pub mod parser;
pub mod reader;
pub mod registry;
pub mod util;
pub mod walk;

pub use boxes::{BoxHeader, BoxKey, FourCC, FullBoxHeader};
pub use error::{DecodeError, InvalidFourCC, Result};
pub use parser::{BoxPayload, FullBox, FullBoxBody, IsoBox, peek_box};
pub use reader::{ByteSource, Endianness, checked_read};
pub use registry::{AnyBox, BoxDecoder, Registry, default_registry};
pub use walk::{WalkEntry, walk_siblings};
