//! Bounds-checked primitive reads over an in-memory byte source.
//!
//! Every read goes through a `u32` cursor. The byte source reports how far a
//! read actually got; that position must always fit in 32 bits or the process
//! aborts, since all offset arithmetic downstream assumes it does.

use crate::error::{DecodeError, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Big,
    Little,
}

/// Outcome of a raw [`ByteSource::fill_at`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// `true` if every byte of the destination was written.
    pub complete: bool,
    /// Offset the source reached after the attempt.
    pub reached: usize,
}

/// A bounded, randomly addressable source of bytes.
pub trait ByteSource {
    fn byte_len(&self) -> usize;

    /// Copy `dst.len()` bytes starting at `offset` into `dst`.
    fn fill_at(&self, offset: usize, dst: &mut [u8]) -> Fill;

    fn remaining(&self, offset: u32) -> usize {
        self.byte_len().saturating_sub(offset as usize)
    }
}

impl ByteSource for [u8] {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn fill_at(&self, offset: usize, dst: &mut [u8]) -> Fill {
        let end = offset.checked_add(dst.len());
        match end.and_then(|end| self.get(offset..end)) {
            Some(src) => {
                dst.copy_from_slice(src);
                Fill {
                    complete: true,
                    reached: offset + dst.len(),
                }
            }
            // Short slice reads leave the cursor where it was.
            None => Fill {
                complete: false,
                reached: offset,
            },
        }
    }
}

impl ByteSource for Vec<u8> {
    fn byte_len(&self) -> usize {
        self.len()
    }

    fn fill_at(&self, offset: usize, dst: &mut [u8]) -> Fill {
        ByteSource::fill_at(self.as_slice(), offset, dst)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn byte_len(&self) -> usize {
        (**self).byte_len()
    }

    fn fill_at(&self, offset: usize, dst: &mut [u8]) -> Fill {
        (**self).fill_at(offset, dst)
    }
}

/// A fixed-width integer that can be read with either byte order.
pub trait Primitive: Copy {
    const WIDTH: usize;

    fn from_bytes<B: ByteOrder>(buf: &[u8]) -> Self;

    fn decode(buf: &[u8], endian: Endianness) -> Self {
        match endian {
            Endianness::Big => Self::from_bytes::<BigEndian>(buf),
            Endianness::Little => Self::from_bytes::<LittleEndian>(buf),
        }
    }
}

/// Unsigned 24-bit integer, as used by full box flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Uint24(u32);

impl Uint24 {
    pub const MAX: u32 = 0x00ff_ffff;

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<Uint24> for u32 {
    fn from(v: Uint24) -> Self {
        v.0
    }
}

impl From<Uint24> for u64 {
    fn from(v: Uint24) -> Self {
        v.0 as u64
    }
}

impl Primitive for Uint24 {
    const WIDTH: usize = 3;

    fn from_bytes<B: ByteOrder>(buf: &[u8]) -> Self {
        Uint24(B::read_u24(buf))
    }
}

impl Primitive for u8 {
    const WIDTH: usize = 1;

    fn from_bytes<B: ByteOrder>(buf: &[u8]) -> Self {
        buf[0]
    }
}

impl Primitive for i8 {
    const WIDTH: usize = 1;

    fn from_bytes<B: ByteOrder>(buf: &[u8]) -> Self {
        buf[0] as i8
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $read:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn from_bytes<B: ByteOrder>(buf: &[u8]) -> Self {
                    B::$read(buf)
                }
            }
        )*
    };
}

impl_primitive! {
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    i64 => read_i64,
}

const MAX_PRIMITIVE_WIDTH: usize = 8;

/// Read a `T` at `offset` and widen it into `R`.
///
/// On success the cursor moves past the value. On failure no value is
/// produced and the cursor is set to wherever the source says it stopped.
pub fn checked_read<T, R, S>(source: &S, offset: &mut u32, endian: Endianness) -> Result<R>
where
    T: Primitive,
    R: From<T>,
    S: ByteSource + ?Sized,
{
    let mut buf = [0u8; MAX_PRIMITIVE_WIDTH];
    let dst = &mut buf[..T::WIDTH];
    let start = *offset;
    let fill = source.fill_at(start as usize, dst);
    *offset = guard_cursor(fill.reached);
    if !fill.complete {
        return Err(truncated(source, start, T::WIDTH));
    }
    Ok(R::from(T::decode(dst, endian)))
}

/// Big-endian shorthand for [`checked_read`] without widening.
pub fn read_be<T, S>(source: &S, offset: &mut u32) -> Result<T>
where
    T: Primitive,
    S: ByteSource + ?Sized,
{
    checked_read::<T, T, S>(source, offset, Endianness::Big)
}

/// Copy `N` raw bytes out of the source.
pub fn read_array<const N: usize, S>(source: &S, offset: &mut u32) -> Result<[u8; N]>
where
    S: ByteSource + ?Sized,
{
    let mut out = [0u8; N];
    let start = *offset;
    let fill = source.fill_at(start as usize, &mut out);
    *offset = guard_cursor(fill.reached);
    if !fill.complete {
        return Err(truncated(source, start, N));
    }
    Ok(out)
}

/// Copy `len` raw bytes out of the source into a fresh vector.
pub fn read_vec<S>(source: &S, offset: &mut u32, len: usize) -> Result<Vec<u8>>
where
    S: ByteSource + ?Sized,
{
    ensure_remaining(source, *offset, len)?;
    let mut out = vec![0u8; len];
    let start = *offset;
    let fill = source.fill_at(start as usize, &mut out);
    *offset = guard_cursor(fill.reached);
    if !fill.complete {
        return Err(truncated(source, start, len));
    }
    Ok(out)
}

/// Fail with `Truncated` unless `needed` bytes remain at `offset`.
pub fn ensure_remaining<S>(source: &S, offset: u32, needed: usize) -> Result<()>
where
    S: ByteSource + ?Sized,
{
    if source.remaining(offset) < needed {
        return Err(truncated(source, offset, needed));
    }
    Ok(())
}

fn truncated<S: ByteSource + ?Sized>(source: &S, offset: u32, needed: usize) -> DecodeError {
    DecodeError::Truncated {
        offset,
        needed,
        available: source.remaining(offset),
    }
}

fn guard_cursor(reached: usize) -> u32 {
    match u32::try_from(reached) {
        Ok(cursor) => cursor,
        Err(_) => {
            tracing::error!(reached, "box cursor left the 32-bit range, aborting");
            std::process::abort()
        }
    }
}
