use isobox::reader::{ByteSource, Endianness, Fill, Uint24, checked_read, read_array, read_be};
use isobox::DecodeError;

/// Source that copies as much as it can and reports how far it got.
struct ShortReader(Vec<u8>);

impl ByteSource for ShortReader {
    fn byte_len(&self) -> usize {
        self.0.len()
    }

    fn fill_at(&self, offset: usize, dst: &mut [u8]) -> Fill {
        let avail = self.0.len().saturating_sub(offset).min(dst.len());
        if avail > 0 {
            dst[..avail].copy_from_slice(&self.0[offset..offset + avail]);
        }
        Fill {
            complete: avail == dst.len(),
            reached: offset + avail,
        }
    }
}

#[test]
fn reads_big_and_little_endian() {
    let data = vec![0x12u8, 0x34, 0x56, 0x78];

    let mut off = 0;
    let be: u32 = checked_read::<u32, u32, _>(&data, &mut off, Endianness::Big).unwrap();
    assert_eq!(be, 0x1234_5678);
    assert_eq!(off, 4);

    let mut off = 0;
    let le: u32 = checked_read::<u32, u32, _>(&data, &mut off, Endianness::Little).unwrap();
    assert_eq!(le, 0x7856_3412);
    assert_eq!(off, 4);
}

#[test]
fn widens_into_accumulator() {
    let data = vec![0xffu8, 0xfe];
    let mut off = 0;
    let v: u64 = checked_read::<u16, u64, _>(&data, &mut off, Endianness::Big).unwrap();
    assert_eq!(v, 0xfffe);

    let mut off = 0;
    let s: i64 = checked_read::<i16, i64, _>(&data, &mut off, Endianness::Big).unwrap();
    assert_eq!(s, -2);
}

#[test]
fn reads_24_bit_values() {
    let data = vec![0x02u8, 0x03, 0x04, 0xaa];
    let mut off = 0;
    let v = read_be::<Uint24, _>(&data, &mut off).unwrap();
    assert_eq!(v.get(), 0x020304);
    assert_eq!(off, 3);
}

#[test]
fn short_slice_read_fails_without_moving_cursor() {
    let data = vec![0u8; 6];
    let mut off = 4;
    let err = read_be::<u32, _>(&data, &mut off).unwrap_err();
    assert_eq!(
        err,
        DecodeError::Truncated {
            offset: 4,
            needed: 4,
            available: 2
        }
    );
    assert_eq!(off, 4);
}

#[test]
fn cursor_follows_source_on_short_read() {
    let src = ShortReader(vec![1, 2, 3, 4, 5, 6]);
    let mut off = 4;
    assert!(read_be::<u32, _>(&src, &mut off).is_err());
    assert_eq!(off, 6);
}

#[test]
fn offset_past_end_is_truncated() {
    let data = vec![0u8; 4];
    let mut off = u32::MAX - 1;
    assert!(read_be::<u64, _>(&data, &mut off).unwrap_err().is_truncated());
    assert_eq!(off, u32::MAX - 1);
}

#[test]
fn raw_array_copy() {
    let data: Vec<u8> = (0u8..20).collect();
    let mut off = 2;
    let arr = read_array::<16, _>(&data, &mut off).unwrap();
    assert_eq!(arr[0], 2);
    assert_eq!(arr[15], 17);
    assert_eq!(off, 18);

    assert!(read_array::<16, _>(&data, &mut off).is_err());
    assert_eq!(off, 18);
}

#[cfg(target_pointer_width = "64")]
mod cursor_overflow {
    use super::*;
    use std::process::{Command, Stdio};

    /// Claims every read lands past the 32-bit range.
    struct RunawaySource;

    impl ByteSource for RunawaySource {
        fn byte_len(&self) -> usize {
            usize::MAX
        }

        fn fill_at(&self, _offset: usize, dst: &mut [u8]) -> Fill {
            dst.fill(0);
            Fill {
                complete: true,
                reached: u32::MAX as usize + 1,
            }
        }
    }

    #[test]
    fn cursor_past_32_bits_aborts_the_process() {
        if std::env::var_os("ISOBOX_ABORT_CHILD").is_some() {
            let mut off = 0;
            let _ = read_be::<u32, _>(&RunawaySource, &mut off);
            // Reaching this point means the guard did not fire.
            return;
        }

        let status = Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "cursor_overflow::cursor_past_32_bits_aborts_the_process",
                "--test-threads=1",
            ])
            .env("ISOBOX_ABORT_CHILD", "1")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .unwrap();
        assert!(!status.success());
    }
}
