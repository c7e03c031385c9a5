use isobox::reader::{ByteSource, read_be};
use isobox::{BoxHeader, DecodeError, FullBox, FullBoxBody, FullBoxHeader, IsoBox, Result};

fn full_box(typ: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = ((8 + payload.len()) as u32).to_be_bytes().to_vec();
    v.extend_from_slice(typ);
    v.extend_from_slice(payload);
    v
}

#[test]
fn version_and_flags() {
    let v = full_box(b"mvhd", &[0x01, 0x02, 0x03, 0x04]);
    let mut off = 0;
    let b = IsoBox::<FullBox>::decode(&v, &mut off).unwrap();
    assert_eq!(b.payload().version(), 1);
    assert_eq!(b.payload().flags(), 0x020304);
    assert_eq!(off, 12);
}

#[test]
fn flags_top_byte_stays_zero() {
    let v = full_box(b"mvhd", &[0xff, 0xff, 0xff, 0xff]);
    let mut off = 0;
    let b = IsoBox::<FullBox>::decode(&v, &mut off).unwrap();
    assert_eq!(b.payload().flags(), 0x00ff_ffff);
}

#[test]
fn fewer_than_four_bytes_is_truncated() {
    for n in 0..4 {
        let v = full_box(b"tkhd", &vec![1u8; n]);
        let mut off = 0;
        let err = IsoBox::<FullBox>::decode(&v, &mut off).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 8,
                needed: 4,
                available: n
            }
        );
        // Only the header was consumed.
        assert_eq!(off, 8);
    }
}

/// Version-dependent body chained after version and flags.
#[derive(Debug, PartialEq)]
struct Timestamp(u64);

impl FullBoxBody for Timestamp {
    fn decode<S: ByteSource + ?Sized>(
        _: &BoxHeader,
        full: &FullBoxHeader,
        source: &S,
        offset: &mut u32,
    ) -> Result<Self> {
        let t = if full.version == 1 {
            read_be::<u64, _>(source, offset)?
        } else {
            read_be::<u32, _>(source, offset)? as u64
        };
        Ok(Timestamp(t))
    }
}

#[test]
fn body_chains_after_version_and_flags() {
    let v0 = full_box(b"tfdt", &[0, 0, 0, 0, 0, 0, 1, 0]);
    let mut off = 0;
    let b = IsoBox::<FullBox<Timestamp>>::decode(&v0, &mut off).unwrap();
    assert_eq!(*b.payload().body(), Timestamp(256));
    assert_eq!(off, 16);

    let v1 = full_box(b"tfdt", &[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0]);
    let mut off = 0;
    let b = IsoBox::<FullBox<Timestamp>>::decode(&v1, &mut off).unwrap();
    assert_eq!(b.payload().0, 1 << 32);
}

#[test]
fn body_failure_fails_the_box() {
    let v = full_box(b"tfdt", &[1, 0, 0, 0, 0, 0]);
    let mut off = 0;
    assert!(
        IsoBox::<FullBox<Timestamp>>::decode(&v, &mut off)
            .unwrap_err()
            .is_truncated()
    );
}
