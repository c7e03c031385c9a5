//! Property tests for header peek and decode.

use isobox::{BoxHeader, DecodeError, FourCC, FullBox, IsoBox, peek_box};
use proptest::collection::vec;
use proptest::prelude::*;

fn encode_header(size32: u32, typ: [u8; 4], size64: u64, tail: &[u8]) -> Vec<u8> {
    let mut v = size32.to_be_bytes().to_vec();
    v.extend_from_slice(&typ);
    if size32 == 1 {
        v.extend_from_slice(&size64.to_be_bytes());
    }
    v.extend_from_slice(tail);
    v
}

proptest! {
    #[test]
    fn short_buffers_never_decode(bytes in vec(any::<u8>(), 0..8)) {
        prop_assert_eq!(peek_box(&bytes, 0), None);

        let mut off = 0;
        let res = BoxHeader::decode(&bytes, &mut off);
        let is_truncated = matches!(res, Err(DecodeError::Truncated { .. }));
        prop_assert!(is_truncated);
        prop_assert_eq!(off, 0);
    }

    #[test]
    fn peek_agrees_with_decode(
        size32 in prop_oneof![Just(0u32), Just(1u32), any::<u32>()],
        typ in any::<[u8; 4]>(),
        size64 in any::<u64>(),
        tail in vec(any::<u8>(), 0..32),
    ) {
        prop_assume!(typ != *b"uuid");
        let v = encode_header(size32, typ, size64, &tail);

        let mut off = 0;
        let hdr = BoxHeader::decode(&v, &mut off).unwrap();
        prop_assert_eq!(peek_box(&v, 0), Some((hdr.box_type(), hdr.size())));
        prop_assert_eq!(hdr.box_type(), FourCC(typ));

        let expected = match size32 {
            1 => size64,
            n => n as u64,
        };
        prop_assert_eq!(hdr.size(), expected);
        prop_assert_eq!(off as u64, hdr.payload_start());
    }

    #[test]
    fn extended_type_is_empty_or_sixteen_bytes(bytes in vec(any::<u8>(), 8..48)) {
        let mut off = 0;
        if let Ok(hdr) = BoxHeader::decode(&bytes, &mut off) {
            if hdr.box_type() == FourCC::USER_TYPE {
                prop_assert_eq!(hdr.extended_type().len(), 16);
            } else {
                prop_assert!(hdr.extended_type().is_empty());
            }
        }
    }

    #[test]
    fn decoding_is_idempotent(bytes in vec(any::<u8>(), 0..64)) {
        let mut a_off = 0;
        let mut b_off = 0;
        let a = IsoBox::<FullBox>::decode(&bytes, &mut a_off);
        let b = IsoBox::<FullBox>::decode(&bytes, &mut b_off);
        prop_assert_eq!(a, b);
        prop_assert_eq!(a_off, b_off);
    }
}
