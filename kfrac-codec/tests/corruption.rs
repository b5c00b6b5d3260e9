//! Damaged archives must fail cleanly or still yield the exact original.

use kfrac_codec::{Codec, Config, DEFAULT_MAX_OUTPUT_LEN, MethodPolicy};
use kfrac_core::ErrorKind;

/// Output limit keeps corrupted length fields from driving large allocations.
const LIMIT: usize = 1 << 20;

fn codec(method: MethodPolicy) -> Codec {
    Codec::new(Config::new().with_method(method).with_max_output_len(LIMIT))
}

fn samples() -> Vec<(MethodPolicy, Vec<u8>)> {
    let text = b"It was the best of times, it was the worst of times. ".repeat(6);
    let mut mixed = vec![0u8; 300];
    mixed.extend_from_slice(b"tiers: 0123456789 abcdefghijklmnopqrstuvwxyz ~!@#$%^&*()");
    mixed.extend_from_slice(&[0u8; 200]);
    vec![
        (MethodPolicy::Baseline, text.clone()),
        (MethodPolicy::Tiered, text),
        (MethodPolicy::Tiered, mixed.clone()),
        (MethodPolicy::Baseline, mixed),
        (MethodPolicy::Tiered, vec![0u8; 1000]),
    ]
}

#[test]
fn test_bit_flips_never_yield_wrong_data() {
    for (method, data) in samples() {
        let codec = codec(method);
        let archive = codec.compress(&data).unwrap();

        for pos in 0..archive.len() {
            for mask in [0x01u8, 0x80, 0xFF] {
                let mut damaged = archive.clone();
                damaged[pos] ^= mask;
                if let Ok(restored) = codec.decompress(&damaged) {
                    assert_eq!(
                        restored, data,
                        "{method:?}: flip {mask:#04x} at byte {pos} produced different data"
                    );
                }
            }
        }
    }
}

#[test]
fn test_every_truncation_fails() {
    for (method, data) in samples() {
        let codec = codec(method);
        let archive = codec.compress(&data).unwrap();
        for len in 0..archive.len() {
            assert!(
                codec.decompress(&archive[..len]).is_err(),
                "{method:?}: truncation to {len} bytes accepted"
            );
        }
    }
}

#[test]
fn test_trailing_garbage_fails() {
    for (method, data) in samples() {
        let codec = codec(method);
        let mut archive = codec.compress(&data).unwrap();
        archive.push(0);
        let err = codec.decompress(&archive).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode, "{method:?}");
    }
}

#[test]
fn test_header_damage_is_a_format_error() {
    let codec = codec(MethodPolicy::Tiered);
    let archive = codec.compress(b"header damage").unwrap();

    let mut bad_magic = archive.clone();
    bad_magic[3] = b'5';
    assert_eq!(codec.decompress(&bad_magic).unwrap_err().kind(), ErrorKind::Format);

    let mut bad_method = archive.clone();
    bad_method[16] = 3;
    assert_eq!(codec.decompress(&bad_method).unwrap_err().kind(), ErrorKind::Format);

    let mut bad_reserved = archive.clone();
    bad_reserved[19] = 1;
    assert_eq!(codec.decompress(&bad_reserved).unwrap_err().kind(), ErrorKind::Format);

    let mut bad_index = archive.clone();
    bad_index[8..12].copy_from_slice(&1000u32.to_be_bytes());
    assert_eq!(codec.decompress(&bad_index).unwrap_err().kind(), ErrorKind::Format);

    let mut bad_counts = archive;
    bad_counts[20..24].copy_from_slice(&u32::MAX.to_be_bytes());
    assert_eq!(codec.decompress(&bad_counts).unwrap_err().kind(), ErrorKind::Format);
}

#[test]
fn test_oversized_length_is_a_capacity_error() {
    let codec = codec(MethodPolicy::Baseline);
    let mut archive = codec.compress(b"capacity").unwrap();
    archive[4..8].copy_from_slice(&u32::MAX.to_be_bytes());
    archive[8..12].copy_from_slice(&0u32.to_be_bytes());
    assert_eq!(codec.decompress(&archive).unwrap_err().kind(), ErrorKind::Capacity);
}

fn crafted_header(original_len: u32, method: u8) -> Vec<u8> {
    let mut archive = b"KF34".to_vec();
    archive.extend_from_slice(&original_len.to_be_bytes());
    archive.extend_from_slice(&0u32.to_be_bytes());
    archive.extend_from_slice(&0u32.to_be_bytes());
    archive.extend_from_slice(&[method, 0, 0, 0]);
    archive
}

fn crafted_baseline(original_len: u32) -> Vec<u8> {
    let mut archive = crafted_header(original_len, 1);
    archive.extend_from_slice(&[0; 4]);
    archive
}

fn crafted_tiered(original_len: u32, slot_count: u32) -> Vec<u8> {
    let mut archive = crafted_header(original_len, 2);
    for field in [slot_count, 0, 4, 4, 4, 4, 4] {
        archive.extend_from_slice(&field.to_be_bytes());
    }
    archive.extend_from_slice(&[0; 24]);
    archive
}

#[test]
fn test_default_limit_rejects_huge_declared_length() {
    let baseline = crafted_baseline(u32::MAX);
    assert_eq!(baseline.len(), 24);
    let err = kfrac_codec::decompress(&baseline).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capacity, "{err}");

    let tiered = crafted_tiered(u32::MAX, u32::MAX - 1);
    assert_eq!(tiered.len(), 72);
    let err = kfrac_codec::decompress(&tiered).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capacity, "{err}");

    let at_limit = crafted_baseline(DEFAULT_MAX_OUTPUT_LEN as u32 + 1);
    assert_eq!(
        kfrac_codec::decompress(&at_limit).unwrap_err().kind(),
        ErrorKind::Capacity
    );
}

#[test]
fn test_huge_declared_length_fails_while_decoding() {
    // With the limit lifted, the short payload runs out long before the
    // declared length is reached.
    let codec = Codec::new(Config::new().with_max_output_len(u32::MAX as usize));

    let err = codec.decompress(&crafted_baseline(u32::MAX)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode, "{err}");

    let err = codec
        .decompress(&crafted_tiered(u32::MAX, u32::MAX - 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode, "{err}");
}
