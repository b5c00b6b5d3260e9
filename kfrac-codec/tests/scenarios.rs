//! Behavior on the reference inputs: method choice, layout and size bounds.

use kfrac_codec::container::{Archive, Payload};
use kfrac_codec::{
    Codec, HEADER_LEN, MAGIC, Method, MethodPolicy, TIERED_EXTENSION_LEN, bwt, compress,
    decompress, inspect, zero_run,
};
use kfrac_core::Crc32;

fn lcg_random(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut seed: u64 = 0x123456789ABCDEF0;
    for _ in 0..size {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((seed >> 32) as u8);
    }
    data
}

#[test]
fn test_banana() {
    assert_eq!(bwt::transform(b"banana"), (b"nnbaaa".to_vec(), 3));

    let archive = compress(b"banana").unwrap();
    let info = inspect(&archive).unwrap();
    assert_eq!(info.method, Method::Baseline);
    assert_eq!(info.original_len, 6);
    assert_eq!(info.primary_index, 3);
    assert_eq!(info.crc, Crc32::compute(b"banana"));
    assert_eq!(decompress(&archive).unwrap(), b"banana");
}

#[test]
fn test_header_fields() {
    let archive = compress(b"hello world").unwrap();
    assert_eq!(&archive[..4], &MAGIC.to_be_bytes());
    assert_eq!(&archive[..4], b"KF34");
    assert_eq!(&archive[4..8], &11u32.to_be_bytes());
    assert_eq!(&archive[12..16], &Crc32::compute(b"hello world").to_be_bytes());
    assert_eq!(&archive[17..20], &[0, 0, 0]);
}

#[test]
fn test_zero_run_carried_as_single_run() {
    let data = vec![0u8; 1000];
    let codec = Codec::from(MethodPolicy::Tiered);
    let archive = codec.compress(&data).unwrap();

    let parsed = Archive::parse(&archive).unwrap();
    let layout = parsed.header.tiered.unwrap();
    assert_eq!(layout.slot_count, 1);
    assert_eq!(layout.run_count, 1);

    let Payload::Tiered(slices) = parsed.payload else {
        panic!("expected tiered payload");
    };
    assert_eq!(zero_run::decode_runs(slices.runs, 1).unwrap(), vec![1000]);
    assert_eq!(codec.decompress(&archive).unwrap(), data);
}

#[test]
fn test_long_zero_run_selects_tiered() {
    let data = vec![0u8; 20_000];
    let (archive, report) = Codec::default().compress_with_report(&data).unwrap();
    assert_eq!(report.method, Method::Tiered);
    assert!(report.tiered_len.unwrap() < report.baseline_len.unwrap());
    assert_eq!(archive[16], 2);
    assert_eq!(decompress(&archive).unwrap(), data);
}

#[test]
fn test_random_selects_baseline() {
    let data = lcg_random(4096);
    let (archive, report) = Codec::default().compress_with_report(&data).unwrap();
    assert_eq!(report.method, Method::Baseline);
    assert_eq!(archive[16], 1);
    assert_eq!(decompress(&archive).unwrap(), data);
}

#[test]
fn test_incompressible_size_ceiling() {
    // Adaptive models pay a learning cost on random data; there is no stored
    // method to fall back to.
    for size in [256, 1024, 4096] {
        let data = lcg_random(size);
        let archive = compress(&data).unwrap();
        assert!(
            archive.len() <= size + size / 8 + HEADER_LEN,
            "{size} bytes grew to {}",
            archive.len()
        );
    }
}

#[test]
fn test_incompressible_overhead_is_stable() {
    // Archive sizes measured for this generator, header included. A change
    // in model arithmetic moves these by far more than the tolerance.
    const TOLERANCE: usize = 8;
    for (size, measured) in [(256, 281), (1024, 1064), (4096, 4339)] {
        let archive = compress(&lcg_random(size)).unwrap();
        assert_eq!(archive[16], 1, "{size}: random data must stay on baseline");
        assert!(
            archive.len().abs_diff(measured) <= TOLERANCE,
            "{size} bytes: archive is {} bytes, expected about {measured}",
            archive.len()
        );
    }
}

#[test]
fn test_auto_never_worse_than_forced() {
    let inputs = [
        b"banana".to_vec(),
        vec![0u8; 1000],
        vec![0u8; 20_000],
        lcg_random(2048),
        b"to be or not to be, that is the question. ".repeat(30),
    ];
    for data in &inputs {
        let auto = compress(data).unwrap().len();
        let baseline = Codec::from(MethodPolicy::Baseline).compress(data).unwrap().len();
        let tiered = Codec::from(MethodPolicy::Tiered).compress(data).unwrap().len();
        assert_eq!(auto, baseline.min(tiered));
    }
}

#[test]
fn test_tiered_header_extension() {
    let archive = Codec::from(MethodPolicy::Tiered).compress(b"abc").unwrap();
    let info = inspect(&archive).unwrap();
    assert_eq!(info.header_len, HEADER_LEN + TIERED_EXTENSION_LEN);
    let streams: usize = info.streams.iter().map(|(_, len)| len).sum();
    assert_eq!(info.header_len + streams, archive.len());
    assert_eq!(info.streams.len(), 6);
    assert!(info.streams.iter().all(|&(_, len)| len >= 4));
}
