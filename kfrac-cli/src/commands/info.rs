//! Info command implementation.

use crate::utils::format_size;
use kfrac_codec::{ArchiveInfo, inspect};
use serde::Serialize;
use std::path::Path;

/// Machine-readable archive description.
#[derive(Debug, Serialize)]
struct InfoOutput {
    file: String,
    method: &'static str,
    original_size: u32,
    archive_size: usize,
    header_size: usize,
    primary_index: u32,
    crc32: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    slot_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_count: Option<u32>,
    streams: Vec<StreamOutput>,
    ratio_percent: f64,
}

#[derive(Debug, Serialize)]
struct StreamOutput {
    name: &'static str,
    size: usize,
}

impl InfoOutput {
    fn new(archive: &Path, info: &ArchiveInfo) -> Self {
        Self {
            file: archive.display().to_string(),
            method: info.method.name(),
            original_size: info.original_len,
            archive_size: info.archive_len,
            header_size: info.header_len,
            primary_index: info.primary_index,
            crc32: format!("{:08x}", info.crc),
            slot_count: info.counts.map(|(slots, _)| slots),
            run_count: info.counts.map(|(_, runs)| runs),
            streams: info
                .streams
                .iter()
                .map(|&(name, size)| StreamOutput { name, size })
                .collect(),
            ratio_percent: info.ratio_percent(),
        }
    }
}

pub fn cmd_info(archive: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(archive)?;
    let info = inspect(&data)?;

    if json {
        let output = InfoOutput::new(archive, &info);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Archive Information");
    println!("===================");
    println!("File: {}", archive.display());
    println!("Method: {}", info.method);
    println!(
        "Original size: {} ({} bytes)",
        format_size(info.original_len as u64),
        info.original_len
    );
    println!(
        "Archive size: {} ({} bytes)",
        format_size(info.archive_len as u64),
        info.archive_len
    );
    println!("Header: {} bytes", info.header_len);
    println!("Primary index: {}", info.primary_index);
    println!("CRC-32: {:08x}", info.crc);
    if let Some((slots, runs)) = info.counts {
        println!("Slots: {}", slots);
        println!("Zero runs: {}", runs);
    }
    println!();
    println!("Streams:");
    for (name, size) in &info.streams {
        println!("  {:<10} {:>10} bytes", name, size);
    }
    if info.original_len > 0 {
        println!();
        println!("Compression ratio: {:.1}%", info.ratio_percent());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kfrac_codec::{Codec, MethodPolicy};

    #[test]
    fn test_info_json_fields() {
        let archive = Codec::from(MethodPolicy::Tiered)
            .compress(&[0u8; 1000])
            .unwrap();
        let info = inspect(&archive).unwrap();
        let output = InfoOutput::new(Path::new("zeros.kf"), &info);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["method"], "tiered");
        assert_eq!(value["original_size"], 1000);
        assert_eq!(value["slot_count"], 1);
        assert_eq!(value["run_count"], 1);
        assert_eq!(value["streams"].as_array().unwrap().len(), 6);
        assert_eq!(value["streams"][1]["name"], "runs");
    }

    #[test]
    fn test_info_json_baseline_omits_counts() {
        let archive = Codec::from(MethodPolicy::Baseline).compress(b"banana").unwrap();
        let info = inspect(&archive).unwrap();
        let value = serde_json::to_value(InfoOutput::new(Path::new("b.kf"), &info)).unwrap();
        assert_eq!(value["method"], "baseline");
        assert_eq!(value["primary_index"], 3);
        assert!(value.get("slot_count").is_none());
    }
}
