//! Decompress command implementation.

use crate::utils::{default_output_path, format_size, write_output};
use kfrac_codec::{Codec, Config};
use log::info;
use std::path::Path;

pub fn cmd_decompress(
    archive: &Path,
    output: Option<&Path>,
    force: bool,
    max_output: usize,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(archive)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(archive));

    let codec = Codec::new(Config::new().with_max_output_len(max_output));
    let restored = codec.decompress(&data)?;
    info!("Checksum verified for {} bytes", restored.len());

    write_output(&output, &restored, force)?;

    if !quiet {
        println!(
            "{} -> {} ({})",
            archive.display(),
            output.display(),
            format_size(restored.len() as u64)
        );
    }
    Ok(())
}
