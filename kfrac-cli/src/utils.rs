//! Utility functions for the CLI.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Archive file extension.
pub const ARCHIVE_EXTENSION: &str = "kf";

/// Default archive path: `<input>.kf`.
pub fn default_archive_path(input: &Path) -> PathBuf {
    append_extension(input, ARCHIVE_EXTENSION)
}

/// Default restore path: the archive path without `.kf`, or `<archive>.out`.
pub fn default_output_path(archive: &Path) -> PathBuf {
    match archive.extension() {
        Some(ext) if ext == ARCHIVE_EXTENSION && archive.file_stem().is_some() => {
            archive.with_extension("")
        }
        _ => append_extension(archive, "out"),
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Write `data` to `path`, refusing to replace an existing file unless
/// `force` is set.
pub fn write_output(path: &Path, data: &[u8], force: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            io::Error::new(
                e.kind(),
                format!("{} already exists (use --force to overwrite)", path.display()),
            )
        } else {
            e
        }
    })?;
    file.write_all(data)?;
    file.flush()
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_archive_path() {
        assert_eq!(
            default_archive_path(Path::new("notes.txt")),
            PathBuf::from("notes.txt.kf")
        );
        assert_eq!(
            default_archive_path(Path::new("dir/data")),
            PathBuf::from("dir/data.kf")
        );
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("notes.txt.kf")),
            PathBuf::from("notes.txt")
        );
        assert_eq!(
            default_output_path(Path::new("archive.bin")),
            PathBuf::from("archive.bin.out")
        );
        assert_eq!(
            default_output_path(Path::new("plain")),
            PathBuf::from("plain.out")
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn test_write_output_refuses_overwrite() {
        let dir = std::env::temp_dir().join(format!("kfrac-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.bin");
        let _ = std::fs::remove_file(&path);

        write_output(&path, b"first", false).unwrap();
        let err = write_output(&path, b"second", false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_output(&path, b"second", true).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
