//! JSON file output shared by the batch tools

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static TEMP_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Hidden, per-call unique sibling of `path` used to stage a write
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), seq))
}

fn serialize_to<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    writer.flush()
}

/// Write `value` as 4-space indented JSON, leaving non-ASCII text unescaped.
///
/// The file appears at `path` only once fully written; concurrent writers of
/// the same path each replace it with a complete document.
pub fn write_pretty<T: Serialize>(path: &Path, value: &T) -> std::io::Result<()> {
    let temp_path = temp_sibling(path);

    // Atomic replace
    let written = serialize_to(&temp_path, value).and_then(|_| fs::rename(&temp_path, path));
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_pretty_keeps_unicode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_pretty(&path, &serde_json::json!({ "comments": ["设置 x"] })).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("设置 x"));
        assert!(text.contains("\n    \"comments\""));
    }

    #[test]
    fn test_write_pretty_replaces_without_leftovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "{ \"partial\": [").unwrap();

        write_pretty(&path, &serde_json::json!({ "classes": ["A"] })).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["classes"], serde_json::json!(["A"]));
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        assert!(write_pretty(&path, &serde_json::json!([])).is_err());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_temp_siblings_are_unique_and_hidden() {
        let path = Path::new("out/2020-01/a_2020_01.json");
        let first = temp_sibling(path);
        let second = temp_sibling(path);

        assert_ne!(first, second);
        assert_eq!(first.parent(), path.parent());
        let name = first.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".a_2020_01.json."));
        assert!(name.ends_with(".tmp"));
    }
}
