//! Artifact codec: scoped, self-describing binary persistence for the two
//! derived artifacts (inverted index, corpus counter).
//!
//! Encoding: 4-byte magic + 4-byte little-endian format version + a
//! MessagePack payload. Saves are atomic (write to a temp file, `fsync`,
//! rename over the target); loads surface any header mismatch or decode
//! failure as an [`ArtifactCause`] so the caller can fall back to recovery.
//!
//! A single process-wide lock serializes every artifact open/close so
//! concurrent saves/loads of distinct artifacts can't interleave and
//! corrupt on-disk state (design §5).

use crate::error::{ArtifactCause, DocuError, Result};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use std::io::Write;
use std::path::Path;

const MAGIC: &[u8; 4] = b"DOCS";
const FORMAT_VERSION: u32 = 1;

static ARTIFACT_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Encode `value` and atomically replace the file at `path`.
pub fn save_struct<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let _guard = ARTIFACT_LOCK.lock();

    let payload = rmp_serde::to_vec(value).map_err(|e| DocuError::ArtifactError {
        path: path.to_path_buf(),
        source: ArtifactCause::Encode(e),
    })?;

    let mut buf = Vec::with_capacity(8 + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&payload);

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let tmp_path = path.with_extension("tmp");
    {
        let mut file = std::fs::File::create(&tmp_path)?;
        file.write_all(&buf)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Decode the file at `path` into a `T`.
///
/// Any failure — missing file, bad magic, unsupported version, or a
/// MessagePack decode error — is surfaced as [`DocuError::ArtifactError`].
pub fn load_struct<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let _guard = ARTIFACT_LOCK.lock();

    let buf = std::fs::read(path).map_err(|e| DocuError::ArtifactError {
        path: path.to_path_buf(),
        source: ArtifactCause::Io(e),
    })?;

    if buf.len() < 8 {
        return Err(DocuError::ArtifactError {
            path: path.to_path_buf(),
            source: ArtifactCause::BadHeader("artifact too small".to_string()),
        });
    }
    if &buf[0..4] != MAGIC {
        return Err(DocuError::ArtifactError {
            path: path.to_path_buf(),
            source: ArtifactCause::BadHeader("bad artifact magic".to_string()),
        });
    }
    let version = u32::from_le_bytes(buf[4..8].try_into().unwrap());
    if version != FORMAT_VERSION {
        return Err(DocuError::ArtifactError {
            path: path.to_path_buf(),
            source: ArtifactCause::BadHeader(format!("unsupported artifact version {version}")),
        });
    }

    rmp_serde::from_slice(&buf[8..]).map_err(|e| DocuError::ArtifactError {
        path: path.to_path_buf(),
        source: ArtifactCause::Decode(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        a: u64,
        b: Vec<String>,
    }

    #[test]
    fn round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.bin");
        let value = Sample {
            a: 42,
            b: vec!["x".to_string(), "y".to_string()],
        };
        save_struct(&path, &value).unwrap();
        let loaded: Sample = load_struct(&path).unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, b"XXXX\x01\x00\x00\x00").unwrap();
        let result: Result<Sample> = load_struct(&path);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.bin");
        std::fs::write(&path, b"DOC").unwrap();
        let result: Result<Sample> = load_struct(&path);
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_an_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        let result: Result<Sample> = load_struct(&path);
        assert!(matches!(result, Err(DocuError::ArtifactError { .. })));
    }
}
