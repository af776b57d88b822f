// Scoped Temp Artifact
// Transient on-disk artifact released on every exit path

use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// A uniquely-named temporary file holding one analysis call's staged bytes.
///
/// The file carries the source extension so downstream format probing can use
/// it, and is deleted when the artifact drops — on success, early return, and
/// panic unwind alike. Artifacts are exclusively owned by the call that
/// created them; never shared, never reused.
pub struct TempArtifact {
    file: NamedTempFile,
}

impl TempArtifact {
    pub fn write(bytes: &[u8], extension: Option<&str>) -> std::io::Result<Self> {
        let mut builder = Builder::new();
        builder.prefix("synthscan-");

        let suffix = extension.map(|ext| format!(".{}", ext.trim_start_matches('.')));
        if let Some(suffix) = suffix.as_deref() {
            builder.suffix(suffix);
        }

        let mut file = builder.tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_artifact_holds_bytes_while_alive() {
        let artifact = TempArtifact::write(b"RIFF....", Some("wav")).unwrap();
        assert!(artifact.path().exists());
        assert_eq!(std::fs::read(artifact.path()).unwrap(), b"RIFF....");
    }

    #[test]
    fn test_artifact_carries_source_extension() {
        let artifact = TempArtifact::write(b"x", Some(".mp3")).unwrap();
        assert_eq!(
            artifact.path().extension().and_then(|e| e.to_str()),
            Some("mp3")
        );
    }

    #[test]
    fn test_artifact_removed_on_drop() {
        let path: PathBuf;
        {
            let artifact = TempArtifact::write(b"bytes", None).unwrap();
            path = artifact.path().to_path_buf();
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_artifact_removed_on_panic_unwind() {
        let path = std::sync::Arc::new(std::sync::Mutex::new(PathBuf::new()));
        let seen = std::sync::Arc::clone(&path);

        let result = std::panic::catch_unwind(move || {
            let artifact = TempArtifact::write(b"bytes", Some("wav")).unwrap();
            *seen.lock().unwrap() = artifact.path().to_path_buf();
            panic!("simulated analyzer failure");
        });

        assert!(result.is_err());
        assert!(!path.lock().unwrap().exists());
    }
}
