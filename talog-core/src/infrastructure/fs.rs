use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read a whole UTF-8 file, keeping the path in the error.
pub fn read_text(path: impl AsRef<Path>) -> Result<String, InfrastructureError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| InfrastructureError::io(path, e))
}

/// Write content to a file atomically using a temporary file.
///
/// The temporary file lives in the target's directory so the final rename
/// never crosses filesystems. Readers see either the old content or the new
/// content, never a partial write.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp_file =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| InfrastructureError::io(parent, e))?;

    temp_file
        .write_all(content.as_ref())
        .map_err(|e| InfrastructureError::io(path, e))?;

    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::io(path, e.error))?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("params.yaml");

        atomic_write(&file_path, "x: 1\n")?;

        assert_eq!(read_text(&file_path)?, "x: 1\n");
        Ok(())
    }

    #[test]
    fn test_atomic_write_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("params.yaml");

        atomic_write(&file_path, "Initial")?;
        atomic_write(&file_path, "Updated")?;

        assert_eq!(read_text(&file_path)?, "Updated");
        Ok(())
    }

    #[test]
    fn test_read_text_reports_path() {
        let err = read_text("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
