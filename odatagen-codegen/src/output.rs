//! Artifact writing.

use crate::error::CodegenError;
use crate::rust::naming::module_ident;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Derives the module name from a directory's final path segment.
///
/// Relative paths are made absolute first, so `.` names the current
/// directory.
///
/// # Errors
/// Returns `CodegenError::InvalidOutputPath` if the path has no usable
/// final segment, or `CodegenError::Io` if it cannot be made absolute.
pub fn module_name_for(dir: &Path) -> Result<String, CodegenError> {
    let absolute = match std::fs::canonicalize(dir) {
        Ok(path) => path,
        Err(_) => std::path::absolute(dir)?,
    };

    let segment = absolute
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CodegenError::InvalidOutputPath {
            path: absolute.clone(),
        })?;

    Ok(module_ident(segment))
}

/// Writes `contents` to `path` through a sibling temporary file.
///
/// # Errors
/// Returns `CodegenError::Io` if writing or renaming fails.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), CodegenError> {
    let tmp_path = temp_path_for(path);

    std::fs::write(&tmp_path, contents)?;
    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err.into());
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name_from_directory() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let target = dir.path().join("trippin-models");
        std::fs::create_dir(&target).expect("Failed to create dir");

        let module = module_name_for(&target).expect("module name");
        assert_eq!(module, "trippin_models");
    }

    #[test]
    fn test_module_name_for_missing_directory() {
        let module = module_name_for(Path::new("/nonexistent/odata/TripPin")).expect("module name");
        assert_eq!(module, "trip_pin");
    }

    #[test]
    fn test_root_has_no_module_name() {
        let result = module_name_for(Path::new("/"));
        assert!(matches!(result, Err(CodegenError::InvalidOutputPath { .. })));
    }

    #[test]
    fn test_write_atomic() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("model_definitions.rs");

        write_atomic(&path, "first").expect("first write");
        write_atomic(&path, "second").expect("second write");

        assert_eq!(std::fs::read_to_string(&path).expect("read back"), "second");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing").join("model_definitions.rs");

        let result = write_atomic(&path, "text");
        assert!(matches!(result, Err(CodegenError::Io(_))));
    }
}
