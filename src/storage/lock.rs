//! Detection of ledger files held by another program
//!
//! The tool never locks the ledger itself. It only detects that an office
//! application has it open, either through the owner lock file the
//! application leaves beside the workbook or through the operating system
//! refusing an exclusive read/write open.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{BillError, BillResult};

/// Owner lock files office applications create beside an open workbook
///
/// Excel writes `~$<name>` (and `~$` over the first two characters for some
/// versions); LibreOffice writes `.~lock.<name>#`.
pub fn owner_lock_candidates(path: &Path) -> Vec<PathBuf> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    let dir = path.parent().unwrap_or_else(|| Path::new(""));

    let mut candidates = vec![
        dir.join(format!("~${}", name)),
        dir.join(format!(".~lock.{}#", name)),
    ];
    if let Some(rest) = name.get(2..).filter(|r| !r.is_empty()) {
        candidates.push(dir.join(format!("~${}", rest)));
    }
    candidates
}

/// First owner lock file present beside the ledger
pub fn find_owner_lock(path: &Path) -> Option<PathBuf> {
    owner_lock_candidates(path)
        .into_iter()
        .find(|candidate| candidate.is_file())
}

/// Whether an open failure means another process holds the file
pub fn is_lock_violation(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }

    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(32) | Some(33)) {
        return true;
    }

    false
}

/// Map a failure to open or replace the ledger onto the error kinds the
/// user sees
pub fn classify_open_error(path: &Path, err: io::Error) -> BillError {
    if err.kind() == io::ErrorKind::NotFound {
        BillError::ledger_not_found(path)
    } else if is_lock_violation(&err) {
        warn!(path = %path.display(), error = %err, "ledger refused exclusive open");
        BillError::ledger_locked(path)
    } else {
        BillError::Io(format!("Failed to open {}: {}", path.display(), err))
    }
}

/// Check that the ledger exists and no other program holds it
///
/// Never creates the file.
pub fn ensure_available(path: &Path) -> BillResult<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(BillError::Io(format!(
                "Ledger path {} is not a file",
                path.display()
            )))
        }
        Err(err) => return Err(classify_open_error(path, err)),
    }

    if let Some(lock) = find_owner_lock(path) {
        warn!(
            path = %path.display(),
            lock_file = %lock.display(),
            "ledger is open in another program"
        );
        return Err(BillError::ledger_locked(path));
    }

    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|err| classify_open_error(path, err))?;

    debug!(path = %path.display(), "ledger is available");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("my_bills.xlsx");

        let err = ensure_available(&path).unwrap_err();
        assert!(err.is_not_found());
        assert!(!path.exists());
    }

    #[test]
    fn test_plain_file_is_available() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("my_bills.xlsx");
        fs::write(&path, b"data").unwrap();

        ensure_available(&path).unwrap();
    }

    #[test]
    fn test_excel_owner_file_means_locked() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("my_bills.xlsx");
        fs::write(&path, b"data").unwrap();
        fs::write(temp_dir.path().join("~$my_bills.xlsx"), b"owner").unwrap();

        let err = ensure_available(&path).unwrap_err();
        assert!(matches!(err, BillError::LedgerLocked { .. }));
    }

    #[test]
    fn test_libreoffice_lock_file_means_locked() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("my_bills.xlsx");
        fs::write(&path, b"data").unwrap();
        fs::write(temp_dir.path().join(".~lock.my_bills.xlsx#"), b"owner").unwrap();

        assert!(ensure_available(&path).unwrap_err().is_retryable());
    }

    #[test]
    fn test_directory_is_not_a_ledger() {
        let temp_dir = TempDir::new().unwrap();
        let err = ensure_available(temp_dir.path()).unwrap_err();
        assert!(matches!(err, BillError::Io(_)));
    }

    #[test]
    fn test_classify_open_error() {
        let path = Path::new("my_bills.xlsx");

        let err = classify_open_error(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());

        let err = classify_open_error(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, BillError::LedgerLocked { .. }));

        let err = classify_open_error(path, io::Error::new(io::ErrorKind::Other, "disk on fire"));
        assert!(matches!(err, BillError::Io(_)));
    }

    #[test]
    fn test_owner_lock_candidates() {
        let candidates = owner_lock_candidates(Path::new("/data/my_bills.xlsx"));
        assert!(candidates.contains(&PathBuf::from("/data/~$my_bills.xlsx")));
        assert!(candidates.contains(&PathBuf::from("/data/.~lock.my_bills.xlsx#")));
        assert!(candidates.contains(&PathBuf::from("/data/~$_bills.xlsx")));
    }
}
