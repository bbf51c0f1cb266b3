//! Policy document output

use crate::error::{PlatformError, Result};
use proxifier_core::store;
use std::path::Path;
use tracing::debug;

/// Replace the policy document at `path`
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(PlatformError::InvalidOutput("empty path".into()));
    }

    store::write_atomic(path, contents).map_err(|source| PlatformError::Write {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), bytes = contents.len(), "Wrote policy document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            write_atomic(Path::new(""), b"x"),
            Err(PlatformError::InvalidOutput(_))
        ));
    }

    #[test]
    fn test_blocked_parent_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let target = blocker.join("proxy.pac");
        match write_atomic(&target, b"x") {
            Err(PlatformError::Write { path, .. }) => assert_eq!(path, target.display().to_string()),
            other => panic!("Wrong result: {other:?}"),
        }
    }
}
