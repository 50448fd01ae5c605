// ============================================================================
// File system utilities
// ============================================================================

pub mod fs {
    use anyhow::Result;
    use std::fs;
    use std::path::Path;

    /// Check if file has secure permissions (600 on Unix)
    #[cfg(unix)]
    pub fn has_secure_permissions(path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        if let Ok(metadata) = fs::metadata(path) {
            let mode = metadata.permissions().mode();
            (mode & 0o077) == 0 // Only owner has permissions
        } else {
            false
        }
    }

    #[cfg(not(unix))]
    pub fn has_secure_permissions(_path: &Path) -> bool {
        true // Not applicable on non-Unix systems
    }

    /// Set secure permissions (600 on Unix)
    #[cfg(unix)]
    pub fn set_secure_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn set_secure_permissions(_path: &Path) -> Result<()> {
        Ok(()) // Not applicable on non-Unix systems
    }

    /// Ensure `dir` exists with owner-only permissions (`0700` on Unix).
    pub fn ensure_dir_0700(dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(dir)?.permissions();
            perms.set_mode(0o700);
            fs::set_permissions(dir, perms)?;
        }
        Ok(())
    }

    /// Write `contents` to `path` via a sibling temp file plus rename, so a
    /// reader never observes a partially-written file. On Unix `mode` is the
    /// permission bits the temp file is *created* with (passed straight to
    /// `open(2)`), not applied afterwards — a separate `chmod` after `write`
    /// would leave the contents briefly readable at the default mode.
    pub fn atomic_write(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
        let tmp = path.with_extension("tmp");
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(mode)
                .open(&tmp)?;
            file.write_all(contents)?;
        }
        #[cfg(not(unix))]
        {
            let _ = mode;
            fs::write(&tmp, contents)?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::tempdir;

        #[test]
        fn atomic_write_leaves_no_temp_file_behind() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("manifest.enc");
            atomic_write(&path, b"ciphertext", 0o600).unwrap();
            assert_eq!(fs::read(&path).unwrap(), b"ciphertext");
            assert!(!path.with_extension("tmp").exists());
        }

        #[test]
        fn ensure_dir_0700_creates_missing_directory() {
            let dir = tempdir().unwrap();
            let nested = dir.path().join(".vaultenv");
            ensure_dir_0700(&nested).unwrap();
            assert!(nested.is_dir());
        }

        #[cfg(unix)]
        #[test]
        fn atomic_write_creates_file_at_requested_mode() {
            use std::os::unix::fs::PermissionsExt;
            let dir = tempdir().unwrap();
            let path = dir.path().join("key");
            atomic_write(&path, b"secret", 0o600).unwrap();
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
