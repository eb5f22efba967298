//! Write an installer script without a server.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use deskwrap_core::{generate_installer, TargetOs};

/// Run the installer command.
pub fn run(name: &str, url: &str, os: &str, output: &Path) -> Result<()> {
    let path = write_installer(name, url, os.parse()?, output)?;
    tracing::info!("Wrote {}", path.display());
    println!("{}", path.display());
    Ok(())
}

/// Render the script for `os` into `output`, returning its path.
fn write_installer(name: &str, url: &str, os: TargetOs, output: &Path) -> Result<PathBuf> {
    let script = generate_installer(name, url, os)?;

    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let path = output.join(&script.file_name);
    fs::write(&path, script.body)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    if os != TargetOs::Windows {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to mark {} executable", path.display()))?;
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_script_named_after_app() {
        let temp = tempdir().unwrap();

        let path = write_installer("My App", "https://myapp.com", TargetOs::Linux, temp.path()).unwrap();

        assert_eq!(path, temp.path().join("my-app-installer.sh"));
        let body = fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("#!"));
        assert!(body.contains("https://myapp.com"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn windows_script_uses_bat_extension() {
        let temp = tempdir().unwrap();

        let path = write_installer("My App", "https://myapp.com", TargetOs::Windows, temp.path()).unwrap();

        assert_eq!(path.extension().unwrap(), "bat");
    }

    #[test]
    fn rejects_unknown_os_and_bad_url() {
        let temp = tempdir().unwrap();

        assert!(run("My App", "https://myapp.com", "beos", temp.path()).is_err());
        assert!(write_installer("My App", "ftp://myapp.com", TargetOs::Macos, temp.path()).is_err());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
