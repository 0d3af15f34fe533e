use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use sha2::{Digest, Sha256};

use crate::error::UpdateError;

const RELEASE_URL: &str =
    "https://github.com/vorn003/SSHMenu/releases/latest/download/sshmenu_linux_amd64";
const TMP_NAME: &str = ".sshmenu_update_tmp";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Downloads the latest release next to the running executable, compares
/// content hashes and swaps the binary in with a rename only when they
/// differ. Identical hashes mean we are already current and the download
/// is discarded.
pub fn self_update() -> Result<(), UpdateError> {
    let exe_path =
        std::env::current_exe().map_err(io_error("Error determining executable path"))?;
    let tmp_path = exe_path
        .parent()
        .map(|dir| dir.join(TMP_NAME))
        .unwrap_or_else(|| PathBuf::from(TMP_NAME));

    println!("Downloading latest release...");
    let mut response = reqwest::blocking::get(RELEASE_URL)?;
    if content_type(&response).contains("text/html") {
        // A GitHub error or login page instead of the binary.
        return Err(UpdateError::HtmlPayload);
    }

    let mut tmp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(io_error("Error creating temporary file for update"))?;
    response.copy_to(&mut tmp_file)?;
    drop(tmp_file);
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o755))
            .map_err(io_error("Error marking update executable"))?;
    }

    if install_if_changed(&tmp_path, &exe_path)? {
        print!("Update complete. New version: ");
        let _ = io::stdout().flush();
        match Command::new(&exe_path).arg("--version").status() {
            Ok(status) if status.success() => {}
            _ => println!("(error running updated binary to show version)"),
        }
    } else {
        println!("No update needed, already on version: {VERSION}");
    }
    Ok(())
}

/// Compares content hashes and renames the download over the executable
/// only when they differ. An identical download is deleted instead.
/// Returns whether a replacement happened.
fn install_if_changed(tmp_path: &Path, exe_path: &Path) -> Result<bool, UpdateError> {
    let new_sum = sha256_file(tmp_path).map_err(io_error("Error hashing downloaded file"))?;
    let current_sum = sha256_file(exe_path).map_err(io_error("Error hashing executable"))?;

    if new_sum == current_sum {
        fs::remove_file(tmp_path).map_err(io_error("Error removing temporary file"))?;
        return Ok(false);
    }

    fs::rename(tmp_path, exe_path).map_err(io_error("Error replacing executable"))?;
    Ok(true)
}

fn content_type(response: &reqwest::blocking::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

fn io_error(context: &'static str) -> impl FnOnce(io::Error) -> UpdateError {
    move |source| UpdateError::Io { context, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_file_matches_known_digest() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(
            sha256_file(file.path()).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn identical_content_hashes_equal() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();
        assert_eq!(sha256_file(&a).unwrap(), sha256_file(&b).unwrap());
    }

    #[test]
    fn different_content_hashes_differ() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"old binary").unwrap();
        fs::write(&b, b"new binary").unwrap();
        assert_ne!(sha256_file(&a).unwrap(), sha256_file(&b).unwrap());
    }

    #[test]
    fn identical_download_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("sshmenu");
        let tmp = dir.path().join(TMP_NAME);
        fs::write(&exe, b"binary v1").unwrap();
        fs::write(&tmp, b"binary v1").unwrap();
        assert!(!install_if_changed(&tmp, &exe).unwrap());
        assert!(!tmp.exists());
        assert_eq!(fs::read(&exe).unwrap(), b"binary v1");
    }

    #[test]
    fn changed_download_replaces_executable() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("sshmenu");
        let tmp = dir.path().join(TMP_NAME);
        fs::write(&exe, b"binary v1").unwrap();
        fs::write(&tmp, b"binary v2").unwrap();
        assert!(install_if_changed(&tmp, &exe).unwrap());
        assert!(!tmp.exists());
        assert_eq!(fs::read(&exe).unwrap(), b"binary v2");
    }
}
