use std::path::PathBuf;

use thiserror::Error;

/// Loading the YAML config failed. Fatal: the caller prints this and
/// exits with status 1, there is no fallback configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not open {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("Downloaded file is HTML, not a binary. Check the release URL or authentication.")]
    HtmlPayload,
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        source: std::io::Error,
    },
}

impl UpdateError {
    /// A broken/redirected release URL gets its own exit code so scripts
    /// can tell it apart from ordinary I/O failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            UpdateError::HtmlPayload => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_payload_has_distinct_exit_code() {
        assert_eq!(UpdateError::HtmlPayload.exit_code(), 2);
        let io = UpdateError::Io {
            context: "error replacing executable",
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(io.exit_code(), 1);
    }
}
