use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use tempfile::{tempdir, TempDir};
use thiserror::Error;
use zip::ZipArchive;

/// Branch fetched from a remote repository when none is given.
pub const DEFAULT_BRANCH: &str = "master";

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Input directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("A .zip file is required, got {}", .0.display())]
    NotAnArchive(PathBuf),
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Failed to download {url}: {reason}")]
    Http { url: String, reason: String },
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not read archive {}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
}

/// Where function configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A local function-app directory, used in place.
    Directory(PathBuf),
    /// A local `.zip` archive of a function app.
    ZipArchive(PathBuf),
    /// A repository whose `<url>/archive/<branch>.zip` is downloaded.
    RemoteRepository { url: String, branch: String },
}

/// A local directory tree ready for discovery.
///
/// For archive sources the tree lives in a temporary directory that is
/// removed when this value is dropped.
#[derive(Debug)]
pub struct AcquiredInput {
    root: PathBuf,
    workspace: Option<TempDir>,
}

impl AcquiredInput {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_temporary(&self) -> bool {
        self.workspace.is_some()
    }
}

/// Resolves an [`InputSource`] into a local directory.
#[derive(Debug, Clone)]
pub struct Acquirer {
    pub timeout: Duration,
}

impl Default for Acquirer {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(60) }
    }
}

impl Acquirer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn acquire(&self, source: &InputSource) -> Result<AcquiredInput, AcquisitionError> {
        match source {
            InputSource::Directory(dir) => {
                if !dir.is_dir() {
                    return Err(AcquisitionError::MissingDirectory(dir.clone()));
                }
                Ok(AcquiredInput { root: dir.clone(), workspace: None })
            }
            InputSource::ZipArchive(path) => {
                if !is_zip_path(path) {
                    return Err(AcquisitionError::NotAnArchive(path.clone()));
                }
                extract_to_temp(path)
            }
            InputSource::RemoteRepository { url, branch } => {
                let archive_url = archive_url(url, branch)?;
                let workspace = new_workspace()?;
                let archive_path = workspace.path().join("repository.zip");
                self.download(&archive_url, &archive_path)?;
                let root = workspace.path().join("extracted");
                extract_zip(&archive_path, &root)?;
                Ok(AcquiredInput { root, workspace: Some(workspace) })
            }
        }
    }

    fn download(&self, url: &Url, dest: &Path) -> Result<(), AcquisitionError> {
        let http_error =
            |reason: String| AcquisitionError::Http { url: url.to_string(), reason };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| http_error(e.to_string()))?;
        let response = client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| http_error(e.to_string()))?;
        let body = response.bytes().map_err(|e| http_error(e.to_string()))?;

        let io_error =
            |source: std::io::Error| AcquisitionError::Io { path: dest.to_path_buf(), source };
        let mut file = File::create(dest).map_err(io_error)?;
        file.write_all(&body).map_err(io_error)?;

        tracing::info!(url = %url, bytes = body.len(), "downloaded repository archive");
        Ok(())
    }
}

/// `<repo>/archive/<branch>.zip`, rejecting anything that is not http(s).
pub fn archive_url(repo_url: &str, branch: &str) -> Result<Url, AcquisitionError> {
    let invalid =
        |reason: String| AcquisitionError::InvalidUrl { url: repo_url.to_string(), reason };

    let parsed = Url::parse(repo_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if branch.is_empty() || branch.contains(['/', '\\']) {
        return Err(invalid(format!("invalid branch '{branch}'")));
    }

    let base = repo_url.trim_end_matches('/');
    Url::parse(&format!("{base}/archive/{branch}.zip")).map_err(|e| invalid(e.to_string()))
}

fn is_zip_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

fn new_workspace() -> Result<TempDir, AcquisitionError> {
    tempdir().map_err(|source| AcquisitionError::Io { path: std::env::temp_dir(), source })
}

fn extract_to_temp(archive: &Path) -> Result<AcquiredInput, AcquisitionError> {
    let workspace = new_workspace()?;
    let root = workspace.path().to_path_buf();
    extract_zip(archive, &root)?;
    Ok(AcquiredInput { root, workspace: Some(workspace) })
}

/// Unpack `archive` into `dest`. Entries escaping `dest` are skipped by `zip`.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<(), AcquisitionError> {
    let file = File::open(archive)
        .map_err(|source| AcquisitionError::Io { path: archive.to_path_buf(), source })?;
    let mut zip = ZipArchive::new(file)
        .map_err(|source| AcquisitionError::Archive { path: archive.to_path_buf(), source })?;
    tracing::debug!(
        archive = %archive.display(),
        entries = zip.len(),
        dest = %dest.display(),
        "extracting archive"
    );
    zip.extract(dest)
        .map_err(|source| AcquisitionError::Archive { path: archive.to_path_buf(), source })?;
    Ok(())
}
