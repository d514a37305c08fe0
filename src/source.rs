//! Turning the user's argument into a directory to walk.
//!
//! An argument is either a URL on a known hosting service or a local
//! directory. Remote repositories are cloned into a temporary directory that
//! lives exactly as long as the [`Workspace`] holding it.

use crate::error::{ProjcatError, Result};
use crate::options::ProjcatOptions;
use crate::types::ProjectSnapshot;
use crate::walker::snapshot;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
#[cfg(feature = "logging")]
use tracing;

/// Hosts whose URLs are treated as repositories to clone.
pub const KNOWN_HOSTS: &[&str] = &[
    "github.com",
    "www.github.com",
    "gitlab.com",
    "www.gitlab.com",
    "bitbucket.org",
];

/// A repository on a known hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    /// The URL as given, passed to the fetcher unchanged.
    pub url: String,
    /// Last path segment without `.git`; used as the checkout directory name.
    pub name: String,
}

impl RemoteRepo {
    /// Recognizes `http(s)://<known host>/.../<name>[.git]`.
    pub fn parse(input: &str) -> Option<Self> {
        let url = input.trim();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))?;
        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let host = host.split(':').next().unwrap_or(host);
        if !KNOWN_HOSTS.iter().any(|known| known.eq_ignore_ascii_case(host)) {
            return None;
        }
        let path = path.split(['?', '#']).next().unwrap_or("");
        let last = path.trim_end_matches('/').rsplit('/').next()?;
        let name = last.strip_suffix(".git").unwrap_or(last);
        if name.is_empty() || name == "." || name == ".." {
            return None;
        }
        Some(Self {
            url: url.to_string(),
            name: name.to_string(),
        })
    }
}

/// Where the project comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Local(PathBuf),
    Remote(RemoteRepo),
}

impl InputSource {
    /// Classifies `raw`. URLs are checked before the filesystem.
    ///
    /// # Errors
    ///
    /// [`ProjcatError::InvalidInput`] when `raw` is neither a recognized
    /// repository URL nor an existing directory.
    pub fn parse(raw: &str) -> Result<Self> {
        if let Some(repo) = RemoteRepo::parse(raw) {
            return Ok(InputSource::Remote(repo));
        }
        let path = PathBuf::from(raw);
        if path.is_dir() {
            Ok(InputSource::Local(path))
        } else {
            Err(ProjcatError::InvalidInput(raw.to_string()))
        }
    }

    /// Like [`InputSource::parse`], but a missing or blank value is
    /// [`ProjcatError::MissingInput`].
    pub fn resolve(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(value) if !value.is_empty() => Self::parse(value),
            _ => Err(ProjcatError::MissingInput),
        }
    }
}

/// Materializes a remote repository into a local directory.
pub trait RepoFetcher {
    /// Populates `dest` (which does not exist yet) with a working copy of
    /// the repository's default branch.
    fn fetch(&self, repo: &RemoteRepo, dest: &Path) -> Result<()>;
}

/// Fetches by running `git clone --depth 1`.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl GitCli {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl RepoFetcher for GitCli {
    fn fetch(&self, repo: &RemoteRepo, dest: &Path) -> Result<()> {
        #[cfg(feature = "logging")]
        tracing::info!("Cloning repository from {}...", repo.url);
        let output = Command::new(&self.program)
            .args(["clone", "--depth", "1", "--quiet"])
            .arg(&repo.url)
            .arg(dest)
            .output()
            .map_err(|e| {
                ProjcatError::RemoteFetch(format!(
                    "could not run {}: {}",
                    self.program.to_string_lossy(),
                    e
                ))
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProjcatError::RemoteFetch(format!(
                "git clone {} failed: {}",
                repo.url,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// The directory a run walks. A remote checkout is removed when this is
/// dropped, whether the run succeeded or not.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    checkout: Option<TempDir>,
}

impl Workspace {
    pub fn materialize(source: &InputSource, fetcher: &dyn RepoFetcher) -> Result<Self> {
        match source {
            InputSource::Local(path) => Ok(Self {
                root: path.clone(),
                checkout: None,
            }),
            InputSource::Remote(repo) => {
                let checkout = tempfile::Builder::new()
                    .prefix("projcat-")
                    .tempdir()
                    .map_err(|e| ProjcatError::io(std::env::temp_dir(), e))?;
                let root = checkout.path().join(&repo.name);
                fetcher.fetch(repo, &root)?;
                if !root.is_dir() {
                    return Err(ProjcatError::RemoteFetch(format!(
                        "no checkout was produced for {}",
                        repo.url
                    )));
                }
                #[cfg(feature = "logging")]
                tracing::debug!("Checked out {} into {}", repo.url, root.display());
                Ok(Self {
                    root,
                    checkout: Some(checkout),
                })
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True when the root is a temporary checkout.
    pub fn is_temporary(&self) -> bool {
        self.checkout.is_some()
    }
}

/// Materializes `source`, walks it with `options` (whose `root` is replaced),
/// and releases any temporary checkout before returning.
pub fn snapshot_source(
    source: &InputSource,
    mut options: ProjcatOptions,
    fetcher: &dyn RepoFetcher,
) -> Result<ProjectSnapshot> {
    let workspace = Workspace::materialize(source, fetcher)?;
    #[cfg(feature = "logging")]
    tracing::debug!(
        "Workspace {} (temporary: {})",
        workspace.root().display(),
        workspace.is_temporary()
    );
    options.root = workspace.root().to_path_buf();
    snapshot(&options)
}
