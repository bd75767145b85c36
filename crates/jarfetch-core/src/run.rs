//! One post-build run: read the descriptor, then download the artifact.
//!
//! Any failure ends the run; nothing is retried.

use crate::config::{FetchConfig, DESCRIPTOR_PATH, DESTINATION_PATH};
use crate::descriptor::Descriptor;
use crate::error::Result;
use crate::fetch::{self, FetchReport};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Directory the fixed descriptor and destination paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDir {
    root: PathBuf,
}

impl ProjectDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The process working directory.
    pub fn current() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(DESCRIPTOR_PATH)
    }

    pub fn destination_path(&self) -> PathBuf {
        self.root.join(DESTINATION_PATH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadDescriptor,
    Download,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::ReadDescriptor => write!(f, "read-descriptor"),
            Stage::Download => write!(f, "download"),
        }
    }
}

/// Read the descriptor under `project` and return the download URL it points at.
/// No network access.
pub fn resolve_url(project: &ProjectDir) -> Result<String> {
    let descriptor = Descriptor::read(&project.descriptor_path())?;
    Ok(fetch::artifact_url(&descriptor.base_url, &descriptor.version))
}

/// Read the descriptor, then download the artifact to the destination path.
pub fn run(project: &ProjectDir, cfg: &FetchConfig) -> Result<FetchReport> {
    tracing::info!(
        "running post-extract plugin download in {}",
        project.root().display()
    );

    tracing::debug!(stage = %Stage::ReadDescriptor, "entering stage");
    let url = resolve_url(project)?;

    tracing::debug!(stage = %Stage::Download, "entering stage");
    let report = fetch::fetch_artifact(&url, &project.destination_path(), cfg)?;

    tracing::info!(
        "download successful: {} bytes written to {}",
        report.bytes_written,
        report.destination.display()
    );
    Ok(report)
}

/// Process exit code for the outcome of a run.
pub fn exit_code<T, E>(result: &std::result::Result<T, E>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}
