use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::Result;
use log::*;
use walkdir::WalkDir;


/// A precondition that failed before any generator invocation. Each variant
/// carries the path that was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    MissingDirectory(PathBuf),
    MissingExecutable(PathBuf),
    NoInputFiles(PathBuf),
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreconditionError::MissingDirectory(path) => {
                write!(f, "directory '{}' does not exist", path.display())
            }
            PreconditionError::MissingExecutable(path) => {
                write!(f, "generator executable '{}' does not exist", path.display())
            }
            PreconditionError::NoInputFiles(path) => {
                write!(f, "no .proto files found in '{}'", path.display())
            }
        }
    }
}

impl std::error::Error for PreconditionError {}

/// Outcome of one run: how many files were attempted and how many of those
/// invocations exited non-zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub failed: usize,
}

pub struct Generator {
    proto_dir: PathBuf,
    protoc: PathBuf,
    out_dir: PathBuf,
}

impl Generator {
    pub fn new(proto_dir: PathBuf, protoc: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            proto_dir,
            protoc,
            out_dir,
        }
    }

    /// Checks the preconditions and lists the .proto files. Called once per
    /// run; the returned set is fixed for the rest of the run.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.proto_dir.is_dir() {
            return Err(PreconditionError::MissingDirectory(self.proto_dir.clone()).into());
        }
        if !self.protoc.is_file() {
            return Err(PreconditionError::MissingExecutable(self.protoc.clone()).into());
        }

        let mut protos = Vec::new();
        for entry in WalkDir::new(&self.proto_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "proto")
            {
                protos.push(entry.path().to_path_buf());
            }
        }

        if protos.is_empty() {
            return Err(PreconditionError::NoInputFiles(self.proto_dir.clone()).into());
        }

        Ok(protos)
    }

    fn invoke(&self, proto: &Path) -> std::io::Result<Output> {
        Command::new(&self.protoc)
            .arg(format!("--proto_path={}", self.proto_dir.display()))
            .arg(format!("--nanopb_out={}", self.out_dir.display()))
            .arg(proto)
            .output()
    }

    /// Runs the generator over every discovered file, in listing order, one
    /// invocation at a time. A non-zero exit from the generator is logged and
    /// counted but never aborts the batch.
    pub fn run(&self) -> Result<RunSummary> {
        let protos = self.discover()?;

        let mut summary = RunSummary::default();
        for proto in &protos {
            info!(
                "Running: {} --proto_path={} --nanopb_out={} {}",
                self.protoc.display(),
                self.proto_dir.display(),
                self.out_dir.display(),
                proto.display()
            );

            summary.attempted += 1;
            let output = self.invoke(proto)?;
            if output.status.success() {
                info!("{}", String::from_utf8_lossy(&output.stdout));
            } else {
                error!(
                    "Error generating files for {}: {}",
                    proto.display(),
                    String::from_utf8_lossy(&output.stderr)
                );
                summary.failed += 1;
            }
        }

        Ok(summary)
    }
}
