//! # Run Context
//!
//! Execution metadata of the pipeline run: run name, directories, container
//! engine, profile. The summary builder reports these as the leading "core
//! options" group and resolves directory placeholders in schema defaults
//! against them.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::document::read_structured;
use crate::error::ParamError;

/// Execution context of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunContext {
    /// Pipeline revision, if a specific one was requested.
    pub revision: Option<String>,
    /// Unique run name.
    pub run_name: String,
    /// Container engine in use (`docker`, `singularity`, ...).
    pub container_engine: Option<String>,
    /// Container image, when a single one is configured.
    pub container: Option<String>,
    /// Directory the run was launched from.
    pub launch_dir: PathBuf,
    /// Scratch directory for task execution.
    pub work_dir: PathBuf,
    /// Directory containing the pipeline sources.
    pub project_dir: PathBuf,
    /// User who launched the run.
    pub user_name: String,
    /// Active configuration profile(s).
    pub profile: String,
    /// Configuration files loaded for the run.
    pub config_files: Vec<PathBuf>,
}

impl RunContext {
    /// Load a run context from a YAML or JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ParamError> {
        read_structured(path).map_err(|reason| ParamError::ConfigLoad {
            path: path.display().to_string(),
            reason,
        })
    }

    /// Build a context for the current process: launch and project
    /// directories default to the current directory, the work directory to
    /// `work/` beneath it.
    pub fn current(project_dir: impl Into<PathBuf>) -> Self {
        let launch_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            work_dir: launch_dir.join("work"),
            user_name: std::env::var("USER").unwrap_or_default(),
            profile: "standard".to_string(),
            project_dir: project_dir.into(),
            launch_dir,
            ..Self::default()
        }
    }
}
