//! Sequential mutation-tool runner.
//!
//! # Responsibilities
//! - Run `init`, optional `baseline`, `exec` and `dump` in order
//! - Block on each step; abort on the first failure
//! - Capture the `dump` step's stdout into the dump file

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::config::schema::MutationConfig;

/// One tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: &'static str,
    pub args: Vec<String>,
    /// File receiving stdout, if captured.
    pub capture: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("step '{step}' could not start: {source}")]
    Spawn {
        step: &'static str,
        source: std::io::Error,
    },
    #[error("step '{step}' failed with {status}: {stderr}")]
    Failed {
        step: &'static str,
        status: String,
        stderr: String,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Drives the external mutation tool.
#[derive(Debug, Clone)]
pub struct MutationRunner {
    config: MutationConfig,
}

impl MutationRunner {
    pub fn new(config: MutationConfig) -> Self {
        Self { config }
    }

    /// Planned steps, in execution order.
    pub fn steps(&self) -> Vec<Step> {
        let c = &self.config;
        let mut steps = vec![Step {
            name: "init",
            args: vec!["init".into(), c.config_file.clone(), c.session_file.clone()],
            capture: None,
        }];
        if c.baseline {
            steps.push(Step {
                name: "baseline",
                args: vec!["baseline".into(), c.config_file.clone()],
                capture: None,
            });
        }
        steps.push(Step {
            name: "exec",
            args: vec!["exec".into(), c.config_file.clone(), c.session_file.clone()],
            capture: None,
        });
        steps.push(Step {
            name: "dump",
            args: vec!["dump".into(), c.session_file.clone()],
            capture: Some(PathBuf::from(&c.dump_file)),
        });
        steps
    }

    /// Run every step and return the dump file path.
    pub fn run(&self) -> Result<PathBuf, RunnerError> {
        for step in self.steps() {
            tracing::info!(step = step.name, args = ?step.args, "Running mutation step");

            let output = Command::new(&self.config.executable)
                .args(&step.args)
                .output()
                .map_err(|source| RunnerError::Spawn {
                    step: step.name,
                    source,
                })?;

            if !output.status.success() {
                return Err(RunnerError::Failed {
                    step: step.name,
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            if let Some(path) = &step.capture {
                fs::write(path, &output.stdout).map_err(|source| RunnerError::Write {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        Ok(PathBuf::from(&self.config.dump_file))
    }
}
