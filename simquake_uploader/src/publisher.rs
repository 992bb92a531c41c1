//! Git publishing of the feed file.
//!
//! Stage, commit, and push run as three sequential subprocesses. All
//! output is captured and logged at DEBUG; a non-zero exit surfaces as
//! [`PublishError::CommandFailed`] and the scheduler decides whether to
//! escalate (it doesn't: the next cycle is the retry).

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Errors from the publishing pipeline.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Required environment variable missing or empty for token push
    #[error("environment variable {0} is not set (required for --token-push)")]
    MissingEnv(&'static str),

    /// git could not be spawned
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// A git command exited non-zero
    #[error("`{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
}

/// How pushes authenticate.
#[derive(Debug, Clone)]
pub enum PushMode {
    /// `git push <remote> <branch>` with ambient credentials.
    Ambient { remote: String, branch: String },

    /// `git push https://<token>@github.com/<repo>.git HEAD:<branch>`.
    Token {
        repo: String,
        token: String,
        branch: String,
    },
}

impl PushMode {
    /// Resolves token-mode credentials from `GITHUB_REPO` and
    /// `GITHUB_TOKEN`. Both are required; call this before the loop starts
    /// so a missing variable fails fast.
    pub fn token_from_env(branch: String) -> Result<Self, PublishError> {
        let repo = env::var("GITHUB_REPO").unwrap_or_default();
        let token = env::var("GITHUB_TOKEN").unwrap_or_default();
        if repo.is_empty() {
            return Err(PublishError::MissingEnv("GITHUB_REPO"));
        }
        if token.is_empty() {
            return Err(PublishError::MissingEnv("GITHUB_TOKEN"));
        }
        Ok(PushMode::Token {
            repo,
            token,
            branch,
        })
    }
}

/// Stages, commits, and pushes the feed file from a fixed repository
/// directory.
#[derive(Debug, Clone)]
pub struct Publisher {
    repo_dir: PathBuf,
    mode: PushMode,
}

impl Publisher {
    pub fn new(repo_dir: impl Into<PathBuf>, mode: PushMode) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            mode,
        }
    }

    /// One best-effort publish: add, commit, push. The first non-zero exit
    /// aborts the remaining steps.
    pub fn publish(&self, path: &Path, message: &str) -> Result<(), PublishError> {
        let path = path.display().to_string();
        self.run_git(&["add", &path], None)?;
        self.run_git(&["commit", "-m", message], None)?;

        match &self.mode {
            PushMode::Ambient { remote, branch } => {
                self.run_git(&["push", remote, branch], None)?;
            }
            PushMode::Token {
                repo,
                token,
                branch,
            } => {
                let url = format!("https://{token}@github.com/{repo}.git");
                let refspec = format!("HEAD:{branch}");
                // Keep the token out of the logs
                let display = format!("git push https://***@github.com/{repo}.git {refspec}");
                self.run_git(&["push", &url, &refspec], Some(&display))?;
            }
        }
        Ok(())
    }

    fn run_git(&self, args: &[&str], display: Option<&str>) -> Result<(), PublishError> {
        let command = match display {
            Some(d) => d.to_string(),
            None => format!("git {}", args.join(" ")),
        };
        debug!("$ {command}");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()?;

        if !output.stdout.is_empty() {
            debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
        }
        if !output.stderr.is_empty() {
            debug!("{}", String::from_utf8_lossy(&output.stderr).trim_end());
        }

        if !output.status.success() {
            return Err(PublishError::CommandFailed {
                command,
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }
        Ok(())
    }
}
