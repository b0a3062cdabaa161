//! Road-damage detection script invocation.
//!
//! The detection model lives in an external script treated as an opaque
//! collaborator with a narrow contract: `(input path, output path)` in, exit
//! status out. Exit 0 means the annotated video was written to the output
//! path; anything else is a processing failure surfaced to the caller.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use paveai_core::AppError;
use tokio::process::Command;

/// Collaborator interface for turning a raw video into a processed artifact.
#[async_trait]
pub trait VideoDetector: Send + Sync {
    async fn process(&self, input: &Path, output: &Path) -> Result<(), AppError>;
}

/// Runs the detection script as a subprocess:
/// `<interpreter> <script> <input> <output>`.
pub struct ScriptDetector {
    interpreter: String,
    script_path: PathBuf,
}

impl ScriptDetector {
    pub fn new(interpreter: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script_path: script_path.into(),
        }
    }
}

#[async_trait]
impl VideoDetector for ScriptDetector {
    async fn process(&self, input: &Path, output: &Path) -> Result<(), AppError> {
        tracing::info!(
            script = %self.script_path.display(),
            input = %input.display(),
            output = %output.display(),
            "Running detection script"
        );

        let result = Command::new(&self.interpreter)
            .arg(&self.script_path)
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                AppError::Processing(format!(
                    "Failed to spawn detection script {}: {}",
                    self.script_path.display(),
                    e
                ))
            })?;

        if !result.stdout.is_empty() {
            tracing::debug!(
                stdout = %String::from_utf8_lossy(&result.stdout),
                "Detection script stdout"
            );
        }
        if !result.stderr.is_empty() {
            tracing::warn!(
                stderr = %String::from_utf8_lossy(&result.stderr),
                "Detection script stderr"
            );
        }

        if result.status.success() {
            tracing::info!(output = %output.display(), "Detection script completed");
            return Ok(());
        }

        // Killed by signal on Unix leaves no exit code.
        let detail = match result.status.code() {
            Some(code) => format!("exited with code {}", code),
            None => "terminated by signal".to_string(),
        };
        Err(AppError::Processing(format!(
            "Detection script {}",
            detail
        )))
    }
}
