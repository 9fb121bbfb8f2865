//! Local scripts - executables in a directory that answer commands

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::PathBuf;

use crate::application::errors::ScriptError;
use crate::domain::traits::ScriptRunner;

/// Runs executables found directly inside `directory`
pub struct LocalScripts {
    directory: PathBuf,
    /// Names that must never be run, e.g. the bot's own binary and data files
    reserved: Vec<String>,
}

impl LocalScripts {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            reserved: Vec::new(),
        }
    }

    pub fn with_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved.extend(names.into_iter().map(Into::into));
        self
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    // executable by user, group and other
    metadata.is_file() && metadata.permissions().mode() & 0o111 == 0o111
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    false
}

#[async_trait]
impl ScriptRunner for LocalScripts {
    fn exists(&self, name: &str) -> bool {
        if name.is_empty() || self.reserved.iter().any(|r| r == name) {
            return false;
        }

        let entries = match std::fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot list script directory {:?}: {}", self.directory, e);
                return false;
            }
        };

        entries.flatten().any(|entry| {
            entry.file_name() == OsStr::new(name)
                && std::fs::metadata(entry.path())
                    .map(|m| is_executable(&m))
                    .unwrap_or(false)
        })
    }

    async fn run(&self, name: &str, arg: &str) -> Result<String, ScriptError> {
        if !self.exists(name) {
            return Err(ScriptError::NotFound(name.to_string()));
        }

        let program = self.directory.join(name);
        tracing::info!("Running script {:?} with argument '{}'", program, arg);

        let output = tokio::process::Command::new(&program)
            .arg(arg)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| ScriptError::ExecutionFailed(format!("{}: {}", name, e)))?;

        if !output.status.success() {
            return Err(ScriptError::ExecutionFailed(format!(
                "{} exited with {}",
                name, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
