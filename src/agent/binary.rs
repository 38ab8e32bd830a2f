//! Agent CLI discovery.
//!
//! Lookup order: explicit config path, `SIUMAI_AGENT_CLI_PATH`, then `PATH`.
//! The env/`PATH` result is resolved once per process and memoized; it is
//! never refreshed while the process runs.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use super::AgentError;
use crate::defaults;

static DISCOVERED: OnceCell<Option<PathBuf>> = OnceCell::new();

/// Process-wide discovered agent binary, if any.
pub fn discover_binary() -> Option<&'static Path> {
    DISCOVERED
        .get_or_init(|| {
            let found = locate_binary(
                std::env::var_os(defaults::ENV_CLI_PATH).as_deref(),
                std::env::var_os("PATH").as_deref(),
                defaults::BINARY_NAME,
            );
            match &found {
                Some(path) => tracing::debug!(path = %path.display(), "discovered agent binary"),
                None => tracing::debug!("no agent binary found on PATH"),
            }
            found
        })
        .as_deref()
}

/// Resolve the binary to spawn, preferring an explicitly configured path.
pub fn resolve_binary(explicit: Option<&Path>) -> Result<PathBuf, AgentError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    discover_binary().map(Path::to_path_buf).ok_or_else(|| {
        AgentError::BinaryNotFound(format!(
            "`{}` is not on PATH; set {} or configure a binary path",
            defaults::BINARY_NAME,
            defaults::ENV_CLI_PATH
        ))
    })
}

/// Pure lookup used by `discover_binary`.
pub fn locate_binary(
    env_override: Option<&OsStr>,
    path_var: Option<&OsStr>,
    name: &str,
) -> Option<PathBuf> {
    if let Some(path) = env_override.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    std::env::split_paths(path_var?)
        .flat_map(|dir| candidates(&dir, name))
        .find(|candidate| candidate.is_file())
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    ["", ".exe", ".cmd"]
        .iter()
        .map(|ext| dir.join(format!("{name}{ext}")))
        .collect()
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}
