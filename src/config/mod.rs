pub mod types;

use crate::error::{AnalyzerError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".cfn-metrics.toml";

/// Get the global config file path (~/.cfn-metrics.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (next to the template)
pub fn local_config_path(template_dir: &Path) -> PathBuf {
    template_dir.join(CONFIG_FILE_NAME)
}

/// Read and parse one config file.
pub fn read_config(path: &Path) -> Result<types::Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| AnalyzerError::Config(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| AnalyzerError::Config(format!("{}: {}", path.display(), e)))
}

/// Load configuration.
///
/// An explicit path must load cleanly. Otherwise the local file is tried
/// first, then the global one; files that fail to parse are skipped.
pub fn load_config(explicit: Option<&Path>, template_dir: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        log::debug!("Loading config from {}", path.display());
        return read_config(path);
    }

    let candidates = template_dir
        .map(local_config_path)
        .into_iter()
        .chain(global_config_path());

    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        match read_config(&candidate) {
            Ok(config) => {
                log::debug!("Loaded config from {}", candidate.display());
                return Ok(config);
            }
            Err(e) => log::warn!("Ignoring config file: {}", e),
        }
    }

    Ok(types::Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_config_is_used() {
        let dir = TempDir::new().unwrap();
        fs::write(
            local_config_path(dir.path()),
            "[analysis]\nconcurrency = 2\ncontinue_on_error = true\n\n[output]\nformat = \"html\"\n",
        )
        .unwrap();

        let config = load_config(None, Some(dir.path())).unwrap();
        assert_eq!(config.analysis.concurrency, 2);
        assert!(config.analysis.continue_on_error);
        assert!(config.analysis.include_unsupported);
        assert_eq!(config.output.format, "html");
        assert!(config.output.pretty);
    }

    #[test]
    fn test_explicit_config_errors_are_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[analysis\n").unwrap();

        let err = load_config(Some(&path), None).unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn test_broken_local_config_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(local_config_path(dir.path()), "not = [valid").unwrap();
        // Falls through to the global file or defaults without failing
        assert!(load_config(None, Some(dir.path())).is_ok());
    }
}
