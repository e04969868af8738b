use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::authority::fsf::FSF_LICENSES_URL;
use crate::authority::open_definition::OD_LICENSES_URL;
use crate::authority::spdx::SPDX_LICENSES_URL;

/// Root configuration structure, deserialized from `.license-verify/config.toml`.
///
/// Every section and key is optional; missing values fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,
    pub http: HttpConfig,
    pub corpus: CorpusConfig,
}

/// Where each authority publishes its list.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub spdx: String,
    pub fsf: String,
    pub open_definition: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            spdx: SPDX_LICENSES_URL.to_string(),
            fsf: FSF_LICENSES_URL.to_string(),
            open_definition: OD_LICENSES_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    /// Request timeout. Unset means the client default.
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("license-verify/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}

/// Layout of the site the corpus is read from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Site root; relative paths resolve against the project path.
    pub root: PathBuf,
    /// Directory holding `rules.yml`, `fields.yml` and `meta.yml`, relative to `root`.
    pub data_dir: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            data_dir: PathBuf::from("_data"),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — an explicit path
/// 2. `<project_path>/.license-verify/config.toml`
/// 3. `~/.config/license-verify/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-verify").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-verify")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("parsing config from {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoints.spdx, "https://spdx.org/licenses/licenses.json");
        assert_eq!(cfg.endpoints.fsf, "https://www.gnu.org/licenses/license-list.en.html");
        assert!(cfg.http.timeout_secs.is_none());
        assert!(cfg.http.user_agent.starts_with("license-verify/"));
        assert_eq!(cfg.corpus.data_dir, PathBuf::from("_data"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[endpoints]
fsf = "http://localhost:8080/license-list.html"

[http]
timeout_secs = 30
"#,
        )
        .unwrap();
        assert_eq!(cfg.endpoints.fsf, "http://localhost:8080/license-list.html");
        assert_eq!(cfg.endpoints.spdx, SPDX_LICENSES_URL);
        assert_eq!(cfg.http.timeout_secs, Some(30));
        assert_eq!(cfg.corpus.root, PathBuf::from("."));
    }

    #[test]
    fn test_project_config_is_found() {
        let dir = TempDir::new().unwrap();
        let cfg_dir = dir.path().join(".license-verify");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[corpus]\nroot = \"site\"\n",
        )
        .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.corpus.root, PathBuf::from("site"));
    }

    #[test]
    fn test_override_wins_and_reports_bad_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[http\nuser_agent = ").unwrap();

        let err = load_config(dir.path(), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("custom.toml"));
    }
}
