use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde_json::{Map, Value};

use super::{ContentSource, Document};
use crate::config::CorpusConfig;

/// A site directory: collections under `_<collection>/*.txt` with YAML front
/// matter, data sections under `<data_dir>/<section>.yml`.
#[derive(Debug, Clone)]
pub struct SiteDir {
    root: PathBuf,
    data_dir: PathBuf,
}

impl SiteDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = root.join("_data");
        Self { root, data_dir }
    }

    /// Site described by `config`, with relative roots resolved against `project_path`.
    pub fn from_config(project_path: &Path, config: &CorpusConfig) -> Self {
        let root = project_path.join(&config.root);
        let data_dir = root.join(&config.data_dir);
        Self { root, data_dir }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for SiteDir {
    fn documents(&self, collection: &str) -> Result<Vec<Document>> {
        let dir = self.root.join(format!("_{}", collection));
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("reading collection {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        let front_matter_re = Regex::new(FRONT_MATTER)?;
        paths
            .iter()
            .map(|path| {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                parse_document(&front_matter_re, path, &content)
                    .with_context(|| format!("parsing {}", path.display()))
            })
            .collect()
    }

    fn data(&self, section: &str) -> Result<Option<Value>> {
        for ext in ["yml", "yaml"] {
            let path = self.data_dir.join(format!("{}.{}", section, ext));
            if path.exists() {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let value: Value = serde_yaml::from_str(&content)
                    .with_context(|| format!("parsing {}", path.display()))?;
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// `---` delimited YAML block at the very start of a document.
const FRONT_MATTER: &str = r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)";

fn parse_document(front_matter_re: &Regex, path: &Path, content: &str) -> Result<Document> {
    let Some(caps) = front_matter_re.captures(content) else {
        bail!("no front matter block");
    };

    let front_matter = match serde_yaml::from_str::<Value>(&caps[1])? {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => bail!("front matter must be a mapping, found {}", other),
    };

    let basename = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Document {
        basename,
        front_matter,
    })
}
