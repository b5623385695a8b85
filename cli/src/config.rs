use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use toml_edit::DocumentMut;

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenumberConfig {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub image_extension: Option<String>,
    pub required_substring: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn new_default() -> anyhow::Result<Self> {
        let Some(home) = dirs::home_dir() else {
            anyhow::bail!("cannot determine home directory for config path");
        };
        Ok(Self::new(default_config_path(&home)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file. A missing file yields empty settings; a file
    /// that cannot be read or parsed is an error.
    pub fn load(&self) -> anyhow::Result<RenumberConfig> {
        let Some(content) = read_document_string(&self.path)? else {
            return Ok(RenumberConfig::default());
        };
        let doc = content
            .parse::<DocumentMut>()
            .with_context(|| format!("parse {}", self.path.display()))?;

        Ok(RenumberConfig {
            input_dir: read_string(&doc, "input_dir")?.map(|dir| expand_home(&dir)),
            output_dir: read_string(&doc, "output_dir")?.map(|dir| expand_home(&dir)),
            image_extension: read_string(&doc, "image_extension")?,
            required_substring: read_string(&doc, "required_substring")?,
        })
    }
}

fn default_config_path(home: &Path) -> PathBuf {
    home.join(".timepoint-renumber").join("config.toml")
}

fn read_string(doc: &DocumentMut, key: &str) -> anyhow::Result<Option<String>> {
    let Some(item) = doc.get(key) else {
        return Ok(None);
    };
    let Some(value) = item.as_str() else {
        anyhow::bail!("config key `{key}` must be a string");
    };
    Ok(Some(value.to_string()))
}

/// Expands a leading `~` to the home directory. Other paths are returned as-is.
fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

fn read_document_string(path: &Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(anyhow::Error::new(err).context(format!("read {}", path.display()))),
    }
}
