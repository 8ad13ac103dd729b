use anyhow::{Context, Result};
use implgen_build::BuildConfig;
use implgen_codegen::CodeGenConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "implgen.toml";

/// Contents of `implgen.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImplgenConfig {
    pub codegen: CodeGenConfig,
    pub introspect: IntrospectConfig,
    pub build: BuildConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrospectConfig {
    /// Directories, jars and jmods searched for class files.
    pub classpath: Vec<PathBuf>,
    /// JSON catalogs, merged in order.
    pub catalogs: Vec<PathBuf>,
    /// Whether `$JAVA_HOME/jmods` is appended to the class path.
    pub jdk_modules: bool,
}

impl Default for IntrospectConfig {
    fn default() -> Self {
        Self {
            classpath: Vec::new(),
            catalogs: Vec::new(),
            jdk_modules: true,
        }
    }
}

impl ImplgenConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid implgen configuration")
    }

    /// Read a configuration file. Relative paths inside it are resolved
    /// against the directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Self = toml::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Use `explicit` when given, otherwise `implgen.toml` in `dir` if it
    /// exists, otherwise the defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn rebase(&mut self, base: &Path) {
        let rebase = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        self.introspect.classpath.iter_mut().for_each(rebase);
        self.introspect.catalogs.iter_mut().for_each(rebase);
        self.build.classpath.iter_mut().for_each(rebase);
        if let Some(javac) = self.build.javac.as_mut() {
            rebase(javac);
        }
    }
}
