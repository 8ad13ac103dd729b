use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options for compiling generated units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Explicit `javac` executable; discovered from the environment when unset.
    pub javac: Option<PathBuf>,
    /// Passed to javac as `--release`; older JDKs are rejected.
    pub release: Option<u32>,
    /// Extra arguments placed before the generated ones.
    pub compiler_options: Vec<String>,
    /// Class path used while compiling the unit.
    pub classpath: Vec<PathBuf>,
}

impl BuildConfig {
    pub fn with_classpath<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.classpath.extend(entries);
        self
    }
}
