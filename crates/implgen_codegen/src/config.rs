use serde::{Deserialize, Serialize};

/// Layout options for generated units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeGenConfig {
    /// Indentation string used for each nesting level.
    pub indent: String,
    /// Appended to the target's simple name to form the generated name.
    pub suffix: String,
    /// File extension of the emitted unit, without the dot.
    pub extension: String,
}

impl Default for CodeGenConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            suffix: "Impl".to_string(),
            extension: "java".to_string(),
        }
    }
}

impl CodeGenConfig {
    pub fn class_name(&self, simple_name: &str) -> String {
        format!("{}{}", simple_name, self.suffix)
    }
}
