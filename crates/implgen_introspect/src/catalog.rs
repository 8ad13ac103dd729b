use crate::declaration::{ClassDeclaration, DeclarationSource};
use implgen_model::ImplError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// On-disk shape of a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub types: Vec<ClassDeclaration>,
}

/// Precomputed type metadata, for environments where class files are not
/// available. Type strings use Java source form (`java.lang.String[]`).
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    types: HashMap<String, ClassDeclaration>,
}

impl CatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_declarations<I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = ClassDeclaration>,
    {
        let mut catalog = Self::new();
        for declaration in declarations {
            catalog.insert(declaration);
        }
        catalog
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Ok(Self::from_declarations(document.types))
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ImplError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ImplError::io(path, source))?;
        let catalog = Self::from_json_str(&json).map_err(|error| {
            ImplError::invalid_argument(format!("catalog {}: {}", path.display(), error))
        })?;
        debug!(path = %path.display(), types = catalog.len(), "loaded type catalog");
        Ok(catalog)
    }

    /// Insert a declaration; the first definition of a name is kept.
    pub fn insert(&mut self, declaration: ClassDeclaration) {
        let declaration = declaration.normalize();
        if self.types.contains_key(&declaration.name) {
            warn!(type_name = %declaration.name, "duplicate catalog entry ignored");
            return;
        }
        self.types.insert(declaration.name.clone(), declaration);
    }

    pub fn merge(&mut self, other: CatalogSource) {
        let mut incoming: Vec<ClassDeclaration> = other.types.into_values().collect();
        incoming.sort_by(|a, b| a.name.cmp(&b.name));
        for declaration in incoming {
            self.insert(declaration);
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl DeclarationSource for CatalogSource {
    fn load(&self, binary_name: &str) -> Result<Option<ClassDeclaration>, ImplError> {
        Ok(self.types.get(binary_name).cloned())
    }
}
