use implgen_model::{
    ConstructorDescriptor, ImplError, MethodDescriptor, Modifiers, TypeKind,
};
use serde::{Deserialize, Serialize};

pub(crate) const JAVA_LANG_OBJECT: &str = "java.lang.Object";

/// Raw declaration of one type as stored in a class file or catalog entry.
/// Supertypes are referenced by binary name and resolved later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::from_bits(Modifiers::PUBLIC),
            superclass: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Apply the implicit rules of the Java language so that hand-written
    /// catalog entries and class-file declarations look the same.
    pub fn normalize(mut self) -> Self {
        match self.kind {
            TypeKind::Interface | TypeKind::Annotation => {
                self.modifiers = self
                    .modifiers
                    .with(Modifiers::INTERFACE | Modifiers::ABSTRACT);
                if self.kind == TypeKind::Annotation {
                    self.modifiers = self.modifiers.with(Modifiers::ANNOTATION);
                }
                // Interfaces have no class chain; class files still name Object.
                self.superclass = None;
                self.constructors.clear();
                for method in &mut self.methods {
                    if !method.modifiers.is_private() {
                        method.modifiers = method.modifiers.with(Modifiers::PUBLIC);
                    }
                }
            }
            TypeKind::Enum => {
                self.modifiers = self.modifiers.with(Modifiers::ENUM);
            }
            TypeKind::Class => {
                // A class without constructor declarations gets the implicit
                // default constructor with the class's own access.
                if self.constructors.is_empty() {
                    self.constructors.push(ConstructorDescriptor {
                        modifiers: self.modifiers.masked(Modifiers::CONSTRUCTOR_MODIFIERS),
                        ..ConstructorDescriptor::default()
                    });
                }
            }
            TypeKind::Primitive | TypeKind::Array => {}
        }

        if self.superclass.is_none()
            && matches!(self.kind, TypeKind::Class | TypeKind::Enum)
            && self.name != JAVA_LANG_OBJECT
        {
            self.superclass = Some(JAVA_LANG_OBJECT.to_string());
        }

        for method in &mut self.methods {
            method.declaring_type = self.name.clone();
        }
        self
    }
}

/// Where raw declarations come from: a catalog, a class path, or a chain.
pub trait DeclarationSource {
    /// Load the declaration of `binary_name`; `Ok(None)` when the source
    /// does not know the type.
    fn load(&self, binary_name: &str) -> Result<Option<ClassDeclaration>, ImplError>;
}

impl<S: DeclarationSource + ?Sized> DeclarationSource for Box<S> {
    fn load(&self, binary_name: &str) -> Result<Option<ClassDeclaration>, ImplError> {
        (**self).load(binary_name)
    }
}

/// Ordered list of sources; the first one that knows a type wins.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn DeclarationSource + Send + Sync>>,
}

impl SourceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S>(&mut self, source: S)
    where
        S: DeclarationSource + Send + Sync + 'static,
    {
        self.sources.push(Box::new(source));
    }

    pub fn with<S>(mut self, source: S) -> Self
    where
        S: DeclarationSource + Send + Sync + 'static,
    {
        self.push(source);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl DeclarationSource for SourceChain {
    fn load(&self, binary_name: &str) -> Result<Option<ClassDeclaration>, ImplError> {
        for source in &self.sources {
            if let Some(declaration) = source.load(binary_name)? {
                return Ok(Some(declaration));
            }
        }
        Ok(None)
    }
}
