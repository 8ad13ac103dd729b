use crate::modifiers::Modifiers;
use crate::signature::MemberSignature;
use crate::types::JavaType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity of a type: package plus simple name, derived from the binary name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    binary_name: String,
    package: String,
    simple_name: String,
}

impl TypeName {
    pub fn new(binary_name: impl Into<String>) -> Self {
        let binary_name = binary_name.into();
        let (package, local) = match binary_name.rsplit_once('.') {
            Some((package, local)) => (package.to_string(), local),
            None => (String::new(), binary_name.as_str()),
        };
        let simple_name = local.rsplit('$').next().unwrap_or(local).to_string();
        Self {
            package,
            simple_name,
            binary_name,
        }
    }

    /// `java.util.Map$Entry`
    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// `java.util.Map.Entry`
    pub fn source_name(&self) -> String {
        self.binary_name.replace('$', ".")
    }

    /// `java.util`; empty for the default package.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// `Entry`
    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    /// Package mapped onto relative path components (`java/util`).
    pub fn package_path(&self) -> PathBuf {
        self.package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
    Primitive,
    Array,
}

/// Members that take parameters and declare exceptions.
pub trait Executable {
    fn parameters(&self) -> &[JavaType];
    fn exceptions(&self) -> &[JavaType];
    fn modifiers(&self) -> Modifiers;

    /// Variadic flag; applies to the final parameter only.
    fn is_variadic(&self) -> bool {
        self.modifiers().is_varargs() && !self.parameters().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    /// Binary name of the declaring type; filled in when a declaration is
    /// loaded, so catalogs may omit it.
    #[serde(default)]
    pub declaring_type: String,
    #[serde(default = "void_type")]
    pub return_type: JavaType,
    #[serde(default)]
    pub parameters: Vec<JavaType>,
    #[serde(default)]
    pub exceptions: Vec<JavaType>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

fn void_type() -> JavaType {
    JavaType::Void
}

impl MethodDescriptor {
    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract()
    }

    pub fn signature(&self) -> MemberSignature {
        MemberSignature::new(
            self.name.clone(),
            self.parameters.clone(),
            self.declaring_type.clone(),
        )
    }
}

impl Executable for MethodDescriptor {
    fn parameters(&self) -> &[JavaType] {
        &self.parameters
    }

    fn exceptions(&self) -> &[JavaType] {
        &self.exceptions
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstructorDescriptor {
    #[serde(default)]
    pub parameters: Vec<JavaType>,
    #[serde(default)]
    pub exceptions: Vec<JavaType>,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl ConstructorDescriptor {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_private(&self) -> bool {
        self.modifiers.is_private()
    }
}

impl Executable for ConstructorDescriptor {
    fn parameters(&self) -> &[JavaType] {
        &self.parameters
    }

    fn exceptions(&self) -> &[JavaType] {
        &self.exceptions
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

/// Structural snapshot of a type and everything reachable through its
/// supertypes. Produced by an introspector; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub name: TypeName,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    pub constructors: Vec<ConstructorDescriptor>,
    /// Methods declared by this type itself, in declaration order.
    pub methods: Vec<MethodDescriptor>,
    pub superclass: Option<Box<TypeDescriptor>>,
    /// Binary names of the directly implemented (or extended) interfaces.
    pub interfaces: Vec<String>,
    /// Public methods reachable from this type, most specific first.
    pub public_methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Descriptor with no members, used for primitives and arrays.
    pub fn opaque(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: TypeName::new(name),
            kind,
            modifiers: Modifiers::from_bits(Modifiers::PUBLIC | Modifiers::FINAL),
            constructors: Vec::new(),
            methods: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            public_methods: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Annotation)
    }

    /// This type followed by each superclass up to the root.
    pub fn class_chain(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |current| current.superclass.as_deref())
    }
}
