use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

/// Erased Java type as it appears in member signatures.
///
/// Reference names are binary names (`java.util.Map$Entry`); `Display`
/// renders the source form (`java.util.Map.Entry`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum JavaType {
    /// Primitive types: int, boolean, char, etc.
    Primitive(String),
    /// Reference types: String, Object, custom classes
    Reference { name: String },
    /// Array types: int[], String[][]
    Array {
        element_type: Box<JavaType>,
        dimensions: usize,
    },
    /// Void type
    Void,
}

impl JavaType {
    pub fn primitive(name: &str) -> Self {
        JavaType::Primitive(name.to_string())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        JavaType::Reference { name: name.into() }
    }

    /// Build an array type, flattening nested arrays into a single rank.
    pub fn array_of(element: JavaType, dimensions: usize) -> Self {
        if dimensions == 0 {
            return element;
        }
        match element {
            JavaType::Array {
                element_type,
                dimensions: inner,
            } => JavaType::Array {
                element_type,
                dimensions: inner + dimensions,
            },
            other => JavaType::Array {
                element_type: Box::new(other),
                dimensions,
            },
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, JavaType::Void)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, JavaType::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, JavaType::Array { .. })
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, JavaType::Primitive(name) if name == "boolean")
    }

    /// The same type with one array dimension removed.
    ///
    /// Used for the element type of a variadic parameter. Non-array types are
    /// returned unchanged.
    pub fn component_type(&self) -> JavaType {
        match self {
            JavaType::Array {
                element_type,
                dimensions,
            } => JavaType::array_of((**element_type).clone(), dimensions - 1),
            other => other.clone(),
        }
    }

    /// Type name using binary names for references, as `Class.getTypeName` would.
    pub fn type_name(&self) -> String {
        match self {
            JavaType::Primitive(name) => name.clone(),
            JavaType::Reference { name } => name.clone(),
            JavaType::Array {
                element_type,
                dimensions,
            } => format!("{}{}", element_type.type_name(), "[]".repeat(*dimensions)),
            JavaType::Void => "void".to_string(),
        }
    }

    pub fn is_primitive_name(name: &str) -> bool {
        PRIMITIVES.contains(&name)
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Primitive(name) => f.write_str(name),
            JavaType::Reference { name } => f.write_str(&name.replace('$', ".")),
            JavaType::Array {
                element_type,
                dimensions,
            } => write!(f, "{}{}", element_type, "[]".repeat(*dimensions)),
            JavaType::Void => f.write_str("void"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParseError(pub String);

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed type name '{}'", self.0)
    }
}

impl std::error::Error for TypeParseError {}

impl FromStr for JavaType {
    type Err = TypeParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let mut base = trimmed;
        let mut dimensions = 0;
        while let Some(stripped) = base.strip_suffix("[]") {
            base = stripped.trim_end();
            dimensions += 1;
        }

        if base.is_empty() || !base.chars().all(is_type_name_char) {
            return Err(TypeParseError(raw.to_string()));
        }

        let element = if base == "void" {
            if dimensions > 0 {
                return Err(TypeParseError(raw.to_string()));
            }
            JavaType::Void
        } else if JavaType::is_primitive_name(base) {
            JavaType::Primitive(base.to_string())
        } else {
            JavaType::Reference {
                name: base.to_string(),
            }
        };

        Ok(JavaType::array_of(element, dimensions))
    }
}

fn is_type_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '.' | '$' | '_')
}

impl TryFrom<String> for JavaType {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JavaType> for String {
    fn from(value: JavaType) -> Self {
        value.type_name()
    }
}
