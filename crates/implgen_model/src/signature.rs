use crate::types::JavaType;
use std::cmp::Ordering;
use std::fmt;

/// Name plus parameter types; identifies a member regardless of where it is
/// declared or what it returns.
///
/// Ordering compares the name, then the arity, then each parameter's type
/// name. `declaring_type` is carried for diagnostics only.
#[derive(Debug, Clone)]
pub struct MemberSignature {
    pub name: String,
    pub parameters: Vec<JavaType>,
    pub declaring_type: String,
}

impl MemberSignature {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<JavaType>,
        declaring_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            declaring_type: declaring_type.into(),
        }
    }

    fn key(&self) -> (&str, usize, Vec<String>) {
        (
            self.name.as_str(),
            self.parameters.len(),
            self.parameters.iter().map(JavaType::type_name).collect(),
        )
    }
}

impl PartialEq for MemberSignature {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MemberSignature {}

impl PartialOrd for MemberSignature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MemberSignature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for MemberSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(JavaType::type_name).collect();
        write!(f, "{}({})", self.name, params.join(", "))
    }
}
