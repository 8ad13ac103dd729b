use implgen_model::{ImplError, TypeDescriptor, TypeKind};

/// Reject types no subclass or implementation can be written for.
///
/// Runs before any file system or compiler interaction.
pub fn check_implementable(descriptor: &TypeDescriptor) -> Result<(), ImplError> {
    let reason = match descriptor.kind {
        TypeKind::Primitive => Some("primitive types cannot be implemented"),
        TypeKind::Array => Some("array types cannot be implemented"),
        TypeKind::Enum => Some("enum types cannot be extended"),
        TypeKind::Class | TypeKind::Interface | TypeKind::Annotation => {
            if descriptor.modifiers.is_final() {
                Some("type is final")
            } else if descriptor.modifiers.is_sealed() {
                Some("type is sealed")
            } else {
                None
            }
        }
    };

    match reason {
        Some(reason) => Err(ImplError::not_implementable(
            descriptor.name.binary_name(),
            reason,
        )),
        None => Ok(()),
    }
}
