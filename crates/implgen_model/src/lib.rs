// implgen_model - Type descriptors shared by the introspector, generator and build pipeline
mod descriptor;
mod error;
mod modifiers;
mod signature;
mod types;

pub use descriptor::{
    ConstructorDescriptor, Executable, MethodDescriptor, TypeDescriptor, TypeKind, TypeName,
};
pub use error::ImplError;
pub use modifiers::Modifiers;
pub use signature::MemberSignature;
pub use types::{JavaType, TypeParseError};
