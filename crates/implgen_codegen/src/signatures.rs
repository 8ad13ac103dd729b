use implgen_model::{MemberSignature, MethodDescriptor, TypeDescriptor};
use std::collections::BTreeSet;

/// Tracks every signature seen across the walk; a member is admitted only
/// the first time its signature appears, and only if it is abstract.
#[derive(Debug, Default)]
pub struct SignatureDeduplicator {
    seen: BTreeSet<MemberSignature>,
}

impl SignatureDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit(&mut self, method: &MethodDescriptor) -> bool {
        self.seen.insert(method.signature()) && method.is_abstract()
    }
}

/// Abstract members the generated type has to implement, in walk order.
///
/// The public surface is walked first. For class targets the declared
/// methods of every class level follow, from the target up to the root, so
/// protected and package-private abstract members are found too.
pub fn abstract_members(descriptor: &TypeDescriptor) -> Vec<&MethodDescriptor> {
    let mut dedup = SignatureDeduplicator::new();
    let mut members = Vec::new();

    for method in &descriptor.public_methods {
        if dedup.admit(method) {
            members.push(method);
        }
    }

    if !descriptor.is_interface() {
        for level in descriptor.class_chain() {
            for method in &level.methods {
                if dedup.admit(method) {
                    members.push(method);
                }
            }
        }
    }

    members
}
