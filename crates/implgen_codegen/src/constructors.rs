use implgen_model::{ConstructorDescriptor, ImplError, TypeDescriptor};

/// How the generated class satisfies its superclass constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstructorPlan<'a> {
    /// A non-private no-argument constructor exists; nothing is generated.
    Implicit,
    /// Generate a constructor forwarding every argument to this one.
    Delegate(&'a ConstructorDescriptor),
}

/// Pick the superclass constructor the generated class delegates to.
///
/// Private constructors are never candidates. A zero-parameter candidate
/// wins outright; otherwise the candidate with the most parameters is used,
/// and among equal arities the one declared last.
pub fn resolve_constructor(descriptor: &TypeDescriptor) -> Result<ConstructorPlan<'_>, ImplError> {
    let candidates: Vec<&ConstructorDescriptor> = descriptor
        .constructors
        .iter()
        .filter(|ctor| !ctor.is_private())
        .collect();

    if candidates.iter().any(|ctor| ctor.arity() == 0) {
        return Ok(ConstructorPlan::Implicit);
    }

    let mut chosen: Option<&ConstructorDescriptor> = None;
    for ctor in candidates {
        if chosen.map_or(true, |current| ctor.arity() >= current.arity()) {
            chosen = Some(ctor);
        }
    }

    chosen
        .map(ConstructorPlan::Delegate)
        .ok_or_else(|| ImplError::NoAccessibleConstructor {
            type_name: descriptor.name.binary_name().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use implgen_model::{JavaType, Modifiers, TypeKind};

    fn ctor(params: &[&str], modifiers: u32) -> ConstructorDescriptor {
        ConstructorDescriptor {
            parameters: params.iter().map(|p| p.parse().expect("type")).collect(),
            exceptions: Vec::new(),
            modifiers: Modifiers::from_bits(modifiers),
        }
    }

    fn class_with(constructors: Vec<ConstructorDescriptor>) -> TypeDescriptor {
        let mut descriptor = TypeDescriptor::opaque("a.Base", TypeKind::Class);
        descriptor.modifiers = Modifiers::from_bits(Modifiers::PUBLIC | Modifiers::ABSTRACT);
        descriptor.constructors = constructors;
        descriptor
    }

    #[test]
    fn private_only_is_an_error() {
        let descriptor = class_with(vec![ctor(&[], Modifiers::PRIVATE)]);
        let error = resolve_constructor(&descriptor).expect_err("private only");
        assert_eq!(error.category(), "NoAccessibleConstructor");
    }

    #[test]
    fn no_arg_constructor_needs_nothing() {
        let descriptor = class_with(vec![
            ctor(&[], Modifiers::PUBLIC),
            ctor(&["int"], Modifiers::PUBLIC),
        ]);
        assert_eq!(
            resolve_constructor(&descriptor).expect("plan"),
            ConstructorPlan::Implicit
        );
    }

    #[test]
    fn private_no_arg_constructor_is_ignored() {
        let descriptor = class_with(vec![
            ctor(&[], Modifiers::PRIVATE),
            ctor(&["int"], Modifiers::PROTECTED),
        ]);
        match resolve_constructor(&descriptor).expect("plan") {
            ConstructorPlan::Delegate(chosen) => {
                assert_eq!(chosen.parameters, vec![JavaType::primitive("int")])
            }
            other => panic!("expected delegation, got {:?}", other),
        }
    }

    #[test]
    fn widest_constructor_wins_and_ties_go_to_the_last() {
        let descriptor = class_with(vec![
            ctor(&["java.lang.String"], Modifiers::PUBLIC),
            ctor(&["java.lang.String", "int"], Modifiers::PUBLIC),
            ctor(&["long", "long"], 0),
            ctor(&["java.lang.Object"], Modifiers::PUBLIC),
        ]);
        match resolve_constructor(&descriptor).expect("plan") {
            ConstructorPlan::Delegate(chosen) => {
                assert_eq!(chosen.parameters, vec![JavaType::primitive("long"); 2])
            }
            other => panic!("expected delegation, got {:?}", other),
        }
    }
}
