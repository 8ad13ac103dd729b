use crate::declaration::{ClassDeclaration, DeclarationSource, JAVA_LANG_OBJECT};
use implgen_model::{
    ImplError, JavaType, MemberSignature, MethodDescriptor, TypeDescriptor, TypeKind, TypeName,
};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Produces structural snapshots of named types.
pub trait TypeIntrospector {
    fn describe(&self, qualified_name: &str) -> Result<TypeDescriptor, ImplError>;
}

impl<T: TypeIntrospector + ?Sized> TypeIntrospector for &T {
    fn describe(&self, qualified_name: &str) -> Result<TypeDescriptor, ImplError> {
        (**self).describe(qualified_name)
    }
}

/// Introspector backed by a [`DeclarationSource`].
#[derive(Debug, Clone, Default)]
pub struct Introspector<S> {
    source: S,
}

impl<S: DeclarationSource> Introspector<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: DeclarationSource> TypeIntrospector for Introspector<S> {
    fn describe(&self, qualified_name: &str) -> Result<TypeDescriptor, ImplError> {
        let name = qualified_name.trim();
        if name.is_empty() {
            return Err(ImplError::not_introspectable(
                qualified_name,
                "type name is empty",
            ));
        }
        if name == "void" || JavaType::is_primitive_name(name) {
            return Ok(TypeDescriptor::opaque(name, TypeKind::Primitive));
        }
        if name.ends_with("[]") {
            return Ok(TypeDescriptor::opaque(name, TypeKind::Array));
        }

        let mut assembler = DescriptorAssembler::new(&self.source);
        let binary_name = assembler.resolve_name(name)?;
        assembler.assemble(&binary_name)
    }
}

/// Builds descriptors for one `describe` call. Supertypes shared by several
/// branches of the hierarchy are assembled once.
pub struct DescriptorAssembler<'s, S: ?Sized> {
    source: &'s S,
    declarations: HashMap<String, ClassDeclaration>,
    assembled: HashMap<String, TypeDescriptor>,
    in_progress: Vec<String>,
}

impl<'s, S: DeclarationSource + ?Sized> DescriptorAssembler<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            declarations: HashMap::new(),
            assembled: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Map a user supplied name to the binary name a source knows it by.
    /// `a.Outer.Inner` is tried as `a.Outer$Inner`, then `a$Outer$Inner`.
    pub fn resolve_name(&mut self, name: &str) -> Result<String, ImplError> {
        let mut candidate = name.to_string();
        loop {
            if self.lookup(&candidate)?.is_some() {
                if candidate != name {
                    debug!(requested = name, binary_name = %candidate, "resolved nested type name");
                }
                return Ok(candidate);
            }
            match candidate.rfind('.') {
                Some(index) => candidate.replace_range(index..=index, "$"),
                None => break,
            }
        }
        Err(ImplError::not_introspectable(
            name,
            "type not found on the class path or in any catalog",
        ))
    }

    fn lookup(&mut self, binary_name: &str) -> Result<Option<&ClassDeclaration>, ImplError> {
        if !self.declarations.contains_key(binary_name) {
            match self.source.load(binary_name)? {
                Some(declaration) => {
                    self.declarations.insert(binary_name.to_string(), declaration);
                }
                None => return Ok(None),
            }
        }
        Ok(self.declarations.get(binary_name))
    }

    pub fn assemble(&mut self, binary_name: &str) -> Result<TypeDescriptor, ImplError> {
        if let Some(descriptor) = self.assembled.get(binary_name) {
            return Ok(descriptor.clone());
        }
        if self.in_progress.iter().any(|name| name == binary_name) {
            return Err(ImplError::not_introspectable(
                binary_name,
                format!(
                    "cyclic inheritance through {}",
                    self.in_progress.join(" -> ")
                ),
            ));
        }

        let declaration = match self.lookup(binary_name)? {
            Some(declaration) => declaration.clone(),
            None => {
                return Err(ImplError::not_introspectable(
                    binary_name,
                    "type not found on the class path or in any catalog",
                ))
            }
        };

        self.in_progress.push(binary_name.to_string());
        let result = self.assemble_declaration(declaration);
        self.in_progress.pop();

        let descriptor = result?;
        self.assembled
            .insert(binary_name.to_string(), descriptor.clone());
        Ok(descriptor)
    }

    fn assemble_declaration(
        &mut self,
        declaration: ClassDeclaration,
    ) -> Result<TypeDescriptor, ImplError> {
        let superclass = match &declaration.superclass {
            Some(name) => self.supertype(&declaration.name, name)?,
            None => None,
        };

        let mut interface_surfaces = Vec::with_capacity(declaration.interfaces.len());
        for interface in &declaration.interfaces {
            if let Some(descriptor) = self.supertype(&declaration.name, interface)? {
                interface_surfaces.push(descriptor.public_methods);
            }
        }

        let methods: Vec<MethodDescriptor> = declaration
            .methods
            .into_iter()
            .filter(is_member_method)
            .collect();

        let public_methods = public_surface(
            &methods,
            superclass.as_ref().map(|s| s.public_methods.as_slice()),
            &interface_surfaces,
        );

        debug!(
            type_name = %declaration.name,
            declared = methods.len(),
            surface = public_methods.len(),
            "assembled type descriptor"
        );

        Ok(TypeDescriptor {
            name: TypeName::new(declaration.name),
            kind: declaration.kind,
            modifiers: declaration.modifiers,
            constructors: declaration.constructors,
            methods,
            superclass: superclass.map(Box::new),
            interfaces: declaration.interfaces,
            public_methods,
        })
    }

    /// Resolve a supertype of `owner`. A missing `java.lang.Object` ends the
    /// chain; any other missing supertype is an error naming both types.
    fn supertype(
        &mut self,
        owner: &str,
        supertype: &str,
    ) -> Result<Option<TypeDescriptor>, ImplError> {
        if self.lookup(supertype)?.is_none() {
            if supertype == JAVA_LANG_OBJECT {
                debug!(owner, "java.lang.Object not available; ending class chain");
                return Ok(None);
            }
            return Err(ImplError::not_introspectable(
                owner,
                format!("supertype '{}' cannot be resolved", supertype),
            ));
        }
        self.assemble(supertype).map(Some)
    }
}

/// Bridges stay: they are the concrete implementation of an erased signature.
fn is_member_method(method: &MethodDescriptor) -> bool {
    !method.name.starts_with('<')
        && (!method.modifiers.is_synthetic() || method.modifiers.is_bridge())
}

/// Public methods reachable from a type, most specific first: own methods,
/// then the superclass surface, then each interface surface. Static
/// interface methods are not inherited.
fn public_surface(
    own: &[MethodDescriptor],
    superclass: Option<&[MethodDescriptor]>,
    interfaces: &[Vec<MethodDescriptor>],
) -> Vec<MethodDescriptor> {
    let mut seen: BTreeSet<MemberSignature> = BTreeSet::new();
    let mut surface = Vec::new();

    let mut admit = |method: &MethodDescriptor| {
        if seen.insert(method.signature()) {
            surface.push(method.clone());
        }
    };

    own.iter()
        .filter(|method| method.modifiers.is_public())
        .for_each(&mut admit);
    superclass
        .into_iter()
        .flatten()
        .for_each(&mut admit);
    interfaces
        .iter()
        .flatten()
        .filter(|method| !method.modifiers.is_static())
        .for_each(&mut admit);

    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSource;
    use test_case::test_case;

    const HIERARCHY: &str = r#"{
        "types": [
            {
                "name": "shapes.Named",
                "kind": "interface",
                "methods": [
                    { "name": "name", "return_type": "java.lang.String", "modifiers": ["abstract"] },
                    { "name": "of", "return_type": "shapes.Named", "parameters": ["java.lang.String"], "modifiers": ["static"] }
                ]
            },
            {
                "name": "shapes.Base",
                "modifiers": ["public", "abstract"],
                "interfaces": ["shapes.Named"],
                "constructors": [ { "modifiers": ["protected"] } ],
                "methods": [
                    { "name": "name", "return_type": "java.lang.String", "modifiers": ["public"] },
                    { "name": "size", "return_type": "int", "modifiers": ["public", "abstract"] },
                    { "name": "grow", "parameters": ["int"], "modifiers": ["protected", "abstract"] }
                ]
            },
            {
                "name": "shapes.Leaf",
                "modifiers": ["public", "abstract"],
                "superclass": "shapes.Base",
                "methods": [
                    { "name": "size", "return_type": "int", "modifiers": ["public", "abstract"] },
                    { "name": "<clinit>", "modifiers": ["static"] }
                ]
            },
            {
                "name": "shapes.Outer$Inner",
                "kind": "interface"
            },
            {
                "name": "shapes.Orphan",
                "superclass": "shapes.Gone"
            },
            {
                "name": "loop.A",
                "superclass": "loop.B"
            },
            {
                "name": "loop.B",
                "superclass": "loop.A"
            }
        ]
    }"#;

    fn introspector() -> Introspector<CatalogSource> {
        Introspector::new(CatalogSource::from_json_str(HIERARCHY).expect("catalog"))
    }

    fn names(methods: &[MethodDescriptor]) -> Vec<String> {
        methods
            .iter()
            .map(|method| format!("{}@{}", method.name, method.declaring_type))
            .collect()
    }

    #[test_case("int", TypeKind::Primitive ; "primitive")]
    #[test_case("void", TypeKind::Primitive ; "void")]
    #[test_case("java.lang.String[]", TypeKind::Array ; "array")]
    fn builtin_shapes_have_no_members(name: &str, kind: TypeKind) {
        let descriptor = introspector().describe(name).expect("describe");
        assert_eq!(descriptor.kind, kind);
        assert!(descriptor.public_methods.is_empty());
        assert!(descriptor.constructors.is_empty());
    }

    #[test]
    fn blank_name_is_not_introspectable() {
        let error = introspector().describe("  ").expect_err("blank");
        assert_eq!(error.category(), "NotIntrospectable");
    }

    #[test]
    fn unknown_type_is_named_in_the_error() {
        let error = introspector().describe("shapes.Missing").expect_err("missing");
        assert_eq!(error.category(), "NotIntrospectable");
        assert!(error.to_string().contains("shapes.Missing"));
    }

    #[test]
    fn canonical_nested_names_resolve_to_binary_names() {
        let descriptor = introspector().describe("shapes.Outer.Inner").expect("describe");
        assert_eq!(descriptor.name.binary_name(), "shapes.Outer$Inner");
        assert_eq!(descriptor.name.simple_name(), "Inner");
    }

    #[test]
    fn missing_object_ends_the_chain() {
        let descriptor = introspector().describe("shapes.Base").expect("describe");
        assert!(descriptor.superclass.is_none());
    }

    #[test]
    fn missing_supertype_names_both_types() {
        let error = introspector().describe("shapes.Orphan").expect_err("orphan");
        let message = error.to_string();
        assert!(message.contains("shapes.Orphan"));
        assert!(message.contains("shapes.Gone"));
    }

    #[test]
    fn cyclic_hierarchies_are_rejected() {
        let error = introspector().describe("loop.A").expect_err("cycle");
        assert_eq!(error.category(), "NotIntrospectable");
        assert!(error.to_string().contains("cyclic"));
    }

    #[test]
    fn surface_is_most_specific_first_and_deduplicated() {
        let leaf = introspector().describe("shapes.Leaf").expect("describe");
        assert_eq!(
            names(&leaf.public_methods),
            vec!["size@shapes.Leaf", "name@shapes.Base"]
        );
        assert_eq!(names(&leaf.methods), vec!["size@shapes.Leaf"]);

        let chain: Vec<&str> = leaf.class_chain().map(|t| t.name.binary_name()).collect();
        assert_eq!(chain, vec!["shapes.Leaf", "shapes.Base"]);
        assert_eq!(leaf.superclass.as_ref().expect("base").methods.len(), 3);
    }

    #[test]
    fn static_interface_methods_are_not_inherited() {
        let base = introspector().describe("shapes.Base").expect("describe");
        assert!(base.public_methods.iter().all(|method| method.name != "of"));
        let named = introspector().describe("shapes.Named").expect("describe");
        assert!(named.public_methods.iter().any(|method| method.name == "of"));
    }

    #[test]
    fn describing_twice_yields_identical_descriptors() {
        let introspector = introspector();
        let first = introspector.describe("shapes.Leaf").expect("first");
        let second = introspector.describe("shapes.Leaf").expect("second");
        assert_eq!(first, second);
    }
}
