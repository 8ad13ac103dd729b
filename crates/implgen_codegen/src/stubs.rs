use crate::builder::JavaSourceBuilder;
use implgen_model::{ConstructorDescriptor, Executable, JavaType, MethodDescriptor, Modifiers};

/// Expression a stub returns for `return_type`; `None` for `void`.
pub fn default_value(return_type: &JavaType) -> Option<String> {
    let value = match return_type {
        JavaType::Void => return None,
        JavaType::Primitive(name) => match name.as_str() {
            "boolean" => "false",
            "long" => "0L",
            "float" => "0.0f",
            "double" => "0.0d",
            "char" => "'\\0'",
            _ => "0",
        }
        .to_string(),
        JavaType::Array {
            element_type,
            dimensions,
        } => format!(
            "new {}[0]{}",
            element_type,
            "[]".repeat(dimensions.saturating_sub(1))
        ),
        JavaType::Reference { .. } => "null".to_string(),
    };
    Some(value)
}

/// Rendered `(<params>)[ throws ...]` part of a declaration, plus the
/// parameter names in order.
struct RenderedParameters {
    declaration: String,
    names: Vec<String>,
}

fn render_parameters(executable: &impl Executable) -> RenderedParameters {
    let parameters = executable.parameters();
    let last = parameters.len().saturating_sub(1);
    let mut rendered = Vec::with_capacity(parameters.len());
    let mut names = Vec::with_capacity(parameters.len());

    for (index, parameter) in parameters.iter().enumerate() {
        let name = format!("p{}", index);
        if index == last && executable.is_variadic() && parameter.is_array() {
            rendered.push(format!("{}... {}", parameter.component_type(), name));
        } else {
            rendered.push(format!("{} {}", parameter, name));
        }
        names.push(name);
    }

    let mut declaration = format!("({})", rendered.join(", "));
    let exceptions = executable.exceptions();
    if !exceptions.is_empty() {
        let list: Vec<String> = exceptions.iter().map(ToString::to_string).collect();
        declaration.push_str(" throws ");
        declaration.push_str(&list.join(", "));
    }

    RenderedParameters { declaration, names }
}

fn header(modifiers: Modifiers, rest: &str) -> String {
    let modifiers = modifiers.to_string();
    if modifiers.is_empty() {
        rest.to_string()
    } else {
        format!("{} {}", modifiers, rest)
    }
}

/// Stub overriding `method` with a body that returns a default value.
pub fn render_method(method: &MethodDescriptor, indent: &str) -> String {
    let modifiers = method
        .modifiers
        .masked(Modifiers::METHOD_MODIFIERS)
        .without(Modifiers::ABSTRACT);
    let parameters = render_parameters(method);
    let signature = header(
        modifiers,
        &format!(
            "{} {}{}",
            method.return_type, method.name, parameters.declaration
        ),
    );

    let mut builder = JavaSourceBuilder::new(indent.to_string());
    builder.push_line(&format!("{} {{", signature));
    builder.indent();
    if let Some(value) = default_value(&method.return_type) {
        builder.push_line(&format!("return {};", value));
    }
    builder.dedent();
    builder.push_line("}");
    builder.build()
}

/// Constructor of `class_name` forwarding its arguments to `ctor`.
pub fn render_constructor(ctor: &ConstructorDescriptor, class_name: &str, indent: &str) -> String {
    let modifiers = ctor.modifiers.masked(Modifiers::CONSTRUCTOR_MODIFIERS);
    let parameters = render_parameters(ctor);
    let signature = header(
        modifiers,
        &format!("{}{}", class_name, parameters.declaration),
    );

    let mut builder = JavaSourceBuilder::new(indent.to_string());
    builder.push_line(&format!("{} {{", signature));
    builder.indent();
    builder.push_line(&format!("super({});", parameters.names.join(", ")));
    builder.dedent();
    builder.push_line("}");
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const INDENT: &str = "    ";

    fn parse(ty: &str) -> JavaType {
        ty.parse().expect("type")
    }

    fn method(name: &str, ret: &str, params: &[&str], modifiers: u32) -> MethodDescriptor {
        MethodDescriptor {
            name: name.to_string(),
            declaring_type: "a.T".to_string(),
            return_type: parse(ret),
            parameters: params.iter().map(|p| parse(p)).collect(),
            exceptions: Vec::new(),
            modifiers: Modifiers::from_bits(modifiers),
        }
    }

    #[test_case("void", None ; "void")]
    #[test_case("boolean", Some("false") ; "boolean")]
    #[test_case("int", Some("0") ; "int")]
    #[test_case("byte", Some("0") ; "byte")]
    #[test_case("long", Some("0L") ; "long")]
    #[test_case("float", Some("0.0f") ; "float")]
    #[test_case("double", Some("0.0d") ; "double")]
    #[test_case("char", Some("'\\0'") ; "char")]
    #[test_case("java.lang.String", Some("null") ; "reference")]
    #[test_case("int[]", Some("new int[0]") ; "primitive array")]
    #[test_case("java.util.Map$Entry[][]", Some("new java.util.Map.Entry[0][]") ; "nested reference matrix")]
    fn defaults(ty: &str, expected: Option<&str>) {
        assert_eq!(default_value(&parse(ty)).as_deref(), expected);
    }

    #[test]
    fn abstract_is_cleared_and_visibility_kept() {
        let stub = render_method(
            &method("size", "int", &[], Modifiers::PROTECTED | Modifiers::ABSTRACT),
            INDENT,
        );
        assert_eq!(stub, "protected int size() {\n    return 0;\n}\n");
    }

    #[test]
    fn void_methods_have_empty_bodies() {
        let stub = render_method(&method("run", "void", &[], Modifiers::ABSTRACT), INDENT);
        assert_eq!(stub, "void run() {\n}\n");
    }

    #[test]
    fn variadic_and_throwing_methods() {
        let mut load = method(
            "format",
            "java.lang.String",
            &["java.lang.String", "java.lang.Object[]"],
            Modifiers::PUBLIC | Modifiers::ABSTRACT | Modifiers::VARARGS,
        );
        load.exceptions = vec![parse("java.io.IOException"), parse("a.Outer$Failure")];
        assert_eq!(
            render_method(&load, INDENT),
            "public java.lang.String format(java.lang.String p0, java.lang.Object... p1) \
             throws java.io.IOException, a.Outer.Failure {\n    return null;\n}\n"
        );
    }

    #[test]
    fn constructor_delegates_every_parameter() {
        let ctor = ConstructorDescriptor {
            parameters: vec![parse("java.lang.String"), parse("int[]")],
            exceptions: Vec::new(),
            modifiers: Modifiers::from_bits(Modifiers::PUBLIC | Modifiers::VARARGS),
        };
        assert_eq!(
            render_constructor(&ctor, "TaskImpl", INDENT),
            "public TaskImpl(java.lang.String p0, int... p1) {\n    super(p0, p1);\n}\n"
        );
    }

    #[test]
    fn package_private_constructor_has_no_modifier_prefix() {
        let ctor = ConstructorDescriptor {
            parameters: vec![parse("long")],
            exceptions: vec![parse("java.lang.Exception")],
            modifiers: Modifiers::empty(),
        };
        assert_eq!(
            render_constructor(&ctor, "BaseImpl", "\t"),
            "BaseImpl(long p0) throws java.lang.Exception {\n\tsuper(p0);\n}\n"
        );
    }
}
