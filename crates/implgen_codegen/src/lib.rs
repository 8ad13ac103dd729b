// implgen_codegen - Minimal concrete implementations of abstract Java types
mod builder;
mod config;
mod constructors;
mod eligibility;
mod emit;
mod signatures;
mod stubs;

pub use builder::{GeneratedUnit, JavaSourceBuilder, Relation};
pub use config::CodeGenConfig;
pub use constructors::{resolve_constructor, ConstructorPlan};
pub use eligibility::check_implementable;
pub use emit::{write_unit, EmissionTarget, EmittedUnit};
pub use signatures::{abstract_members, SignatureDeduplicator};
pub use stubs::{default_value, render_constructor, render_method};

use implgen_model::{ImplError, TypeDescriptor, TypeName};
use std::path::Path;
use tracing::{debug, info};

/// Generates `<Name>Impl` units for interfaces and abstract classes.
///
/// Holds only configuration, so one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Implementor {
    config: CodeGenConfig,
}

impl Implementor {
    pub fn new(config: CodeGenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodeGenConfig {
        &self.config
    }

    /// Build the unit for `descriptor` without touching the file system.
    pub fn generate(&self, descriptor: &TypeDescriptor) -> Result<GeneratedUnit, ImplError> {
        check_implementable(descriptor)?;

        let class_name = self.config.class_name(descriptor.name.simple_name());
        let (relation, constructor) = if descriptor.is_interface() {
            (Relation::Implements, None)
        } else {
            let constructor = match resolve_constructor(descriptor)? {
                ConstructorPlan::Implicit => None,
                ConstructorPlan::Delegate(ctor) => {
                    Some(render_constructor(ctor, &class_name, &self.config.indent))
                }
            };
            (Relation::Extends, constructor)
        };

        let methods: Vec<String> = abstract_members(descriptor)
            .into_iter()
            .map(|method| render_method(method, &self.config.indent))
            .collect();

        debug!(
            type_name = descriptor.name.binary_name(),
            stubs = methods.len(),
            delegating_constructor = constructor.is_some(),
            "generated implementation unit"
        );

        Ok(GeneratedUnit {
            package: descriptor.name.package().to_string(),
            class_name,
            relation,
            target: descriptor.name.source_name(),
            constructor,
            methods,
        })
    }

    /// Generate the unit and write it under `root` in the package layout.
    pub fn implement(
        &self,
        descriptor: &TypeDescriptor,
        root: &Path,
    ) -> Result<EmittedUnit, ImplError> {
        if root.as_os_str().is_empty() {
            return Err(ImplError::invalid_argument("output root must not be empty"));
        }
        let unit = self.generate(descriptor)?;
        self.emit(&unit, &descriptor.name, root)
    }

    /// Write an already generated unit for `target` under `root`.
    pub fn emit(
        &self,
        unit: &GeneratedUnit,
        target: &TypeName,
        root: &Path,
    ) -> Result<EmittedUnit, ImplError> {
        let emission = EmissionTarget::resolve(root, target, &self.config);
        write_unit(&emission, &unit.to_source(&self.config))?;
        info!(
            type_name = target.binary_name(),
            path = %emission.unit_path().display(),
            "emitted implementation"
        );

        let qualified_name = if unit.package.is_empty() {
            unit.class_name.clone()
        } else {
            format!("{}.{}", unit.package, unit.class_name)
        };
        Ok(EmittedUnit {
            target: emission,
            class_name: unit.class_name.clone(),
            qualified_name,
        })
    }
}
