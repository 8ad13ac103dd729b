// implgen_introspect - Type descriptors from class files, archives and JSON catalogs
mod assembler;
mod catalog;
mod classfile;
mod classpath;
mod declaration;

#[cfg(test)]
mod testing;

pub use assembler::{DescriptorAssembler, Introspector, TypeIntrospector};
pub use catalog::{CatalogDocument, CatalogSource};
pub use classfile::{parse_class, parse_method_descriptor, ClassParseError};
pub use classpath::ClasspathSource;
pub use declaration::{ClassDeclaration, DeclarationSource, SourceChain};
