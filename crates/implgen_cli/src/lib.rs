// implgen_cli - Command surface for generating Java implementations
use clap::Parser;
use implgen_build::{discover_jdk, ArchivePipeline, Javac, PackagedUnit};
use implgen_codegen::{EmittedUnit, Implementor};
use implgen_introspect::{
    CatalogSource, ClasspathSource, Introspector, SourceChain, TypeIntrospector,
};
use implgen_model::ImplError;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod config;
pub mod logging;

pub use config::{ImplgenConfig, IntrospectConfig, CONFIG_FILE_NAME};
pub use logging::init_logging;

#[derive(Parser)]
#[command(name = "implgen")]
#[command(about = "Generate minimal implementations of Java interfaces and abstract classes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate an implementation of an interface or abstract class
    Generate(GenerateArgs),
    /// Show version information
    Version,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Compile the implementation and package it into ARCHIVE_PATH
    #[arg(long)]
    pub archive: bool,

    /// Qualified name of the type to implement
    pub type_name: String,

    /// Destination archive (requires --archive)
    pub archive_path: Option<PathBuf>,

    /// Root directory for the generated source
    #[arg(short, long, conflicts_with = "archive")]
    pub output: Option<PathBuf>,

    /// Class path entries; each value may hold several separated by the
    /// platform path separator
    #[arg(long = "classpath", value_name = "PATH")]
    pub classpath: Vec<String>,

    /// JSON type catalogs
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalogs: Vec<PathBuf>,

    /// Do not add the JDK's modules to the class path
    #[arg(long)]
    pub no_jdk: bool,

    /// Configuration file (defaults to ./implgen.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Where `generate` puts its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl GenerateArgs {
    /// Check the argument shape clap cannot express and pick the destination.
    pub fn destination(&self) -> Result<Destination, ImplError> {
        if self.type_name.trim().is_empty() {
            return Err(ImplError::invalid_argument("type name must not be empty"));
        }
        match (self.archive, &self.archive_path) {
            (true, Some(path)) => Ok(Destination::Archive(path.clone())),
            (true, None) => Err(ImplError::invalid_argument(
                "--archive requires an archive path",
            )),
            (false, Some(path)) => Err(ImplError::invalid_argument(format!(
                "unexpected argument '{}'; pass --archive to package the implementation",
                path.display()
            ))),
            (false, None) => Ok(Destination::Directory(
                self.output.clone().unwrap_or_else(|| PathBuf::from(".")),
            )),
        }
    }
}

/// Result of a successful `generate`.
#[derive(Debug, Clone)]
pub enum Outcome {
    Emitted(EmittedUnit),
    Packaged(PackagedUnit),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Emitted(unit) => write!(
                f,
                "generated {} at {}",
                unit.qualified_name,
                unit.unit_path().display()
            ),
            Outcome::Packaged(unit) => write!(
                f,
                "packaged {} into {}",
                unit.qualified_name,
                unit.archive_path.display()
            ),
        }
    }
}

/// Class path entries from the command line followed by those from the
/// configuration file.
pub fn user_classpath(args: &GenerateArgs, config: &ImplgenConfig) -> Vec<PathBuf> {
    let mut classpath = ClasspathSource::from_raw(&args.classpath);
    classpath.add_entries(config.introspect.classpath.iter().cloned());
    classpath.entries().to_vec()
}

/// Catalogs first, then the class path (plus the JDK's modules unless
/// disabled by `--no-jdk` or the configuration).
pub fn declaration_sources(
    args: &GenerateArgs,
    config: &ImplgenConfig,
) -> Result<SourceChain, ImplError> {
    let mut catalog = CatalogSource::new();
    for path in args.catalogs.iter().chain(&config.introspect.catalogs) {
        catalog.merge(CatalogSource::load_file(path)?);
    }

    let mut classpath = ClasspathSource::new(user_classpath(args, config));
    if config.introspect.jdk_modules && !args.no_jdk {
        if let Some(java_home) = jdk_home(config.build.javac.as_deref()) {
            classpath = classpath.with_jdk_modules(&java_home);
        }
    }
    debug!(
        catalog_types = catalog.len(),
        classpath_entries = classpath.entries().len(),
        "declaration sources ready"
    );

    Ok(SourceChain::new().with(catalog).with(classpath))
}

/// Home of the JDK that compiles archives, so introspection and compilation
/// see the same platform classes.
fn jdk_home(javac: Option<&Path>) -> Option<PathBuf> {
    match discover_jdk(javac) {
        Ok(jdk) => {
            if jdk.java_home.is_none() {
                debug!(javac = %jdk.javac_path.display(), "JDK home unknown; skipping JDK modules");
            }
            jdk.java_home
        }
        Err(error) => {
            debug!(%error, "no JDK found; java.* supertypes must come from the class path");
            None
        }
    }
}

/// Run `implgen generate` with an already loaded configuration.
pub fn run_generate(args: &GenerateArgs, config: &ImplgenConfig) -> Result<Outcome, ImplError> {
    let destination = args.destination()?;
    let introspector = Introspector::new(declaration_sources(args, config)?);
    let descriptor = introspector.describe(args.type_name.trim())?;
    let implementor = Implementor::new(config.codegen.clone());

    match destination {
        Destination::Directory(root) => implementor
            .implement(&descriptor, &root)
            .map(Outcome::Emitted),
        Destination::Archive(archive_path) => {
            ArchivePipeline::new(implementor, Javac::new(config.build.clone()))
                .with_classpath(user_classpath(args, config))
                .run(&descriptor, &archive_path)
                .map(Outcome::Packaged)
        }
    }
}

/// Configuration problems are reported under the `InvalidArgument` category.
pub fn configuration_error(error: anyhow::Error) -> ImplError {
    ImplError::invalid_argument(format!("{:#}", error))
}

pub fn get_version() -> String {
    format!(
        "implgen {} - Java implementation synthesizer",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests;
