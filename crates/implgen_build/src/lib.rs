// implgen_build - javac integration and jar packaging for generated units
mod archive;
mod compiler;
mod config;
mod jdk;
mod pipeline;

pub use archive::write_single_entry_archive;
pub use compiler::{CompileStatus, JavaCompiler, Javac};
pub use config::BuildConfig;
pub use jdk::{discover_jdk, JdkError, JdkInfo};
pub use pipeline::{ArchivePipeline, PackagedUnit};
