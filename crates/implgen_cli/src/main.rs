// implgen CLI entry point
use clap::{CommandFactory, Parser};
use implgen_cli::{
    configuration_error, get_version, init_logging, run_generate, Cli, Commands, GenerateArgs,
    ImplgenConfig,
};
use implgen_model::ImplError;
use std::path::Path;
use std::process;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Generate(args)) => generate(&args),
        Some(Commands::Version) => {
            println!("{}", get_version());
            Ok(())
        }
        None => {
            eprintln!("{}", Cli::command().render_help());
            process::exit(2);
        }
    };

    if let Err(error) = result {
        eprintln!("error[{}]: {}", error.category(), error);
        process::exit(error.exit_code());
    }
}

fn generate(args: &GenerateArgs) -> Result<(), ImplError> {
    init_logging(args.log_level.as_deref()).map_err(configuration_error)?;
    let config = ImplgenConfig::resolve(args.config.as_deref(), Path::new("."))
        .map_err(configuration_error)?;

    let outcome = run_generate(args, &config)?;
    println!("{}", outcome);
    Ok(())
}
