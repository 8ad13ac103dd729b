use super::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_case::test_case;

const CATALOG: &str = r#"{
    "types": [
        {
            "name": "shop.Priced",
            "kind": "interface",
            "modifiers": ["public", "interface", "abstract"],
            "methods": [
                { "name": "price", "return_type": "long", "modifiers": ["public", "abstract"] }
            ]
        },
        {
            "name": "shop.Receipt",
            "modifiers": ["public", "final"]
        }
    ]
}"#;

fn parse(args: &[&str]) -> GenerateArgs {
    let cli = Cli::try_parse_from(args).expect("parse");
    match cli.command {
        Some(Commands::Generate(args)) => args,
        _ => panic!("Expected Generate command"),
    }
}

fn catalog_file(dir: &Path) -> PathBuf {
    let path = dir.join("types.json");
    fs::write(&path, CATALOG).expect("write catalog");
    path
}

fn offline_args(type_name: &str, catalog: &Path, output: &Path) -> GenerateArgs {
    GenerateArgs {
        type_name: type_name.to_string(),
        catalogs: vec![catalog.to_path_buf()],
        output: Some(output.to_path_buf()),
        no_jdk: true,
        ..GenerateArgs::default()
    }
}

#[test]
fn test_cli_parsing() {
    let cli = Cli::try_parse_from(["implgen", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Version)));

    let args = parse(&["implgen", "generate", "java.util.Comparator"]);
    assert_eq!(args.type_name, "java.util.Comparator");
    assert!(!args.archive);
    assert_eq!(
        args.destination().unwrap(),
        Destination::Directory(PathBuf::from("."))
    );
}

#[test]
fn test_generate_options_parsing() {
    let args = parse(&[
        "implgen",
        "generate",
        "a.B",
        "-o",
        "out",
        "--classpath",
        "lib/a.jar",
        "--classpath",
        "classes",
        "--catalog",
        "one.json",
        "--catalog",
        "two.json",
        "--no-jdk",
        "--config",
        "custom.toml",
        "--log-level",
        "debug",
    ]);
    assert_eq!(args.output, Some(PathBuf::from("out")));
    assert_eq!(args.classpath, vec!["lib/a.jar", "classes"]);
    assert_eq!(
        args.catalogs,
        vec![PathBuf::from("one.json"), PathBuf::from("two.json")]
    );
    assert!(args.no_jdk);
    assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
    assert_eq!(args.log_level.as_deref(), Some("debug"));
}

#[test]
fn test_archive_mode_parsing() {
    let args = parse(&["implgen", "generate", "--archive", "a.B", "dist/b.jar"]);
    assert_eq!(
        args.destination().unwrap(),
        Destination::Archive(PathBuf::from("dist/b.jar"))
    );
}

#[test]
fn output_and_archive_are_mutually_exclusive() {
    let result = Cli::try_parse_from([
        "implgen", "generate", "--archive", "a.B", "b.jar", "--output", "out",
    ]);
    assert!(result.is_err());
}

#[test_case(&["implgen", "generate", "--archive", "a.B"], "requires an archive path" ; "archive without path")]
#[test_case(&["implgen", "generate", "a.B", "b.jar"], "pass --archive" ; "path without archive")]
#[test_case(&["implgen", "generate", "  "], "must not be empty" ; "blank type name")]
fn malformed_shapes_are_invalid_arguments(argv: &[&str], message: &str) {
    let error = parse(argv).destination().expect_err("invalid shape");
    assert_eq!(error.category(), "InvalidArgument");
    assert!(error.to_string().contains(message), "{}", error);
}

#[test]
fn generates_into_the_output_directory() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = catalog_file(dir.path());
    let output = dir.path().join("out");

    let outcome = run_generate(
        &offline_args("shop.Priced", &catalog, &output),
        &ImplgenConfig::default(),
    )
    .expect("generate");

    let unit = match outcome {
        Outcome::Emitted(unit) => unit,
        other => panic!("expected emitted unit, got {:?}", other),
    };
    assert_eq!(unit.qualified_name, "shop.PricedImpl");
    let source = fs::read_to_string(output.join("shop").join("PricedImpl.java")).expect("read");
    assert!(source.starts_with("package shop;\n\npublic class PricedImpl implements shop.Priced {"));
    assert!(source.contains("return 0L;"));
}

#[test]
fn configuration_shapes_the_generated_unit() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = catalog_file(dir.path());
    let output = dir.path().join("out");
    let config = ImplgenConfig::from_toml_str("[codegen]\nsuffix = \"Stub\"\nindent = \"\\t\"\n")
        .expect("config");

    let outcome = run_generate(&offline_args("shop.Priced", &catalog, &output), &config)
        .expect("generate");
    assert_eq!(
        outcome.to_string(),
        format!(
            "generated shop.PricedStub at {}",
            output.join("shop").join("PricedStub.java").display()
        )
    );
    let source = fs::read_to_string(output.join("shop").join("PricedStub.java")).expect("read");
    assert!(source.contains("\n\tpublic long price() {\n\t\treturn 0L;\n\t}\n"));
}

#[test]
fn catalogs_from_configuration_are_used() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = catalog_file(dir.path());
    let output = dir.path().join("out");
    let mut config = ImplgenConfig::default();
    config.introspect.catalogs.push(catalog);
    config.introspect.jdk_modules = false;

    let args = GenerateArgs {
        type_name: "shop.Priced".to_string(),
        output: Some(output.clone()),
        ..GenerateArgs::default()
    };
    run_generate(&args, &config).expect("generate");
    assert!(output.join("shop").join("PricedImpl.java").is_file());
}

#[test]
fn final_types_are_rejected_without_output() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = catalog_file(dir.path());
    let output = dir.path().join("out");

    let error = run_generate(
        &offline_args("shop.Receipt", &catalog, &output),
        &ImplgenConfig::default(),
    )
    .expect_err("final");
    assert_eq!(error.category(), "NotImplementable");
    assert_eq!(error.exit_code(), 4);
    assert!(!output.exists());
}

#[test]
fn unknown_types_are_not_introspectable() {
    let dir = TempDir::new().expect("temp dir");
    let catalog = catalog_file(dir.path());

    let error = run_generate(
        &offline_args("shop.Missing", &catalog, dir.path()),
        &ImplgenConfig::default(),
    )
    .expect_err("unknown");
    assert_eq!(error.category(), "NotIntrospectable");
    assert!(error.to_string().contains("shop.Missing"));
}

#[test]
fn missing_catalog_is_an_io_failure() {
    let dir = TempDir::new().expect("temp dir");
    let error = run_generate(
        &offline_args("shop.Priced", &dir.path().join("absent.json"), dir.path()),
        &ImplgenConfig::default(),
    )
    .expect_err("missing catalog");
    assert_eq!(error.category(), "IOFailure");
}

#[test]
fn command_line_classpath_precedes_configured_entries() {
    let mut config = ImplgenConfig::default();
    config.introspect.classpath.push(PathBuf::from("/configured"));
    let args = GenerateArgs {
        type_name: "a.B".to_string(),
        classpath: vec!["/first".to_string()],
        ..GenerateArgs::default()
    };
    assert_eq!(
        user_classpath(&args, &config),
        vec![PathBuf::from("/first"), PathBuf::from("/configured")]
    );
}

#[test]
fn configuration_errors_use_the_invalid_argument_category() {
    let error = ImplgenConfig::from_toml_str("[build\n").expect_err("broken toml");
    let error = configuration_error(error);
    assert_eq!(error.category(), "InvalidArgument");
    assert!(error.to_string().contains("invalid implgen configuration"));
}

#[test]
fn version_names_the_tool() {
    assert!(get_version().starts_with("implgen "));
}
