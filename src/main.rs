use clap::Parser;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use xmlmap::{MappingConfig, TransformError};

/// Maps an XML document to JSON records using a mapping configuration.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Mapping configuration (JSON with context, namespaces, filter and mapping)
    #[arg(short, long)]
    config: PathBuf,

    /// XML document to transform
    input: PathBuf,

    /// Print only the first record
    #[arg(long, default_value_t = false)]
    first: bool,

    /// Drop null and empty values, regardless of the configuration
    #[arg(long, default_value_t = false)]
    filter: bool,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn run(args: &Args) -> Result<String, TransformError> {
    let config = MappingConfig::from_file(&args.config)?;
    let mut transformer = config.into_transformer()?;
    if args.filter {
        transformer.set_filter_empty(true);
    }
    transformer.bind_file(&args.input);

    let output = if args.first {
        transformer.transform_first()?
    } else {
        Value::Array(transformer.transform_all()?)
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(json)
}

fn main() -> ExitCode {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "xmlmap=warn");
        }
    }
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
