use anyhow::Context;
use clap::Parser;
use graphql_cypher::config::BuilderConfig;
use graphql_cypher::graph_catalog::GraphSchemaConfig;
use graphql_cypher::translate::{translate_read, ReadRequest};
use std::path::PathBuf;

/// graphql-cypher - Translate a read request into Cypher and parameters
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML file with the node descriptors
    #[arg(long)]
    schema: PathBuf,

    /// Node type to read
    #[arg(long)]
    node: String,

    /// Read request as inline JSON, or `@path` to read it from a file
    #[arg(long, default_value = "{}")]
    request: String,

    /// YAML builder configuration; environment variables are used otherwise
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_request(arg: &str) -> anyhow::Result<ReadRequest> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading request file {}", path))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("parsing read request JSON")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => BuilderConfig::from_yaml_file(path)?,
        None => BuilderConfig::from_env()?,
    };
    let schema = GraphSchemaConfig::from_yaml_file(&cli.schema)?.to_graph_schema()?;
    let request = load_request(&cli.request)?;

    let result = translate_read(&schema, &cli.node, &request, &config)?;
    println!("{}", result.cypher);
    println!("{}", serde_json::to_string_pretty(&result.params)?);
    Ok(())
}

fn main() {
    // Defaults to WARN so only the query reaches stdout; override with RUST_LOG
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
