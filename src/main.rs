mod ambari;
mod cli;
mod config;
mod filters;
mod module;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;

use cli::{Args, Command};
use config::Config;
use report::ModuleResult;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the module JSON, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ambari_facts=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Module { args_file } => {
            let result = module::run(&args_file).await;
            emit(&result, args.pretty)
        }
        Command::Facts(facts_args) => {
            let config = Config::load();
            let params = facts_args.resolve(&config);
            let result = module::gather(&params).await;
            emit(&result, args.pretty)
        }
        Command::Filter { name, file } => {
            let filter = filters::find(&name)
                .with_context(|| format!("Unknown filter: {name} (see `ambari-facts filters`)"))?;
            print_json(&filter.run(&file)?, args.pretty)
        }
        Command::Hosts { file } => {
            let hosts = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read resolver config: {}", file.display()))
                .map(|contents| filters::hosts::extract_hosts(&contents))?;
            print_json(&Value::from(hosts), args.pretty)
        }
        Command::Filters => {
            for filter in filters::registry() {
                println!("{:<24} {}", filter.name, filter.description);
            }
            Ok(())
        }
    }
}

/// Print a module result; a failed result exits with status 1 as Ansible
/// modules do.
fn emit(result: &ModuleResult, pretty: bool) -> Result<()> {
    println!("{}", result.to_json(pretty)?);
    if result.is_failed() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
