#![allow(clippy::print_stdout, clippy::print_stderr)] // CLI binary: stdout/stderr is the UI

mod cli;
mod config;
mod memory_tools;
mod tracing_setup;

use anyhow::{Context, Result};
use clap::Parser;
use mnemo_core::traits::{ToolContext, ToolExecutor};
use mnemo_core::types::ToolOutput;
use mnemo_core::{Clock, SystemClock};
use mnemo_memory::{FileMemory, MemoryPaths, MemoryStore, SeedOutcome};
use serde_json::{Map, Value, json};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::memory_tools::{MEMORY_TOOL, MemoryToolExecutor};

const CLI_SESSION: &str = "mnemo:cli";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _tracing_guard = tracing_setup::init();

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        pid = std::process::id(),
        "mnemo starting"
    );

    let config = Config::load_or_default(cli.config.as_deref())?;
    let base = config.resolve_base_dir(cli.dir.as_deref());

    match cli.command {
        Commands::Schema => {
            let schema = serde_json::to_string_pretty(&MemoryToolExecutor::definition())?;
            println!("{schema}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Path => {
            println!("{}", base.display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init => cmd_init(base),
        Commands::Context => {
            let memory = open_memory(base)?;
            let context = memory.build_context();
            if !context.is_empty() {
                println!("{context}");
            }
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let arguments = tool_arguments(command)?;
            let memory = open_memory(base)?;
            let executor =
                MemoryToolExecutor::new(Arc::new(memory) as Arc<dyn MemoryStore>, config.limits());
            let output = executor
                .execute(MEMORY_TOOL, arguments, &ToolContext::new(CLI_SESSION))
                .await?;
            Ok(report(&output))
        }
    }
}

fn cmd_init(base: PathBuf) -> Result<ExitCode> {
    let memory = build_memory(base);
    match memory.initialize()? {
        SeedOutcome::Seeded(created) => {
            println!("Initialized memory at {}", memory.paths().base().display());
            for path in created {
                println!("  created {}", path.display());
            }
        }
        SeedOutcome::AlreadyInitialized => {
            println!(
                "Memory already initialized at {}",
                memory.paths().base().display()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn build_memory(base: PathBuf) -> FileMemory {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    FileMemory::new(MemoryPaths::new(base), clock)
}

fn open_memory(base: PathBuf) -> Result<FileMemory> {
    let memory = build_memory(base);
    let outcome = memory.initialize().with_context(|| {
        format!(
            "failed to initialize memory at {}",
            memory.paths().base().display()
        )
    })?;
    if let SeedOutcome::Seeded(created) = outcome {
        info!(files = created.len(), "seeded first-run templates");
    }
    Ok(memory)
}

/// Map a subcommand onto `memory` tool arguments.
fn tool_arguments(command: Commands) -> Result<Value> {
    let mut args = Map::new();
    match command {
        Commands::Read { target, date } => {
            args.insert("action".to_owned(), json!("read"));
            insert_opt(&mut args, "target", target);
            insert_opt(&mut args, "date", date);
        }
        Commands::Write {
            target,
            content,
            mode,
            date,
        } => {
            let content = match content {
                Some(content) => content,
                None => read_stdin()?,
            };
            args.insert("action".to_owned(), json!("write"));
            args.insert("target".to_owned(), json!(target));
            args.insert("content".to_owned(), json!(content));
            insert_opt(&mut args, "mode", mode);
            insert_opt(&mut args, "date", date);
        }
        Commands::Search { query, max_results } => {
            args.insert("action".to_owned(), json!("search"));
            args.insert("query".to_owned(), json!(query));
            if let Some(max) = max_results {
                args.insert("max_results".to_owned(), json!(max));
            }
        }
        Commands::List => {
            args.insert("action".to_owned(), json!("list"));
        }
        Commands::Exec { json } => {
            let raw = match json {
                Some(raw) => raw,
                None => read_stdin()?,
            };
            return serde_json::from_str(&raw).context("invalid JSON arguments");
        }
        Commands::Init | Commands::Context | Commands::Schema | Commands::Path => {
            anyhow::bail!("command does not map to a tool call");
        }
    }
    Ok(Value::Object(args))
}

fn insert_opt(args: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        args.insert(key.to_owned(), Value::String(value));
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf.trim_end_matches('\n').to_owned())
}

fn report(output: &ToolOutput) -> ExitCode {
    if output.is_error {
        eprintln!("{}", output.content);
        ExitCode::FAILURE
    } else {
        println!("{}", output.content);
        ExitCode::SUCCESS
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_maps_to_read_action() {
        let args = tool_arguments(Commands::Read {
            target: Some("daily".to_owned()),
            date: Some("2024-03-05".to_owned()),
        })
        .unwrap();
        assert_eq!(
            args,
            json!({"action": "read", "target": "daily", "date": "2024-03-05"})
        );
    }

    #[test]
    fn write_omits_unset_options() {
        let args = tool_arguments(Commands::Write {
            target: "memory".to_owned(),
            content: Some("fact".to_owned()),
            mode: None,
            date: None,
        })
        .unwrap();
        assert_eq!(
            args,
            json!({"action": "write", "target": "memory", "content": "fact"})
        );
    }

    #[test]
    fn search_carries_cap() {
        let args = tool_arguments(Commands::Search {
            query: "rust".to_owned(),
            max_results: Some(3),
        })
        .unwrap();
        assert_eq!(
            args,
            json!({"action": "search", "query": "rust", "max_results": 3})
        );
    }

    #[test]
    fn exec_passes_json_through() {
        let args = tool_arguments(Commands::Exec {
            json: Some(r#"{"action":"list","extra":1}"#.to_owned()),
        })
        .unwrap();
        assert_eq!(args, json!({"action": "list", "extra": 1}));
    }

    #[test]
    fn exec_rejects_bad_json() {
        let err = tool_arguments(Commands::Exec {
            json: Some("{not json".to_owned()),
        })
        .unwrap_err();
        assert!(format!("{err}").contains("invalid JSON arguments"));
    }
}
