#![allow(clippy::unwrap_used)]
use std::io::BufRead;
use std::sync::Arc;

use mnemo_core::fakes::FixedClock;
use mnemo_core::traits::ToolContext;
use mnemo_memory::{FileMemory, MemoryPaths, MemoryStore};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[path = "../src/memory_tools.rs"]
mod memory_tools;
#[path = "../src/tracing_setup.rs"]
mod tracing_setup;

/// A tool call traced through the JSONL layer yields parseable lines that
/// carry the call's spans.
#[test]
fn tool_calls_are_traced_as_jsonl() {
    let dir = tempfile::tempdir().unwrap();
    let trace_file = dir.path().join("traces.jsonl");

    let (layer, guard) = tracing_setup::jsonl_layer(&trace_file, EnvFilter::new("debug"));
    let subscriber = tracing_subscriber::Registry::default().with(layer);

    let memory = FileMemory::new(
        MemoryPaths::new(dir.path().join("memory")),
        Arc::new(FixedClock::at("2024-03-05T10:00:00Z")),
    );
    let executor = memory_tools::MemoryToolExecutor::new(
        Arc::new(memory) as Arc<dyn MemoryStore>,
        memory_tools::MemoryToolLimits::default(),
    );

    tracing::subscriber::with_default(subscriber, || {
        let output = executor.run(
            &serde_json::json!({"action": "write", "target": "memory", "content": "traced"}),
            &ToolContext::new("trace-test"),
        );
        assert!(!output.is_error);
    });

    // Flush the non-blocking writer
    drop(guard);

    let file = std::fs::File::open(&trace_file).unwrap();
    let lines: Vec<serde_json::Value> = std::io::BufReader::new(file)
        .lines()
        .map(|l| l.unwrap())
        .filter(|l| !l.is_empty())
        .map(|l| {
            serde_json::from_str(&l).unwrap_or_else(|e| panic!("invalid JSON: {e}\nline: {l}"))
        })
        .collect();

    assert!(!lines.is_empty(), "expected JSONL output");
    for line in &lines {
        assert!(line.get("timestamp").is_some(), "missing timestamp");
        assert!(line.get("level").is_some(), "missing level");
    }

    let write_event = lines
        .iter()
        .find(|l| l["fields"]["message"] == "memory write complete")
        .expect("missing write event");
    let spans = write_event["spans"].as_array().expect("missing spans array");
    assert!(spans.iter().any(|s| s["name"] == "run"));
    assert!(spans.iter().any(|s| s["session"] == "trace-test"));
    assert!(spans.iter().any(|s| s["name"] == "write"));
}
