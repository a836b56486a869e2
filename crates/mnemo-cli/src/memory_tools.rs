use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mnemo_core::traits::{ToolContext, ToolExecutor};
use mnemo_core::types::{ToolDef, ToolOutput};
use mnemo_memory::{
    ListResult, MemoryStore, SearchHit, TARGET_NAMES, Target, WriteMode, parse_daily_date,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, instrument};

pub(crate) const MEMORY_TOOL: &str = "memory";

pub(crate) const DEFAULT_MAX_RESULTS: usize = 20;
pub(crate) const DEFAULT_DAILY_LIST_LIMIT: usize = 10;

/// Tunables for result rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MemoryToolLimits {
    /// Search cap when the caller omits `max_results`.
    pub max_results: usize,
    /// Daily logs shown by `list` before collapsing into "... and N more".
    pub daily_list_limit: usize,
}

impl Default for MemoryToolLimits {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            daily_list_limit: DEFAULT_DAILY_LIST_LIMIT,
        }
    }
}

/// A validated request. Building one never touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Read(Target),
    Write {
        target: Target,
        content: String,
        mode: WriteMode,
    },
    Search {
        query: String,
        max_results: usize,
    },
    List,
}

/// Adapter exposing a [`MemoryStore`] as the single `memory` tool.
#[allow(missing_debug_implementations)]
pub(crate) struct MemoryToolExecutor {
    memory: Arc<dyn MemoryStore>,
    limits: MemoryToolLimits,
}

impl MemoryToolExecutor {
    pub(crate) fn new(memory: Arc<dyn MemoryStore>, limits: MemoryToolLimits) -> Self {
        Self { memory, limits }
    }

    pub(crate) fn definition() -> ToolDef {
        ToolDef::new(
            MEMORY_TOOL,
            "\
Manage memory files for persistent context across sessions.

**Actions:**
- `read`: Read a memory file (memory, identity, user, daily), or list all when no target is given
- `write`: Write to a memory file (memory, identity, user, daily) with append or overwrite mode
- `search`: Search across all memory files
- `list`: List all memory files

**Targets:**
- `memory`: MEMORY.md - Long-term memory (crucial facts, decisions, preferences)
- `identity`: IDENTITY.md - Agent identity (name, persona, behavioral rules)
- `user`: USER.md - User profile (name, preferences, context)
- `daily`: daily/YYYY-MM-DD.md - Daily logs (day-to-day activities)",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": ["read", "write", "search", "list"],
                        "description": "Action to perform"
                    },
                    "target": {
                        "type": "string",
                        "enum": TARGET_NAMES,
                        "description": "Target file: memory, identity, user, or daily"
                    },
                    "content": {
                        "type": "string",
                        "description": "Content to write (for write action)"
                    },
                    "mode": {
                        "type": "string",
                        "enum": ["append", "overwrite"],
                        "description": "Write mode (default: append)"
                    },
                    "date": {
                        "type": "string",
                        "description": "Date for daily log (YYYY-MM-DD), defaults to today"
                    },
                    "query": {
                        "type": "string",
                        "description": "Search query (for search action)"
                    },
                    "max_results": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Max search results (default: 20)"
                    }
                },
                "required": ["action"]
            }),
        )
    }

    /// Run one `memory` call. Every outcome, including failure, is text.
    #[instrument(skip(self, arguments, ctx), fields(session = %ctx.session_id))]
    pub(crate) fn run(&self, arguments: &Value, ctx: &ToolContext) -> ToolOutput {
        let request = match self.parse_request(arguments) {
            Ok(request) => request,
            Err(output) => return output,
        };
        debug!(?request, "memory request");

        if let Err(e) = self.memory.ensure_directories() {
            error!(error = %e, "failed to prepare memory directories");
            return ToolOutput::error(format!("failed to prepare memory directory: {e:#}"));
        }

        match request {
            Request::Read(target) => self.exec_read(target),
            Request::Write {
                target,
                content,
                mode,
            } => self.exec_write(target, &content, mode),
            Request::Search { query, max_results } => self.exec_search(&query, max_results),
            Request::List => ToolOutput::success(render_list(
                &self.memory.list(),
                self.limits.daily_list_limit,
            )),
        }
    }

    fn parse_request(&self, arguments: &Value) -> Result<Request, ToolOutput> {
        let Some(action) = str_arg(arguments, "action") else {
            return Err(ToolOutput::error(
                "Error: action is required. Use 'read', 'write', 'search', or 'list'.",
            ));
        };

        match action {
            "read" => match str_arg(arguments, "target") {
                None => Ok(Request::List),
                Some(name) => Ok(Request::Read(self.parse_target(name, arguments)?)),
            },
            "write" => {
                let Some(content) = str_arg(arguments, "content") else {
                    return Err(ToolOutput::error(
                        "Error: content is required for write action.",
                    ));
                };
                let Some(name) = str_arg(arguments, "target") else {
                    return Err(ToolOutput::error(
                        "Error: target is required for write action.",
                    ));
                };
                let mode = match str_arg(arguments, "mode") {
                    None => WriteMode::default(),
                    Some(raw) => WriteMode::parse(raw).ok_or_else(|| {
                        ToolOutput::error(format!(
                            "Unknown mode: {raw}. Use 'append' or 'overwrite'."
                        ))
                    })?,
                };
                Ok(Request::Write {
                    target: self.parse_target(name, arguments)?,
                    content: content.to_owned(),
                    mode,
                })
            }
            "search" => {
                let Some(query) = str_arg(arguments, "query") else {
                    return Err(ToolOutput::error(
                        "Error: query is required for search action.",
                    ));
                };
                let max_results = match arguments.get("max_results") {
                    None | Some(Value::Null) => self.limits.max_results,
                    Some(raw) => parse_max_results(raw).ok_or_else(|| {
                        ToolOutput::error(format!(
                            "Invalid max_results: {raw}. Use a non-negative integer."
                        ))
                    })?,
                };
                Ok(Request::Search {
                    query: query.to_owned(),
                    max_results,
                })
            }
            "list" => Ok(Request::List),
            other => Err(ToolOutput::error(format!("Unknown action: {other}"))),
        }
    }

    /// `date` only matters for `daily`; other targets ignore it.
    fn parse_target(&self, name: &str, arguments: &Value) -> Result<Target, ToolOutput> {
        let date = match str_arg(arguments, "date") {
            Some(raw) if name == "daily" => Some(parse_daily_date(raw).ok_or_else(|| {
                ToolOutput::error(format!("Invalid date: {raw}. Use YYYY-MM-DD."))
            })?),
            _ => None,
        };
        Target::parse(name, date, self.today()).ok_or_else(|| {
            ToolOutput::error(format!(
                "Unknown target: {name}. Use 'memory', 'identity', 'user', or 'daily'."
            ))
        })
    }

    fn today(&self) -> NaiveDate {
        self.memory.today()
    }

    #[instrument(skip(self))]
    fn exec_read(&self, target: Target) -> ToolOutput {
        match self.memory.read(target) {
            Ok(Some(content)) => ToolOutput::success(content),
            Ok(None) => ToolOutput::success(format!("{target} not found or empty.")),
            Err(e) => {
                error!(error = %e, "memory read failed");
                ToolOutput::error(format!("failed to read {target}: {e:#}"))
            }
        }
    }

    #[instrument(skip(self, content))]
    fn exec_write(&self, target: Target, content: &str, mode: WriteMode) -> ToolOutput {
        match self.memory.write(target, content, mode) {
            Ok(()) => {
                let verb = match mode {
                    WriteMode::Overwrite => "Wrote to",
                    WriteMode::Append => "Appended to",
                };
                ToolOutput::success(format!("{verb} {target}"))
            }
            Err(e) => {
                error!(error = %e, "memory write failed");
                ToolOutput::error(format!("failed to write {target}: {e:#}"))
            }
        }
    }

    #[instrument(skip(self))]
    fn exec_search(&self, query: &str, max_results: usize) -> ToolOutput {
        ToolOutput::success(render_search(query, &self.memory.search(query, max_results)))
    }
}

#[async_trait]
impl ToolExecutor for MemoryToolExecutor {
    async fn execute(&self, name: &str, arguments: Value, ctx: &ToolContext) -> Result<ToolOutput> {
        if name != MEMORY_TOOL {
            return Ok(ToolOutput::error(format!("unknown tool: {name}")));
        }
        Ok(self.run(&arguments, ctx))
    }

    fn tools(&self) -> Vec<ToolDef> {
        vec![Self::definition()]
    }
}

/// A string argument; empty strings count as absent.
fn str_arg<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// A non-negative integer, also accepted as an integral float (`2.0`).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn parse_max_results(raw: &Value) -> Option<usize> {
    // Largest float below which every integer is exact.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if let Some(n) = raw.as_u64() {
        return usize::try_from(n).ok();
    }
    let n = raw.as_f64()?;
    if n < 0.0 || n > MAX_EXACT || n.fract() != 0.0 {
        return None;
    }
    usize::try_from(n as u64).ok()
}

fn render_search(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No results for \"{query}\".");
    }
    let lines = hits
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    format!("Found {} results:\n\n{lines}", hits.len())
}

fn render_list(listing: &ListResult, daily_limit: usize) -> String {
    let mut parts = Vec::new();

    if !listing.root.is_empty() {
        let root = listing
            .root
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n");
        parts.push(format!("Root files:\n{root}"));
    }

    if !listing.daily.is_empty() {
        let total = listing.daily.len();
        let shown = listing
            .daily
            .iter()
            .take(daily_limit)
            .map(|name| format!("- daily/{name}"))
            .collect::<Vec<_>>()
            .join("\n");
        let more = if total > daily_limit {
            format!("\n  ... and {} more", total - daily_limit)
        } else {
            String::new()
        };
        parts.push(format!("Daily logs ({total}):\n{shown}{more}"));
    }

    if parts.is_empty() {
        return "No memory files found.".to_owned();
    }
    parts.join("\n\n")
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn listing(root: &[&str], daily: &[&str]) -> ListResult {
        ListResult {
            root: root.iter().map(|s| (*s).to_owned()).collect(),
            daily: daily.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn list_renders_both_halves() {
        let out = render_list(
            &listing(&["MEMORY.md", "USER.md"], &["2024-03-05.md", "2024-01-01.md"]),
            10,
        );
        assert_eq!(
            out,
            "Root files:\n- MEMORY.md\n- USER.md\n\nDaily logs (2):\n- daily/2024-03-05.md\n- daily/2024-01-01.md"
        );
    }

    #[test]
    fn list_collapses_old_daily_logs() {
        let daily = (1..=12)
            .rev()
            .map(|d| format!("2024-01-{d:02}.md"))
            .collect::<Vec<_>>();
        let daily_refs = daily.iter().map(String::as_str).collect::<Vec<_>>();

        let out = render_list(&listing(&[], &daily_refs), 10);

        assert!(out.starts_with("Daily logs (12):\n- daily/2024-01-12.md"));
        assert!(out.contains("- daily/2024-01-03.md"));
        assert!(!out.contains("2024-01-02.md"));
        assert!(out.ends_with("\n  ... and 2 more"));
    }

    #[test]
    fn empty_list_has_message() {
        assert_eq!(render_list(&listing(&[], &[]), 10), "No memory files found.");
    }

    #[test]
    fn search_rendering() {
        assert_eq!(render_search("x", &[]), "No results for \"x\".");
        let hits = vec![SearchHit {
            file: "MEMORY.md".to_owned(),
            line: 4,
            text: "x marks".to_owned(),
        }];
        assert_eq!(render_search("x", &hits), "Found 1 results:\n\nMEMORY.md:4: x marks");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let args = serde_json::json!({"content": "", "target": "memory", "n": 3});
        assert_eq!(str_arg(&args, "content"), None);
        assert_eq!(str_arg(&args, "target"), Some("memory"));
        assert_eq!(str_arg(&args, "n"), None);
        assert_eq!(str_arg(&args, "absent"), None);
    }

    #[test]
    fn max_results_accepts_integral_numbers_only() {
        assert_eq!(parse_max_results(&serde_json::json!(3)), Some(3));
        assert_eq!(parse_max_results(&serde_json::json!(0)), Some(0));
        assert_eq!(parse_max_results(&serde_json::json!(2.0)), Some(2));
        assert_eq!(parse_max_results(&serde_json::json!(2.5)), None);
        assert_eq!(parse_max_results(&serde_json::json!(-1)), None);
        assert_eq!(parse_max_results(&serde_json::json!(-1.0)), None);
        assert_eq!(parse_max_results(&serde_json::json!(1e300)), None);
        assert_eq!(parse_max_results(&serde_json::json!("2")), None);
        assert_eq!(parse_max_results(&serde_json::json!(true)), None);
    }

    #[test]
    fn definition_schema_lists_targets() {
        let def = MemoryToolExecutor::definition();
        assert_eq!(def.name, "memory");
        assert_eq!(
            def.parameters["properties"]["target"]["enum"],
            serde_json::json!(["memory", "identity", "user", "daily"])
        );
        assert_eq!(def.parameters["required"], serde_json::json!(["action"]));
    }
}
