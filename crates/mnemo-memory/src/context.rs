//! Per-turn context assembly.

use crate::types::{ContextFile, Document};

/// Separator placed between document sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

const HEADING: &str = "# Memory Context";

const SETUP_INSTRUCTIONS: &str = "\
## Memory Setup
This is your first run. Read BOOTSTRAP.md above and follow the setup instructions.
Ask the user questions interactively, then write to MEMORY.md, IDENTITY.md, and USER.md.
After setup is complete, delete BOOTSTRAP.md.";

const USAGE_INSTRUCTIONS: &str = "\
## Memory
Memory files have been loaded above. Use the `memory` tool to manage them:
- `action=write target=memory|identity|user|daily content=... [mode=append|overwrite] [date=YYYY-MM-DD]` - save to a memory file or the daily log
- `action=read target=memory|identity|user|daily [date=YYYY-MM-DD]` - read a memory file (no target lists files)
- `action=search query=... [max_results=N]` - search across all memory files
- `action=list` - list all memory files";

/// What to surface this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextSource {
    /// Setup pending: the raw `BOOTSTRAP.md` content (possibly blank).
    Bootstrap(String),
    /// Setup finished: the non-empty persistent documents.
    Documents(Vec<ContextFile>),
}

/// Render the context block. Returns an empty string when no section has
/// content, in which case nothing should be injected.
pub fn render(source: &ContextSource) -> String {
    let (sections, instructions) = match source {
        ContextSource::Bootstrap(content) => {
            let content = content.trim();
            let sections = if content.is_empty() {
                Vec::new()
            } else {
                vec![format!(
                    "## {} (First Run Setup)\n\n{content}",
                    Document::Bootstrap.file_name()
                )]
            };
            (sections, SETUP_INSTRUCTIONS)
        }
        ContextSource::Documents(files) => {
            let sections = files
                .iter()
                .map(|file| format!("## {}\n\n{}", file.name, file.content))
                .collect::<Vec<_>>();
            (sections, USAGE_INSTRUCTIONS)
        }
    };

    if sections.is_empty() {
        return String::new();
    }

    format!(
        "{HEADING}\n\n{}\n\n{instructions}",
        sections.join(SECTION_SEPARATOR)
    )
}
