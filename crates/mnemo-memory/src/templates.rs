use std::path::Path;

pub(crate) fn bootstrap_md(bootstrap_path: &Path) -> String {
    let path = bootstrap_path.display();
    format!(
        "\
# BOOTSTRAP.md - First Run Setup

**This file exists because the memory directory was just created.** Run the
setup conversation below, then delete this file. While it exists, only these
instructions are loaded into context.

**Bootstrap file location:** `{path}`

Setup needs a mode where you are allowed to write files.

## Instructions

Introduce yourself first and explain that this is a one-time setup. Ask the
questions a few at a time, not all at once. The user can skip any of them.

### IDENTITY.md

1. What should the agent call itself?
2. What personality or tone should it have? (formal, casual, blunt, playful)
3. Which languages should it answer in?
4. Anything it should always or never do?

### USER.md

1. What should the agent call the user?
2. What is their role or profession?
3. Which languages, frameworks and tools do they use?
4. Where are they located? (timezone matters)
5. How do they like answers? (length, format, tone)
6. Any other preferences or constraints?

### MEMORY.md

1. Any technical knowledge that should never be forgotten?
2. Important system configuration or paths?
3. Conventions for how code should be written?

## After Setup

1. Save the answers with the memory tool (`write` to `identity`, `user` and
   `memory`, mode `overwrite`).
2. Delete this file: `rm {path}`
3. Tell the user setup is complete and that every file can be edited by hand.
"
    )
}

pub(crate) const MEMORY_MD: &str = "\
# MEMORY.md - Long-Term Memory

<!-- Durable facts, decisions and preferences that should survive across sessions. -->

## Technical Knowledge

## Preferences

## Important Facts
";

pub(crate) const IDENTITY_MD: &str = "\
# IDENTITY.md - Agent Identity

- **Name**:
- **Vibe**:
- **Languages**:
- **Behavioral Rules**:
";

pub(crate) const USER_MD: &str = "\
# USER.md - User Profile

- **Name**:
- **Role**:
- **Technical Stack**:
- **Location**:
- **Communication Style**:
";
