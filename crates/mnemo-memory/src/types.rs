use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four role-keyed documents at the root of the base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Document {
    Memory,
    Identity,
    User,
    Bootstrap,
}

impl Document {
    pub const ALL: [Document; 4] = [
        Document::Memory,
        Document::Identity,
        Document::User,
        Document::Bootstrap,
    ];

    /// Documents surfaced on every turn once bootstrap is finished, in order.
    pub const CONTEXT: [Document; 3] = [Document::Memory, Document::Identity, Document::User];

    pub fn file_name(self) -> &'static str {
        match self {
            Document::Memory => "MEMORY.md",
            Document::Identity => "IDENTITY.md",
            Document::User => "USER.md",
            Document::Bootstrap => "BOOTSTRAP.md",
        }
    }
}

/// Subdirectory holding date-keyed logs.
pub const DAILY_DIR: &str = "daily";

/// Names accepted for the `target` argument.
pub const TARGET_NAMES: [&str; 4] = ["memory", "identity", "user", "daily"];

/// Something the command surface can read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Memory,
    Identity,
    User,
    Daily(NaiveDate),
}

impl Target {
    /// Resolve a target name. `daily` uses `date`, or `today` when absent.
    /// Returns `None` for unknown names.
    pub fn parse(name: &str, date: Option<NaiveDate>, today: NaiveDate) -> Option<Self> {
        match name {
            "memory" => Some(Target::Memory),
            "identity" => Some(Target::Identity),
            "user" => Some(Target::User),
            "daily" => Some(Target::Daily(date.unwrap_or(today))),
            _ => None,
        }
    }

    pub fn document(self) -> Option<Document> {
        match self {
            Target::Memory => Some(Document::Memory),
            Target::Identity => Some(Document::Identity),
            Target::User => Some(Document::User),
            Target::Daily(_) => None,
        }
    }

    /// Label used in result text: `MEMORY.md` or `daily/2024-03-05.md`.
    pub fn display_name(self) -> String {
        match self {
            Target::Memory => Document::Memory.file_name().to_owned(),
            Target::Identity => Document::Identity.file_name().to_owned(),
            Target::User => Document::User.file_name().to_owned(),
            Target::Daily(date) => format!("{DAILY_DIR}/{}", daily_file_name(date)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// `2024-03-05.md`. Zero-padded, so lexicographic order is date order.
pub fn daily_file_name(date: NaiveDate) -> String {
    format!("{}.md", date.format("%Y-%m-%d"))
}

/// Strict `YYYY-MM-DD`; anything else (including unpadded fields) is rejected.
pub fn parse_daily_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    #[default]
    Append,
    Overwrite,
}

impl WriteMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "append" => Some(WriteMode::Append),
            "overwrite" => Some(WriteMode::Overwrite),
            _ => None,
        }
    }
}

/// A single matching line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Bare filename for root documents, `daily/<file>` for logs.
    pub file: String,
    /// 1-based.
    pub line: usize,
    pub text: String,
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult {
    /// Root documents, alphabetical, never including `BOOTSTRAP.md`.
    pub root: Vec<String>,
    /// Daily log filenames, newest first.
    pub daily: Vec<String>,
}

impl ListResult {
    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.daily.is_empty()
    }
}

/// A non-empty document selected for context, content already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFile {
    pub name: String,
    pub content: String,
}
