use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mnemo", version, about = "File-based memory for agents")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ./mnemo.toml, then ~/.config/mnemo/mnemo.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Memory directory; overrides MNEMO_DIR and the config file
    #[arg(short, long, global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the memory directory and seed first-run templates.
    Init,
    /// Print the context block for the next turn.
    Context,
    /// Print a memory document, or list them all when no target is given.
    Read {
        /// memory, identity, user, or daily
        target: Option<String>,
        /// Daily log date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Write to a memory document.
    Write {
        /// memory, identity, user, or daily
        target: String,
        /// Text to write; read from stdin when omitted
        content: Option<String>,
        /// append (default) or overwrite
        #[arg(short, long)]
        mode: Option<String>,
        /// Daily log date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Search every memory file, line by line.
    Search {
        query: String,
        #[arg(short = 'n', long)]
        max_results: Option<u64>,
    },
    /// List memory files.
    List,
    /// Run one raw tool call given as JSON arguments.
    Exec {
        /// JSON arguments; read from stdin when omitted
        json: Option<String>,
    },
    /// Print the tool definition as JSON.
    Schema,
    /// Print the resolved memory directory.
    Path,
}
