use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "deckhand")]
#[command(about = "Browse, mark and sync a cloud-backed presentation workspace", long_about = None)]
pub struct Cli {
    /// Base URL of the workspace API (overrides config and DECKHAND_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Log to stderr instead of the log file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the workspace tree (default if no subcommand given)
    Tree {
        /// Only show nodes whose name contains this phrase, with their
        /// ancestors
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Toggle a folder's mark and store the result
    Mark { folder_id: String },
    /// Request a bulk sync and follow its progress until it settles
    Watch,
    /// Print the path from the root to a node
    Path { node_id: String },
    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
