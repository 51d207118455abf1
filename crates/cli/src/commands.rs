use clap::{ArgGroup, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Pull new transactions from one or all partners and persist their cursors
    #[command(group(ArgGroup::new("target").required(true).args(["partner", "all"])))]
    Sync {
        #[arg(long, help = "Partner id to sync (see `partners`)")]
        partner: Option<String>,

        #[arg(long, help = "Sync every registered partner, one after another")]
        all: bool,

        #[arg(long, help = "Load credentials from a KEY=VALUE env file")]
        env_file: Option<String>,

        #[arg(
            long = "credential",
            value_name = "KEY=VALUE",
            help = "Credential passed straight to the partner, e.g. apiKey=..."
        )]
        credentials: Vec<String>,

        #[arg(
            long,
            help = "If specified, writes the transactions JSON to this file instead of stdout"
        )]
        output: Option<String>,

        #[arg(long, help = "Records requested per page")]
        page_size: Option<usize>,

        #[arg(long, help = "Override the partner's offset rollback margin")]
        rollback: Option<u64>,

        #[arg(long, help = "Stop after this many pages per partner")]
        max_pages: Option<usize>,

        #[arg(long, default_value_t = 30, help = "HTTP timeout in seconds")]
        timeout_secs: u64,
    },
    /// List the registered partners
    Partners,
    /// Inspect or reset persisted cursors
    Cursor {
        #[command(subcommand)]
        command: CursorCommand,
    },
}

#[derive(Subcommand)]
pub enum CursorCommand {
    /// Show persisted cursors
    Show {
        #[arg(long, help = "Only show this partner")]
        partner: Option<String>,

        #[arg(long, help = "Include every stored run, not just the latest")]
        history: bool,

        #[arg(
            long,
            help = "If set, prints the checkpoints as JSON instead of a table"
        )]
        json: bool,
    },
    /// Forget a partner's cursor so the next sync starts fresh
    Reset {
        #[arg(long)]
        partner: String,
    },
}
