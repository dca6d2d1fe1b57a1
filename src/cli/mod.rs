use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, default_value = "8000")]
        port: u16,
    },

    /// Analyze a single message and print the result as JSON
    Analyze {
        message: String,

        #[arg(long)]
        customer_id: Option<String>,

        #[arg(long)]
        agent_id: Option<String>,
    },

    /// Analyze the messages in a file, one per line (blank lines are skipped)
    Bulk { file: PathBuf },
}
