use clap::{Parser, Subcommand};

/// Authgate — token-issuing authentication gateway
#[derive(Parser)]
#[command(name = "authgate", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server
    Serve {
        /// Port to bind (overrides AUTHGATE_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
