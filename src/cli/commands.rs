use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "storyrelay", version, about = "Story relay for an LLM-narrated text adventure", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP relay
    Serve,

    /// Play the adventure in the terminal
    Play {
        /// Relay to play against, e.g. http://127.0.0.1:3000. Plays in-process when omitted.
        #[arg(short, long, env = "STORYRELAY_SERVER")]
        server: Option<String>,
    },
}
