use clap::{Parser, Subcommand};

/// Beam relay — Soracom Beam to watering controller bridge
#[derive(Parser)]
#[command(name = "beam-relay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the relay server on port 8000
    Serve,

    /// Send one activation straight to the watering controller
    Water {
        /// How long to water, in seconds
        seconds: u64,
    },
}
