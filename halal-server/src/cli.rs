use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "halal-server",
    about = "Halal Guide - product classification service",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Overrides server.port from the config file
    #[arg(short, long, env = "HALAL_PORT")]
    pub port: Option<u16>,

    /// Log filter; takes precedence over RUST_LOG, which applies when omitted
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Config file (defaults to <data dir>/config.json)
    #[arg(short, long, env = "HALAL_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Commands {
    #[command(about = "Start the HTTP server (default if no command specified)")]
    Serve,

    #[command(about = "Load and validate configuration, then exit")]
    CheckConfig,
}
