//! Server configuration.

use clap::Parser;

/// Command-line and environment configuration for the `bookshelf` server.
#[derive(Parser, Debug, Clone)]
#[command(name = "bookshelf", version, about = "In-memory book catalog served over HTTP")]
pub struct Config {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "BOOKSHELF_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Log filter directive (e.g. "info" or "bookshelf_core=debug,info")
    #[arg(long = "log", env = "BOOKSHELF_LOG", default_value = "info")]
    pub log_filter: String,
}
