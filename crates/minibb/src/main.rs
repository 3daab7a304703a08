// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MiniBB - a small bulletin board.
//!
//! This is the binary entry point: it loads configuration, sets up logging,
//! and runs one storage command, printing its result as JSON.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::error;

/// MiniBB - boards, topics, and posts on SQLite.
#[derive(Parser, Debug)]
#[command(name = "minibb", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the database if needed and apply pending migrations.
    Migrate,
    /// List boards with their most recent topic and post.
    Boards,
    /// List a page of topics on a board, newest first.
    Topics {
        /// Board slug.
        slug: String,
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        per_page: Option<i64>,
    },
    /// List a page of posts in a topic, oldest first.
    Posts {
        topic_id: i64,
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        per_page: Option<i64>,
    },
    /// Start a topic on a board with its opening post.
    NewTopic {
        /// Board slug.
        slug: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
    },
    /// Reply to an existing topic.
    Reply {
        topic_id: i64,
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
    },
    /// Import threads from a JSON file.
    Import {
        file: PathBuf,
        /// Create boards the file names but the database lacks.
        #[arg(long)]
        create_boards: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => minibb_config::load_and_validate_path(path),
        None => minibb_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            minibb_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let Some(command) = cli.command else {
        println!("minibb: use --help for available commands");
        return;
    };

    match commands::execute(command, &config).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("minibb: failed to render output: {e}");
                std::process::exit(1);
            }
        },
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("minibb: {err}");
            std::process::exit(if err.is_client_error() { 2 } else { 1 });
        }
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("minibb={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
