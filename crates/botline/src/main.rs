// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Botline - omnichannel auto-reply dispatch engine.
//!
//! This is the binary entry point for the Botline service.

use clap::{Args, Parser, Subcommand};

mod broadcast;
mod serve;
mod webhook;

/// Botline - omnichannel auto-reply dispatch engine.
#[derive(Parser, Debug)]
#[command(name = "botline", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server and dispatch engine.
    Serve,
    /// Manage the provider webhook registration.
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },
    /// Send a message to a list of chats.
    Broadcast(BroadcastArgs),
}

/// Webhook registration actions.
#[derive(Subcommand, Debug)]
enum WebhookAction {
    /// Register the configured webhook URL with the provider.
    Set,
    /// Remove the webhook registration.
    Delete,
    /// Show the current webhook registration state.
    Info,
}

/// Arguments for `botline broadcast`.
#[derive(Args, Debug)]
struct BroadcastArgs {
    /// Recipient chat ids (comma-separated or repeated).
    #[arg(long = "to", required = true, value_delimiter = ',')]
    to: Vec<i64>,
    /// Message text (caption when media is given).
    #[arg(long)]
    text: String,
    /// Photo URL or provider file id to attach.
    #[arg(long, conflicts_with = "document")]
    photo: Option<String>,
    /// Document URL or provider file id to attach.
    #[arg(long)]
    document: Option<String>,
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("botline={log_level},warn")));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration at startup; every command needs it.
    let config = match botline_config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("botline: configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Webhook { action }) => webhook::run_webhook(config, action).await,
        Some(Commands::Broadcast(args)) => broadcast::run_broadcast(config, args).await,
        None => {
            println!("botline: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("botline: {e}");
        std::process::exit(1);
    }
}
