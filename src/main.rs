use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod console;
mod models;
mod services;
mod session;
mod utils;

#[cfg(test)]
mod testing;

use commands::Flow;
use config::Settings;
use console::{read_line, Console, Interrupt};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    let mut filter = EnvFilter::from_default_env();
    match "blaffa_partner=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Invalid log directive: {}", e),
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    info!("💳 Starting Blaffa Pay partner console...");
    info!("  ___ _       __  __        ___          ");
    info!(" | _ ) |__ _ / _|/ _|__ _  | _ \\__ _ _  _ ");
    info!(" | _ \\ / _` |  _|  _/ _` | |  _/ _` | || |");
    info!(" |___/_\\__,_|_| |_| \\__,_| |_| \\__,_|\\_, |");
    info!("                                     |__/ ");
    info!("  Partenaires v{}", env!("CARGO_PKG_VERSION"));

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!("API: {}", settings.api_url);

    // One Ctrl-C listener for the whole run; `watch` borrows it, otherwise it exits
    let interrupt = Arc::new(Interrupt::default());
    let listener = interrupt.clone();
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C: {}", e);
                return;
            }
            if !listener.signal() {
                println!();
                info!("Interrupted");
                std::process::exit(130);
            }
        }
    });

    let mut console = match Console::new(settings, interrupt).await {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to start console: {}", e);
            return;
        }
    };
    if !console.store.is_persistent() {
        warn!("BLAFFA_SESSION_KEY not set, the session will not survive a restart");
    }

    // One-shot mode: `blaffa-partner bet list p2`
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if !argv.is_empty() {
        commands::handle_line(&mut console, &argv.join(" ")).await;
        return;
    }

    println!("Tapez `help` pour la liste des commandes.");
    while let Some(line) = read_line("blaffa> ").await {
        if commands::handle_line(&mut console, &line).await == Flow::Quit {
            break;
        }
    }

    info!("Au revoir 👋");
}
