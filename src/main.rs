//! BMO chat - terminal client for the BMO conversational backend
//!
//! Keeps one conversation session (transcript, mood, in-flight request)
//! and renders it line by line.

mod backend;
mod config;
mod db;
mod render;
mod session;
mod state_machine;

use backend::{ChatBackend, HttpBackend, LoggingBackend};
use chrono::Local;
use config::ClientConfig;
use db::Database;
use render::Input;
use session::{ProductionSession, Session};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bmo_chat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ClientConfig::from_env();

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;

    let http = HttpBackend::new(&config.api_base, config.request_timeout)?;
    let backend = LoggingBackend::new(Arc::new(http));

    let mut session: ProductionSession = Session::bootstrap(backend, db, config.params);

    // Readiness probe, informational only
    match session.backend().status().await {
        Ok(status) if status.ready => {
            tracing::info!(message = %status.message, "Backend ready");
        }
        Ok(status) => println!("BMO is not ready yet! ({})", status.message),
        Err(_) => println!("Error connecting to BMO backend at {}.", config.api_base),
    }

    for message in session.messages() {
        println!("{}", render::format_message(message, &Local));
    }
    println!("{}", render::format_mood(session.mood()));
    println!("{}", render::HELP);

    // One task owns stdout so command output lands after the events that
    // preceded it
    let events = session.subscribe();
    let (output, commands) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(render::run_printer(events, commands, Local, |text| {
        println!("{text}");
    }));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = match render::parse_input(&line) {
            Input::Prompt(text) => {
                session.send(&text).await;
                continue;
            }
            Input::Reset => {
                session.reset().await;
                continue;
            }
            Input::Mood => render::format_mood(session.mood()),
            Input::History => session
                .messages()
                .iter()
                .map(|message| render::format_message(message, &Local))
                .collect::<Vec<_>>()
                .join("\n"),
            Input::Help => render::HELP.to_string(),
            Input::Quit => break,
        };
        if output.send(text).is_err() {
            tracing::warn!("Renderer stopped");
            break;
        }
    }

    tracing::info!(session_id = %session.id(), messages = session.messages().len(), "Session closed");
    drop(session);
    drop(output);
    if let Err(e) = printer.await {
        tracing::error!(error = %e, "Renderer task failed");
    }

    Ok(())
}
