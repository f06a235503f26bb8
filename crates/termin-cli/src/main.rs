use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::path::PathBuf;
use std::sync::Arc;
use termin_core::store::MemoryConversationStore;
use termin_dialogs::AppointmentBot;
use termin_nlu::{AppointmentRecognizer, LuisConfig};
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::CliConfig;
use console::ConsoleTransport;

#[derive(Parser)]
#[command(name = "terminbot")]
#[command(about = "Terminbot - appointment scheduling from your terminal", long_about = None)]
struct Cli {
    /// Conversation id to resume; a fresh one is generated by default
    #[arg(long)]
    conversation: Option<String>,

    /// Settings file; defaults to the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // ===== Bot Assembly =====
    // Environment variables win over the settings file.
    let file_config = CliConfig::load(cli.config.as_deref())?;
    let luis = LuisConfig::from_env().or(file_config.luis);
    let configured = luis.is_complete();

    let recognizer = Arc::new(AppointmentRecognizer::new(&luis)?);
    let store = Arc::new(MemoryConversationStore::new());
    let bot = AppointmentBot::new(recognizer, store).context("failed to assemble the bot")?;

    let conversation = cli
        .conversation
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let transport = ConsoleTransport::new();

    tracing::info!(
        target: "termin::cli",
        conversation = %conversation,
        configured,
        "terminbot ready"
    );

    println!("{}", "=== Terminbot ===".bright_magenta().bold());
    println!(
        "{}",
        "Schreib mir, mit wem du wann einen Termin brauchst. Mit 'exit' oder Strg-D beendest du das Programm."
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                // "abbrechen" and "quit" belong to the bot; only "exit"
                // leaves the program.
                if trimmed == "exit" {
                    println!("{}", "Bis bald!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Err(err) = bot.on_turn(&conversation, trimmed, &transport).await {
                    if err.is_recognizer() {
                        eprintln!(
                            "{}",
                            format!("Spracherkennung fehlgeschlagen: {err}").red()
                        );
                    } else {
                        eprintln!("{}", format!("Fehler: {err}").red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!(
                    "{}",
                    "Strg-C erkannt. Mit 'exit' beendest du das Programm.".yellow()
                );
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Bis bald!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
