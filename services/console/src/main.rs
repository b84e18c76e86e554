//! Terminal front-end for the voice assistant.
//!
//! Each line typed on stdin stands in for a finalized speech recognition
//! result. Replies are "spoken" by printing them and pausing for a time
//! proportional to their length, so `:hush` and barge-in can be tried out.

mod command;
mod speaker;

use anyhow::Context;
use assistant_core::{
    assistant::{AssistantEvent, AssistantUpdate, EVENT_QUEUE_DEPTH, VoiceAssistant},
    history::{BoundedHistory, COMMAND_HISTORY_CAPACITY},
    interpreter::CommandInterpreter,
    speech::{SpeechInput, SpeechOutput, SpeechSynthesizer},
};
use clap::Parser;
use command::{ConsoleCommand, USAGE};
use speaker::ConsoleSpeaker;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::{Level, info, warn};

/// Upper bound for `--ms-per-char`.
const MAX_MS_PER_CHAR: u64 = 10_000;

#[derive(Parser, Debug)]
#[command(version, about = "Talk to the voice assistant from a terminal")]
struct Args {
    /// Simulated playback time per character, in milliseconds.
    #[arg(long, default_value_t = 40, value_parser = clap::value_parser!(u64).range(0..=MAX_MS_PER_CHAR))]
    ms_per_char: u64,

    /// Run without a synthesizer; replies are printed but never spoken.
    #[arg(long)]
    no_speech: bool,

    /// Maximum log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let (event_tx, event_rx) = mpsc::channel::<AssistantEvent>(EVENT_QUEUE_DEPTH);
    let (update_tx, update_rx) = mpsc::channel::<AssistantUpdate>(EVENT_QUEUE_DEPTH);

    let synthesizer: Option<Arc<dyn SpeechSynthesizer>> = if args.no_speech {
        None
    } else {
        Some(Arc::new(ConsoleSpeaker::new(Duration::from_millis(
            args.ms_per_char,
        ))))
    };
    let output = SpeechOutput::new(synthesizer, &event_tx);
    let mut assistant = VoiceAssistant::new(CommandInterpreter::default(), SpeechInput::new(), output)
        .with_updates(update_tx);
    let assistant_handle = tokio::spawn(async move { assistant.run(event_rx).await });

    let history = Arc::new(Mutex::new(BoundedHistory::new(COMMAND_HISTORY_CAPACITY)));
    let printer_handle = tokio::spawn(print_updates(update_rx, history.clone(), args.no_speech));

    println!("{USAGE}");
    event_tx
        .send(AssistantEvent::StartListening)
        .await
        .context("Assistant loop exited before start")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => println!("{USAGE}"),
            ConsoleCommand::History => print_history(&history),
            ConsoleCommand::Unknown(input) => println!("Unknown command: {input} (try :help)"),
            ConsoleCommand::Empty => {}
            command => {
                if let Some(event) = command.into_event() {
                    if event_tx.send(event).await.is_err() {
                        warn!("Assistant loop exited; stopping console.");
                        break;
                    }
                }
            }
        }
    }

    drop(event_tx);
    assistant_handle.await.context("Assistant task panicked")?;
    printer_handle.await.context("Printer task panicked")?;
    info!("Console session finished.");
    Ok(())
}

async fn print_updates(
    mut updates: mpsc::Receiver<AssistantUpdate>,
    history: Arc<Mutex<BoundedHistory<String>>>,
    text_only: bool,
) {
    while let Some(update) = updates.recv().await {
        match update {
            AssistantUpdate::Transcript { text, is_final: true } => {
                if let Ok(mut history) = history.lock() {
                    history.push(text);
                }
            }
            AssistantUpdate::Transcript { .. } => {}
            AssistantUpdate::Response { text } if text_only => println!("assistant> {text}"),
            AssistantUpdate::Response { .. } => {}
            AssistantUpdate::Listening { active } => {
                println!("[{}]", if active { "listening" } else { "not listening" });
            }
            AssistantUpdate::Speaking { .. } => {}
            AssistantUpdate::Unavailable { message } => println!("[unavailable] {message}"),
        }
    }
}

fn print_history(history: &Mutex<BoundedHistory<String>>) {
    let Ok(history) = history.lock() else {
        return;
    };
    if history.is_empty() {
        println!("No commands yet.");
        return;
    }
    for (i, command) in history.iter().enumerate() {
        println!("{:>2}. {command}", i + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_per_char_is_bounded() {
        let args = Args::try_parse_from(["console", "--ms-per-char", "250"]).unwrap();
        assert_eq!(args.ms_per_char, 250);

        let result = Args::try_parse_from(["console", "--ms-per-char", "18446744073709551615"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["console"]).unwrap();
        assert_eq!(args.ms_per_char, 40);
        assert!(!args.no_speech);
        assert_eq!(args.log_level, Level::WARN);
    }
}
