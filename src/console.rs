//! Line-oriented front end: reads stdin, prints companion events.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use crate::ai::conversation::Sender;
use crate::ai::orchestrator::CompanionEvent;
use crate::app::CompanionApp;
use crate::commands::{self, Command, HELP};

/// Render one event as a console line. `None` for events the console skips.
pub fn render_event(event: &CompanionEvent) -> Option<String> {
    match event {
        CompanionEvent::ContextChanged { context, greeting } => Some(format!(
            "── {} ──\nassistant: {}",
            context,
            greeting.text()
        )),
        CompanionEvent::ChatCleared { greeting } => {
            Some(format!("── cleared ──\nassistant: {}", greeting.text()))
        }
        CompanionEvent::MessageAppended(message) => match message.sender() {
            Sender::User => Some(format!("you: {}", message.text())),
            Sender::Assistant => Some(format!("assistant: {}", message.text())),
        },
        CompanionEvent::Typing(_) => Some("assistant is typing...".to_string()),
        CompanionEvent::EngagementChanged { level, label } => {
            Some(format!("[engagement {:.1}/10, {}]", level, label))
        }
        CompanionEvent::SensorStatus { sensor, status } => {
            Some(format!("[{} {:?}]", sensor, status).to_lowercase())
        }
        CompanionEvent::SpeechUnavailable { reason } => {
            Some(format!("[speech off: {}]", reason))
        }
        CompanionEvent::EmotionDetected { .. }
        | CompanionEvent::TypingStopped
        | CompanionEvent::AvatarActivated
        | CompanionEvent::Speaking(_) => None,
    }
}

async fn print_events(mut rx: broadcast::Receiver<CompanionEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if let Some(line) = render_event(&event) {
                    println!("{}", line);
                }
            }
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "console lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

async fn print_status(app: &CompanionApp) {
    let snapshot = app.companion.snapshot().await;
    println!(
        "context: {}  engagement: {:.1}/10 ({})  mood: {} {}",
        snapshot.context,
        snapshot.engagement,
        snapshot.engagement_label,
        snapshot.emotion,
        snapshot.avatar_expression
    );
    if let Some(tip) = snapshot.engagement_suggestion {
        println!("tip: {}", tip);
    }
    for (sensor, status) in &snapshot.sensors {
        println!("{}: {:?}", sensor, status);
    }
}

/// Run until `/quit` or end of input.
pub async fn run_repl(app: CompanionApp) -> anyhow::Result<()> {
    // Subscribed after launch, so print the opening greeting by hand.
    let printer = tokio::spawn(print_events(app.companion.subscribe()));
    if let Some(greeting) = app.companion.messages().await.first() {
        println!("assistant: {}", greeting.text());
    }
    println!("type /help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match command {
            Command::Say(text) => {
                app.companion.send_message(&text).await;
            }
            Command::Speak(text) => {
                app.companion.hear_speech(&text).await;
            }
            Command::Context(context) => {
                app.companion.switch_context(context).await;
            }
            Command::Clear => {
                app.companion.clear_chat().await;
            }
            Command::Sensor { kind, on: true } => {
                if let Err(e) = app.sensors.start(kind).await {
                    warn!(error = %e, "could not start sensor");
                }
            }
            Command::Sensor { kind, on: false } => app.sensors.stop(kind).await,
            Command::Away => {
                app.companion.attention_lost().await;
            }
            Command::Mute => app.companion.mute().await,
            Command::Status => print_status(&app).await,
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    app.shutdown().await;
    printer.abort();
    Ok(())
}
