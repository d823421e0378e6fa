//! Console command parsing.
//!
//! Lines starting with `/` are commands; anything else is chat text.

use thiserror::Error;

use crate::ai::context::InteractionContext;
use crate::sensors::SensorKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Say(String),
    /// Pretend the line came from speech recognition.
    Speak(String),
    Context(InteractionContext),
    Clear,
    Sensor { kind: SensorKind, on: bool },
    Away,
    Mute,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: /{0}")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Context(#[from] crate::ai::context::ParseContextError),
}

pub const HELP: &str = "\
/context <learning|assessment|interview>  switch context
/clear                                    clear the chat
/camera on|off, /mic on|off               toggle sensors
/say <text>                               send text as if spoken
/away                                     report that you looked away
/mute                                     stop speaking
/status                                   show engagement and sensors
/quit                                     exit";

/// Parse one input line. Blank lines give `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Say(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let command = match name.to_lowercase().as_str() {
        "context" | "ctx" => {
            if arg.is_empty() {
                return Err(CommandError::Usage("/context <learning|assessment|interview>"));
            }
            Command::Context(arg.parse()?)
        }
        "clear" => Command::Clear,
        "camera" | "cam" => sensor(SensorKind::Camera, arg, "/camera on|off")?,
        "mic" | "microphone" => sensor(SensorKind::Microphone, arg, "/mic on|off")?,
        "say" => {
            if arg.is_empty() {
                return Err(CommandError::Usage("/say <text>"));
            }
            Command::Speak(arg.to_string())
        }
        "away" => Command::Away,
        "mute" => Command::Mute,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn sensor(kind: SensorKind, arg: &str, usage: &'static str) -> Result<Command, CommandError> {
    let on = match arg.to_lowercase().as_str() {
        "on" | "start" => true,
        "off" | "stop" => false,
        _ => return Err(CommandError::Usage(usage)),
    };
    Ok(Command::Sensor { kind, on })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_chat() {
        assert_eq!(
            parse("  Can you explain this?  ").unwrap(),
            Some(Command::Say("Can you explain this?".into()))
        );
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn parses_context_and_sensor_commands() {
        assert_eq!(
            parse("/context Interview").unwrap(),
            Some(Command::Context(InteractionContext::Interview))
        );
        assert_eq!(
            parse("/mic off").unwrap(),
            Some(Command::Sensor {
                kind: SensorKind::Microphone,
                on: false
            })
        );
        assert_eq!(parse("/QUIT").unwrap(), Some(Command::Quit));
        assert_eq!(
            parse("/say hello there").unwrap(),
            Some(Command::Speak("hello there".into()))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse("/context"), Err(CommandError::Usage(_))));
        assert!(matches!(parse("/context party"), Err(CommandError::Context(_))));
        assert!(matches!(parse("/camera maybe"), Err(CommandError::Usage(_))));
        assert_eq!(
            parse("/dance").unwrap_err(),
            CommandError::Unknown("dance".into())
        );
    }
}
