//! Parses lines typed at the console prompt.

use assistant_core::assistant::AssistantEvent;

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// A `:`-command mapped straight onto an assistant event.
    Event(AssistantEvent),
    /// Print the recent command history.
    History,
    Help,
    Quit,
    /// A line that should be treated as a final recognition result.
    Utterance(String),
    Unknown(String),
    Empty,
}

pub const USAGE: &str = "\
Type anything to say it to the assistant.
  :listen       start listening
  :stop         stop listening
  :say <text>   speak <text> without interpreting it
  :hush         stop speaking
  :history      show the last commands
  :help         show this help
  :quit         exit";

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ConsoleCommand::Empty;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return ConsoleCommand::Utterance(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name.to_lowercase().as_str() {
            "listen" => ConsoleCommand::Event(AssistantEvent::StartListening),
            "stop" => ConsoleCommand::Event(AssistantEvent::StopListening),
            "say" if !arg.is_empty() => {
                ConsoleCommand::Event(AssistantEvent::Speak(arg.to_string()))
            }
            "hush" => ConsoleCommand::Event(AssistantEvent::StopSpeaking),
            "history" => ConsoleCommand::History,
            "help" => ConsoleCommand::Help,
            "quit" | "exit" => ConsoleCommand::Quit,
            _ => ConsoleCommand::Unknown(line.to_string()),
        }
    }

    /// The event this line feeds into the assistant, if any.
    pub fn into_event(self) -> Option<AssistantEvent> {
        match self {
            ConsoleCommand::Event(event) => Some(event),
            ConsoleCommand::Utterance(text) => Some(AssistantEvent::Recognition {
                text,
                is_final: true,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_are_final_recognitions() {
        let command = ConsoleCommand::parse("  what time is it ");
        assert_eq!(command, ConsoleCommand::Utterance("what time is it".to_string()));
        assert_eq!(
            command.into_event(),
            Some(AssistantEvent::Recognition {
                text: "what time is it".to_string(),
                is_final: true
            })
        );
    }

    #[test]
    fn test_colon_commands() {
        assert_eq!(
            ConsoleCommand::parse(":listen"),
            ConsoleCommand::Event(AssistantEvent::StartListening)
        );
        assert_eq!(
            ConsoleCommand::parse(":STOP"),
            ConsoleCommand::Event(AssistantEvent::StopListening)
        );
        assert_eq!(
            ConsoleCommand::parse(":say  good morning"),
            ConsoleCommand::Event(AssistantEvent::Speak("good morning".to_string()))
        );
        assert_eq!(
            ConsoleCommand::parse(":hush"),
            ConsoleCommand::Event(AssistantEvent::StopSpeaking)
        );
        assert_eq!(ConsoleCommand::parse(":history"), ConsoleCommand::History);
        assert_eq!(ConsoleCommand::parse(":exit"), ConsoleCommand::Quit);
    }

    #[test]
    fn test_say_without_text_is_unknown() {
        assert_eq!(
            ConsoleCommand::parse(":say"),
            ConsoleCommand::Unknown(":say".to_string())
        );
        assert_eq!(ConsoleCommand::parse(":say").into_event(), None);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        assert_eq!(ConsoleCommand::parse("   "), ConsoleCommand::Empty);
        assert_eq!(ConsoleCommand::parse("").into_event(), None);
    }
}
