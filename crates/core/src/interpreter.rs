//! Voice Command Interpreter
//!
//! Classifies a recognized utterance against an ordered table of keyword rules
//! and produces the assistant's spoken reply. Matching is plain substring
//! containment over the lower-cased utterance; the first rule that matches
//! wins, so the order of [`COMMAND_RULES`] is part of the contract.
//!
//! The interpreter is a total function: any input, including the empty string,
//! yields a response.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const GREETING_RESPONSE: &str = "Hello! How can I assist you today?";
pub const OPEN_RESPONSE: &str = "Opening requested application";
pub const CLOSE_RESPONSE: &str = "Closing application";
pub const HELP_RESPONSE: &str = "I can help you with voice commands, screen control, and API integration. Try saying \"open\", \"close\", \"time\", or \"date\".";
pub const FALLBACK_RESPONSE: &str = "Command received. Processing your request.";

/// The intent an utterance was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Time,
    Date,
    Open,
    Help,
    Close,
    Fallback,
}

/// A single keyword rule: the intent fires if any keyword occurs in the utterance.
#[derive(Debug, Clone, Copy)]
pub struct CommandRule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

impl CommandRule {
    /// `lowered` must already be lower-cased.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Rules in priority order. Anything that matches none of them is a `Fallback`.
pub static COMMAND_RULES: &[CommandRule] = &[
    CommandRule {
        intent: Intent::Greeting,
        keywords: &["hello", "hi"],
    },
    CommandRule {
        intent: Intent::Time,
        keywords: &["time"],
    },
    CommandRule {
        intent: Intent::Date,
        keywords: &["date"],
    },
    CommandRule {
        intent: Intent::Open,
        keywords: &["open"],
    },
    CommandRule {
        intent: Intent::Help,
        keywords: &["help"],
    },
    CommandRule {
        intent: Intent::Close,
        keywords: &["close"],
    },
];

/// Source of the current local time, read when a response is produced.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The host's wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Formats a time of day using the host's preferred time representation.
pub fn format_time(now: &DateTime<Local>) -> String {
    now.format("%X").to_string()
}

/// Formats a calendar date using the host's preferred date representation.
pub fn format_date(now: &DateTime<Local>) -> String {
    now.format("%x").to_string()
}

/// Keyword-based command interpreter.
#[derive(Clone)]
pub struct CommandInterpreter {
    rules: &'static [CommandRule],
    clock: Arc<dyn Clock>,
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl CommandInterpreter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rules: COMMAND_RULES,
            clock,
        }
    }

    /// Returns the intent of the first rule matching `utterance`.
    pub fn classify(&self, utterance: &str) -> Intent {
        let lowered = utterance.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Fallback)
    }

    /// Produces the reply for `utterance`. Never fails.
    pub fn interpret(&self, utterance: &str) -> String {
        let intent = self.classify(utterance);
        debug!(utterance = %utterance, intent = ?intent, "Utterance classified");
        self.respond(intent)
    }

    /// Renders the reply for an already classified intent.
    pub fn respond(&self, intent: Intent) -> String {
        match intent {
            Intent::Greeting => GREETING_RESPONSE.to_string(),
            Intent::Time => format!("The current time is {}", format_time(&self.clock.now())),
            Intent::Date => format!("Today is {}", format_date(&self.clock.now())),
            Intent::Open => OPEN_RESPONSE.to_string(),
            Intent::Help => HELP_RESPONSE.to_string(),
            Intent::Close => CLOSE_RESPONSE.to_string(),
            Intent::Fallback => FALLBACK_RESPONSE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_clock() -> Arc<dyn Clock> {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(|| Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 5).unwrap());
        Arc::new(clock)
    }

    #[test]
    fn test_greeting_keywords() {
        let interpreter = CommandInterpreter::new(fixed_clock());
        for utterance in ["hello", "Hi there", "oh HELLO assistant", "well hi"] {
            assert_eq!(interpreter.interpret(utterance), GREETING_RESPONSE);
        }
    }

    #[test]
    fn test_greeting_outranks_time() {
        let interpreter = CommandInterpreter::new(fixed_clock());
        assert_eq!(interpreter.classify("hello, what time is it"), Intent::Greeting);
        assert_eq!(
            interpreter.interpret("hello, what time is it"),
            GREETING_RESPONSE
        );
    }

    #[test]
    fn test_time_response_uses_clock() {
        let interpreter = CommandInterpreter::new(fixed_clock());
        assert_eq!(
            interpreter.interpret("what time is it"),
            "The current time is 10:30:05"
        );
    }

    #[test]
    fn test_date_response_uses_clock() {
        let interpreter = CommandInterpreter::new(fixed_clock());
        assert_eq!(interpreter.interpret("what date is it"), "Today is 01/15/24");
    }

    #[test]
    fn test_time_is_read_when_responding() {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .times(1)
            .returning(|| Local.with_ymd_and_hms(2024, 6, 1, 23, 59, 59).unwrap());
        let interpreter = CommandInterpreter::new(Arc::new(clock));

        assert_eq!(interpreter.classify("time please"), Intent::Time);
        assert_eq!(
            interpreter.respond(Intent::Time),
            "The current time is 23:59:59"
        );
    }

    #[test]
    fn test_rule_order_for_remaining_intents() {
        let interpreter = CommandInterpreter::new(fixed_clock());
        assert_eq!(interpreter.classify("open the browser"), Intent::Open);
        assert_eq!(interpreter.classify("open help"), Intent::Open);
        assert_eq!(interpreter.classify("help me close it"), Intent::Help);
        assert_eq!(interpreter.classify("close the door"), Intent::Close);
        assert_eq!(interpreter.classify("update the date"), Intent::Date);
    }

    #[test]
    fn test_open_and_close_do_not_extract_target() {
        let interpreter = CommandInterpreter::new(fixed_clock());
        assert_eq!(interpreter.interpret("open spotify"), OPEN_RESPONSE);
        assert_eq!(interpreter.interpret("close spotify"), CLOSE_RESPONSE);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let interpreter = CommandInterpreter::new(fixed_clock());
        assert_eq!(interpreter.interpret("HELP"), interpreter.interpret("help"));
        assert_eq!(interpreter.interpret("help"), HELP_RESPONSE);
    }

    #[test]
    fn test_unmatched_input_falls_back() {
        let interpreter = CommandInterpreter::new(fixed_clock());
        assert_eq!(interpreter.interpret(""), FALLBACK_RESPONSE);
        assert_eq!(interpreter.interpret("xyz"), FALLBACK_RESPONSE);
        assert_eq!(interpreter.classify("   "), Intent::Fallback);
    }

    #[test]
    fn test_substring_matching_is_not_tokenized() {
        // "this" contains "hi", so it reads as a greeting.
        let interpreter = CommandInterpreter::new(fixed_clock());
        assert_eq!(interpreter.classify("close this window"), Intent::Greeting);
    }

    #[test]
    fn test_system_clock_formats() {
        let interpreter = CommandInterpreter::default();
        assert!(interpreter.interpret("time").starts_with("The current time is "));
        assert!(interpreter.interpret("date").starts_with("Today is "));
    }
}
