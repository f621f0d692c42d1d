//! Colored command-line renderer.

use crate::application::ports::{Reporter, ReporterError};
use crate::application::registry::{ReporterOptions, ReporterOptionsPatch};
use crate::domain::message::LogMessage;
use owo_colors::{AnsiColors, OwoColorize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

/// Colors handed out to tags without a severity of their own, in
/// first-seen order.
const PALETTE: [AnsiColors; 6] = [
    AnsiColors::Green,
    AnsiColors::Magenta,
    AnsiColors::Cyan,
    AnsiColors::BrightGreen,
    AnsiColors::BrightMagenta,
    AnsiColors::BrightCyan,
];

/// Renders `  message (tag1,tag2)` with ANSI-colored tags.
///
/// Severity tags carry fixed colors (`error` red, `warn`/`warning`
/// yellow, `notice` blue); every other tag receives a palette color the
/// first time it appears and keeps it. Settings: `colors` (default
/// `true`) disables styling entirely, `line_color` tints the message
/// body, `pretty` indents structured messages.
#[derive(Debug, Default)]
pub struct CliReporter {
    assigned: Mutex<HashMap<String, AnsiColors>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn tag_color(&self, tag: &str) -> AnsiColors {
        match tag {
            "error" => AnsiColors::Red,
            "warn" | "warning" => AnsiColors::Yellow,
            "notice" => AnsiColors::Blue,
            other => {
                let mut assigned = self
                    .assigned
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                let next = PALETTE[assigned.len() % PALETTE.len()];
                *assigned.entry(other.to_string()).or_insert(next)
            }
        }
    }
}

impl Reporter for CliReporter {
    fn defaults(&self) -> ReporterOptionsPatch {
        ReporterOptionsPatch::new().with_setting("colors", json!(true))
    }

    fn log(
        &self,
        options: &ReporterOptions,
        tags: Vec<String>,
        message: LogMessage,
    ) -> Result<Option<String>, ReporterError> {
        let colors = options.setting_bool("colors", true);

        let body = match &message {
            LogMessage::Data(value) if options.setting_bool("pretty", false) => {
                serde_json::to_string_pretty(value)?
            }
            other => other.to_string(),
        };
        let body = format!("  {body}");
        let body = match options.setting_str("line_color").and_then(parse_color) {
            Some(color) if colors => body.color(color).to_string(),
            _ => body,
        };

        let suffix = if tags.is_empty() {
            String::new()
        } else {
            let rendered: Vec<String> = tags
                .iter()
                .map(|tag| {
                    if colors {
                        tag.color(self.tag_color(tag)).to_string()
                    } else {
                        tag.clone()
                    }
                })
                .collect();
            format!(" ({})", rendered.join(","))
        };

        Ok(Some(format!("{body}{suffix}")))
    }
}

fn parse_color(name: &str) -> Option<AnsiColors> {
    let color = match name {
        "black" => AnsiColors::Black,
        "red" => AnsiColors::Red,
        "green" => AnsiColors::Green,
        "yellow" => AnsiColors::Yellow,
        "blue" => AnsiColors::Blue,
        "magenta" => AnsiColors::Magenta,
        "cyan" => AnsiColors::Cyan,
        "white" => AnsiColors::White,
        "gray" | "grey" | "bright-black" => AnsiColors::BrightBlack,
        "bright-red" => AnsiColors::BrightRed,
        "bright-green" => AnsiColors::BrightGreen,
        "bright-yellow" => AnsiColors::BrightYellow,
        "bright-blue" => AnsiColors::BrightBlue,
        "bright-magenta" => AnsiColors::BrightMagenta,
        "bright-cyan" => AnsiColors::BrightCyan,
        "bright-white" => AnsiColors::BrightWhite,
        _ => return None,
    };
    Some(color)
}
