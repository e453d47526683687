//! Terminal presentation for courtcut commands.
//!
//! Lines are emitted through the `log` facade at info level so the CLI's
//! logger decides where they go. `NO_COLOR` disables styling.

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

use crate::progress::{ProgressReporter, ProgressStatus, ProgressUpdate};

/// Width of the label column in [`print_status`].
const LABEL_WIDTH: usize = 15;

/// Indentation of the output hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    Section,
    Step,
    Item,
    Status,
}

impl OutputLevel {
    fn indent(self) -> &'static str {
        match self {
            OutputLevel::Section => "",
            OutputLevel::Step => "  ",
            OutputLevel::Item => "    ",
            OutputLevel::Status => "      ",
        }
    }
}

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// `===== TITLE =====` surrounded by blank lines.
pub fn print_section(title: &str) {
    let title = title.to_uppercase();
    info!("");
    if color_enabled() {
        info!("===== {} =====", title.cyan());
    } else {
        info!("===== {title} =====");
    }
    info!("");
}

/// One line at `level`, optionally led by a marker and optionally bold.
pub fn print_item(level: OutputLevel, marker: Option<&str>, text: &str, bold: bool) {
    let text = if bold && color_enabled() {
        style(text).bold().to_string()
    } else {
        text.to_string()
    };
    match marker {
        Some(marker) => info!("{}{marker} {text}", level.indent()),
        None => info!("{}{text}", level.indent()),
    }
}

/// A processing step (`» step`).
pub fn print_processing(message: &str) {
    info!("");
    print_item(OutputLevel::Step, Some("»"), message, true);
}

/// An entry listed under a processing step.
pub fn print_sub_item(message: &str) {
    print_item(OutputLevel::Item, None, message, false);
}

/// A `label: value` line with aligned values.
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let padding = LABEL_WIDTH.saturating_sub(label.width()).max(1);
    let value = if highlight && color_enabled() {
        value.bold().to_string()
    } else {
        value.to_string()
    };
    info!(
        "{}{label}:{}{value}",
        OutputLevel::Status.indent(),
        " ".repeat(padding)
    );
}

pub fn print_success(message: &str) {
    info!("");
    if color_enabled() {
        info!("  ✓ {}", message.green());
    } else {
        info!("  ✓ {message}");
    }
}

pub fn print_warning(message: &str) {
    if color_enabled() {
        info!("  ⚠ {}", message.yellow());
    } else {
        info!("  ⚠ {message}");
    }
}

/// A failure with its message and, when the user can act on it, a hint.
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if color_enabled() {
        info!("✗ {}", title.red().bold());
    } else {
        info!("✗ {title}");
    }
    info!("  {message}");
    if let Some(suggestion) = suggestion {
        info!("  Hint: {suggestion}");
    }
}

/// Analysis progress drawn as a bar on stderr. Nothing is drawn when stderr
/// is not a terminal.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new(video: &str) -> Self {
        let bar = ProgressBar::new(100);
        let template = if Term::stderr().size().1 >= 80 {
            "  ⧖ {msg}: {pos:>3}% [{bar:30}] ({elapsed_precise} / {eta_precise})"
        } else {
            "  ⧖ {pos:>3}% [{bar:10}]"
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##."),
        );
        bar.set_message(video.to_string());

        if !std::io::stderr().is_terminal() {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl ProgressReporter for TerminalProgress {
    fn report(&self, update: &ProgressUpdate) {
        self.bar.set_position(u64::from(update.progress));
        match update.status {
            ProgressStatus::Running => {}
            ProgressStatus::Done => self.bar.finish(),
            ProgressStatus::Stopped | ProgressStatus::Error => self.bar.abandon(),
        }
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
