//! Terminal UI components and styling for vcompress.
//!
//! All user-facing output goes through the `log` facade at info level so the
//! CLI's logger decides where it lands. A single batch progress bar may be
//! active at a time; lines printed while it is visible are written through
//! `ProgressBar::suspend` so the bar is redrawn underneath them.

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Visual hierarchy levels of the output
#[derive(Debug, Clone, Copy)]
pub enum OutputLevel {
    /// Main sections (===== SECTION =====)
    Section,
    /// Per-file headers (» file)
    Subsection,
    /// Key-value status information
    Status,
}

impl OutputLevel {
    fn indent(&self) -> &'static str {
        match self {
            OutputLevel::Section => "",
            OutputLevel::Subsection => "  ",
            OutputLevel::Status => "    ",
        }
    }
}

struct TerminalState {
    current_progress: Option<ProgressBar>,
}

static TERMINAL_STATE: LazyLock<Mutex<TerminalState>> = LazyLock::new(|| {
    Mutex::new(TerminalState {
        current_progress: None,
    })
});

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Runs `f` with the progress bar (if any) hidden.
fn emit(f: impl FnOnce()) {
    let bar = TERMINAL_STATE
        .lock()
        .ok()
        .and_then(|state| state.current_progress.clone());
    match bar {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

fn emit_line(line: String) {
    emit(|| info!("{line}"));
}

/// Print a section header for major phases of a run
pub fn print_section(title: &str) {
    let title = title.to_uppercase();
    let header = if should_use_color() {
        format!("===== {} =====", title.cyan())
    } else {
        format!("===== {title} =====")
    };
    emit(|| {
        info!("");
        info!("{header}");
        info!("");
    });
}

/// Print the header for one file
pub fn print_processing(message: &str) {
    let indent = OutputLevel::Subsection.indent();
    let line = if should_use_color() {
        format!("{indent}» {}", style(message).bold())
    } else {
        format!("{indent}» {message}")
    };
    emit(|| {
        info!("");
        info!("{line}");
    });
}

/// Print a status line (key-value pair) with aligned values
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label_width: usize = 15;
    let padding = label_width.saturating_sub(label.width()).max(1);
    let value = if should_use_color() && highlight {
        value.bold().to_string()
    } else {
        value.to_string()
    };
    emit_line(format!(
        "{}{}:{} {}",
        OutputLevel::Status.indent(),
        label,
        " ".repeat(padding),
        value
    ));
}

/// Print a success message
pub fn print_success(message: &str) {
    let line = if should_use_color() {
        format!("  ✓ {}", message.green())
    } else {
        format!("  ✓ {message}")
    };
    emit_line(line);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    let line = if should_use_color() {
        format!("  ⚠ {}", message.yellow())
    } else {
        format!("  ⚠ {message}")
    };
    emit_line(line);
}

/// Print an error message with an optional suggestion
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    let header = if should_use_color() {
        format!("✗ {}", title.red().bold())
    } else {
        format!("✗ {title}")
    };
    emit(|| {
        info!("{header}");
        info!("");
        info!("  Message:  {message}");
        if let Some(suggestion) = suggestion {
            info!("");
            info!("  Suggestion: {suggestion}");
        }
        info!("");
    });
}

/// Echo an external command line (debug mode)
pub fn print_command(command: &str) {
    let line = if should_use_color() {
        format!("    $ {}", command.dimmed())
    } else {
        format!("    $ {command}")
    };
    emit_line(line);
}

fn progress_style() -> ProgressStyle {
    let term_width = Term::stderr().size().1 as usize;
    let template = if term_width >= 100 {
        "  ⧖ {prefix} [{bar:30}] {pos}/{len} ({elapsed_precise}) {wide_msg}"
    } else if term_width >= 60 {
        "  ⧖ {prefix} [{bar:20}] {pos}/{len} {wide_msg}"
    } else {
        "  ⧖ [{bar:10}] {pos}/{len}"
    };
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.")
}

/// Starts the batch progress bar for `total` files, replacing any previous one.
///
/// Nothing is drawn when stderr is not a terminal.
pub fn start_progress(total: u64, label: &str) {
    let pb = ProgressBar::new(total);
    pb.set_style(progress_style());
    pb.set_prefix(label.to_string());

    if std::io::stderr().is_terminal() {
        pb.enable_steady_tick(Duration::from_millis(100));
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    if let Ok(mut state) = TERMINAL_STATE.lock() {
        if let Some(previous) = state.current_progress.replace(pb) {
            previous.finish_and_clear();
        }
    }
}

/// Advances the batch progress bar by one file
pub fn advance_progress() {
    if let Ok(state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.as_ref() {
            pb.inc(1);
        }
    }
}

/// Replaces the trailing message of the progress bar (encoder time/speed)
pub fn set_progress_message(message: &str) {
    if let Ok(state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.as_ref() {
            pb.set_message(message.to_string());
        }
    }
}

/// Finish the current progress bar and remove it from the screen
pub fn finish_progress() {
    if let Ok(mut state) = TERMINAL_STATE.lock() {
        if let Some(pb) = state.current_progress.take() {
            pb.finish_and_clear();
        }
    }
}
