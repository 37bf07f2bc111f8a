use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const FRAMES: &[&str] = &["    ", ".   ", "..  ", "... ", "....", ""];
const TICK: Duration = Duration::from_millis(300);

/// Animated "Fetching information ...." line shown while yt-dlp works.
///
/// The ticker runs on its own thread; `stop` (or dropping the handle) joins it
/// and clears the line before returning.
pub struct LoadingIndicator {
    bar: ProgressBar,
    term: Term,
    stopped: bool,
}

impl LoadingIndicator {
    pub fn start(message: &str) -> Self {
        let term = Term::stderr();
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(FRAMES);
        bar.set_style(style);
        bar.set_message(message.to_string());

        if term.is_term() {
            let _ = term.hide_cursor();
        }
        bar.enable_steady_tick(TICK);

        Self {
            bar,
            term,
            stopped: false,
        }
    }

    /// A handle that draws nothing, for non-interactive sessions.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            term: Term::stderr(),
            stopped: false,
        }
    }

    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.bar.disable_steady_tick();
        self.bar.finish_and_clear();
        if self.term.is_term() {
            let _ = self.term.show_cursor();
        }
    }
}

impl Drop for LoadingIndicator {
    fn drop(&mut self) {
        self.halt();
    }
}
