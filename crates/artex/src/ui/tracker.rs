use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use once_cell::sync::Lazy;

pub trait TrackerBuilder<T: Tracker<U>, U> {
    fn build(self) -> T;
}

pub trait Tracker<Inc> {
    fn step(&self, step: Inc) -> &Self;
    fn finish(self);
}

const PB_STYLE: &str = "{spinner:.blue} {prefix:>10.cyan.bold} [{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

static PB_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    let pb_style = match ProgressStyle::with_template(PB_STYLE) {
        Ok(pb_style) => pb_style.tick_chars(TICK).progress_chars(PB_CHARS),
        Err(_) => return None,
    };

    Some(pb_style)
});

/// Category-level progress. Cleared from the terminal when finished.
pub struct ProgressTracker {
    pb: ProgressBar,
}

impl ProgressTracker {
    pub fn set_message(&self, msg: impl Into<String>) {
        self.pb.set_message(msg.into());
    }

    /// Handle for updating the message from an extraction callback.
    pub fn handle(&self) -> ProgressBar {
        self.pb.clone()
    }
}

impl Tracker<u64> for ProgressTracker {
    fn step(&self, len: u64) -> &Self {
        self.pb.inc(len);
        self
    }

    fn finish(self) {
        self.pb.finish_and_clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTrackerBuilder {
    len: Option<u64>,
    prefix: Option<String>,
    hidden: bool,
}

impl ProgressTrackerBuilder {
    pub fn with_len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

impl TrackerBuilder<ProgressTracker, u64> for ProgressTrackerBuilder {
    fn build(self) -> ProgressTracker {
        let pb = if let Some(len) = self.len {
            ProgressBar::new(len)
        } else {
            ProgressBar::new_spinner()
        };
        if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        let pb = if let Some(style) = PB_TEMPLATE.as_ref() {
            pb.with_style(style.clone())
        } else {
            pb
        };

        if let Some(prefix) = self.prefix {
            pb.set_prefix(prefix);
        }
        ProgressTracker { pb }
    }
}
