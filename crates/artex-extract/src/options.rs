use std::sync::Arc;

use artex_fs::DEFAULT_CHUNK_SIZE;

#[derive(Clone)]
pub struct ExtractOptions {
    pub chunk_size: usize,
    pub fold_separator: bool,
    pub on_progress: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

/// Emitted after each file copied into the output tree.
#[derive(Clone, Debug)]
pub struct Progress {
    pub category: String,
    pub path: String,
    pub bytes: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            fold_separator: false,
            on_progress: None,
        }
    }
}

impl ExtractOptions {
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Keep `+` in category directory names instead of folding it to `_`.
    pub fn keep_plus(mut self, keep: bool) -> Self {
        self.fold_separator = !keep;
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn copy_options(&self) -> artex_fs::CopyOptions {
        artex_fs::CopyOptions::default().chunk_size(self.chunk_size)
    }
}
