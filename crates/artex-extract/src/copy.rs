use std::path::Path;

use artex_source::{FsNode, NodeKind, is_pseudo_entry};
use tracing::debug;

use crate::extract::RuleRun;
use crate::options::Progress;
use crate::path::MatchPath;
use crate::plan;
use crate::sanitize;

impl RuleRun<'_> {
    /// Rebase a terminal match by `anchor` and copy it into the category
    /// directory. Directories carry the same anchor down to every
    /// descendant.
    ///
    /// Every node that reaches here counts as matched, whether it is copied,
    /// rejected, or skipped.
    pub(crate) fn extract<N: FsNode>(&mut self, node: &N, path: &MatchPath, anchor: &str) {
        self.outcome.matched += 1;

        let relative = plan::relative_path(path.segments(), anchor);
        let target = match sanitize::output_path(self.category_dir, relative) {
            Ok(target) => target,
            Err(e) => {
                self.fail(path, e.to_string());
                return;
            }
        };

        match node.kind() {
            NodeKind::File => self.copy_file(node, path, &target),
            NodeKind::Directory => self.copy_dir(node, path, &target, anchor),
            NodeKind::Other => debug!(path = %path, "skipping node that is neither file nor directory"),
        }
    }

    fn copy_file<N: FsNode>(&mut self, node: &N, path: &MatchPath, target: &Path) {
        let mut reader = match node.open() {
            Ok(reader) => reader,
            Err(e) => {
                self.fail(path, format!("failed to open for copy to '{}': {e}", target.display()));
                return;
            }
        };

        match artex_fs::copy_stream(&mut *reader, target, self.options.copy_options()) {
            Ok(bytes) => {
                debug!(path = %path, target = %target.display(), bytes, "copied file");
                self.outcome.copied_bytes += bytes;
                self.outcome.files_copied += 1;
                self.succeed(path);
                self.report_progress(path, bytes);
            }
            Err(e) => {
                self.fail(path, format!("failed to write file to '{}': {e}", target.display()));
            }
        }
    }

    fn copy_dir<N: FsNode>(&mut self, node: &N, path: &MatchPath, target: &Path, anchor: &str) {
        if let Err(e) = artex_fs::ensure_dir(target) {
            self.fail(path, e.to_string());
            return;
        }
        self.succeed(path);

        let children = match node.children() {
            Ok(children) => children,
            Err(e) => {
                self.fail(path, format!("failed to process subdirectory: {e}"));
                return;
            }
        };

        for child in children.iter().filter(|c| !is_pseudo_entry(c.name())) {
            self.extract(child, &path.child(child.name()), anchor);
        }
    }

    fn report_progress(&self, path: &MatchPath, bytes: u64) {
        if let Some(callback) = &self.options.on_progress {
            callback(Progress {
                category: self.category.to_string(),
                path: path.to_string(),
                bytes,
            });
        }
    }
}
