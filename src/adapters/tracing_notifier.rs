//! Notification hook that reports patches through the log.

use crate::domain::PatchRecord;
use crate::ports::PatchNotifier;
use tracing::info;

#[derive(Debug, Default)]
pub struct TracingNotifier;

impl PatchNotifier for TracingNotifier {
    fn notify(&self, patches: &[PatchRecord]) {
        for patch in patches {
            info!(
                event = "patch.produced",
                tool = %patch.tool_name,
                description = %patch.description,
                diff_lines = patch.diff.lines().count(),
            );
        }
    }
}
