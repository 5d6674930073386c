pub mod command_repair_engine;
pub mod git2_adapter;
pub mod outbox_forge;
pub mod tracing_notifier;

pub use command_repair_engine::CommandRepairEngine;
pub use git2_adapter::{Git2Repo, Identity};
pub use outbox_forge::OutboxForge;
pub use tracing_notifier::TracingNotifier;
