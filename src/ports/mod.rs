pub mod forge;
pub mod git;
pub mod notifier;
pub mod repair_engine;

pub use forge::{PullRequestForge, PushHandle};
pub use git::GitRepo;
pub use notifier::PatchNotifier;
pub use repair_engine::RepairEngine;
