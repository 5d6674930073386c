use thiserror::Error;

/// Why a repair run stopped early. Every variant ends the run as skipped;
/// none of them is retried.
#[derive(Error, Debug)]
pub enum RunError {
    /// Target commit or its originating branch could not be established.
    #[error("initialization failed: {0}")]
    Initialization(String),

    #[error("repair engine failed on rule {rule}: {cause:#}")]
    RepairEngine { rule: String, cause: anyhow::Error },

    /// Object reads failed while walking history or diffing.
    #[error("history traversal failed: {0:#}")]
    HistoryTraversal(anyhow::Error),

    /// Checkout, staging or committing in the working repository failed.
    #[error("git operation failed on rule {rule}: {cause:#}")]
    Git { rule: String, cause: anyhow::Error },

    #[error("pull request transport failed on rule {rule}: {cause:#}")]
    Transport { rule: String, cause: anyhow::Error },
}

impl RunError {
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Initialization(_) => "initialization",
            RunError::RepairEngine { .. } => "repair_engine",
            RunError::HistoryTraversal(_) => "history_traversal",
            RunError::Git { .. } => "git",
            RunError::Transport { .. } => "transport",
        }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
