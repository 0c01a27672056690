//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine rejections and repository failures so transports can map
//! every failure to a reply through [`RuntimeError::severity`].
use duel_core::{BattleError, BattleId, ChatId, DuelError, ErrorSeverity};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown battle {0}")]
    UnknownBattle(BattleId),

    #[error("{chat_id} already has an active battle {battle_id}")]
    BattleAlreadyActive { chat_id: ChatId, battle_id: BattleId },

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),

    #[error("runtime requires a skill catalog before building")]
    MissingCatalog,

    #[error("runtime requires a battle repository before building")]
    MissingRepository,
}

impl RuntimeError {
    /// Classifies the failure: rejected request, retryable, or stop serving.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownBattle(_) | Self::BattleAlreadyActive { .. } => ErrorSeverity::Validation,
            Self::Battle(err) => err.severity(),
            Self::Storage(_) => ErrorSeverity::Transient,
            Self::MissingCatalog | Self::MissingRepository => ErrorSeverity::Fatal,
        }
    }
}

impl DuelError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        RuntimeError::severity(self)
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownBattle(_) => "RUNTIME_UNKNOWN_BATTLE",
            Self::BattleAlreadyActive { .. } => "RUNTIME_BATTLE_ALREADY_ACTIVE",
            Self::Battle(err) => err.error_code(),
            Self::Storage(_) => "RUNTIME_STORAGE",
            Self::MissingCatalog => "RUNTIME_MISSING_CATALOG",
            Self::MissingRepository => "RUNTIME_MISSING_REPOSITORY",
        }
    }
}
