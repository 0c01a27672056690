//! Repository layer for battle persistence.
//!
//! One durable record per battle, keyed by battle id and overwritten whole on
//! every committed transition. Static content (the skill catalog) is loaded
//! by duel-content and never stored here.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileBattleRepository;
pub use memory::InMemoryBattleRepo;
pub use traits::BattleRepository;
pub use types::BattleRecord;
