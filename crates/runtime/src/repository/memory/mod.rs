mod battle;

pub use battle::InMemoryBattleRepo;
