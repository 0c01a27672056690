mod battle;

pub use battle::FileBattleRepository;
