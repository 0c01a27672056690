mod record;

pub use record::BattleRecord;
