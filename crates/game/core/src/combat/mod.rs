//! Round resolution: damage math, status upkeep, and cooldowns.
//!
//! Everything here is a pure function of its inputs. The engine feeds it the
//! round-start combatants and the locked actions and stores whatever comes
//! back.
mod damage;
mod outcome;
mod resolver;

pub use damage::{apply_damage, apply_modifiers};
pub use outcome::{ActionTaken, AppliedStatus, RoundOutcome, SideOutcome, StruggleReason};
pub use resolver::{Resolution, resolve};
