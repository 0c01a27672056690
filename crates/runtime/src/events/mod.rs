//! Topic-based event system.
//!
//! Events are published only after the transition they describe has been
//! committed to storage and memory. Delivery is best-effort: slow or absent
//! subscribers never block or fail a battle operation.
mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{LifecycleEvent, RoundEvent};
