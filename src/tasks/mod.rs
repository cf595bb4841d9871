//! Background Tasks Module
//!
//! Houses the periodic sweep task that ages out expired cache entries.

mod sweep;

pub use sweep::spawn_sweep_task;
