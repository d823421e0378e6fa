pub mod timer;

pub use timer::{DelayedTask, PeriodicTask};
