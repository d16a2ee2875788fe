mod engine;
mod store;

pub use engine::{SessionTimer, TimerSnapshot, TimerState};
pub use store::{load_timer, save_timer, TIMER_KEY};
