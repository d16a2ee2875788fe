pub mod config;
pub mod goal;
pub mod player;
pub mod progress;
pub mod reflect;
pub mod session;
pub mod timer;

use focusreel_core::{Config, Database, Event, WatchSession};

/// Open the persisted watch session, printing any events the restart
/// reconciliation produced (e.g. a completion consumed by the gap).
pub fn open_session(db: &Database) -> Result<WatchSession<'_>, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (session, events) = WatchSession::open(db, &config, focusreel_core::now_ms())?;
    print_events(&events)?;
    Ok(session)
}

pub fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        print_event(event)?;
    }
    Ok(())
}
