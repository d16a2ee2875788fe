use clap::Subcommand;
use focusreel_core::{now_ms, Database, Event};

use super::{open_session, print_event, print_events};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the countdown
    Start,
    /// Pause the countdown, preserving remaining time
    Pause,
    /// Cancel the countdown and re-base at the chosen duration
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Run the countdown in the foreground, ticking once per second
    Watch,
    /// Show or set the session length in minutes
    Duration {
        /// New length in minutes; omit to show the current choice
        minutes: Option<i64>,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut session = open_session(&db)?;

    match action {
        TimerAction::Start => {
            if let Some(event) = session.start(now_ms())? {
                print_event(&event)?;
            } else {
                print_event(&session.state_snapshot())?;
            }
        }
        TimerAction::Pause => {
            if let Some(event) = session.pause(now_ms())? {
                print_event(&event)?;
            } else {
                print_event(&session.state_snapshot())?;
            }
        }
        TimerAction::Reset => {
            let event = session.reset(now_ms())?;
            print_event(&event)?;
        }
        TimerAction::Status => {
            print_event(&session.state_snapshot())?;
        }
        TimerAction::Watch => {
            if !session.timer().is_running() {
                print_event(&session.state_snapshot())?;
                return Ok(());
            }
            loop {
                std::thread::sleep(std::time::Duration::from_secs(1));
                let events = session.tick(now_ms())?;
                let left = session.timer().seconds_left();
                println!("{:02}:{:02}", left / 60, left % 60);
                if events
                    .iter()
                    .any(|e| matches!(e, Event::SessionCompleted { .. }))
                {
                    print_events(&events)?;
                    break;
                }
                if !session.timer().is_running() {
                    break;
                }
            }
        }
        TimerAction::Duration { minutes: None } => {
            let config = focusreel_core::Config::load_or_default();
            let durations = focusreel_core::DurationStore::with_default(
                &db,
                config.session.default_minutes,
            );
            println!("{}", durations.minutes());
        }
        TimerAction::Duration {
            minutes: Some(minutes),
        } => {
            if let Some(event) = session.set_duration(minutes, now_ms())? {
                print_event(&event)?;
            } else {
                // Session is running; the new length applies on next reset.
                print_event(&session.state_snapshot())?;
            }
        }
    }

    Ok(())
}
