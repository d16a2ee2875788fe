use clap::Subcommand;
use focusreel_core::{now_ms, Database, PlayerSignal};

use super::{open_session, print_event, print_events};

#[derive(Subcommand)]
pub enum PlayerAction {
    /// The player reported that playback started
    Playing,
    /// The player reported that the video ended
    Ended,
}

pub fn run(action: PlayerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut session = open_session(&db)?;

    let signal = match action {
        PlayerAction::Playing => PlayerSignal::Playing,
        PlayerAction::Ended => PlayerSignal::Ended,
    };

    let events = session.player_signal(signal, now_ms())?;
    if events.is_empty() {
        print_event(&session.state_snapshot())?;
    } else {
        print_events(&events)?;
    }
    Ok(())
}
