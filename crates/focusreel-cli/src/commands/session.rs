use clap::Subcommand;
use focusreel_core::{now_ms, Database, VideoMeta};

use super::{open_session, print_event};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Begin a watch session for a video
    Begin {
        /// Goal to attribute watch time to
        #[arg(long)]
        goal: Option<String>,
        /// Video identifier
        #[arg(long)]
        video: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        channel: String,
        /// Display duration, e.g. "12:34"
        #[arg(long, default_value = "")]
        duration: String,
    },
    /// Print session and timer state as JSON
    Status,
    /// Submit the closing reflection for the completed session
    Reflect {
        /// Reflection text (min length applies after trimming)
        text: String,
    },
    /// Walk away without completing; nothing is accrued
    Abandon,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut session = open_session(&db)?;

    match action {
        SessionAction::Begin {
            goal,
            video,
            title,
            channel,
            duration,
        } => {
            let meta = VideoMeta {
                video_id: video,
                title,
                channel,
                duration,
            };
            let event = session.begin(goal, meta, now_ms())?;
            print_event(&event)?;
        }
        SessionAction::Status => {
            print_event(&session.state_snapshot())?;
            if let Some(ctx) = session.context() {
                println!("{}", serde_json::to_string_pretty(ctx)?);
            }
        }
        SessionAction::Reflect { text } => {
            let (reflection, event) = session.reflect(&text, now_ms())?;
            print_event(&event)?;
            println!("{}", serde_json::to_string_pretty(&reflection)?);
        }
        SessionAction::Abandon => {
            let event = session.abandon(now_ms())?;
            print_event(&event)?;
        }
    }

    Ok(())
}
