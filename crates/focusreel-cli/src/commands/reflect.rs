use clap::Subcommand;
use focusreel_core::{Database, ReflectionLog};

#[derive(Subcommand)]
pub enum ReflectAction {
    /// List all reflections as JSON, newest first
    List,
    /// Print the plain-text export of a reflection
    Export {
        /// Video the reflection belongs to
        video_id: String,
        /// Exact record timestamp (epoch ms); defaults to the newest
        /// reflection for the video
        #[arg(long)]
        at: Option<u64>,
    },
}

pub fn run(action: ReflectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let log = ReflectionLog::new(&db);

    match action {
        ReflectAction::List => {
            println!("{}", serde_json::to_string_pretty(&log.list())?);
        }
        ReflectAction::Export { video_id, at } => {
            let found = log
                .list()
                .into_iter()
                .filter(|r| r.video_id == video_id)
                .find(|r| at.map_or(true, |ts| r.created_at == ts));
            match found {
                Some(reflection) => println!("{}", reflection.export_text()),
                None => {
                    eprintln!("no reflection found for video {video_id}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
