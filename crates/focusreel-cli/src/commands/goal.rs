use clap::Subcommand;
use focusreel_core::{Database, GoalBook};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a learning goal
    Add {
        /// Display name, e.g. "Business"
        label: String,
        /// Search query the goal maps to, e.g. "startup fundamentals"
        query: String,
    },
    /// List all goals as JSON
    List,
    /// Remove a goal by id (accrued progress is kept)
    Remove { id: String },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let book = GoalBook::new(&db);

    match action {
        GoalAction::Add { label, query } => {
            let goal = book.add(&label, &query)?;
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::List => {
            println!("{}", serde_json::to_string_pretty(&book.list())?);
        }
        GoalAction::Remove { id } => {
            if book.remove(&id)? {
                println!("{{\"removed\": \"{id}\"}}");
            } else {
                eprintln!("no goal with id {id}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
