use clap::Subcommand;
use focusreel_core::{Database, ProgressLedger};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Print accrued watch time as JSON, for one goal or all
    Show {
        /// Restrict to a single goal id
        #[arg(long)]
        goal: Option<String>,
    },
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let ledger = ProgressLedger::new(&db);

    match action {
        ProgressAction::Show { goal: Some(goal) } => match ledger.for_goal(&goal) {
            Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
            None => {
                eprintln!("no progress recorded for goal {goal}");
                std::process::exit(1);
            }
        },
        ProgressAction::Show { goal: None } => {
            println!("{}", serde_json::to_string_pretty(&ledger.all())?);
        }
    }

    Ok(())
}
