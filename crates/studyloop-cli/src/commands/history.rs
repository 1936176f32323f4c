use clap::Subcommand;
use studyloop_core::storage::Database;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved sessions, newest first
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        HistoryAction::List { json } => {
            let sessions = db.list_sessions()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
            } else if sessions.is_empty() {
                println!("no saved sessions");
            } else {
                for s in sessions {
                    println!(
                        "{}  {:>4} min  {:>4} pts  [{}]  {}",
                        s.created_at.format("%Y-%m-%d %H:%M"),
                        s.duration_min,
                        s.points_earned,
                        s.mode.as_str(),
                        s.name,
                    );
                }
            }
        }
    }
    Ok(())
}
