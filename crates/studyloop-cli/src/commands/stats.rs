use clap::Subcommand;
use studyloop_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's sessions and points
    Today,
    /// All-time totals
    All,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let stats = db.stats_all()?;
    match action {
        StatsAction::Today => {
            println!("sessions today: {}", stats.today_sessions);
            println!("points today:   {}", stats.today_points);
        }
        StatsAction::All => {
            println!("saved sessions:      {}", stats.total_sessions);
            println!("total study minutes: {}", stats.total_study_min);
            println!("total points:        {}", stats.total_points);
        }
    }
    Ok(())
}
