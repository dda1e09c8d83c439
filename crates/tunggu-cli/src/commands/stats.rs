use clap::Subcommand;
use tunggu_core::util::time::{format_clock, human_duration, ClockFormat};
use tunggu_core::{CoreError, HistoryDb, StatsRange};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Aggregate session statistics
    Show {
        /// today, week, or all
        #[arg(long, default_value = "all")]
        range: String,
    },
    /// Recent sessions, newest first
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Delete all recorded sessions
    Clear,
}

pub fn run(action: StatsAction) -> Result<(), CoreError> {
    let db = HistoryDb::open()?;
    match action {
        StatsAction::Show { range } => {
            let range = match range.as_str() {
                "today" => StatsRange::Today,
                "week" => StatsRange::Week,
                "all" => StatsRange::All,
                other => {
                    return Err(CoreError::Custom(format!(
                        "unknown range '{other}' (expected today, week, or all)"
                    )))
                }
            };
            let stats = db.stats(range)?;
            println!(
                "sessions: {} ({} completed, {} abandoned)",
                stats.total_sessions, stats.completed_sessions, stats.abandoned_sessions
            );
            println!("total time: {}", human_duration(stats.total_secs));
            if let Some(favorite) = &stats.favorite_kind {
                println!("favorite: {favorite}");
            }
            for (kind, stat) in &stats.by_kind {
                println!(
                    "  {:<18} {:>4}  {}",
                    kind,
                    stat.sessions,
                    human_duration(stat.total_secs)
                );
            }
        }
        StatsAction::Recent { limit } => {
            for record in db.recent(limit)? {
                println!(
                    "{}  {:<18} {:<13} {}  {}",
                    record.finished_at.format("%Y-%m-%d %H:%M"),
                    record.kind,
                    record.category,
                    format_clock(record.duration_secs, ClockFormat::MmSs),
                    if record.was_completed { "done" } else { "stopped" }
                );
            }
        }
        StatsAction::Clear => {
            let removed = db.clear()?;
            println!("removed {removed} sessions");
        }
    }
    Ok(())
}
