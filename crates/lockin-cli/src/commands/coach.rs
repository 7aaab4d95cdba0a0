use std::io::Read;

use clap::Subcommand;
use lockin_core::coach::extract_suggestions;
use lockin_core::{CatchUpInput, Coach, LocalCoach, SessionInput};

#[derive(Subcommand)]
pub enum CoachAction {
    /// Summarize a finished focus session
    Summary {
        /// Session length in minutes
        #[arg(long, default_value = "25")]
        minutes: u64,
        /// Task worked on (repeatable)
        #[arg(long = "task")]
        tasks: Vec<String>,
        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Suggest quick actions after a break in practice
    CatchUp {
        /// Days since last activity
        #[arg(long)]
        days: u32,
        /// Preferred topic (repeatable)
        #[arg(long = "topic")]
        topics: Vec<String>,
    },
    /// Pull bullet-point suggestions out of free text read from stdin
    Extract,
}

pub fn run(action: CoachAction) -> Result<(), Box<dyn std::error::Error>> {
    let coach = LocalCoach;
    match action {
        CoachAction::Summary { minutes, tasks, notes } => {
            let summary = coach.summarize_session(&SessionInput {
                duration_minutes: minutes,
                tasks,
                notes,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        CoachAction::CatchUp { days, topics } => {
            let suggestions = coach.suggest_catch_up(&CatchUpInput {
                last_active_days: days,
                preferred_topics: topics,
            });
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        CoachAction::Extract => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            println!("{}", serde_json::to_string_pretty(&extract_suggestions(&text))?);
        }
    }
    Ok(())
}
