//! Session coaching.
//!
//! [`Coach`] is the seam for a remote language-model backend; this crate
//! ships only [`LocalCoach`], the heuristic used when no backend is
//! configured or a remote call fails.

use serde::{Deserialize, Serialize};

/// Data about a finished focus session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInput {
    pub duration_minutes: u64,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub summary: String,
    pub suggestions: Vec<String>,
}

/// Data about a period of inactivity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatchUpInput {
    pub last_active_days: u32,
    #[serde(default)]
    pub preferred_topics: Vec<String>,
}

pub trait Coach {
    /// Summarize a finished session and propose next steps.
    fn summarize_session(&self, input: &SessionInput) -> SessionSummary;

    /// Suggest short actions to get back on track after inactivity.
    fn suggest_catch_up(&self, input: &CatchUpInput) -> Vec<String>;
}

/// Offline coach with fixed heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCoach;

const NEXT_STEPS: [&str; 3] = [
    "Do a 10-min recap of today's key idea.",
    "Create one micro-example or flashcard.",
    "Plan the first 5 minutes of your next session.",
];

const CATCH_UP: [&str; 3] = [
    "Do a 15-min review of your last notes.",
    "Rebuild one small component from memory.",
    "Skim a short article on your niche topic.",
];

impl Coach for LocalCoach {
    fn summarize_session(&self, input: &SessionInput) -> SessionSummary {
        let focus = input
            .tasks
            .first()
            .map(String::as_str)
            .unwrap_or("your core skill");
        let mut summary = format!(
            "Session complete: {} min. Focused on {focus}.",
            input.duration_minutes
        );
        let notes = input.notes.trim();
        if !notes.is_empty() {
            summary.push_str(&format!(" Notes: {notes}"));
        }
        SessionSummary {
            summary,
            suggestions: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn suggest_catch_up(&self, _input: &CatchUpInput) -> Vec<String> {
        CATCH_UP.iter().map(|s| s.to_string()).collect()
    }
}

/// Pull bullet or numbered lines out of free-form coach output.
///
/// Keeps the last five candidates, stripped of their leading markers.
pub fn extract_suggestions(text: &str) -> Vec<String> {
    let candidates: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| {
            l.chars()
                .next()
                .is_some_and(|c| c == '-' || c == '*' || c.is_ascii_digit())
        })
        .collect();
    let skip = candidates.len().saturating_sub(5);
    candidates
        .into_iter()
        .skip(skip)
        .map(|l| {
            l.trim_start_matches(|c: char| {
                c == '-' || c == '*' || c == '.' || c.is_ascii_digit() || c.is_whitespace()
            })
            .to_string()
        })
        .collect()
}
