//! Plain-text rendering of workflow state for the terminal front end.

use crate::models::{HistoryEntry, Tone};
use crate::workflow::{HistoryState, SubmissionState};

const BRIGHT: char = '●';
const CALM: char = '○';

fn tone_symbol(tone: Tone) -> char {
    match tone {
        Tone::Bright => BRIGHT,
        Tone::Calm => CALM,
    }
}

/// Render the mood trend as one symbol per entry, in server order.
///
/// ```text
/// Mood Trend  ● ○ ●
/// ```
pub fn render_trend(entries: &[HistoryEntry]) -> String {
    let symbols: Vec<String> = entries
        .iter()
        .map(|e| tone_symbol(e.tone()).to_string())
        .collect();
    format!("Mood Trend  {}", symbols.join(" "))
}

/// Render the history panel, or `None` when there is nothing to show.
pub fn render_history(history: &HistoryState) -> Option<String> {
    match history {
        HistoryState::Loaded(entries) if !entries.is_empty() => Some(render_trend(entries)),
        HistoryState::Failed(reason) => Some(format!("(history unavailable: {})", reason)),
        _ => None,
    }
}

/// Render the outcome of the latest submission.
pub fn render_submission(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => String::new(),
        SubmissionState::Submitting => "Analyzing...".to_string(),
        SubmissionState::Succeeded(result) => {
            format!("{}\n(Sentiment: {})", result.message, result.sentiment)
        }
        SubmissionState::Failed { kind, detail } => {
            format!("{}\n  [{}]", kind.user_message(), detail)
        }
    }
}
