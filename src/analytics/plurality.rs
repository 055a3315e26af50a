use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::vote::Vote;

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub candidate_id: String,
    pub votes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub leaderboard: Vec<Standing>,
}

/// Outcome of a plurality election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerReport {
    pub winner: Option<String>,
    pub tie: bool,
    pub tied: Option<Vec<String>>,
}

/// Sum the votes for each of `candidates`. Every candidate gets an entry, even
/// with no votes, and votes for anyone else are ignored.
pub fn totals<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    votes: &[Vote],
) -> IndexMap<String, f64> {
    let mut totals = candidates
        .into_iter()
        .map(|id| (id.to_string(), 0.0))
        .collect::<IndexMap<_, _>>();
    for vote in votes {
        if let Some(total) = totals.get_mut(&vote.candidate_id) {
            *total += vote.tally_weight();
        }
    }
    totals
}

/// Order totals by votes descending, then candidate ID ascending.
pub fn rank(totals: IndexMap<String, f64>) -> Vec<Standing> {
    let mut board = totals
        .into_iter()
        .map(|(candidate_id, votes)| Standing {
            candidate_id,
            votes,
        })
        .collect::<Vec<_>>();
    board.sort_by(|a, b| {
        b.votes
            .total_cmp(&a.votes)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
    board
}

pub fn leaderboard<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    votes: &[Vote],
) -> Vec<Standing> {
    rank(totals(candidates, votes))
}

/// Determine the winner of a ranked leaderboard, reporting ties.
pub fn winner(board: &[Standing]) -> WinnerReport {
    let Some(top) = board.first().map(|s| s.votes) else {
        return WinnerReport {
            winner: None,
            tie: false,
            tied: None,
        };
    };
    let mut leaders = board
        .iter()
        .filter(|s| s.votes == top)
        .map(|s| s.candidate_id.clone())
        .collect::<Vec<_>>();
    if leaders.len() == 1 {
        WinnerReport {
            winner: leaders.pop(),
            tie: false,
            tied: None,
        }
    } else {
        WinnerReport {
            winner: None,
            tie: true,
            tied: Some(leaders),
        }
    }
}
