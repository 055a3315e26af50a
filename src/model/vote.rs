use chrono::{DateTime, Utc};
use rocket::serde::json::Value;
use serde::{Deserialize, Serialize};

fn default_weight() -> f64 {
    1.0
}

/// A vote as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub voter_id: String,
    pub candidate_id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Defaults to the time of insertion. An offset-less time is taken as UTC.
    #[serde(default, deserialize_with = "super::timestamp::deserialize_optional")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl VoteRequest {
    pub fn new(voter_id: impl Into<String>, candidate_id: impl Into<String>) -> Self {
        Self {
            voter_id: voter_id.into(),
            candidate_id: candidate_id.into(),
            weight: default_weight(),
            timestamp: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A vote recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub voter_id: String,
    pub candidate_id: String,
    pub weight: f64,
    pub timestamp: DateTime<Utc>,
    pub weighted: bool,
}

impl Vote {
    /// How much this vote counts towards its candidate's total.
    /// Standard votes always count exactly once, whatever weight was submitted.
    pub fn tally_weight(&self) -> f64 {
        if self.weighted {
            self.weight
        } else {
            1.0
        }
    }

    /// Is this vote's timestamp within the closed interval `[start, end]`?
    pub fn within(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
        start.map_or(true, |start| self.timestamp >= start)
            && end.map_or(true, |end| self.timestamp <= end)
    }
}

/// Acknowledgement of an accepted vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteAccepted {
    pub detail: String,
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,
}

/// An encrypted ballot with its toy zero-knowledge proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedBallot {
    pub voter_id: String,
    pub ciphertext: String,
    pub proof: String,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Acknowledgement of an accepted encrypted ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotAccepted {
    pub detail: String,
    pub index: usize,
}

/// Votes matching a time-range query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteList {
    pub count: usize,
    pub votes: Vec<Vote>,
}

impl FromIterator<Vote> for VoteList {
    fn from_iter<I: IntoIterator<Item = Vote>>(iter: I) -> Self {
        let votes = iter.into_iter().collect::<Vec<_>>();
        Self {
            count: votes.len(),
            votes,
        }
    }
}
