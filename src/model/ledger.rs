use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::error::{Error, Result};
use crate::toy_crypto::proof::verify_proof;

use super::registry::Registry;
use super::vote::{EncryptedBallot, Vote, VoteRequest};

/// Append-only record of cast votes and submitted encrypted ballots.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    votes: Vec<Vote>,
    encrypted_ballots: Vec<EncryptedBallot>,
}

impl Ledger {
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn encrypted_ballots(&self) -> &[EncryptedBallot] {
        &self.encrypted_ballots
    }

    /// Ensure the vote references a registered voter and candidate.
    fn check_references(registry: &Registry, request: &VoteRequest) -> Result<()> {
        if !registry.voter_exists(&request.voter_id) {
            return Err(Error::not_found(format!("Voter '{}'", request.voter_id)));
        }
        if !registry.candidate_exists(&request.candidate_id) {
            return Err(Error::not_found(format!(
                "Candidate '{}'",
                request.candidate_id
            )));
        }
        Ok(())
    }

    fn has_standard_vote(&self, voter_id: &str) -> bool {
        self.votes
            .iter()
            .any(|v| !v.weighted && v.voter_id == voter_id)
    }

    fn append(&mut self, request: VoteRequest, weighted: bool, now: DateTime<Utc>) -> DateTime<Utc> {
        let timestamp = request.timestamp.unwrap_or(now);
        debug!(
            "Recording {} vote from '{}' for '{}'",
            if weighted { "weighted" } else { "standard" },
            request.voter_id,
            request.candidate_id
        );
        self.votes.push(Vote {
            voter_id: request.voter_id,
            candidate_id: request.candidate_id,
            weight: request.weight,
            timestamp,
            weighted,
        });
        timestamp
    }

    /// Cast a standard vote. Each voter gets exactly one; the submitted weight
    /// must not be negative and is recorded but never counted. Returns the
    /// vote's effective timestamp.
    pub fn cast(
        &mut self,
        registry: &Registry,
        request: VoteRequest,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        Self::check_references(registry, &request)?;
        if !(request.weight >= 0.0) {
            return Err(Error::InvalidArgument(format!(
                "Weight must be >= 0, got {}",
                request.weight
            )));
        }
        if self.has_standard_vote(&request.voter_id) {
            return Err(Error::Conflict(format!(
                "Duplicate vote from voter '{}'",
                request.voter_id
            )));
        }
        Ok(self.append(request, false, now))
    }

    /// Cast a weighted vote. These are never deduplicated.
    pub fn cast_weighted(
        &mut self,
        registry: &Registry,
        request: VoteRequest,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        Self::check_references(registry, &request)?;
        if !(request.weight > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "Weight must be > 0, got {}",
                request.weight
            )));
        }
        Ok(self.append(request, true, now))
    }

    /// Votes timestamped within `[start, end]`, in insertion order.
    pub fn query(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> impl Iterator<Item = &Vote> {
        self.votes.iter().filter(move |v| v.within(start, end))
    }

    /// Accept an encrypted ballot whose proof checks out, returning its index.
    pub fn submit_encrypted(
        &mut self,
        registry: &Registry,
        ballot: EncryptedBallot,
    ) -> Result<usize> {
        if !registry.voter_exists(&ballot.voter_id) {
            return Err(Error::not_found(format!("Voter '{}'", ballot.voter_id)));
        }
        if !verify_proof(&ballot.voter_id, &ballot.ciphertext, &ballot.proof) {
            return Err(Error::InvalidProof(format!(
                "Zero-knowledge proof rejected for voter '{}'",
                ballot.voter_id
            )));
        }
        self.encrypted_ballots.push(ballot);
        let index = self.encrypted_ballots.len() - 1;
        info!("Accepted encrypted ballot #{index}");
        Ok(index)
    }

    pub fn clear(&mut self) {
        self.votes.clear();
        self.encrypted_ballots.clear();
    }
}
