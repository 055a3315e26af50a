use indexmap::IndexMap;

use crate::error::{Error, Result};

use super::candidate::{Candidate, CandidatePatch};
use super::voter::{Voter, VoterPatch};

/// Registered voters and candidates, keyed by ID and kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    voters: IndexMap<String, Voter>,
    candidates: IndexMap<String, Candidate>,
}

impl Registry {
    pub fn voter_exists(&self, voter_id: &str) -> bool {
        self.voters.contains_key(voter_id)
    }

    pub fn candidate_exists(&self, candidate_id: &str) -> bool {
        self.candidates.contains_key(candidate_id)
    }

    /// IDs of every registered candidate, in registration order.
    pub fn candidate_ids(&self) -> impl Iterator<Item = &str> {
        self.candidates.keys().map(String::as_str)
    }

    pub fn register_voter(&mut self, voter: Voter) -> Result<&Voter> {
        voter.validate()?;
        if self.voter_exists(&voter.voter_id) {
            return Err(Error::Conflict(format!(
                "Duplicate voter_id '{}'",
                voter.voter_id
            )));
        }
        let id = voter.voter_id.clone();
        Ok(self.voters.entry(id).or_insert(voter))
    }

    pub fn voters(&self) -> impl Iterator<Item = &Voter> {
        self.voters.values()
    }

    pub fn voter(&self, voter_id: &str) -> Result<&Voter> {
        self.voters
            .get(voter_id)
            .ok_or_else(|| Error::not_found(format!("Voter '{voter_id}'")))
    }

    pub fn update_voter(&mut self, voter_id: &str, patch: VoterPatch) -> Result<&Voter> {
        let updated = self.voter(voter_id)?.patched(patch)?;
        // Unwrap safe: existence checked above and we hold `&mut self`.
        let stored = self.voters.get_mut(voter_id).unwrap();
        *stored = updated;
        Ok(stored)
    }

    /// Remove a voter. Votes they already cast stay in the ledger.
    pub fn delete_voter(&mut self, voter_id: &str) -> Result<Voter> {
        self.voters
            .shift_remove(voter_id)
            .ok_or_else(|| Error::not_found(format!("Voter '{voter_id}'")))
    }

    pub fn register_candidate(&mut self, candidate: Candidate) -> Result<&Candidate> {
        if self.candidate_exists(&candidate.candidate_id) {
            return Err(Error::Conflict(format!(
                "Duplicate candidate_id '{}'",
                candidate.candidate_id
            )));
        }
        let id = candidate.candidate_id.clone();
        Ok(self.candidates.entry(id).or_insert(candidate))
    }

    /// All candidates, optionally restricted to a single party. An empty
    /// party name applies no filter.
    pub fn candidates<'a>(
        &'a self,
        party: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Candidate> + 'a {
        self.candidates
            .values()
            .filter(move |c| {
                party.map_or(true, |party| party.is_empty() || c.in_party(party))
            })
    }

    pub fn candidate(&self, candidate_id: &str) -> Result<&Candidate> {
        self.candidates
            .get(candidate_id)
            .ok_or_else(|| Error::not_found(format!("Candidate '{candidate_id}'")))
    }

    pub fn update_candidate(
        &mut self,
        candidate_id: &str,
        patch: CandidatePatch,
    ) -> Result<&Candidate> {
        let updated = self.candidate(candidate_id)?.patched(patch);
        let stored = self.candidates.get_mut(candidate_id).unwrap(); // Checked above.
        *stored = updated;
        Ok(stored)
    }

    pub fn delete_candidate(&mut self, candidate_id: &str) -> Result<Candidate> {
        self.candidates
            .shift_remove(candidate_id)
            .ok_or_else(|| Error::not_found(format!("Candidate '{candidate_id}'")))
    }

    pub fn clear(&mut self) {
        self.voters.clear();
        self.candidates.clear();
    }
}
