use serde::{Deserialize, Serialize};

/// A registered candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: String,
    pub name: String,
    #[serde(default)]
    pub party: Option<String>,
}

impl Candidate {
    /// Does this candidate belong to `party`?
    pub fn in_party(&self, party: &str) -> bool {
        self.party.as_deref() == Some(party)
    }

    /// Apply a patch to a copy of this candidate.
    pub fn patched(&self, patch: CandidatePatch) -> Self {
        let mut updated = self.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(party) = patch.party {
            updated.party = party;
        }
        updated
    }
}

/// A partial update: only the supplied fields are overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePatch {
    #[serde(default)]
    pub name: Option<String>,
    /// `Some(None)` clears the party.
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub party: Option<Option<String>>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_filter() {
        assert!(Candidate::example1().in_party("Purple"));
        assert!(!Candidate::example1().in_party("Orange"));
        assert!(!Candidate::example3().in_party(""));
    }

    #[test]
    fn patch() {
        let patch = CandidatePatch {
            party: Some(Some("Green".to_string())),
            ..Default::default()
        };
        let updated = Candidate::example1().patched(patch);
        assert_eq!(updated.name, "Carol");
        assert_eq!(updated.party.as_deref(), Some("Green"));

        let patch = CandidatePatch {
            party: Some(None),
            ..Default::default()
        };
        assert_eq!(Candidate::example1().patched(patch).party, None);
        assert_eq!(
            Candidate::example1().patched(CandidatePatch::default()),
            Candidate::example1()
        );
    }
}
