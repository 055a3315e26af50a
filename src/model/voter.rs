use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Minimum age for a registered voter.
pub const MIN_AGE: u32 = 18;

/// A registered voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub voter_id: String,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub district: Option<String>,
}

impl Voter {
    /// Check the invariants that every stored voter must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.age < MIN_AGE {
            return Err(Error::InvalidArgument(format!(
                "Voter must be at least {MIN_AGE} years old"
            )));
        }
        Ok(())
    }

    /// Apply a patch to a copy of this voter, returning the validated result.
    /// `self` is left untouched, so a rejected patch never leaks into stored state.
    pub fn patched(&self, patch: VoterPatch) -> Result<Self> {
        let mut updated = self.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(age) = patch.age {
            updated.age = age;
        }
        if let Some(district) = patch.district {
            updated.district = district;
        }
        updated.validate()?;
        Ok(updated)
    }
}

/// A partial update: only the supplied fields are overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    /// `Some(None)` clears the district.
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub district: Option<Option<String>>,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_limit() {
        assert!(Voter::example1().validate().is_ok());
        assert!(matches!(
            Voter::underage().validate(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn patch_only_overwrites_supplied_fields() {
        let voter = Voter::example1();
        let patch = VoterPatch {
            name: Some("Alicia".to_string()),
            ..Default::default()
        };
        let updated = voter.patched(patch).unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(updated.age, voter.age);
        assert_eq!(updated.district, voter.district);
    }

    #[test]
    fn null_clears_district() {
        use rocket::serde::json::serde_json::from_str;

        let voter = Voter::example1();
        let absent: VoterPatch = from_str(r#"{"age": 23}"#).unwrap();
        assert_eq!(absent.district, None);
        assert_eq!(voter.patched(absent).unwrap().district.as_deref(), Some("D1"));

        let null: VoterPatch = from_str(r#"{"district": null}"#).unwrap();
        assert_eq!(null.district, Some(None));
        assert_eq!(voter.patched(null).unwrap().district, None);

        let moved: VoterPatch = from_str(r#"{"district": "D9"}"#).unwrap();
        assert_eq!(voter.patched(moved).unwrap().district.as_deref(), Some("D9"));
    }

    #[test]
    fn invalid_patch_is_rejected() {
        let voter = Voter::example1();
        let patch = VoterPatch {
            age: Some(12),
            ..Default::default()
        };
        assert!(voter.patched(patch).is_err());
        assert_eq!(voter, Voter::example1());
    }
}
