pub mod candidate;
pub mod election;
pub mod ledger;
pub mod registry;
pub mod timestamp;
pub mod vote;
pub mod voter;

use serde::{Deserialize, Deserializer};

pub use election::{Election, ElectionStore};

/// Deserialize a nullable patch field. With `#[serde(default)]` an absent key
/// stays `None`, while an explicit `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
