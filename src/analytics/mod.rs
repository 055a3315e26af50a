//! Analytics over the ballot ledger and over request-supplied ballots.

pub mod audit;
pub mod plurality;
pub mod privacy;
pub mod schulze;
