use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

use crate::error::Error as TallyError;

/// A UTC instant supplied as a query bound or in a request body.
///
/// RFC 3339 strings are used as given; an ISO-8601 date-time without an
/// offset is taken to be UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

#[derive(Debug, Error)]
#[error("'{0}' is not an ISO-8601 date-time")]
pub struct ParseError(String);

impl FromStr for Timestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(datetime.with_timezone(&Utc)));
        }
        s.parse::<NaiveDateTime>()
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
            .map_err(|_| ParseError(s.to_string()))
    }
}

impl Deref for Timestamp {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.0
    }
}

impl From<ParseError> for TallyError {
    fn from(err: ParseError) -> Self {
        TallyError::InvalidArgument(err.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

/// For `#[serde(deserialize_with)]` on optional `DateTime<Utc>` body fields.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Timestamp>::deserialize(deserializer)?.map(DateTime::from))
}

/// Parse an optional bound, rejecting anything that is not a date-time.
pub fn parse_bound(bound: Option<&str>) -> Result<Option<DateTime<Utc>>, TallyError> {
    Ok(bound.map(str::parse::<Timestamp>).transpose()?.map(DateTime::from))
}
