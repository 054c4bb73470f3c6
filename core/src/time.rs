//! Timestamp codec for the two date encodings the API emits.
//!
//! # Design
//! The API writes dates either with an explicit offset
//! (`2017-09-24T13:28:06+00:00`) or naive (`2017-12-25T09:54:42`), and only
//! accepts the naive form back. Naive values are read in a *location*, a
//! fixed UTC offset that belongs to the client configuration. Serde gives a
//! `Deserialize` impl no way to receive that location, so the dispatcher
//! scopes it around each decode with [`with_location`]; outside any scope the
//! location is UTC. Decoded values hold an absolute instant, so later scopes
//! never change them.

use std::cell::Cell;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimestampError;

/// Layout of a timestamp without offset, e.g. `2017-12-25T09:54:42`.
pub const TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// Layout of a timestamp with offset, e.g. `2017-09-24T13:28:06+00:00`.
pub const TIME_WITH_ZONE_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%:z";

// Parsing accepts optional fractional seconds; encoding never emits them.
const PARSE_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const PARSE_WITH_ZONE_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

thread_local! {
    static DECODE_LOCATION: Cell<FixedOffset> = Cell::new(Utc.fix());
}

/// The UTC location.
pub fn utc() -> FixedOffset {
    Utc.fix()
}

/// Location used by `Deserialize` for naive timestamps on this thread.
pub fn current_location() -> FixedOffset {
    DECODE_LOCATION.with(Cell::get)
}

/// Run `f` with `location` as the naive-timestamp location on this thread.
///
/// The previous location is restored when `f` returns or unwinds.
pub fn with_location<R>(location: FixedOffset, f: impl FnOnce() -> R) -> R {
    struct Restore(FixedOffset);

    impl Drop for Restore {
        fn drop(&mut self) {
            DECODE_LOCATION.with(|cell| cell.set(self.0));
        }
    }

    let _restore = Restore(DECODE_LOCATION.with(|cell| cell.replace(location)));
    f()
}

/// An absolute point in time, kept in the location it was decoded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    /// Wrap `instant`, expressed in `location`.
    pub fn new<Tz: TimeZone>(instant: DateTime<Tz>, location: FixedOffset) -> Self {
        Self(instant.with_timezone(&location))
    }

    /// Wrap a UTC instant.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        Self::new(instant, utc())
    }

    /// Decode either supported layout, reading naive values in `location`.
    ///
    /// Surrounding double quotes are stripped first, so raw JSON string
    /// tokens are accepted as well.
    pub fn decode(input: &[u8], location: FixedOffset) -> Result<Self, TimestampError> {
        let input = match input {
            [b'"', inner @ .., b'"'] => inner,
            other => other,
        };
        let text = std::str::from_utf8(input).map_err(|_| TimestampError::NotUtf8)?;

        match DateTime::parse_from_str(text, PARSE_WITH_ZONE_LAYOUT) {
            Ok(zoned) => Ok(Self::new(zoned, location)),
            Err(zoned_err) => {
                let naive = NaiveDateTime::parse_from_str(text, PARSE_LAYOUT).map_err(|_| {
                    TimestampError::Parse {
                        input: text.to_string(),
                        source: zoned_err,
                    }
                })?;
                location
                    .from_local_datetime(&naive)
                    .single()
                    .map(Self)
                    .ok_or_else(|| TimestampError::Ambiguous(text.to_string()))
            }
        }
    }

    /// Encode as the naive layout, wall clock of the stored location.
    pub fn encode(&self) -> String {
        self.0.format(TIME_LAYOUT).to_string()
    }

    /// The same instant expressed in another location.
    pub fn in_location(&self, location: FixedOffset) -> Self {
        Self(self.0.with_timezone(&location))
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl Visitor<'_> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a timestamp like 2017-12-25T09:54:42 or 2017-12-25T09:54:42+00:00")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Timestamp, E> {
                Timestamp::decode(value.as_bytes(), current_location()).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[rstest]
    #[case("2017-12-25T09:54:42")]
    #[case("2000-01-01T00:00:00")]
    #[case("2024-02-29T23:59:59")]
    fn naive_timestamps_round_trip(#[case] input: &str) {
        let decoded = Timestamp::decode(input.as_bytes(), utc()).unwrap();
        assert_eq!(decoded.encode(), input);

        let shifted = Timestamp::decode(input.as_bytes(), offset(9)).unwrap();
        assert_eq!(shifted.encode(), input);
    }

    #[test]
    fn naive_timestamp_is_read_in_location() {
        let decoded = Timestamp::decode(b"2017-12-25T09:54:42", offset(2)).unwrap();
        assert_eq!(decoded.to_utc().to_rfc3339(), "2017-12-25T07:54:42+00:00");
    }

    #[test]
    fn offset_timestamp_keeps_instant_and_normalizes() {
        let decoded = Timestamp::decode(b"2017-09-24T13:28:06+02:00", utc()).unwrap();
        assert_eq!(decoded.to_utc().to_rfc3339(), "2017-09-24T11:28:06+00:00");
        assert_eq!(decoded.encode(), "2017-09-24T11:28:06");

        let local = Timestamp::decode(b"2017-09-24T13:28:06+02:00", offset(-5)).unwrap();
        assert_eq!(local.encode(), "2017-09-24T06:28:06");
        assert_eq!(local.to_utc(), decoded.to_utc());
    }

    #[rstest]
    #[case("2017-12-25T09:54:42.000", "2017-12-25T09:54:42")]
    #[case("2017-12-25T09:54:42.5", "2017-12-25T09:54:42")]
    #[case("2017-12-25T11:54:42.123456+02:00", "2017-12-25T09:54:42")]
    fn fractional_seconds_are_accepted_and_dropped(#[case] input: &str, #[case] encoded: &str) {
        let decoded = Timestamp::decode(input.as_bytes(), utc()).unwrap();
        assert_eq!(decoded.encode(), encoded);
    }

    #[test]
    fn quotes_are_stripped() {
        let decoded = Timestamp::decode(b"\"2017-12-25T09:54:42\"", utc()).unwrap();
        assert_eq!(decoded.encode(), "2017-12-25T09:54:42");
    }

    #[test]
    fn garbage_reports_original_parse_failure() {
        let err = Timestamp::decode(b"yesterday", utc()).unwrap_err();
        assert!(matches!(err, TimestampError::Parse { ref input, .. } if input == "yesterday"));
    }

    #[test]
    fn serde_uses_scoped_location() {
        let json = r#""2017-12-25T09:54:42""#;
        let in_utc: Timestamp = serde_json::from_str(json).unwrap();
        let in_tokyo: Timestamp = with_location(offset(9), || serde_json::from_str(json)).unwrap();

        assert_eq!(in_utc.encode(), in_tokyo.encode());
        assert_eq!(
            in_utc.to_utc() - in_tokyo.to_utc(),
            chrono::Duration::hours(9)
        );
        assert_eq!(current_location(), utc());
        assert_eq!(serde_json::to_string(&in_tokyo).unwrap(), json);
    }

    #[test]
    fn scope_restores_on_panic() {
        let result = std::panic::catch_unwind(|| {
            with_location(offset(3), || panic!("boom"));
        });
        assert!(result.is_err());
        assert_eq!(current_location(), utc());
    }
}
