//! Date parsing and formatting for the Trakt wire formats.
//!
//! The API has shipped three date shapes over the years and still mixes them
//! between endpoints. The shape is chosen by string length, not by sniffing
//! the content:
//!
//! | length | shape                              | example                         |
//! |--------|------------------------------------|---------------------------------|
//! | ≤ 10   | `yyyy-MM-dd`                       | `2014-10-15`                    |
//! | 23     | `yyyy-MM-dd HH:mm:ss <zone>`       | `2014-10-15 20:30:00 UTC`       |
//! | other  | `yyyy-MM-dd'T'HH:mm:ss.SSS<offset>`| `2014-10-15T20:30:00.000Z`      |
//!
//! Outgoing dates are always rendered in UTC as
//! `yyyy-MM-dd'T'HH:mm:ss.SSS+0000`. Every function here is pure; the
//! format is a parameter, never shared state.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const ZONED_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

const ZONED_LEN: usize = 23;

/// Errors produced while decoding a date value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("failed to parse date {input:?} with format {format:?}")]
    Parse { input: String, format: &'static str },

    /// The JSON value was neither a string nor null.
    #[error("unsupported date input: {0}")]
    UnsupportedInput(&'static str),
}

/// Parse a date string in any of the three wire shapes.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, DateError> {
    let len = input.chars().count();
    if len <= 10 {
        parse_plain(input)
    } else if len == ZONED_LEN {
        parse_zoned(input)
    } else {
        parse_iso(input)
    }
}

/// Decode a JSON value into a timestamp. Only strings are accepted.
pub fn date_from_value(value: &Value) -> Result<DateTime<Utc>, DateError> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Null => Err(DateError::UnsupportedInput("null")),
        Value::Bool(_) => Err(DateError::UnsupportedInput("bool")),
        Value::Number(_) => Err(DateError::UnsupportedInput("number")),
        Value::Array(_) => Err(DateError::UnsupportedInput("array")),
        Value::Object(_) => Err(DateError::UnsupportedInput("object")),
    }
}

/// Render a timestamp in the API's outgoing format.
pub fn format_date(date: &DateTime<Utc>) -> String {
    format_with(date, ISO_FORMAT)
}

/// Render a timestamp in UTC using an explicit chrono format string.
pub fn format_with(date: &DateTime<Utc>, format: &str) -> String {
    date.format(format).to_string()
}

fn parse_plain(input: &str) -> Result<DateTime<Utc>, DateError> {
    let err = || DateError::Parse {
        input: input.to_string(),
        format: DATE_FORMAT,
    };
    // chrono accepts unpadded fields; the wire shape does not.
    let shaped = input.len() == 10
        && input.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(err());
    }
    let date = NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| err())?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(err)?;
    Ok(Utc.from_utc_datetime(&midnight))
}

fn parse_zoned(input: &str) -> Result<DateTime<Utc>, DateError> {
    let err = || DateError::Parse {
        input: input.to_string(),
        format: ZONED_FORMAT,
    };
    if !input.is_ascii() {
        return Err(err());
    }
    let (local, zone) = input.split_at(19);
    let zone = zone.strip_prefix(' ').ok_or_else(err)?;
    let offset = zone_offset(zone).ok_or_else(err)?;
    let naive = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M:%S").map_err(|_| err())?;
    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(err)?;
    Ok(local.with_timezone(&Utc))
}

fn parse_iso(input: &str) -> Result<DateTime<Utc>, DateError> {
    let err = || DateError::Parse {
        input: input.to_string(),
        format: ISO_FORMAT,
    };
    // chrono treats `%.3f` as optional; the wire shape requires `.SSS`.
    let bytes = input.as_bytes();
    let millis = bytes.get(19) == Some(&b'.')
        && bytes.get(20..23).is_some_and(|d| d.iter().all(u8::is_ascii_digit))
        && !bytes.get(23).is_some_and(u8::is_ascii_digit);
    if !millis {
        return Err(err());
    }
    let normalized;
    let candidate = match input.strip_suffix('Z') {
        Some(rest) => {
            normalized = format!("{rest}+0000");
            normalized.as_str()
        }
        None => input,
    };
    DateTime::parse_from_str(candidate, ISO_FORMAT)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| err())
}

/// Offsets for the three-letter zones the API has been seen to emit.
fn zone_offset(zone: &str) -> Option<FixedOffset> {
    let hours = match zone {
        "UTC" | "GMT" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

/// `#[serde(with = "crate::date::serde_date")]` adapter for `DateTime<Utc>`.
pub mod serde_date {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        super::date_from_value(&value).map_err(de::Error::custom)
    }

    /// Same as the parent module for `Option<DateTime<Utc>>`; `null` and a
    /// missing field both decode to `None`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de, Deserialize, Deserializer, Serializer};
        use serde_json::Value;

        pub fn serialize<S: Serializer>(
            date: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_some(&super::super::format_date(date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Value::deserialize(deserializer)? {
                Value::Null => Ok(None),
                value => super::super::date_from_value(&value)
                    .map(Some)
                    .map_err(de::Error::custom),
            }
        }
    }
}
