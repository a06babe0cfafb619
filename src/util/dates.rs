//! Date handling for front matter and sitemap output.

use serde::{Deserialize, Deserializer, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

type FormatItems = &'static [BorrowedFormatItem<'static>];

const CALENDAR_DATE: FormatItems = format_description!("[year]-[month]-[day]");
const SPACED_DATETIME: FormatItems =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const T_DATETIME: FormatItems =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Parse an RFC 3339 timestamp, a `YYYY-MM-DD[ T]HH:MM:SS` local time, or a
/// bare `YYYY-MM-DD` date. Values without an offset are taken as UTC.
pub fn parse_content_date(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    let trimmed = value.trim();
    if let Ok(datetime) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(datetime);
    }
    for format in [SPACED_DATETIME, T_DATETIME] {
        if let Ok(datetime) = PrimitiveDateTime::parse(trimmed, format) {
            return Ok(datetime.assume_utc());
        }
    }
    Date::parse(trimmed, CALENDAR_DATE).map(|date| date.midnight().assume_utc())
}

pub fn parse_calendar_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value.trim(), CALENDAR_DATE)
}

/// `YYYY-MM-DD`, as used by sitemap `lastmod` values.
pub fn format_calendar_date(date: Date) -> String {
    date.format(CALENDAR_DATE)
        .unwrap_or_else(|_| date.to_string())
}

pub(crate) fn deserialize_optional<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(value) if !value.trim().is_empty() => parse_content_date(&value)
            .map(Some)
            .map_err(|err| serde::de::Error::custom(format!("invalid date `{value}`: {err}"))),
        _ => Ok(None),
    }
}

pub(crate) fn serialize_optional<S>(
    value: &Option<OffsetDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(datetime) => {
            let formatted = datetime
                .format(&Rfc3339)
                .map_err(|err| serde::ser::Error::custom(err.to_string()))?;
            serializer.serialize_some(&formatted)
        }
        None => serializer.serialize_none(),
    }
}
