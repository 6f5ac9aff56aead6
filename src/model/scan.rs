use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Parse a wall-clock timestamp. Naive ISO 8601 is taken as local time; an
/// RFC 3339 value with an offset (a browser's `Date.toJSON()`) is converted
/// to local time.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    raw.parse::<NaiveDateTime>().or_else(|naive_err| {
        DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Local).naive_local())
            .map_err(|_| naive_err)
    })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(serde::de::Error::custom))
        .transpose()
}

/// A device check-in/check-out event for an employee-device pair.
///
/// `scanned_out` is `None` while the device is still checked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "employee": "f881234",
        "device": "D1",
        "scannedIn": "2024-01-15T09:30:00",
        "scannedOut": null
    })
)]
pub struct Scan {
    #[schema(example = "f881234")]
    pub employee: String,

    #[schema(example = "D1")]
    pub device: String,

    #[serde(deserialize_with = "deserialize_timestamp")]
    #[schema(example = "2024-01-15T09:30:00", value_type = String, format = "date-time")]
    pub scanned_in: NaiveDateTime,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(example = "2024-01-15T17:05:00", value_type = Option<String>, format = "date-time", nullable = true)]
    pub scanned_out: Option<NaiveDateTime>,
}

impl Scan {
    pub fn new(employee: impl Into<String>, device: impl Into<String>, scanned_in: NaiveDateTime) -> Self {
        Self {
            employee: employee.into(),
            device: device.into(),
            scanned_in,
            scanned_out: None,
        }
    }

    /// Still checked in
    pub fn is_open(&self) -> bool {
        self.scanned_out.is_none()
    }
}
