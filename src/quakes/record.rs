//! Raw dataset records and their validation into [`Quake`] events.

use crate::utils::geo::{GeoPoint, normalize_longitude};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a quake, taken from the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuakeId(pub String);

impl QuakeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuakeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Time of a quake as stored in the dataset: year, day of year and time of day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuakeTimestamp {
    pub year: i32,
    /// Day of year, 1-based.
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    /// Seconds, possibly fractional.
    pub second: f64,
}

impl QuakeTimestamp {
    /// Calendar date in UTC: `(day - 1)` whole days after January 1 of `year`,
    /// at the stored time of day.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, RecordError> {
        let january_first =
            NaiveDate::from_ymd_opt(self.year, 1, 1).ok_or(RecordError::InvalidDate {
                year: self.year,
                day: self.day,
            })?;
        let date = january_first
            .checked_add_signed(Duration::days(i64::from(self.day) - 1))
            .ok_or(RecordError::InvalidDate {
                year: self.year,
                day: self.day,
            })?;

        // Day 366 only exists in leap years.
        if chrono::Datelike::year(&date) != self.year {
            return Err(RecordError::InvalidDate {
                year: self.year,
                day: self.day,
            });
        }

        let invalid_time = RecordError::InvalidTime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        };
        if !self.second.is_finite() || !(0.0..60.0).contains(&self.second) {
            return Err(invalid_time);
        }
        let start_of_minute = NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .ok_or_else(|| invalid_time.clone())?;
        // Rounded once so a fraction close to 1 carries into the next second.
        let nanos = (self.second * 1e9).round() as i64;

        date.and_time(start_of_minute)
            .and_utc()
            .checked_add_signed(Duration::nanoseconds(nanos))
            .ok_or(invalid_time)
    }

    /// `HH:MM:SS` form for display.
    pub fn time_of_day(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.hour,
            self.minute,
            self.second.floor() as u32
        )
    }
}

/// A validated surface event. Read-only after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quake {
    pub id: QuakeId,
    pub timestamp: QuakeTimestamp,
    pub location: GeoPoint,
    pub magnitude: f64,
    pub stations: Vec<String>,
}

impl Quake {
    /// UTC date of the event. Validation guarantees this is well formed.
    pub fn datetime(&self) -> DateTime<Utc> {
        self.timestamp
            .to_datetime()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// A record as it appears in the dataset file.
///
/// Time fields are strings in the source data; unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct QuakeRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub year: StringOrNumber,
    pub day: StringOrNumber,
    pub hour: StringOrNumber,
    pub minute: StringOrNumber,
    pub seconds: StringOrNumber,
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: f64,
    #[serde(default)]
    pub station: Vec<StationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

/// Numeric field that may be encoded as a JSON string or number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Number(f64),
    Text(String),
}

impl StringOrNumber {
    fn parse(&self, field: &'static str) -> Result<f64, RecordError> {
        match self {
            StringOrNumber::Number(value) => Ok(*value),
            StringOrNumber::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| RecordError::InvalidNumber {
                        field,
                        value: text.clone(),
                    })
            }
        }
    }

    fn parse_integer(&self, field: &'static str) -> Result<i64, RecordError> {
        let value = self.parse(field)?;
        if value.fract() != 0.0 || !value.is_finite() {
            return Err(RecordError::InvalidNumber {
                field,
                value: value.to_string(),
            });
        }
        Ok(value as i64)
    }
}

/// Reasons a dataset record is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    EmptyId,
    InvalidNumber { field: &'static str, value: String },
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
    InvalidMagnitude(f64),
    InvalidDate { year: i32, day: u32 },
    InvalidTime { hour: u32, minute: u32, second: f64 },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::EmptyId => write!(f, "record has an empty id"),
            RecordError::InvalidNumber { field, value } => {
                write!(f, "field `{field}` is not a valid number: {value:?}")
            }
            RecordError::LatitudeOutOfRange(latitude) => {
                write!(f, "latitude {latitude} is outside [-90, 90]")
            }
            RecordError::LongitudeOutOfRange(longitude) => {
                write!(f, "longitude {longitude} is outside [-180, 180]")
            }
            RecordError::InvalidMagnitude(magnitude) => {
                write!(f, "magnitude {magnitude} is negative or not finite")
            }
            RecordError::InvalidDate { year, day } => {
                write!(f, "day {day} does not exist in year {year}")
            }
            RecordError::InvalidTime {
                hour,
                minute,
                second,
            } => write!(f, "invalid time of day {hour}:{minute}:{second}"),
        }
    }
}

impl std::error::Error for RecordError {}

impl TryFrom<QuakeRecord> for Quake {
    type Error = RecordError;

    fn try_from(record: QuakeRecord) -> Result<Self, Self::Error> {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(RecordError::EmptyId);
        }

        if !record.latitude.is_finite() || !(-90.0..=90.0).contains(&record.latitude) {
            return Err(RecordError::LatitudeOutOfRange(record.latitude));
        }
        if !record.longitude.is_finite() || !(-180.0..=180.0).contains(&record.longitude) {
            return Err(RecordError::LongitudeOutOfRange(record.longitude));
        }
        if !record.magnitude.is_finite() || record.magnitude < 0.0 {
            return Err(RecordError::InvalidMagnitude(record.magnitude));
        }

        let year = record.year.parse_integer("year")?;
        let day = record.day.parse_integer("day")?;
        let hour = record.hour.parse_integer("hour")?;
        let minute = record.minute.parse_integer("minute")?;
        let second = record.seconds.parse("seconds")?;

        let year = i32::try_from(year).map_err(|_| RecordError::InvalidNumber {
            field: "year",
            value: year.to_string(),
        })?;

        if !(1..=366).contains(&day) {
            return Err(RecordError::InvalidDate {
                year,
                day: day.clamp(0, i64::from(u32::MAX)) as u32,
            });
        }
        if !(0..24).contains(&hour)
            || !(0..60).contains(&minute)
            || !second.is_finite()
            || !(0.0..60.0).contains(&second)
        {
            return Err(RecordError::InvalidTime {
                hour: hour.clamp(0, i64::from(u32::MAX)) as u32,
                minute: minute.clamp(0, i64::from(u32::MAX)) as u32,
                second,
            });
        }
        let (day, hour, minute) = (day as u32, hour as u32, minute as u32);

        let timestamp = QuakeTimestamp {
            year,
            day,
            hour,
            minute,
            second,
        };

        timestamp.to_datetime()?;

        Ok(Quake {
            id: QuakeId::new(id),
            timestamp,
            location: GeoPoint::new(record.latitude, normalize_longitude(record.longitude)),
            magnitude: record.magnitude,
            stations: record
                .station
                .into_iter()
                .map(|station| {
                    if station.label.is_empty() {
                        station.value
                    } else {
                        station.label
                    }
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn record(json: &str) -> QuakeRecord {
        serde_json::from_str(json).unwrap()
    }

    const VALID: &str = r#"{
        "_id": "q1", "year": "1973", "day": "72", "hour": "07",
        "minute": "56", "seconds": "30", "latitude": 84.0,
        "longitude": -134.0, "magnitude": 3.2,
        "station": [{"value": "s12", "label": "Apollo 12"}],
        "__v": 0
    }"#;

    #[test]
    fn test_valid_record() {
        let quake = Quake::try_from(record(VALID)).unwrap();
        assert_eq!(quake.id.as_str(), "q1");
        assert_eq!(quake.timestamp.day, 72);
        assert_eq!(quake.stations, vec!["Apollo 12".to_string()]);
        assert_eq!(quake.location.longitude, -134.0);
    }

    #[test]
    fn test_day_of_year_reconstruction() {
        let timestamp = QuakeTimestamp {
            year: 1973,
            day: 72,
            hour: 7,
            minute: 56,
            second: 30.0,
        };
        let datetime = timestamp.to_datetime().unwrap();
        assert_eq!(datetime.month(), 3);
        assert_eq!(datetime.day(), 13);
        assert_eq!(datetime.hour(), 7);
        assert_eq!(datetime.minute(), 56);
        assert_eq!(datetime.second(), 30);
    }

    #[test]
    fn test_leap_day_handling() {
        let leap = QuakeTimestamp {
            year: 1972,
            day: 366,
            hour: 0,
            minute: 0,
            second: 0.0,
        };
        assert_eq!(leap.to_datetime().unwrap().day(), 31);

        let json = VALID.replace(r#""day": "72""#, r#""day": "366""#);
        assert_eq!(
            Quake::try_from(record(&json)),
            Err(RecordError::InvalidDate {
                year: 1973,
                day: 366
            })
        );
    }

    #[test]
    fn test_numeric_fields_accept_numbers() {
        let json = VALID.replace(r#""year": "1973""#, r#""year": 1973"#);
        assert!(Quake::try_from(record(&json)).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let json = VALID.replace("84.0", "91.0");
        assert_eq!(
            Quake::try_from(record(&json)),
            Err(RecordError::LatitudeOutOfRange(91.0))
        );
    }

    #[test]
    fn test_rejects_negative_magnitude() {
        let json = VALID.replace("3.2", "-1.0");
        assert_eq!(
            Quake::try_from(record(&json)),
            Err(RecordError::InvalidMagnitude(-1.0))
        );
    }

    #[test]
    fn test_rejects_bad_hour() {
        let json = VALID.replace(r#""hour": "07""#, r#""hour": "24""#);
        assert!(matches!(
            Quake::try_from(record(&json)),
            Err(RecordError::InvalidTime { hour: 24, .. })
        ));
    }

    #[test]
    fn test_rejects_garbage_number() {
        let json = VALID.replace(r#""minute": "56""#, r#""minute": "fifty""#);
        assert!(matches!(
            Quake::try_from(record(&json)),
            Err(RecordError::InvalidNumber {
                field: "minute",
                ..
            })
        ));
    }

    #[test]
    fn test_longitude_minus_180_normalized() {
        let json = VALID.replace("-134.0", "-180.0");
        let quake = Quake::try_from(record(&json)).unwrap();
        assert_eq!(quake.location.longitude, 180.0);
    }

    #[test]
    fn test_time_of_day_format() {
        let quake = Quake::try_from(record(VALID)).unwrap();
        assert_eq!(quake.timestamp.time_of_day(), "07:56:30");
    }

    #[test]
    fn test_fraction_rounding_up_carries_into_next_second() {
        let json = VALID.replace(r#""seconds": "30""#, r#""seconds": "30.9999999999""#);
        let quake = Quake::try_from(record(&json)).unwrap();
        let datetime = quake.datetime();
        assert_eq!(datetime.minute(), 56);
        assert_eq!(datetime.second(), 31);
        assert_eq!(datetime.nanosecond(), 0);

        let end_of_minute = QuakeTimestamp {
            year: 1973,
            day: 72,
            hour: 7,
            minute: 59,
            second: 59.9999999999,
        };
        let datetime = end_of_minute.to_datetime().unwrap();
        assert_eq!((datetime.hour(), datetime.minute(), datetime.second()), (8, 0, 0));
    }

    #[test]
    fn test_fractional_seconds_keep_nanoseconds() {
        let json = VALID.replace(r#""seconds": "30""#, r#""seconds": "30.25""#);
        let datetime = Quake::try_from(record(&json)).unwrap().datetime();
        assert_eq!(datetime.second(), 30);
        assert_eq!(datetime.nanosecond(), 250_000_000);
    }
}
