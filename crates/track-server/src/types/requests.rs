//! Request body types for API endpoints.

use serde::{Deserialize, Serialize};
use time::{Date, Month, PrimitiveDateTime, Time};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::AppError;

/// Activity generation request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateRequest {
    /// One start time per activity to generate.
    pub times: Vec<TimeSpec>,
}

impl GenerateRequest {
    /// Validates every time and converts them to start timestamps.
    ///
    /// The first invalid entry fails the whole request.
    pub fn start_times(&self) -> Result<Vec<PrimitiveDateTime>, AppError> {
        if self.times.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one start time is required".to_string(),
            ));
        }

        let batch = self.times.len() > 1;
        self.times
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.to_datetime().map_err(|message| {
                    if batch {
                        AppError::InvalidInput(format!("time #{}: {message}", index + 1))
                    } else {
                        AppError::InvalidInput(message)
                    }
                })
            })
            .collect()
    }
}

/// Calendar date and wall-clock time of an activity start.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct TimeSpec {
    #[validate(range(min = 2000, max = 2100, message = "year must be between 2000 and 2100"))]
    pub year: i64,
    #[validate(range(min = 1, max = 12, message = "month must be between 1 and 12"))]
    pub month: i64,
    #[validate(range(min = 1, max = 31, message = "day must be between 1 and 31"))]
    pub day: i64,
    #[validate(range(min = 0, max = 23, message = "hour must be between 0 and 23"))]
    pub hour: i64,
    #[validate(range(min = 0, max = 59, message = "minute must be between 0 and 59"))]
    pub minute: i64,
    #[validate(range(min = 0, max = 59, message = "second must be between 0 and 59"))]
    pub second: i64,
}

impl TimeSpec {
    /// Field check order; the first failing field is reported.
    const FIELDS: [&'static str; 6] = ["year", "month", "day", "hour", "minute", "second"];

    pub fn new(year: i64, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Converts to a timestamp, or a human-readable reason it is invalid.
    pub fn to_datetime(&self) -> Result<PrimitiveDateTime, String> {
        if let Err(errors) = self.validate() {
            let field_errors = errors.field_errors();
            let message = Self::FIELDS
                .iter()
                .filter_map(|field| field_errors.get(*field))
                .flat_map(|errors| errors.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()));
            return Err(message.unwrap_or_else(|| "invalid time".to_string()));
        }

        let month = Month::try_from(self.month as u8).map_err(|e| e.to_string())?;
        let year = self.year as i32;
        let last_day = time::util::days_in_year_month(year, month);
        if self.day as u8 > last_day {
            return Err(format!("{month} has {last_day} days in {year}"));
        }

        let date =
            Date::from_calendar_date(year, month, self.day as u8).map_err(|e| e.to_string())?;
        let time = Time::from_hms(self.hour as u8, self.minute as u8, self.second as u8)
            .map_err(|e| e.to_string())?;

        Ok(PrimitiveDateTime::new(date, time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_valid_time() {
        let spec = TimeSpec::new(2024, 6, 1, 8, 0, 0);
        assert_eq!(spec.to_datetime().unwrap(), datetime!(2024-06-01 08:00:00));
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(
            TimeSpec::new(2024, 2, 29, 6, 30, 15).to_datetime().unwrap(),
            datetime!(2024-02-29 06:30:15)
        );
        assert_eq!(
            TimeSpec::new(2023, 2, 29, 6, 30, 15).to_datetime().unwrap_err(),
            "February has 28 days in 2023"
        );
        assert_eq!(
            TimeSpec::new(2024, 2, 30, 6, 30, 15).to_datetime().unwrap_err(),
            "February has 29 days in 2024"
        );
        assert_eq!(
            TimeSpec::new(2024, 4, 31, 0, 0, 0).to_datetime().unwrap_err(),
            "April has 30 days in 2024"
        );
    }

    #[test]
    fn test_range_messages() {
        let cases = [
            (TimeSpec::new(1999, 1, 1, 0, 0, 0), "year must be between 2000 and 2100"),
            (TimeSpec::new(2101, 1, 1, 0, 0, 0), "year must be between 2000 and 2100"),
            (TimeSpec::new(2024, 13, 1, 0, 0, 0), "month must be between 1 and 12"),
            (TimeSpec::new(2024, 1, 0, 0, 0, 0), "day must be between 1 and 31"),
            (TimeSpec::new(2024, 1, 1, 24, 0, 0), "hour must be between 0 and 23"),
            (TimeSpec::new(2024, 1, 1, 0, 60, 0), "minute must be between 0 and 59"),
            (TimeSpec::new(2024, 1, 1, 0, 0, -1), "second must be between 0 and 59"),
        ];

        for (spec, expected) in cases {
            assert_eq!(spec.to_datetime().unwrap_err(), expected, "{spec:?}");
        }
    }

    #[test]
    fn test_first_failing_field_reported() {
        let spec = TimeSpec::new(1999, 13, 40, 25, 61, 61);
        assert_eq!(
            spec.to_datetime().unwrap_err(),
            "year must be between 2000 and 2100"
        );
    }

    #[test]
    fn test_request_batch_prefix_and_empty() {
        let request = GenerateRequest {
            times: vec![
                TimeSpec::new(2024, 6, 1, 8, 0, 0),
                TimeSpec::new(2024, 2, 30, 8, 0, 0),
            ],
        };
        match request.start_times() {
            Err(AppError::InvalidInput(msg)) => {
                assert_eq!(msg, "time #2: February has 29 days in 2024")
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let empty = GenerateRequest { times: vec![] };
        assert!(matches!(empty.start_times(), Err(AppError::InvalidInput(_))));
    }
}
