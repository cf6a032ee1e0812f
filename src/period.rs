//! Resolution of named reporting periods into inclusive date ranges.
//!
//! All windows are calendar-based: weeks start on Sunday everywhere in the
//! application, and month windows are leap-year aware.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use crate::Error;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first date in the range.
    pub start: Date,
    /// The last date in the range.
    pub end: Date,
}

/// A named window used to scope transaction queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    /// The calendar day containing the reference date.
    Day,
    /// The Sunday-start week containing the reference date.
    Week,
    /// The calendar month containing the reference date.
    Month,
}

impl FromStr for ReportingPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(Error::InvalidPeriod(other.to_owned())),
        }
    }
}

impl Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        };

        write!(f, "{label}")
    }
}

/// The recurrence of a budget's spending window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// The budget resets every Sunday-start week.
    Weekly,
    /// The budget resets every calendar month.
    Monthly,
}

impl BudgetPeriod {
    /// The canonical lowercase label, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// The spending window of this period containing `reference`.
    pub fn window(&self, reference: Date) -> DateRange {
        match self {
            Self::Weekly => resolve_period(ReportingPeriod::Week, reference),
            Self::Monthly => resolve_period(ReportingPeriod::Month, reference),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(Error::InvalidBudgetPeriod(other.to_owned())),
        }
    }
}

impl ToSql for BudgetPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BudgetPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// Compute the inclusive date window of `period` containing `reference`.
pub fn resolve_period(period: ReportingPeriod, reference: Date) -> DateRange {
    match period {
        ReportingPeriod::Day => DateRange {
            start: reference,
            end: reference,
        },
        ReportingPeriod::Week => {
            let start = reference
                - Duration::days(reference.weekday().number_days_from_sunday() as i64);

            DateRange {
                start,
                end: start + Duration::days(6),
            }
        }
        ReportingPeriod::Month => {
            let first_of_next = match reference.month() {
                Month::December => Date::from_calendar_date(reference.year() + 1, Month::January, 1),
                month => Date::from_calendar_date(reference.year(), month.next(), 1),
            }
            .unwrap();

            DateRange {
                start: reference.replace_day(1).unwrap(),
                end: first_of_next - Duration::days(1),
            }
        }
    }
}
