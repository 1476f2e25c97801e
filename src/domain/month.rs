use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres, Type,
};
use std::fmt;
use time::Date;

/// A calendar month, stored as the first day of that month.
///
/// Every constructor truncates to the 1st, so two values built from dates in
/// the same month always compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(Date);

impl Month {
    pub fn new(year: i32, month: u8) -> Result<Self, String> {
        let month = time::Month::try_from(month)
            .map_err(|_| format!("`{month}` is not a valid month number"))?;
        Date::from_calendar_date(year, month, 1)
            .map(Self)
            .map_err(|e| format!("`{year}` is out of range: {e}"))
    }

    /// Parses the `MM-YYYY` representation used by the HTTP API.
    pub fn parse(s: &str) -> Result<Self, String> {
        let invalid = || format!("`{s}` is not a month in MM-YYYY format");

        let (month, year) = s.trim().split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(invalid());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let month: u8 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn from_date(date: Date) -> Self {
        Self(date.replace_day(1).unwrap_or(date))
    }

    pub fn first_day(&self) -> Date {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn number(&self) -> u8 {
        self.0.month() as u8
    }

    pub fn next_month(&self) -> Option<Self> {
        let (year, month) = match self.0.month() {
            time::Month::December => (self.year().checked_add(1)?, time::Month::January),
            month => (self.year(), month.next()),
        };
        Date::from_calendar_date(year, month, 1).ok().map(Self)
    }

    /// Inclusive range of months from `self` to `last`, one month per step.
    pub fn through(self, last: Month) -> MonthRange {
        MonthRange {
            next: Some(self),
            last,
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.number(), self.year())
    }
}

impl From<Date> for Month {
    fn from(date: Date) -> Self {
        Self::from_date(date)
    }
}

impl TryFrom<String> for Month {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

impl Type<Postgres> for Month {
    fn type_info() -> PgTypeInfo {
        <Date as Type<Postgres>>::type_info()
    }
}

impl Encode<'_, Postgres> for Month {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        <Date as Encode<'_, Postgres>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r> Decode<'r, Postgres> for Month {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let date = <Date as Decode<'r, Postgres>>::decode(value)?;
        Ok(Self::from_date(date))
    }
}

/// Iterator over an inclusive range of calendar months.
///
/// Empty when the first month is after the last one.
#[derive(Clone, Debug)]
pub struct MonthRange {
    next: Option<Month>,
    last: Month,
}

impl Iterator for MonthRange {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        let current = self.next.filter(|month| *month <= self.last)?;
        self.next = current.next_month();
        Some(current)
    }
}
