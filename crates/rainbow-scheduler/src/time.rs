//! Weekday codes, day sets, and time-of-day parsing.
//!
//! Days use the single-letter codes printed in the catalog: `M T W R F S U`
//! (Thursday is `R`, Sunday is `U`). A [`DaySet`] is a 7-bit set of those
//! codes and serializes as a compact string in weekday order (`"MWF"`).

use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SectionError};

/// A day of the week, identified by its catalog code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    /// Parse a single catalog day code. Case-insensitive.
    pub fn from_code(code: char) -> Result<Self> {
        match code.to_ascii_uppercase() {
            'M' => Ok(Day::Mon),
            'T' => Ok(Day::Tue),
            'W' => Ok(Day::Wed),
            'R' => Ok(Day::Thu),
            'F' => Ok(Day::Fri),
            'S' => Ok(Day::Sat),
            'U' => Ok(Day::Sun),
            _ => Err(SectionError::InvalidDay(code)),
        }
    }

    pub fn code(self) -> char {
        match self {
            Day::Mon => 'M',
            Day::Tue => 'T',
            Day::Wed => 'W',
            Day::Thu => 'R',
            Day::Fri => 'F',
            Day::Sat => 'S',
            Day::Sun => 'U',
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl From<Day> for Weekday {
    fn from(day: Day) -> Self {
        match day {
            Day::Mon => Weekday::Mon,
            Day::Tue => Weekday::Tue,
            Day::Wed => Weekday::Wed,
            Day::Thu => Weekday::Thu,
            Day::Fri => Weekday::Fri,
            Day::Sat => Weekday::Sat,
            Day::Sun => Weekday::Sun,
        }
    }
}

impl From<Weekday> for Day {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Day::Mon,
            Weekday::Tue => Day::Tue,
            Weekday::Wed => Day::Wed,
            Weekday::Thu => Day::Thu,
            Weekday::Fri => Day::Fri,
            Weekday::Sat => Day::Sat,
            Weekday::Sun => Day::Sun,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A set of weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DaySet(u8);

impl DaySet {
    pub const fn empty() -> Self {
        DaySet(0)
    }

    /// Parse a run of day codes such as `"MWF"` or `"tr"`.
    ///
    /// Whitespace is ignored. Repeated codes are harmless.
    pub fn parse(codes: &str) -> Result<Self> {
        codes
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Day::from_code)
            .collect()
    }

    pub fn insert(&mut self, day: Day) {
        self.0 |= day.bit();
    }

    pub fn contains(self, day: Day) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn intersects(self, other: DaySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn intersection(self, other: DaySet) -> DaySet {
        DaySet(self.0 & other.0)
    }

    pub fn union(self, other: DaySet) -> DaySet {
        DaySet(self.0 | other.0)
    }

    pub fn is_subset(self, other: DaySet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Days in weekday order, Monday first.
    pub fn iter(self) -> impl Iterator<Item = Day> {
        Day::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Day> for DaySet {
    fn from_iter<I: IntoIterator<Item = Day>>(iter: I) -> Self {
        let mut set = DaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in self.iter() {
            write!(f, "{}", day.code())?;
        }
        Ok(())
    }
}

impl Serialize for DaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DaySet::parse(&raw).map_err(de::Error::custom)
    }
}

/// Parse a 24-hour `HH:MM` time of day.
pub fn parse_time(raw: &str) -> Result<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| SectionError::InvalidTime(trimmed.to_string()))
}

/// Format a time of day as `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter storing a [`NaiveTime`] as `"HH:MM"`.
pub mod hhmm {
    use super::*;

    pub fn serialize<S: Serializer>(
        time: &NaiveTime,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for an optional `"HH:MM"` time of day.
pub mod hhmm_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_some(&format_time(*t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|r| parse_time(&r).map_err(de::Error::custom))
            .transpose()
    }
}
