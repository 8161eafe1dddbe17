//! Simple wrappers to keep epoch based times from being mixed up with other
//! numbers

#![warn(unused_crate_dependencies)]

use std::{fmt::Display, time::Duration};

/// Intended to be similar to Duration but always clear that it is in Seconds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, PartialOrd, Ord,
)]
pub struct Seconds(u64);

/// Seconds since the unix epoch. Keeps on ticking if the computer is sleeping
/// and only works with date/time after the unix epoch
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    PartialOrd,
    Ord,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn now() -> Self {
        Self(
            web_time::SystemTime::UNIX_EPOCH
                .elapsed()
                .expect("expected date on system to be after the epoch")
                .as_secs(),
        )
    }

    pub const fn from_unix_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Converts a (possibly fractional or negative) claim value as found in
    /// token payloads. Negative values clamp to the epoch.
    pub fn from_claim(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            Self(0)
        } else {
            Self(value.floor() as u64)
        }
    }

    pub fn as_unix_secs(&self) -> u64 {
        self.0
    }

    /// Returns `None` if the value cannot be represented as a date
    pub fn as_utc_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.0.try_into().ok()?, 0)
    }

    pub fn display_as_locale_datetime(&self) -> String {
        match self.as_utc_datetime() {
            Some(utc) => chrono::DateTime::<chrono::Local>::from(utc)
                .format("%c")
                .to_string(),
            None => format!("{} (unix)", self.0),
        }
    }

    /// Returns true if this timestamp is strictly earlier than `other`
    pub fn is_before(&self, other: Self) -> bool {
        self.0 < other.0
    }

    /// Returns the number of seconds since `past_time` or None if `past_time`
    /// is in the future
    pub fn seconds_since(self, past_time: Self) -> Option<Seconds> {
        if self.0 < past_time.0 {
            None
        } else {
            Some(Seconds(self.0 - past_time.0))
        }
    }

    /// Returns the number of seconds since this timestamp or None if this
    /// timestamp is in the future
    pub fn elapsed(self) -> Option<Seconds> {
        Self::now().seconds_since(self)
    }
}

impl std::ops::Add<Seconds> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Seconds) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub<Seconds> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Seconds) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Seconds {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Seconds {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Seconds> for Duration {
    fn from(value: Seconds) -> Self {
        Duration::from_secs(value.0)
    }
}

impl From<Duration> for Seconds {
    fn from(value: Duration) -> Self {
        Self(value.as_secs())
    }
}

impl Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
