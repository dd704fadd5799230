// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of seconds elapsed since the start of the service day.
///
/// May be negative : a reverse search that crosses the day start
/// keeps counting downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SecondsSinceDayStart {
    pub(crate) seconds: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PositiveDuration {
    pub(crate) seconds: u32,
}

impl SecondsSinceDayStart {
    pub const fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_seconds(seconds: i32) -> Self {
        Self { seconds }
    }

    pub const fn from_hms(hours: i32, minutes: i32, seconds: i32) -> Self {
        Self {
            seconds: hours * 60 * 60 + minutes * 60 + seconds,
        }
    }

    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    pub fn checked_add(self, duration: PositiveDuration) -> Option<Self> {
        let seconds = self.seconds.checked_add(duration.signed_seconds()?)?;
        Some(Self { seconds })
    }

    pub fn checked_sub(self, duration: PositiveDuration) -> Option<Self> {
        let seconds = self.seconds.checked_sub(duration.signed_seconds()?)?;
        Some(Self { seconds })
    }
}

impl PositiveDuration {
    pub const fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            seconds: hours * 60 * 60 + minutes * 60 + seconds,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }

    /// `None` when the duration does not fit in an `i32`.
    pub fn signed_seconds(&self) -> Option<i32> {
        i32::try_from(self.seconds).ok()
    }

    /// Seconds as an `i32`, capped to `i32::MAX`.
    pub fn saturating_seconds(&self) -> i32 {
        self.signed_seconds().unwrap_or(i32::MAX)
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0
    }
}

impl std::ops::Add for PositiveDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_add(rhs.seconds),
        }
    }
}

impl std::ops::Mul<u32> for PositiveDuration {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_mul(rhs),
        }
    }
}

impl std::ops::Add<PositiveDuration> for SecondsSinceDayStart {
    type Output = Self;

    fn add(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_add(rhs.saturating_seconds()),
        }
    }
}

impl std::ops::Sub<PositiveDuration> for SecondsSinceDayStart {
    type Output = Self;

    fn sub(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self.seconds.saturating_sub(rhs.saturating_seconds()),
        }
    }
}

impl Display for SecondsSinceDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.seconds < 0 { "-" } else { "" };
        let seconds = self.seconds.abs();
        write!(
            f,
            "{}{:02}:{:02}:{:02}",
            sign,
            seconds / 60 / 60,
            seconds / 60 % 60,
            seconds % 60
        )
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadTime {
    input: String,
}

impl std::error::Error for BadTime {}

impl Display for BadTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unable to parse `{}` as a time. Expected format is HH:MM or HH:MM:SS",
            self.input
        )
    }
}

// accepts "HH:MM" and "HH:MM:SS", hours may exceed 24 as long as the
// total fits in an i32
fn parse_hms(input: &str) -> Result<i32, BadTime> {
    let bad_time = || BadTime {
        input: input.to_string(),
    };
    let mut fields = input.trim().split(':');
    let hours: u32 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(bad_time)?;
    let minutes: u32 = fields
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(bad_time)?;
    let seconds: u32 = match fields.next() {
        Some(s) => s.parse().map_err(|_| bad_time())?,
        None => 0,
    };
    if fields.next().is_some() || minutes >= 60 || seconds >= 60 {
        return Err(bad_time());
    }
    hours
        .checked_mul(60 * 60)
        .and_then(|total| total.checked_add(minutes * 60 + seconds))
        .and_then(|total| i32::try_from(total).ok())
        .ok_or_else(bad_time)
}

impl FromStr for SecondsSinceDayStart {
    type Err = BadTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let seconds = parse_hms(s)?;
        Ok(Self { seconds })
    }
}

impl FromStr for PositiveDuration {
    type Err = BadTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let seconds = parse_hms(s)?;
        Ok(Self {
            seconds: seconds.unsigned_abs(),
        })
    }
}

impl TryFrom<String> for PositiveDuration {
    type Error = BadTime;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PositiveDuration::from_str(&value)
    }
}

impl From<PositiveDuration> for String {
    fn from(duration: PositiveDuration) -> Self {
        let seconds = duration.seconds;
        format!(
            "{:02}:{:02}:{:02}",
            seconds / 60 / 60,
            seconds / 60 % 60,
            seconds % 60
        )
    }
}
