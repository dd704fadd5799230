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

use crate::error::ConfigurationError;
use std::fmt::{Display, Formatter};

const RATIO_RESOLUTION: i32 = 16;
const MIN_RATIO: f64 = 1.0;
const MAX_RATIO: f64 = 4.0;

/// Upper bound of the slack of a time criterion, in seconds.
pub const MAX_TIME_SLACK: i32 = 4 * 60 * 60;

/// Upper bound of the slack of a cost criterion : the cost of
/// 4 hours of travel, in centi-seconds.
pub const MAX_COST_SLACK: i32 = 100 * MAX_TIME_SLACK;

/// Loosens the dominance test on one criterion : `v' = v * ratio + slack`.
///
/// The ratio is rounded to the closest sixteenth so that relaxing
/// a value needs only integer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelaxFunction {
    ratio_of_16s: i32,
    slack: i32,
}

impl RelaxFunction {
    /// The identity function : no relaxation.
    pub const fn normal() -> Self {
        Self {
            ratio_of_16s: RATIO_RESOLUTION,
            slack: 0,
        }
    }

    pub fn of_increasing_time(ratio: f64, slack: i32) -> Result<Self, ConfigurationError> {
        Self::new(ratio, slack, MAX_TIME_SLACK)
    }

    pub fn of_cost(ratio: f64, slack: i32) -> Result<Self, ConfigurationError> {
        Self::new(ratio, slack, MAX_COST_SLACK)
    }

    fn new(ratio: f64, slack: i32, max_slack: i32) -> Result<Self, ConfigurationError> {
        if !(MIN_RATIO..=MAX_RATIO).contains(&ratio) {
            return Err(ConfigurationError::RelaxRatioOutOfRange { ratio });
        }
        if !(0..=max_slack).contains(&slack) {
            return Err(ConfigurationError::RelaxSlackOutOfRange {
                slack,
                max: max_slack,
            });
        }
        Ok(Self {
            ratio_of_16s: (ratio * RATIO_RESOLUTION as f64).round() as i32,
            slack,
        })
    }

    pub fn relax(&self, value: i32) -> i32 {
        let relaxed = i64::from(value) * i64::from(self.ratio_of_16s)
            / i64::from(RATIO_RESOLUTION)
            + i64::from(self.slack);
        relaxed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    pub fn is_normal(&self) -> bool {
        *self == Self::normal()
    }

    /// `left` is better than `right` once `right` is relaxed.
    ///
    /// With a relaxation, equal values are better than each other.
    pub fn is_better(&self, left: i32, right: i32) -> bool {
        left < self.relax(right)
    }
}

impl Default for RelaxFunction {
    fn default() -> Self {
        Self::normal()
    }
}

impl Display for RelaxFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "f()={}/{} * v + {}",
            self.ratio_of_16s, RATIO_RESOLUTION, self.slack
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_identity() {
        let normal = RelaxFunction::normal();
        for value in [-1000, -1, 0, 1, 17, 100, 1_000_000] {
            assert_eq!(normal.relax(value), value);
        }
        let same = RelaxFunction::of_increasing_time(1.0, 0).unwrap();
        assert_eq!(same, normal);
        assert!(same.is_normal());
    }

    #[test]
    fn relax_values() {
        assert_eq!(
            RelaxFunction::of_increasing_time(1.0, 0).unwrap().relax(100),
            100
        );
        assert_eq!(
            RelaxFunction::of_increasing_time(1.5, 0).unwrap().relax(50),
            75
        );
        assert_eq!(
            RelaxFunction::of_increasing_time(32.99 / 32.0, 0)
                .unwrap()
                .relax(16),
            16
        );
        assert_eq!(
            RelaxFunction::of_increasing_time(33.01 / 32.0, 0)
                .unwrap()
                .relax(16),
            17
        );
        assert_eq!(
            RelaxFunction::of_increasing_time(2.0, 12).unwrap().relax(10),
            32
        );
    }

    #[test]
    fn out_of_range() {
        assert_eq!(
            RelaxFunction::of_increasing_time(0.99, 0),
            Err(ConfigurationError::RelaxRatioOutOfRange { ratio: 0.99 })
        );
        assert!(RelaxFunction::of_increasing_time(4.01, 0).is_err());
        assert!(RelaxFunction::of_increasing_time(4.0, MAX_TIME_SLACK).is_ok());
        assert_eq!(
            RelaxFunction::of_increasing_time(1.0, MAX_TIME_SLACK + 1),
            Err(ConfigurationError::RelaxSlackOutOfRange {
                slack: MAX_TIME_SLACK + 1,
                max: MAX_TIME_SLACK
            })
        );
        assert!(RelaxFunction::of_increasing_time(1.0, -1).is_err());
        assert!(RelaxFunction::of_cost(1.0, MAX_COST_SLACK).is_ok());
        assert!(RelaxFunction::of_cost(1.0, MAX_COST_SLACK + 1).is_err());
    }

    #[test]
    fn relaxed_better() {
        let relax = RelaxFunction::of_cost(2.0, 0).unwrap();
        assert!(relax.is_better(150, 100));
        assert!(relax.is_better(100, 100));
        assert!(!RelaxFunction::normal().is_better(100, 100));
        assert!(!relax.is_better(200, 100));
        assert!(RelaxFunction::normal().is_better(99, 100));
        assert!(!RelaxFunction::normal().is_better(101, 100));
    }

    #[test]
    fn display() {
        let relax = RelaxFunction::of_increasing_time(1.0, 12).unwrap();
        assert_eq!(relax.to_string(), "f()=16/16 * v + 12");
    }
}
