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

use crate::time::PositiveDuration;
use std::fmt;

/// A request that can not be run as is.
///
/// Returned when building a request or a relax function, and when a
/// request is checked against the transit data it will run on.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    RelaxRatioOutOfRange { ratio: f64 },
    RelaxSlackOutOfRange { slack: i32, max: i32 },
    MissingEarliestDepartureTime,
    MissingLatestArrivalTime,
    NoAccessPaths,
    NoEgressPaths,
    StopOutOfRange { stop: usize, nb_of_stops: usize },
    InvalidPriorityGroup { group: usize, max: usize },
    InvalidTransitData(String),
    DurationOutOfRange {
        what: &'static str,
        duration: PositiveDuration,
    },
    TimeLimitOutOfRange,
}

impl std::error::Error for ConfigurationError {}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigurationError::RelaxRatioOutOfRange { ratio } => write!(
                f,
                "The relax ratio {} is not in the range [1.0, 4.0].",
                ratio
            ),
            ConfigurationError::RelaxSlackOutOfRange { slack, max } => write!(
                f,
                "The relax slack {} is not in the range [0, {}].",
                slack, max
            ),
            ConfigurationError::MissingEarliestDepartureTime => write!(
                f,
                "A search in forward direction needs an earliest departure time."
            ),
            ConfigurationError::MissingLatestArrivalTime => write!(
                f,
                "A search in reverse direction needs a latest arrival time."
            ),
            ConfigurationError::NoAccessPaths => {
                write!(f, "At least one access path is needed.")
            }
            ConfigurationError::NoEgressPaths => {
                write!(f, "At least one egress path is needed.")
            }
            ConfigurationError::StopOutOfRange { stop, nb_of_stops } => write!(
                f,
                "The stop {} is out of the stop universe of size {}.",
                stop, nb_of_stops
            ),
            ConfigurationError::InvalidPriorityGroup { group, max } => write!(
                f,
                "The priority group {} is not supported, the maximum is {}.",
                group, max
            ),
            ConfigurationError::InvalidTransitData(msg) => {
                write!(f, "Invalid transit data : {}", msg)
            }
            ConfigurationError::DurationOutOfRange { what, duration } => write!(
                f,
                "The {} {} is longer than {} seconds.",
                what,
                duration,
                i32::MAX
            ),
            ConfigurationError::TimeLimitOutOfRange => write!(
                f,
                "The time limit of the search is out of the range of a time."
            ),
        }
    }
}

/// Failure of a search.
///
/// Finding no path is not an error : the router returns an empty result.
#[derive(Debug, Clone, PartialEq)]
pub enum RaptorError {
    Configuration(ConfigurationError),
    Timeout { iteration: usize, round: usize },
    WorkerFailed(String),
}

impl std::error::Error for RaptorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RaptorError::Configuration(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for RaptorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RaptorError::Configuration(err) => write!(f, "Bad configuration. {}", err),
            RaptorError::Timeout { iteration, round } => write!(
                f,
                "The search was cancelled at iteration {} in round {}.",
                iteration, round
            ),
            RaptorError::WorkerFailed(msg) => write!(f, "A search worker failed : {}", msg),
        }
    }
}

impl From<ConfigurationError> for RaptorError {
    fn from(err: ConfigurationError) -> Self {
        RaptorError::Configuration(err)
    }
}
