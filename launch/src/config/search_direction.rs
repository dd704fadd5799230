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

use rangeraptor::SearchDirection;
use serde::{Deserialize, Serialize};

/// How the datetime of a request is read.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchDirectionParam {
    /// depart after the datetime
    Departure,
    /// arrive before the datetime
    Arrival,
}

impl Default for SearchDirectionParam {
    fn default() -> Self {
        SearchDirectionParam::Departure
    }
}

impl From<SearchDirectionParam> for SearchDirection {
    fn from(param: SearchDirectionParam) -> Self {
        match param {
            SearchDirectionParam::Departure => SearchDirection::Forward,
            SearchDirectionParam::Arrival => SearchDirection::Reverse,
        }
    }
}

impl std::fmt::Display for SearchDirectionParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchDirectionParam::Departure => write!(f, "departure"),
            SearchDirectionParam::Arrival => write!(f, "arrival"),
        }
    }
}

impl std::str::FromStr for SearchDirectionParam {
    type Err = SearchDirectionConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let direction = match s {
            "departure" => SearchDirectionParam::Departure,
            "arrival" => SearchDirectionParam::Arrival,
            _ => {
                return Err(SearchDirectionConfigError {
                    search_direction_name: s.to_string(),
                })
            }
        };
        Ok(direction)
    }
}

#[derive(Debug)]
pub struct SearchDirectionConfigError {
    search_direction_name: String,
}

impl std::error::Error for SearchDirectionConfigError {}

impl std::fmt::Display for SearchDirectionConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bad search direction : `{}`, expected `departure` or `arrival`",
            self.search_direction_name
        )
    }
}
