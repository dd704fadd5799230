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

#![allow(dead_code)]

use launch::config::RequestParams;
use launch::rangeraptor::transit_data::builder::TransitDataBuilder;
use launch::rangeraptor::{ConfigurationError, Path, PositiveDuration, TransitData};
use launch::RequestInput;
use std::str::FromStr;

/// Two lines reaching `E`, where the line `L99` leaves every minute
/// towards `F` :
///  - `L1a` from `A` to `B`, 2 minutes,
///  - `L1b` from `C` to `D`, 4 minutes, in the priority group `l1b_group`.
///
/// With the default costs, journeys on `L1a` cost $1560 and journeys
/// on `L1b` cost $1680.
pub fn two_lines_to_f(l1b_group: usize) -> Result<TransitData, ConfigurationError> {
    TransitDataBuilder::default()
        .route("L1a", &["A", "B"], |r| {
            r.trip(&["00:01", "00:03"]).trip(&["00:03", "00:05"])
        })
        .route("L1b", &["C", "D"], |r| {
            r.priority_group(l1b_group)
                .trip(&["00:02", "00:06"])
                .trip(&["00:04", "00:08"])
        })
        .route("L99", &["E", "F"], |r| r.frequency("00:03", "00:12", 60, &[0, 120]))
        .transfer("B", "E", 1)
        .transfer("D", "E", 1)
        .build()
}

pub fn make_input(datetime: &str, from: &[&str], to: &[&str]) -> RequestInput {
    let fallbacks = |stops: &[&str]| -> Vec<(String, PositiveDuration)> {
        stops
            .iter()
            .map(|stop| (stop.to_string(), PositiveDuration::zero()))
            .collect()
    };
    RequestInput {
        datetime: datetime.parse().unwrap(),
        departures_stop_and_fallback_duration: fallbacks(from),
        arrivals_stop_and_fallback_duration: fallbacks(to),
    }
}

pub fn params_with_window(search_window: &str) -> RequestParams {
    RequestParams {
        search_window: PositiveDuration::from_str(search_window).unwrap(),
        ..RequestParams::default()
    }
}

pub fn display(paths: &[Path], data: &TransitData) -> Vec<String> {
    paths
        .iter()
        .map(|path| path.display(data).to_string())
        .collect()
}
