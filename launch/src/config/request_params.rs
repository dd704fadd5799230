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
use std::str::FromStr;
use structopt::StructOpt;

use super::{AlternativeType, SearchDirectionParam};
use rangeraptor::PositiveDuration;

#[derive(Debug, Clone, Serialize, Deserialize, StructOpt)]
#[structopt(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct RequestParams {
    /// maximum number of transfers in a journey
    #[structopt(long, default_value = DEFAULT_MAX_NB_OF_TRANSFERS)]
    #[serde(default = "default_max_nb_of_transfers")]
    pub max_nb_of_transfers: usize,

    /// the search covers departures between the requested datetime
    /// and the requested datetime + search_window
    #[structopt(long, default_value = DEFAULT_SEARCH_WINDOW)]
    #[serde(default = "default_search_window")]
    pub search_window: PositiveDuration,

    /// maximum duration of a journey
    #[structopt(long, default_value = DEFAULT_MAX_JOURNEY_DURATION)]
    #[serde(default = "default_max_journey_duration")]
    pub max_journey_duration: PositiveDuration,

    /// minimum time between the arrival at a stop and the boarding of a vehicle
    #[structopt(long, default_value = DEFAULT_BOARD_SLACK)]
    #[serde(default = "default_board_slack")]
    pub board_slack: PositiveDuration,

    /// minimum time between the alighting from a vehicle and leaving the stop
    #[structopt(long, default_value = DEFAULT_ALIGHT_SLACK)]
    #[serde(default = "default_alight_slack")]
    pub alight_slack: PositiveDuration,

    /// added to the board slack of every boarding but the first one
    #[structopt(long, default_value = DEFAULT_TRANSFER_SLACK)]
    #[serde(default = "default_transfer_slack")]
    pub transfer_slack: PositiveDuration,

    /// cost of a boarding, in seconds
    #[structopt(long, default_value = DEFAULT_BOARD_COST)]
    #[serde(default = "default_board_cost")]
    pub board_cost: u32,

    /// extra cost of a boarding after a transfer, in seconds
    #[structopt(long, default_value = DEFAULT_TRANSFER_COST)]
    #[serde(default = "default_transfer_cost")]
    pub transfer_cost: u32,

    /// cost of one second of waiting before a boarding after a transfer
    #[structopt(long, default_value = DEFAULT_WAIT_RELUCTANCE)]
    #[serde(default = "default_wait_reluctance")]
    pub wait_reluctance: f64,

    /// keep journeys whose cost is at most cost * ratio + slack
    /// of a better journey
    #[structopt(long)]
    #[serde(default)]
    pub relax_c1_ratio: Option<f64>,

    /// in centi-seconds
    #[structopt(long)]
    #[serde(default)]
    pub relax_c1_slack: Option<i32>,

    /// compare journeys using distinct sets of priority groups
    /// only on time and transfers
    #[structopt(long)]
    #[serde(default)]
    pub use_priority_groups: bool,

    /// skip the arrivals that can not reach the destination in time,
    /// using lower bounds computed by a first search
    #[structopt(long)]
    #[serde(default)]
    pub destination_pruning: bool,

    /// run the main and alternative searches in parallel
    #[structopt(long)]
    #[serde(default)]
    pub parallel: bool,

    /// departure : depart after the datetime
    /// arrival : arrive before the datetime
    #[structopt(long, default_value = DEFAULT_SEARCH_DIRECTION)]
    #[serde(default)]
    pub search_direction: SearchDirectionParam,

    /// standard : earliest arrival and fewest transfers
    /// reluctant : multi-criteria with bus_reluctance
    #[structopt(long, default_value = DEFAULT_ALTERNATIVE)]
    #[serde(default)]
    pub alternative: AlternativeType,

    /// cost of one second in a bus, for the reluctant alternative
    #[structopt(long, default_value = DEFAULT_BUS_RELUCTANCE)]
    #[serde(default = "default_bus_reluctance")]
    pub bus_reluctance: f64,
}

pub const DEFAULT_MAX_NB_OF_TRANSFERS: &str = "12";
pub const DEFAULT_SEARCH_WINDOW: &str = "01:00:00";
pub const DEFAULT_MAX_JOURNEY_DURATION: &str = "24:00:00";
pub const DEFAULT_BOARD_SLACK: &str = "00:00:00";
pub const DEFAULT_ALIGHT_SLACK: &str = "00:00:00";
pub const DEFAULT_TRANSFER_SLACK: &str = "00:01:00";
pub const DEFAULT_BOARD_COST: &str = "600";
pub const DEFAULT_TRANSFER_COST: &str = "0";
pub const DEFAULT_WAIT_RELUCTANCE: &str = "1.0";
pub const DEFAULT_SEARCH_DIRECTION: &str = "departure";
pub const DEFAULT_ALTERNATIVE: &str = "standard";
pub const DEFAULT_BUS_RELUCTANCE: &str = "2.0";

pub fn default_max_nb_of_transfers() -> usize {
    usize::from_str(DEFAULT_MAX_NB_OF_TRANSFERS).unwrap()
}

pub fn default_search_window() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_SEARCH_WINDOW).unwrap()
}

pub fn default_max_journey_duration() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_MAX_JOURNEY_DURATION).unwrap()
}

pub fn default_board_slack() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_BOARD_SLACK).unwrap()
}

pub fn default_alight_slack() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_ALIGHT_SLACK).unwrap()
}

pub fn default_transfer_slack() -> PositiveDuration {
    PositiveDuration::from_str(DEFAULT_TRANSFER_SLACK).unwrap()
}

pub fn default_board_cost() -> u32 {
    u32::from_str(DEFAULT_BOARD_COST).unwrap()
}

pub fn default_transfer_cost() -> u32 {
    u32::from_str(DEFAULT_TRANSFER_COST).unwrap()
}

pub fn default_wait_reluctance() -> f64 {
    f64::from_str(DEFAULT_WAIT_RELUCTANCE).unwrap()
}

pub fn default_bus_reluctance() -> f64 {
    f64::from_str(DEFAULT_BUS_RELUCTANCE).unwrap()
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            max_nb_of_transfers: default_max_nb_of_transfers(),
            search_window: default_search_window(),
            max_journey_duration: default_max_journey_duration(),
            board_slack: default_board_slack(),
            alight_slack: default_alight_slack(),
            transfer_slack: default_transfer_slack(),
            board_cost: default_board_cost(),
            transfer_cost: default_transfer_cost(),
            wait_reluctance: default_wait_reluctance(),
            relax_c1_ratio: None,
            relax_c1_slack: None,
            use_priority_groups: false,
            destination_pruning: false,
            parallel: false,
            search_direction: SearchDirectionParam::default(),
            alternative: AlternativeType::default(),
            bus_reluctance: default_bus_reluctance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_defaults_match_serde_defaults() {
        let from_args = RequestParams::from_iter(&["request"]);
        let default = RequestParams::default();
        assert_eq!(from_args.max_nb_of_transfers, default.max_nb_of_transfers);
        assert_eq!(from_args.search_window, default.search_window);
        assert_eq!(from_args.transfer_slack, default.transfer_slack);
        assert_eq!(from_args.board_cost, 600);
        assert_eq!(from_args.search_direction, SearchDirectionParam::Departure);
        assert_eq!(from_args.alternative, AlternativeType::Standard);
        assert!(from_args.relax_c1_ratio.is_none());
    }

    #[test]
    fn command_line_overrides() {
        let params = RequestParams::from_iter(&[
            "request",
            "--search_window",
            "00:05:00",
            "--relax_c1_ratio",
            "2.0",
            "--relax_c1_slack",
            "60000",
            "--search_direction",
            "arrival",
            "--parallel",
        ]);
        assert_eq!(params.search_window, PositiveDuration::from_seconds(300));
        assert_eq!(params.relax_c1_ratio, Some(2.0));
        assert_eq!(params.relax_c1_slack, Some(60000));
        assert_eq!(params.search_direction, SearchDirectionParam::Arrival);
        assert!(params.parallel);
    }
}
