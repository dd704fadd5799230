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

use crate::transit_data::{TransitMode, NB_OF_TRANSIT_MODES};
use std::convert::TryFrom;

/// Number of cost units in one second of travel.
pub const COST_UNITS_PER_SECOND: i32 = 100;

/// Computes the generalized cost `c1` of a journey, in centi-seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostCalculator {
    board_cost: i32,
    transfer_cost: i32,
    wait_factor: i32,
    transit_factors: [i32; NB_OF_TRANSIT_MODES],
}

/// Cost of `seconds`, capped to `i32::MAX`.
pub fn cost_of_seconds(seconds: u32) -> i32 {
    i32::try_from(seconds)
        .unwrap_or(i32::MAX)
        .saturating_mul(COST_UNITS_PER_SECOND)
}

fn factor(reluctance: f64) -> i32 {
    (reluctance * COST_UNITS_PER_SECOND as f64).round() as i32
}

impl CostCalculator {
    /// `board_cost` and `transfer_cost` are in seconds, reluctances multiply
    /// the seconds spent waiting or riding.
    pub fn new(board_cost: u32, transfer_cost: u32, wait_reluctance: f64) -> Self {
        Self {
            board_cost: cost_of_seconds(board_cost),
            transfer_cost: cost_of_seconds(transfer_cost),
            wait_factor: factor(wait_reluctance),
            transit_factors: [COST_UNITS_PER_SECOND; NB_OF_TRANSIT_MODES],
        }
    }

    pub fn with_transit_reluctance(mut self, mode: TransitMode, reluctance: f64) -> Self {
        self.transit_factors[mode.index()] = factor(reluctance);
        self
    }

    /// Cost of boarding a vehicle after waiting `wait_duration` seconds.
    ///
    /// The first boarding of a journey pays neither the transfer cost
    /// nor the wait : the access is shifted to leave as late as possible.
    pub fn boarding_cost(&self, first_boarding: bool, wait_duration: i32) -> i32 {
        if first_boarding {
            self.board_cost
        } else {
            self.board_cost + self.transfer_cost + self.wait_factor * wait_duration
        }
    }

    pub fn transit_cost(&self, mode: TransitMode, ride_duration: i32) -> i32 {
        self.transit_factors[mode.index()] * ride_duration
    }

    /// Cost of riding one second in a vehicle of `mode`.
    pub fn transit_factor(&self, mode: TransitMode) -> i32 {
        self.transit_factors[mode.index()]
    }
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new(600, 0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_costs() {
        let calculator = CostCalculator::default();
        assert_eq!(calculator.boarding_cost(true, 300), 60_000);
        assert_eq!(calculator.boarding_cost(false, 119), 71_900);
        assert_eq!(calculator.transit_cost(TransitMode::Bus, 120), 12_000);
    }

    #[test]
    fn mode_reluctance() {
        let calculator = CostCalculator::new(0, 60, 0.5).with_transit_reluctance(TransitMode::Rail, 0.8);
        assert_eq!(calculator.transit_cost(TransitMode::Rail, 100), 8_000);
        assert_eq!(calculator.transit_cost(TransitMode::Tram, 100), 10_000);
        assert_eq!(calculator.boarding_cost(false, 10), 6_000 + 500);
    }

    #[test]
    fn huge_board_cost_is_capped() {
        assert_eq!(cost_of_seconds(600), 60_000);
        assert_eq!(cost_of_seconds(u32::MAX), i32::MAX);
        assert_eq!(CostCalculator::new(30_000_000, 0, 1.0).boarding_cost(true, 0), i32::MAX);
    }
}
