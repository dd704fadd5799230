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
use crate::transit_data::{TransitMode, NB_OF_TRANSIT_MODES};

/// Minimum times, in seconds, needed to board a vehicle, to alight from it
/// and to transfer between two vehicles.
///
/// The transfer slack is added to the board slack of every boarding
/// but the first one of a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlackProvider {
    board_slack: [i32; NB_OF_TRANSIT_MODES],
    alight_slack: [i32; NB_OF_TRANSIT_MODES],
    transfer_slack: i32,
}

impl SlackProvider {
    pub fn new(
        board_slack: PositiveDuration,
        alight_slack: PositiveDuration,
        transfer_slack: PositiveDuration,
    ) -> Self {
        Self {
            board_slack: [board_slack.saturating_seconds(); NB_OF_TRANSIT_MODES],
            alight_slack: [alight_slack.saturating_seconds(); NB_OF_TRANSIT_MODES],
            transfer_slack: transfer_slack.saturating_seconds(),
        }
    }

    pub fn without_slack() -> Self {
        Self::new(
            PositiveDuration::zero(),
            PositiveDuration::zero(),
            PositiveDuration::zero(),
        )
    }

    pub fn with_mode_slack(
        mut self,
        mode: TransitMode,
        board_slack: PositiveDuration,
        alight_slack: PositiveDuration,
    ) -> Self {
        self.board_slack[mode.index()] = board_slack.saturating_seconds();
        self.alight_slack[mode.index()] = alight_slack.saturating_seconds();
        self
    }

    pub fn board_slack(&self, mode: TransitMode) -> i32 {
        self.board_slack[mode.index()]
    }

    pub fn alight_slack(&self, mode: TransitMode) -> i32 {
        self.alight_slack[mode.index()]
    }

    pub fn transfer_slack(&self) -> i32 {
        self.transfer_slack
    }
}

impl Default for SlackProvider {
    fn default() -> Self {
        Self::new(
            PositiveDuration::zero(),
            PositiveDuration::zero(),
            PositiveDuration::from_seconds(60),
        )
    }
}
