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

use super::arrivals::McStopArrival;
use crate::engine::priority_group::{c1_is_better, PriorityGroupPolicy};
use crate::engine::relax::RelaxFunction;
use crate::engine::time_calculator::TimeCalculator;

/// Dominance between two arrivals at the same stop.
///
/// The base criteria are the arrival time, the pareto round and the
/// cost. At stops with egress paths, being on board is an extra
/// criterion : an arrival on board may continue with the egress while
/// an equivalent transfer arrival may not.
pub(crate) struct ArrivalComparator<'a, C> {
    calculator: &'a C,
    relax_c1: RelaxFunction,
    policy: Option<&'a dyn PriorityGroupPolicy>,
}

impl<'a, C: TimeCalculator> ArrivalComparator<'a, C> {
    pub fn new(
        calculator: &'a C,
        relax_c1: RelaxFunction,
        policy: Option<&'a dyn PriorityGroupPolicy>,
    ) -> Self {
        Self {
            calculator,
            relax_c1,
            policy,
        }
    }

    /// Arrivals with the same criteria are never better than each other.
    pub fn base(&self, left: &McStopArrival, right: &McStopArrival) -> bool {
        if same_criteria(left, right) {
            return false;
        }
        self.calculator.is_better(left.time, right.time)
            || left.pareto_round < right.pareto_round
            || c1_is_better(
                self.relax_c1,
                self.policy,
                (left.c1, left.c2),
                (right.c1, right.c2),
            )
    }

    pub fn with_on_board(&self, left: &McStopArrival, right: &McStopArrival) -> bool {
        self.base(left, right) || (left.on_board() && !right.on_board())
    }
}

fn same_criteria(left: &McStopArrival, right: &McStopArrival) -> bool {
    (left.time, left.pareto_round, left.c1, left.c2)
        == (right.time, right.pareto_round, right.c1, right.c2)
}
