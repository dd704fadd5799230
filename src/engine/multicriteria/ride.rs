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

use crate::engine::pareto_set::ParetoComparator;
use crate::engine::priority_group::{c1_is_better, PriorityGroupPolicy};
use crate::engine::relax::RelaxFunction;
use crate::engine::time_calculator::TimeCalculator;

/// A trip boarded while scanning a pattern, not yet alighted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PatternRide {
    /// Id of the arrival the trip was boarded from.
    pub previous: usize,
    pub board_position: usize,
    pub board_time: i32,
    pub trip_index: usize,
    /// Cost at the boarding, including the boarding cost.
    pub c1: i32,
    /// Cost at the boarding minus the riding cost from the start of the
    /// day, so that rides boarded at different stops compare.
    pub relative_c1: i32,
    pub c2: u32,
    pub constrained: bool,
}

/// Rides on a better trip (earlier forward, later in reverse) or with a
/// lower relative cost are kept.
pub(crate) struct RideComparator<'a, C> {
    calculator: &'a C,
    relax_c1: RelaxFunction,
    policy: Option<&'a dyn PriorityGroupPolicy>,
}

impl<'a, C: TimeCalculator> RideComparator<'a, C> {
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
}

impl<'a, C: TimeCalculator> ParetoComparator<PatternRide> for RideComparator<'a, C> {
    fn left_dominance_exist(&self, left: &PatternRide, right: &PatternRide) -> bool {
        if (left.trip_index, left.relative_c1, left.c2)
            == (right.trip_index, right.relative_c1, right.c2)
        {
            return false;
        }
        self.calculator.trip_rank(left.trip_index) < self.calculator.trip_rank(right.trip_index)
            || c1_is_better(
                self.relax_c1,
                self.policy,
                (left.relative_c1, left.c2),
                (right.relative_c1, right.c2),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pareto_set::ParetoSet;
    use crate::engine::time_calculator::{ForwardCalculator, ReverseCalculator};

    fn ride(trip_index: usize, relative_c1: i32) -> PatternRide {
        PatternRide {
            previous: 0,
            board_position: 0,
            board_time: 0,
            trip_index,
            c1: relative_c1,
            relative_c1,
            c2: 0,
            constrained: false,
        }
    }

    #[test]
    fn earlier_trip_or_lower_cost() {
        let calculator = ForwardCalculator::new(0, 0, None);
        let comparator = RideComparator::new(&calculator, RelaxFunction::normal(), None);
        let mut rides = ParetoSet::new();
        assert!(rides.add(ride(2, 1000), &comparator));
        assert!(rides.add(ride(1, 1200), &comparator));
        assert!(!rides.add(ride(2, 1100), &comparator));
        assert!(rides.add(ride(1, 900), &comparator));
        assert_eq!(rides.len(), 1);
    }

    #[test]
    fn later_trip_is_better_in_reverse() {
        let calculator = ReverseCalculator::new(0, 0, None);
        let comparator = RideComparator::new(&calculator, RelaxFunction::normal(), None);
        assert!(comparator.left_dominance_exist(&ride(2, 1000), &ride(1, 1000)));
        assert!(!comparator.left_dominance_exist(&ride(1, 1000), &ride(2, 1000)));
    }

    #[test]
    fn same_ride_is_rejected_when_relaxed() {
        let calculator = ForwardCalculator::new(0, 0, None);
        let relax = RelaxFunction::of_cost(2.0, 0).unwrap();
        let comparator = RideComparator::new(&calculator, relax, None);
        let mut rides = ParetoSet::new();
        assert!(rides.add(ride(1, 1000), &comparator));
        assert!(rides.add(ride(2, 1000), &comparator));
        assert!(!rides.add(ride(1, 1000), &comparator));
        assert_eq!(rides.len(), 2);
    }
}
