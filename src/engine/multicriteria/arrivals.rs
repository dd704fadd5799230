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

use crate::engine::pareto_set::ParetoSet;
use crate::engine::path::ArrivalStep;
use crate::request::AccessEgress;
use crate::time::PositiveDuration;
use crate::transit_data::{Pattern, Stop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum McArrivalKind {
    Access {
        access: AccessEgress,
    },
    Transit {
        pattern: Pattern,
        trip_index: usize,
        board_position: usize,
        alight_position: usize,
        constrained: bool,
    },
    Transfer {
        from: Stop,
        duration: PositiveDuration,
        c1: i32,
    },
}

/// An arrival at a stop with all its criteria, linked to the arrival
/// it was reached from.
#[derive(Debug, Clone, Copy)]
pub(crate) struct McStopArrival {
    pub stop: Stop,
    pub time: i32,
    pub round: usize,
    /// Transfers are one step after the transit arrivals of their round.
    pub pareto_round: usize,
    pub c1: i32,
    pub c2: u32,
    pub kind: McArrivalKind,
    pub previous: Option<usize>,
}

impl McStopArrival {
    pub fn on_board(&self) -> bool {
        matches!(self.kind, McArrivalKind::Transit { .. })
    }

    pub fn transit_pareto_round(round: usize) -> usize {
        2 * round
    }

    pub fn transfer_pareto_round(round: usize) -> usize {
        2 * round + 1
    }
}

/// Every arrival created during a search, and for each stop the pareto
/// set of the ids of the arrivals still competing at this stop.
///
/// Arrivals removed from a pareto set stay in the arena since later
/// arrivals may point to them.
#[derive(Debug, Default)]
pub(crate) struct McArrivals {
    arrivals: Vec<McStopArrival>,
    sets: Vec<ParetoSet<usize>>,
    reached_stops: Vec<usize>,
}

impl McArrivals {
    pub fn reset(&mut self, nb_of_stops: usize) {
        self.arrivals.clear();
        if self.sets.len() != nb_of_stops {
            self.sets = vec![ParetoSet::new(); nb_of_stops];
            self.reached_stops.clear();
            return;
        }
        for stop in self.reached_stops.drain(..) {
            self.sets[stop].clear();
        }
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn get(&self, id: usize) -> &McStopArrival {
        &self.arrivals[id]
    }

    /// Pushes `arrival` in the arena and in the pareto set of its stop.
    ///
    /// A rejected arrival is removed from the arena.
    pub fn add<C>(&mut self, arrival: McStopArrival, comparator: &C) -> Option<usize>
    where
        C: Fn(&McStopArrival, &McStopArrival) -> bool,
    {
        let stop = arrival.stop.idx();
        let id = self.arrivals.len();
        self.arrivals.push(arrival);
        let arrivals = &self.arrivals;
        let by_id = |left: &usize, right: &usize| comparator(&arrivals[*left], &arrivals[*right]);
        let set = &mut self.sets[stop];
        let was_empty = set.is_empty();
        if set.add(id, &by_id) {
            if was_empty {
                self.reached_stops.push(stop);
            }
            Some(id)
        } else {
            self.arrivals.pop();
            None
        }
    }

    /// True while the arrival was not dominated by a later one.
    pub fn is_alive(&self, id: usize) -> bool {
        let stop = self.arrivals[id].stop.idx();
        self.sets[stop].iter().any(|alive| *alive == id)
    }

    #[cfg(test)]
    pub fn nb_of_alive_arrivals(&self, stop: Stop) -> usize {
        self.sets[stop.idx()].len()
    }

    /// The arrivals leading to `id`, in search order.
    pub fn chain(&self, id: usize) -> Vec<ArrivalStep> {
        let mut steps = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let arrival = &self.arrivals[id];
            let step = match arrival.kind {
                McArrivalKind::Access { access } => ArrivalStep::Access { access },
                McArrivalKind::Transit {
                    pattern,
                    trip_index,
                    board_position,
                    alight_position,
                    constrained,
                } => ArrivalStep::Transit {
                    pattern,
                    trip_index,
                    board_position,
                    alight_position,
                    constrained,
                },
                McArrivalKind::Transfer { from, duration, c1 } => ArrivalStep::Transfer {
                    from,
                    to: arrival.stop,
                    duration,
                    c1,
                },
            };
            steps.push(step);
            current = arrival.previous;
        }
        steps.reverse();
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival(stop: usize, time: i32, c1: i32, previous: Option<usize>) -> McStopArrival {
        McStopArrival {
            stop: Stop::new(stop),
            time,
            round: 0,
            pareto_round: 0,
            c1,
            c2: 0,
            kind: McArrivalKind::Access {
                access: AccessEgress::free(Stop::new(stop)),
            },
            previous,
        }
    }

    fn earlier_or_cheaper(left: &McStopArrival, right: &McStopArrival) -> bool {
        left.time < right.time || left.c1 < right.c1
    }

    #[test]
    fn rejected_arrivals_leave_the_arena() {
        let mut arrivals = McArrivals::default();
        arrivals.reset(2);
        assert_eq!(arrivals.add(arrival(0, 100, 10, None), &earlier_or_cheaper), Some(0));
        assert_eq!(arrivals.add(arrival(0, 110, 20, None), &earlier_or_cheaper), None);
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals.add(arrival(0, 110, 5, None), &earlier_or_cheaper), Some(1));
        assert!(arrivals.is_alive(0));
        assert_eq!(arrivals.add(arrival(0, 90, 5, None), &earlier_or_cheaper), Some(2));
        assert!(!arrivals.is_alive(0));
        assert!(!arrivals.is_alive(1));
        assert_eq!(arrivals.nb_of_alive_arrivals(Stop::new(0)), 1);
        // still reachable from later arrivals
        assert_eq!(arrivals.get(1).c1, 5);
    }

    #[test]
    fn reset_clears_reached_stops() {
        let mut arrivals = McArrivals::default();
        arrivals.reset(2);
        arrivals.add(arrival(1, 100, 10, None), &earlier_or_cheaper);
        arrivals.reset(2);
        assert_eq!(arrivals.len(), 0);
        assert_eq!(arrivals.nb_of_alive_arrivals(Stop::new(1)), 0);
    }

    #[test]
    fn chain_follows_previous_arrivals() {
        let mut arrivals = McArrivals::default();
        arrivals.reset(2);
        let first = arrivals.add(arrival(0, 100, 10, None), &earlier_or_cheaper).unwrap();
        let mut transfer = arrival(1, 160, 70, Some(first));
        transfer.kind = McArrivalKind::Transfer {
            from: Stop::new(0),
            duration: PositiveDuration::from_seconds(60),
            c1: 60,
        };
        let second = arrivals.add(transfer, &earlier_or_cheaper).unwrap();
        let chain = arrivals.chain(second);
        assert_eq!(chain.len(), 2);
        assert!(matches!(chain[0], ArrivalStep::Access { .. }));
        assert!(matches!(
            chain[1],
            ArrivalStep::Transfer { from, to, .. } if from == Stop::new(0) && to == Stop::new(1)
        ));
    }
}
