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

use super::arrivals::{McArrivalKind, McArrivals, McStopArrival};
use super::comparators::ArrivalComparator;
use super::ride::{PatternRide, RideComparator};
use crate::engine::pareto_set::ParetoSet;
use crate::engine::path::{build_path, sort_paths, Path, PathComparator};
use crate::engine::priority_group::PriorityGroupPolicy;
use crate::engine::relax::RelaxFunction;
use crate::engine::standard::Heuristics;
use crate::engine::time_calculator::TimeCalculator;
use crate::engine::trip_search::constrained_search;
use crate::engine::{IndexSet, SearchContext};
use crate::error::RaptorError;
use crate::transit_data::{Pattern, Stop, TripStop};
use tracing::trace;

/// Criteria of a multi-criteria search besides time and transfers.
#[derive(Clone, Copy)]
pub(crate) struct McCriteria<'a> {
    pub relax_c1: RelaxFunction,
    pub policy: Option<&'a dyn PriorityGroupPolicy>,
    /// Lower bounds to the destination, used to prune arrivals.
    pub heuristics: Option<&'a Heuristics>,
}

#[derive(Debug, Default)]
pub(crate) struct McOutcome {
    pub paths: Vec<Path>,
    pub nb_of_iterations: usize,
    pub nb_of_rounds: usize,
    pub nb_of_arrivals: usize,
}

/// Range-RAPTOR keeping, at every stop, the pareto set of arrivals on
/// time, round and generalized cost.
#[derive(Debug, Default)]
pub(crate) struct McWorker {
    arrivals: McArrivals,
    previous_round: Vec<usize>,
    previous_by_stop: Vec<Vec<usize>>,
    previous_stops: IndexSet,
    patterns: IndexSet,
    transit_arrivals: Vec<usize>,
    transfer_arrivals: Vec<usize>,
    rides: ParetoSet<PatternRide>,
    constrained_rides: Vec<PatternRide>,
}

impl McWorker {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, nb_of_stops: usize, nb_of_patterns: usize) {
        self.arrivals.reset(nb_of_stops);
        for stop in self.previous_stops.indexes() {
            if let Some(arrivals) = self.previous_by_stop.get_mut(*stop) {
                arrivals.clear();
            }
        }
        self.previous_by_stop.resize_with(nb_of_stops, Vec::new);
        self.previous_stops.resize(nb_of_stops);
        self.patterns.resize(nb_of_patterns);
        self.previous_round.clear();
    }

    pub fn route<C: TimeCalculator>(
        &mut self,
        ctx: &SearchContext<C>,
        criteria: McCriteria,
    ) -> Result<McOutcome, RaptorError> {
        let calculator = &ctx.calculator;
        self.reset(ctx.data.nb_of_stops(), ctx.data.nb_of_patterns());

        let path_comparator = PathComparator {
            c1: Some(criteria.relax_c1),
            policy: criteria.policy,
        };
        let mut destination = ParetoSet::new();
        let mut outcome = McOutcome::default();

        for (iteration, minute) in calculator.range_raptor_minutes().enumerate() {
            ctx.check_cancelled(iteration, 0)?;
            outcome.nb_of_iterations += 1;
            self.previous_round.clear();
            for access in ctx.access_paths {
                let arrival = McStopArrival {
                    stop: access.stop,
                    time: calculator.plus_duration(minute, access.duration.saturating_seconds()),
                    round: 0,
                    pareto_round: McStopArrival::transit_pareto_round(0),
                    c1: access.c1,
                    c2: 0,
                    kind: McArrivalKind::Access { access: *access },
                    previous: None,
                };
                if let Some(id) = self.add_arrival(ctx, &criteria, arrival) {
                    self.previous_round.push(id);
                }
            }

            for round in 1..ctx.nb_of_rounds {
                ctx.check_cancelled(iteration, round)?;
                self.group_previous_round();
                if self.previous_stops.is_empty() {
                    break;
                }
                outcome.nb_of_rounds = outcome.nb_of_rounds.max(round);
                self.mark_patterns(ctx);

                self.transit_arrivals.clear();
                for idx in 0..self.patterns.indexes().len() {
                    let pattern = Pattern {
                        idx: self.patterns.indexes()[idx],
                    };
                    self.scan_pattern(
                        ctx,
                        &criteria,
                        round,
                        pattern,
                        &mut destination,
                        &path_comparator,
                    );
                }

                self.transfer_arrivals.clear();
                self.relax_transfers(ctx, &criteria, round);

                self.previous_round.clear();
                self.previous_round.extend_from_slice(&self.transit_arrivals);
                self.previous_round.extend_from_slice(&self.transfer_arrivals);
                trace!(
                    "Iteration {} at {}, round {} : {} transit and {} transfer arrivals",
                    iteration,
                    minute,
                    round,
                    self.transit_arrivals.len(),
                    self.transfer_arrivals.len()
                );
            }
        }

        outcome.nb_of_arrivals = self.arrivals.len();
        let mut paths = destination.into_vec();
        sort_paths(&mut paths);
        outcome.paths = paths;
        Ok(outcome)
    }

    // arrivals of the previous round still in the pareto set of their stop
    fn group_previous_round(&mut self) {
        for stop in self.previous_stops.indexes() {
            self.previous_by_stop[*stop].clear();
        }
        self.previous_stops.clear();
        for id in &self.previous_round {
            if self.arrivals.is_alive(*id) {
                let stop = self.arrivals.get(*id).stop.idx();
                self.previous_stops.insert(stop);
                self.previous_by_stop[stop].push(*id);
            }
        }
    }

    fn mark_patterns<C: TimeCalculator>(&mut self, ctx: &SearchContext<C>) {
        self.patterns.clear();
        for stop_idx in self.previous_stops.indexes() {
            for (pattern, position) in ctx.data.patterns_of_stop(Stop::new(*stop_idx)) {
                if ctx
                    .calculator
                    .board_allowed(ctx.data.pattern(*pattern), *position)
                {
                    self.patterns.insert(pattern.idx);
                }
            }
        }
        self.patterns.sort();
    }

    fn add_arrival<C: TimeCalculator>(
        &mut self,
        ctx: &SearchContext<C>,
        criteria: &McCriteria,
        arrival: McStopArrival,
    ) -> Option<usize> {
        let calculator = &ctx.calculator;
        if calculator.exceeds_time_limit(arrival.time) {
            return None;
        }
        if let Some(heuristics) = criteria.heuristics {
            if !heuristics.is_reachable(arrival.stop) {
                return None;
            }
            let best_arrival =
                calculator.plus_duration(arrival.time, heuristics.best_duration(arrival.stop));
            if calculator.exceeds_time_limit(best_arrival) {
                return None;
            }
            let rides_left = heuristics
                .min_number_of_rides(arrival.stop)
                .unwrap_or(usize::MAX);
            if arrival.round.saturating_add(rides_left) >= ctx.nb_of_rounds {
                return None;
            }
        }
        let comparator = ArrivalComparator::new(calculator, criteria.relax_c1, criteria.policy);
        if ctx.has_egress(arrival.stop) {
            self.arrivals
                .add(arrival, &|left, right| comparator.with_on_board(left, right))
        } else {
            self.arrivals
                .add(arrival, &|left, right| comparator.base(left, right))
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn scan_pattern<C: TimeCalculator>(
        &mut self,
        ctx: &SearchContext<C>,
        criteria: &McCriteria,
        round: usize,
        pattern: Pattern,
        destination: &mut ParetoSet<Path>,
        path_comparator: &PathComparator,
    ) {
        let calculator = &ctx.calculator;
        let pattern_data = ctx.data.pattern(pattern);
        let timetable = pattern_data.timetable();
        if timetable.is_empty() {
            return;
        }
        let mode = pattern_data.mode();
        let board_slack = calculator.board_slack(&ctx.slack, pattern_data);
        let alight_slack = calculator.alight_slack(&ctx.slack, pattern_data);
        let transfer_slack = if round > 1 {
            ctx.slack.transfer_slack()
        } else {
            0
        };
        let ride_comparator = RideComparator::new(calculator, criteria.relax_c1, criteria.policy);

        let mut rides = std::mem::take(&mut self.rides);
        let mut constrained_rides = std::mem::take(&mut self.constrained_rides);
        rides.clear();
        constrained_rides.clear();

        for position in calculator.pattern_stop_iterator(pattern_data.nb_of_positions()) {
            let stop = pattern_data.stop_at(position);

            if calculator.alight_allowed(pattern_data, position) {
                for ride in rides.iter().chain(constrained_rides.iter()) {
                    let trip = timetable.trip(ride.trip_index);
                    let trip_time = calculator.stop_arrival_time(&trip, position);
                    let arrival = McStopArrival {
                        stop,
                        time: calculator.plus_duration(trip_time, alight_slack),
                        round,
                        pareto_round: McStopArrival::transit_pareto_round(round),
                        c1: ride.c1
                            + ctx
                                .cost
                                .transit_cost(mode, calculator.duration(ride.board_time, trip_time)),
                        c2: ride.c2,
                        kind: McArrivalKind::Transit {
                            pattern,
                            trip_index: ride.trip_index,
                            board_position: ride.board_position,
                            alight_position: position,
                            constrained: ride.constrained,
                        },
                        previous: Some(ride.previous),
                    };
                    if let Some(id) = self.add_arrival(ctx, criteria, arrival) {
                        self.transit_arrivals.push(id);
                        if ctx.has_egress(stop) {
                            self.add_destination_paths(ctx, id, destination, path_comparator);
                        }
                    }
                }
            }

            if !self.previous_stops.contains(stop.idx())
                || !calculator.board_allowed(pattern_data, position)
            {
                continue;
            }
            for idx in 0..self.previous_by_stop[stop.idx()].len() {
                let previous_id = self.previous_by_stop[stop.idx()][idx];
                let previous = *self.arrivals.get(previous_id);

                let constrained_event = match previous.kind {
                    McArrivalKind::Transit {
                        pattern: from_pattern,
                        trip_index,
                        alight_position,
                        ..
                    } => {
                        let from_trip = ctx.data.pattern(from_pattern).timetable().trip(trip_index);
                        constrained_search(
                            calculator,
                            ctx.data,
                            pattern,
                            position,
                            &TripStop {
                                pattern: from_pattern,
                                trip: trip_index,
                                position: alight_position,
                            },
                            calculator.stop_arrival_time(&from_trip, alight_position),
                        )
                    }
                    _ => None,
                };
                let event = constrained_event.unwrap_or_else(|| {
                    let earliest_board_time =
                        calculator.plus_duration(previous.time, board_slack + transfer_slack);
                    calculator.trip_search(timetable, position, earliest_board_time, None)
                });
                if !event.is_found() {
                    continue;
                }

                let trip_index = event.trip_index();
                let board_time = event.time();
                let wait = calculator.duration(previous.time, board_time);
                let c1 = previous.c1 + ctx.cost.boarding_cost(previous.round == 0, wait);
                let c2 = match criteria.policy {
                    Some(policy) => policy.merge(
                        previous.c2,
                        policy.group_id(timetable.priority_group(trip_index)),
                    ),
                    None => previous.c2,
                };
                let ride = PatternRide {
                    previous: previous_id,
                    board_position: position,
                    board_time,
                    trip_index,
                    c1,
                    relative_c1: c1
                        - ctx.cost.transit_factor(mode) * calculator.progress(board_time),
                    c2,
                    constrained: event.is_constrained(),
                };
                if ride.constrained {
                    constrained_rides.push(ride);
                } else {
                    rides.add(ride, &ride_comparator);
                }
            }
        }

        self.rides = rides;
        self.constrained_rides = constrained_rides;
    }

    fn relax_transfers<C: TimeCalculator>(
        &mut self,
        ctx: &SearchContext<C>,
        criteria: &McCriteria,
        round: usize,
    ) {
        let calculator = &ctx.calculator;
        for idx in 0..self.transit_arrivals.len() {
            let id = self.transit_arrivals[idx];
            if !self.arrivals.is_alive(id) {
                continue;
            }
            let from = *self.arrivals.get(id);
            for transfer in calculator.get_transfers(ctx.data, from.stop) {
                let arrival = McStopArrival {
                    stop: transfer.stop,
                    time: calculator
                        .plus_duration(from.time, transfer.duration.saturating_seconds()),
                    round,
                    pareto_round: McStopArrival::transfer_pareto_round(round),
                    c1: from.c1 + transfer.c1,
                    c2: from.c2,
                    kind: McArrivalKind::Transfer {
                        from: from.stop,
                        duration: transfer.duration,
                        c1: transfer.c1,
                    },
                    previous: Some(id),
                };
                if let Some(new_id) = self.add_arrival(ctx, criteria, arrival) {
                    self.transfer_arrivals.push(new_id);
                }
            }
        }
    }

    fn add_destination_paths<C: TimeCalculator>(
        &self,
        ctx: &SearchContext<C>,
        id: usize,
        destination: &mut ParetoSet<Path>,
        path_comparator: &PathComparator,
    ) {
        let calculator = &ctx.calculator;
        let arrival = self.arrivals.get(id);
        let chain = self.arrivals.chain(id);
        for egress in ctx.egress_paths(arrival.stop) {
            let arrival_time =
                calculator.plus_duration(arrival.time, egress.duration.saturating_seconds());
            if calculator.exceeds_time_limit(arrival_time) {
                continue;
            }
            if let Some(path) = build_path(
                calculator,
                ctx.data,
                &ctx.slack,
                &ctx.cost,
                &chain,
                *egress,
                arrival.c2,
            ) {
                destination.add(path, path_comparator);
            }
        }
    }
}
