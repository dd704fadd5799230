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

use super::arrival_arena::{StdArrivalKind, StdStopArrival, StopArrivalArena};
use crate::engine::pareto_set::ParetoSet;
use crate::engine::path::{build_path, sort_paths, ArrivalStep, Path, PathComparator};
use crate::engine::time_calculator::TimeCalculator;
use crate::engine::trip_search::constrained_search;
use crate::engine::{IndexSet, SearchContext};
use crate::error::RaptorError;
use crate::transit_data::{Pattern, Stop, TripStop};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StdMode {
    /// Real trips, paths are built at the destination.
    Regular,
    /// Heuristic trips and no slack : only the best durations are computed.
    Heuristic,
}

#[derive(Debug, Default)]
pub(crate) struct StdOutcome {
    pub paths: Vec<Path>,
    pub nb_of_iterations: usize,
    pub nb_of_rounds: usize,
}

#[derive(Debug, Clone, Copy)]
struct Boarding {
    trip_index: usize,
    board_position: usize,
    board_stop: Stop,
    constrained: bool,
    // start time of the heuristic trip
    origin: i32,
}

/// Range-RAPTOR keeping one best arrival per (round, stop).
///
/// The arena is kept between the iterations of a search, so that the
/// arrivals found when leaving later bound the ones found when leaving
/// earlier. It is reset between searches.
#[derive(Debug, Default)]
pub(crate) struct StdWorker {
    arena: StopArrivalArena,
    touched: IndexSet,
    touched_previous: IndexSet,
    transit_touched: IndexSet,
    patterns: IndexSet,
}

impl StdWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn arena(&self) -> &StopArrivalArena {
        &self.arena
    }

    pub fn route<C: TimeCalculator>(
        &mut self,
        ctx: &SearchContext<C>,
        mode: StdMode,
    ) -> Result<StdOutcome, RaptorError> {
        let calculator = &ctx.calculator;
        let nb_of_stops = ctx.data.nb_of_stops();
        self.arena.reset(ctx.nb_of_rounds, nb_of_stops);
        self.touched.resize(nb_of_stops);
        self.touched_previous.resize(nb_of_stops);
        self.transit_touched.resize(nb_of_stops);
        self.patterns.resize(ctx.data.nb_of_patterns());

        let mut destination = ParetoSet::new();
        let mut outcome = StdOutcome::default();

        for (iteration, minute) in calculator.range_raptor_minutes().enumerate() {
            ctx.check_cancelled(iteration, 0)?;
            outcome.nb_of_iterations += 1;
            self.touched.clear();
            for access in ctx.access_paths {
                let time = calculator.plus_duration(minute, access.duration.saturating_seconds());
                if calculator.exceeds_time_limit(time) {
                    continue;
                }
                let arrival = StdStopArrival {
                    time,
                    kind: StdArrivalKind::Access { access: *access },
                };
                if self.accept_best(ctx, 0, access.stop, arrival) {
                    self.touched.insert(access.stop.idx());
                }
            }
            std::mem::swap(&mut self.touched, &mut self.touched_previous);

            for round in 1..ctx.nb_of_rounds {
                ctx.check_cancelled(iteration, round)?;
                if self.touched_previous.is_empty() {
                    break;
                }
                outcome.nb_of_rounds = outcome.nb_of_rounds.max(round);
                self.touched.clear();
                self.transit_touched.clear();
                self.mark_patterns(ctx);
                for idx in 0..self.patterns.indexes().len() {
                    let pattern = Pattern {
                        idx: self.patterns.indexes()[idx],
                    };
                    self.scan_pattern(ctx, round, pattern, mode, &mut destination);
                }
                self.relax_transfers(ctx, round);
                trace!(
                    "Iteration {} at {}, round {} : {} stops reached",
                    iteration,
                    minute,
                    round,
                    self.touched.indexes().len()
                );
                std::mem::swap(&mut self.touched, &mut self.touched_previous);
            }
            self.touched_previous.clear();
        }

        let mut paths = destination.into_vec();
        sort_paths(&mut paths);
        outcome.paths = paths;
        Ok(outcome)
    }

    fn mark_patterns<C: TimeCalculator>(&mut self, ctx: &SearchContext<C>) {
        self.patterns.clear();
        for stop_idx in self.touched_previous.indexes() {
            for (pattern, position) in ctx.data.patterns_of_stop(Stop::new(*stop_idx)) {
                let pattern_data = ctx.data.pattern(*pattern);
                if ctx.calculator.board_allowed(pattern_data, *position) {
                    self.patterns.insert(pattern.idx);
                }
            }
        }
        self.patterns.sort();
    }

    fn scan_pattern<C: TimeCalculator>(
        &mut self,
        ctx: &SearchContext<C>,
        round: usize,
        pattern: Pattern,
        mode: StdMode,
        destination: &mut ParetoSet<Path>,
    ) {
        let calculator = &ctx.calculator;
        let pattern_data = ctx.data.pattern(pattern);
        let timetable = pattern_data.timetable();
        if timetable.is_empty() {
            return;
        }
        let heuristic_trip = timetable.heuristic_trip();
        let board_slack = calculator.board_slack(&ctx.slack, pattern_data);
        let alight_slack = calculator.alight_slack(&ctx.slack, pattern_data);
        // the first boarding of a journey follows an access
        let transfer_slack = if round > 1 {
            ctx.slack.transfer_slack()
        } else {
            0
        };

        let mut on_board: Option<Boarding> = None;
        for position in calculator.pattern_stop_iterator(pattern_data.nb_of_positions()) {
            let stop = pattern_data.stop_at(position);

            if let Some(boarding) = on_board {
                if calculator.alight_allowed(pattern_data, position) {
                    let (trip_time, kind) = match mode {
                        StdMode::Regular => (
                            calculator
                                .stop_arrival_time(&timetable.trip(boarding.trip_index), position),
                            StdArrivalKind::Transit {
                                pattern,
                                trip_index: boarding.trip_index,
                                board_stop: boarding.board_stop,
                                board_position: boarding.board_position,
                                alight_position: position,
                                constrained: boarding.constrained,
                            },
                        ),
                        StdMode::Heuristic => (
                            boarding.origin + calculator.stop_arrival_time(heuristic_trip, position),
                            StdArrivalKind::Heuristic,
                        ),
                    };
                    let arrival = StdStopArrival {
                        time: calculator.plus_duration(trip_time, alight_slack),
                        kind,
                    };
                    self.accept_transit(ctx, round, stop, arrival, mode, destination);
                }
            }

            if !self.touched_previous.contains(stop.idx())
                || !calculator.board_allowed(pattern_data, position)
            {
                continue;
            }
            let previous = match self.arena.best(round - 1, stop) {
                Some(previous) => *previous,
                None => continue,
            };

            match mode {
                StdMode::Regular => {
                    let constrained_event = match previous.kind {
                        StdArrivalKind::Transit {
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
                        calculator.trip_search(
                            timetable,
                            position,
                            earliest_board_time,
                            on_board.map(|boarding| boarding.trip_index),
                        )
                    });
                    if !event.is_found() {
                        continue;
                    }
                    let improves = on_board.map_or(true, |boarding| {
                        calculator.trip_rank(event.trip_index())
                            < calculator.trip_rank(boarding.trip_index)
                            || (event.is_constrained() && event.trip_index() == boarding.trip_index)
                    });
                    if improves {
                        on_board = Some(Boarding {
                            trip_index: event.trip_index(),
                            board_position: position,
                            board_stop: stop,
                            constrained: event.is_constrained(),
                            origin: 0,
                        });
                    }
                }
                StdMode::Heuristic => {
                    let origin = previous.time - calculator.stop_departure_time(heuristic_trip, position);
                    let improves = on_board
                        .map_or(true, |boarding| calculator.is_better(origin, boarding.origin));
                    if improves {
                        on_board = Some(Boarding {
                            trip_index: 0,
                            board_position: position,
                            board_stop: stop,
                            constrained: false,
                            origin,
                        });
                    }
                }
            }
        }
    }

    fn accept_best<C: TimeCalculator>(
        &mut self,
        ctx: &SearchContext<C>,
        round: usize,
        stop: Stop,
        arrival: StdStopArrival,
    ) -> bool {
        let calculator = &ctx.calculator;
        let is_better = |left: i32, right: i32| calculator.is_better(left, right);
        if let Some(best) = self.arena.best_time_up_to(round, stop, is_better) {
            if !calculator.is_better(arrival.time, best) {
                return false;
            }
        }
        self.arena.set_best(round, stop, arrival);
        self.arena
            .update_overall_best(round, stop, arrival.time, is_better);
        true
    }

    fn accept_transit<C: TimeCalculator>(
        &mut self,
        ctx: &SearchContext<C>,
        round: usize,
        stop: Stop,
        arrival: StdStopArrival,
        mode: StdMode,
        destination: &mut ParetoSet<Path>,
    ) {
        let calculator = &ctx.calculator;
        if calculator.exceeds_time_limit(arrival.time) {
            return;
        }
        let is_better = |left: i32, right: i32| calculator.is_better(left, right);
        if let Some(best) = self.arena.transit_time_up_to(round, stop, is_better) {
            if !calculator.is_better(arrival.time, best) {
                return;
            }
        }
        self.arena.set_transit(round, stop, arrival);
        self.transit_touched.insert(stop.idx());
        if self.accept_best(ctx, round, stop, arrival) {
            self.touched.insert(stop.idx());
        }
        if mode == StdMode::Regular && ctx.has_egress(stop) {
            self.add_destination_paths(ctx, round, stop, arrival.time, destination);
        }
    }

    fn relax_transfers<C: TimeCalculator>(&mut self, ctx: &SearchContext<C>, round: usize) {
        let calculator = &ctx.calculator;
        for idx in 0..self.transit_touched.indexes().len() {
            let from = Stop::new(self.transit_touched.indexes()[idx]);
            let transit = match self.arena.transit(round, from) {
                Some(transit) => *transit,
                None => continue,
            };
            for transfer in calculator.get_transfers(ctx.data, from) {
                let time = calculator.plus_duration(
                    transit.time,
                    transfer.duration.saturating_seconds(),
                );
                if calculator.exceeds_time_limit(time) {
                    continue;
                }
                let arrival = StdStopArrival {
                    time,
                    kind: StdArrivalKind::Transfer {
                        from,
                        duration: transfer.duration,
                        c1: transfer.c1,
                    },
                };
                if self.accept_best(ctx, round, transfer.stop, arrival) {
                    self.touched.insert(transfer.stop.idx());
                }
            }
        }
    }

    fn add_destination_paths<C: TimeCalculator>(
        &self,
        ctx: &SearchContext<C>,
        round: usize,
        stop: Stop,
        time: i32,
        destination: &mut ParetoSet<Path>,
    ) {
        let calculator = &ctx.calculator;
        let chain = match self.chain(round, stop) {
            Some(chain) => chain,
            None => return,
        };
        let comparator = PathComparator {
            c1: None,
            policy: None,
        };
        for egress in ctx.egress_paths(stop) {
            let arrival_time =
                calculator.plus_duration(time, egress.duration.saturating_seconds());
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
                0,
            ) {
                destination.add(path, &comparator);
            }
        }
    }

    /// The arrivals leading to the transit arrival at (`round`, `stop`),
    /// in search order.
    fn chain(&self, round: usize, stop: Stop) -> Option<Vec<ArrivalStep>> {
        let mut steps = Vec::new();
        let mut round = round;
        let mut stop = stop;
        let mut current = *self.arena.transit(round, stop)?;
        loop {
            match current.kind {
                StdArrivalKind::Access { access } => {
                    steps.push(ArrivalStep::Access { access });
                    break;
                }
                StdArrivalKind::Transit {
                    pattern,
                    trip_index,
                    board_stop,
                    board_position,
                    alight_position,
                    constrained,
                } => {
                    steps.push(ArrivalStep::Transit {
                        pattern,
                        trip_index,
                        board_position,
                        alight_position,
                        constrained,
                    });
                    debug_assert!(round > 0);
                    round -= 1;
                    stop = board_stop;
                    current = *self.arena.best(round, stop)?;
                }
                StdArrivalKind::Transfer { from, duration, c1 } => {
                    steps.push(ArrivalStep::Transfer {
                        from,
                        to: stop,
                        duration,
                        c1,
                    });
                    stop = from;
                    current = *self.arena.transit(round, stop)?;
                }
                StdArrivalKind::Heuristic => return None,
            }
        }
        steps.reverse();
        Some(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cancel::CancellationToken;
    use crate::engine::cost::CostCalculator;
    use crate::engine::path::PathLeg;
    use crate::engine::slack::SlackProvider;
    use crate::engine::time_calculator::{ForwardCalculator, ReverseCalculator};
    use crate::request::AccessEgress;
    use crate::time::SecondsSinceDayStart;
    use crate::transit_data::builder::TransitDataBuilder;
    use crate::transit_data::TransitData;

    fn data() -> TransitData {
        TransitDataBuilder::new()
            .route("L1", &["A", "B", "C"], |route| {
                route
                    .trip(&["10:00", "10:10", "10:20"])
                    .trip(&["10:30", "10:40", "10:50"])
            })
            .route("L2", &["D", "E"], |route| {
                route.trip(&["10:25", "10:35"]).trip(&["11:00", "11:10"])
            })
            .transfer("C", "D", 120)
            .build()
            .unwrap()
    }

    fn hms(h: i32, m: i32) -> SecondsSinceDayStart {
        SecondsSinceDayStart::from_hms(h, m, 0)
    }

    fn run<C: TimeCalculator>(
        data: &TransitData,
        calculator: C,
        access: &[AccessEgress],
        egress: &[AccessEgress],
        nb_of_rounds: usize,
    ) -> StdOutcome {
        let cancellation = CancellationToken::new();
        let ctx = SearchContext::new(
            calculator,
            data,
            access,
            egress,
            SlackProvider::default(),
            CostCalculator::default(),
            nb_of_rounds,
            &cancellation,
        );
        StdWorker::new().route(&ctx, StdMode::Regular).unwrap()
    }

    #[test]
    fn one_iteration_with_a_transfer() {
        let data = data();
        let stop = |name: &str| data.stop_by_name(name).unwrap();
        let calculator = ForwardCalculator::new(hms(10, 0).seconds(), 0, None);
        let outcome = run(
            &data,
            calculator,
            &[AccessEgress::free(stop("A"))],
            &[AccessEgress::free(stop("E"))],
            4,
        );

        assert_eq!(outcome.nb_of_iterations, 1);
        assert_eq!(outcome.paths.len(), 1);
        let path = &outcome.paths[0];
        assert_eq!(path.departure_time, hms(10, 0));
        assert_eq!(path.arrival_time, hms(10, 35));
        assert_eq!(path.number_of_transfers, 1);
        assert_eq!(path.legs.len(), 5);
        assert!(matches!(
            path.legs[2],
            PathLeg::Transfer { from, to, .. } if from == stop("C") && to == stop("D")
        ));
    }

    #[test]
    fn range_raptor_keeps_later_departures() {
        let data = data();
        let stop = |name: &str| data.stop_by_name(name).unwrap();
        let calculator = ForwardCalculator::new(hms(10, 0).seconds(), 3600, None);
        let outcome = run(
            &data,
            calculator,
            &[AccessEgress::free(stop("A"))],
            &[AccessEgress::free(stop("E"))],
            4,
        );

        assert_eq!(outcome.nb_of_iterations, 60);
        let times: Vec<_> = outcome
            .paths
            .iter()
            .map(|path| (path.departure_time, path.arrival_time))
            .collect();
        assert_eq!(
            times,
            vec![(hms(10, 0), hms(10, 35)), (hms(10, 30), hms(11, 10))]
        );
    }

    #[test]
    fn number_of_rounds_limits_transfers() {
        let data = data();
        let stop = |name: &str| data.stop_by_name(name).unwrap();
        let calculator = ForwardCalculator::new(hms(10, 0).seconds(), 0, None);
        // access and a single ride
        let outcome = run(
            &data,
            calculator,
            &[AccessEgress::free(stop("A"))],
            &[AccessEgress::free(stop("E"))],
            2,
        );
        assert!(outcome.paths.is_empty());
    }

    #[test]
    fn reverse_search_finds_the_latest_departure() {
        let data = data();
        let stop = |name: &str| data.stop_by_name(name).unwrap();
        let calculator = ReverseCalculator::new(hms(11, 10).seconds(), 0, None);
        // in a reverse search the egress paths are the starting points
        let outcome = run(
            &data,
            calculator,
            &[AccessEgress::free(stop("E"))],
            &[AccessEgress::free(stop("A"))],
            4,
        );

        assert_eq!(outcome.paths.len(), 1);
        let path = &outcome.paths[0];
        assert_eq!(path.departure_time, hms(10, 30));
        assert_eq!(path.arrival_time, hms(11, 10));
        assert_eq!(path.number_of_transfers, 1);
        assert!(matches!(path.legs[0], PathLeg::Access { stop: access, .. } if access == stop("A")));
    }

    #[test]
    fn cancelled_search_times_out() {
        let data = data();
        let stop = |name: &str| data.stop_by_name(name).unwrap();
        let cancellation = CancellationToken::new();
        cancellation.cancel();
        let access = [AccessEgress::free(stop("A"))];
        let ctx = SearchContext::new(
            ForwardCalculator::new(hms(10, 0).seconds(), 0, None),
            &data,
            &access,
            &[AccessEgress::free(stop("E"))],
            SlackProvider::default(),
            CostCalculator::default(),
            4,
            &cancellation,
        );
        let result = StdWorker::new().route(&ctx, StdMode::Regular);
        assert!(matches!(
            result,
            Err(RaptorError::Timeout {
                iteration: 0,
                round: 0
            })
        ));
    }
}
