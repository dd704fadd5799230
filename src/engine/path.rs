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

use crate::engine::cost::{CostCalculator, COST_UNITS_PER_SECOND};
use crate::engine::pareto_set::ParetoComparator;
use crate::engine::priority_group::{c1_is_better, PriorityGroupPolicy};
use crate::engine::relax::RelaxFunction;
use crate::engine::slack::SlackProvider;
use crate::engine::time_calculator::TimeCalculator;
use crate::request::AccessEgress;
use crate::time::{PositiveDuration, SecondsSinceDayStart};
use crate::transit_data::{Pattern, Stop, TransitData, TripTimes};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSource {
    Main,
    Alternative,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathLeg {
    Access {
        stop: Stop,
        departure_time: SecondsSinceDayStart,
        arrival_time: SecondsSinceDayStart,
        c1: i32,
    },
    Transit {
        pattern: Pattern,
        trip_index: usize,
        board_position: usize,
        alight_position: usize,
        board_stop: Stop,
        alight_stop: Stop,
        board_time: SecondsSinceDayStart,
        alight_time: SecondsSinceDayStart,
        constrained: bool,
    },
    Transfer {
        from: Stop,
        to: Stop,
        departure_time: SecondsSinceDayStart,
        arrival_time: SecondsSinceDayStart,
        c1: i32,
    },
    Egress {
        stop: Stop,
        departure_time: SecondsSinceDayStart,
        arrival_time: SecondsSinceDayStart,
        c1: i32,
    },
}

/// A journey from the origin to the destination, in real time order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub legs: Vec<PathLeg>,
    pub departure_time: SecondsSinceDayStart,
    pub arrival_time: SecondsSinceDayStart,
    pub number_of_transfers: usize,
    pub c1: i32,
    pub c2: u32,
    pub source: PathSource,
}

/// One arrival of the chain leading to a path, in the order and
/// in the time frame of the search.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ArrivalStep {
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
        to: Stop,
        duration: PositiveDuration,
        c1: i32,
    },
}

// a leg in real time order, before times are computed
enum RealLeg {
    Transit {
        pattern: Pattern,
        trip_index: usize,
        board_position: usize,
        alight_position: usize,
        constrained: bool,
    },
    Transfer {
        from: Stop,
        to: Stop,
        duration: i32,
        c1: i32,
    },
}

/// Turns a chain of arrivals into a `Path`.
///
/// Times are recomputed in real time order : the access leaves as late as
/// possible, the egress arrives as early as possible. The cost is
/// recomputed with the same rules whatever the direction of the search,
/// so that paths of forward and reverse searches are comparable.
pub(crate) fn build_path<C: TimeCalculator>(
    calculator: &C,
    data: &TransitData,
    slack: &SlackProvider,
    cost: &CostCalculator,
    chain: &[ArrivalStep],
    last_edge: AccessEgress,
    c2: u32,
) -> Option<Path> {
    let first_edge = match chain.first() {
        Some(ArrivalStep::Access { access }) => *access,
        _ => return None,
    };
    let (access, egress) = calculator.real_time_ends(first_edge, last_edge);

    let mut real_legs: Vec<RealLeg> = chain
        .iter()
        .filter_map(|step| match *step {
            ArrivalStep::Access { .. } => None,
            ArrivalStep::Transit {
                pattern,
                trip_index,
                board_position,
                alight_position,
                constrained,
            } => {
                let (board_position, alight_position) =
                    calculator.real_time_ends(board_position, alight_position);
                Some(RealLeg::Transit {
                    pattern,
                    trip_index,
                    board_position,
                    alight_position,
                    constrained,
                })
            }
            ArrivalStep::Transfer {
                from,
                to,
                duration,
                c1,
            } => {
                let (from, to) = calculator.real_time_ends(from, to);
                Some(RealLeg::Transfer {
                    from,
                    to,
                    duration: duration.saturating_seconds(),
                    c1,
                })
            }
        })
        .collect();
    calculator.to_real_time_order(&mut real_legs);

    let first_board = real_legs.iter().find_map(|leg| match leg {
        RealLeg::Transit {
            pattern,
            trip_index,
            board_position,
            ..
        } => {
            let pattern_data = data.pattern(*pattern);
            let trip = pattern_data.timetable().trip(*trip_index);
            Some(trip.departure(*board_position) - slack.board_slack(pattern_data.mode()))
        }
        RealLeg::Transfer { .. } => None,
    })?;

    let access_duration = access.duration.saturating_seconds();
    let departure_time = first_board.saturating_sub(access_duration);
    let mut legs = Vec::with_capacity(real_legs.len() + 2);
    legs.push(PathLeg::Access {
        stop: access.stop,
        departure_time: SecondsSinceDayStart::from_seconds(departure_time),
        arrival_time: SecondsSinceDayStart::from_seconds(first_board),
        c1: access.c1,
    });

    let mut c1 = access.c1;
    let mut nb_of_transits = 0;
    let mut current_time = first_board;
    for leg in real_legs {
        match leg {
            RealLeg::Transit {
                pattern,
                trip_index,
                board_position,
                alight_position,
                constrained,
            } => {
                let pattern_data = data.pattern(pattern);
                let trip = pattern_data.timetable().trip(trip_index);
                let board_time = trip.departure(board_position);
                let alight_time = trip.arrival(alight_position);
                let wait = (board_time - current_time).max(0);
                c1 += cost.boarding_cost(nb_of_transits == 0, wait);
                c1 += cost.transit_cost(pattern_data.mode(), alight_time - board_time);
                nb_of_transits += 1;
                current_time = alight_time + slack.alight_slack(pattern_data.mode());
                legs.push(PathLeg::Transit {
                    pattern,
                    trip_index,
                    board_position,
                    alight_position,
                    board_stop: pattern_data.stop_at(board_position),
                    alight_stop: pattern_data.stop_at(alight_position),
                    board_time: SecondsSinceDayStart::from_seconds(board_time),
                    alight_time: SecondsSinceDayStart::from_seconds(alight_time),
                    constrained,
                });
            }
            RealLeg::Transfer {
                from,
                to,
                duration,
                c1: transfer_c1,
            } => {
                c1 += transfer_c1;
                legs.push(PathLeg::Transfer {
                    from,
                    to,
                    departure_time: SecondsSinceDayStart::from_seconds(current_time),
                    arrival_time: SecondsSinceDayStart::from_seconds(
                        current_time.saturating_add(duration),
                    ),
                    c1: transfer_c1,
                });
                current_time = current_time.saturating_add(duration);
            }
        }
    }

    let arrival_time = current_time.saturating_add(egress.duration.saturating_seconds());
    c1 += egress.c1;
    legs.push(PathLeg::Egress {
        stop: egress.stop,
        departure_time: SecondsSinceDayStart::from_seconds(current_time),
        arrival_time: SecondsSinceDayStart::from_seconds(arrival_time),
        c1: egress.c1,
    });

    Some(Path {
        legs,
        departure_time: SecondsSinceDayStart::from_seconds(departure_time),
        arrival_time: SecondsSinceDayStart::from_seconds(arrival_time),
        number_of_transfers: nb_of_transits - 1,
        c1,
        c2,
        source: PathSource::Main,
    })
}

impl Path {
    pub fn duration(&self) -> PositiveDuration {
        let seconds = self.arrival_time.seconds() - self.departure_time.seconds();
        PositiveDuration::from_seconds(seconds.max(0) as u32)
    }

    pub fn transit_legs(&self) -> impl Iterator<Item = &PathLeg> {
        self.legs
            .iter()
            .filter(|leg| matches!(leg, PathLeg::Transit { .. }))
    }

    pub fn display<'a>(&'a self, data: &'a TransitData) -> PathDisplay<'a> {
        PathDisplay { path: self, data }
    }
}

/// Orders paths by departure time, arrival time, number of transfers and cost.
pub fn sort_paths(paths: &mut [Path]) {
    paths.sort_by_key(|path| {
        (
            path.departure_time,
            path.arrival_time,
            path.number_of_transfers,
            path.c1,
        )
    });
}

/// Dominance between paths at the destination : later departure, earlier
/// arrival, fewer transfers and, when `c1` is set, lower cost.
///
/// With a priority group policy, the cost is only relaxed when the
/// priority code of the left path dominates the right one.
#[derive(Clone, Copy)]
pub(crate) struct PathComparator<'a> {
    pub c1: Option<RelaxFunction>,
    pub policy: Option<&'a dyn PriorityGroupPolicy>,
}

impl<'a> ParetoComparator<Path> for PathComparator<'a> {
    fn left_dominance_exist(&self, left: &Path, right: &Path) -> bool {
        if criteria(left) == criteria(right) {
            return false;
        }
        if left.departure_time > right.departure_time
            || left.arrival_time < right.arrival_time
            || left.number_of_transfers < right.number_of_transfers
        {
            return true;
        }
        match self.c1 {
            Some(relax_c1) => {
                c1_is_better(relax_c1, self.policy, (left.c1, left.c2), (right.c1, right.c2))
            }
            None => false,
        }
    }
}

fn criteria(path: &Path) -> (SecondsSinceDayStart, SecondsSinceDayStart, usize, i32, u32) {
    (
        path.departure_time,
        path.arrival_time,
        path.number_of_transfers,
        path.c1,
        path.c2,
    )
}

pub(crate) fn format_time(time: SecondsSinceDayStart) -> String {
    let seconds = time.seconds();
    if seconds % 60 == 0 {
        let sign = if seconds < 0 { "-" } else { "" };
        let minutes = seconds.abs() / 60;
        format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
    } else {
        time.to_string()
    }
}

pub(crate) fn format_duration(seconds: i32) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }
    let (hours, minutes, secs) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
    let mut result = String::new();
    if hours != 0 {
        result.push_str(&format!("{}h", hours));
    }
    if minutes != 0 {
        result.push_str(&format!("{}m", minutes));
    }
    if secs != 0 {
        result.push_str(&format!("{}s", secs));
    }
    result
}

fn format_cost(c1: i32) -> String {
    let units = c1 / COST_UNITS_PER_SECOND;
    let cents = (c1 % COST_UNITS_PER_SECOND).abs();
    if cents == 0 {
        format!("${}", units)
    } else {
        format!("${}.{:02}", units, cents)
    }
}

fn write_walk(
    f: &mut Formatter<'_>,
    departure: SecondsSinceDayStart,
    arrival: SecondsSinceDayStart,
) -> std::fmt::Result {
    write!(
        f,
        "Walk {}",
        format_duration(arrival.seconds() - departure.seconds())
    )
}

pub struct PathDisplay<'a> {
    path: &'a Path,
    data: &'a TransitData,
}

impl<'a> Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data = self.data;
        for leg in &self.path.legs {
            match leg {
                PathLeg::Access {
                    stop,
                    departure_time,
                    arrival_time,
                    ..
                } => {
                    if departure_time != arrival_time {
                        write_walk(f, *departure_time, *arrival_time)?;
                        write!(f, " ~ ")?;
                    }
                    write!(f, "{}", data.stop_name(*stop))?;
                }
                PathLeg::Transit {
                    pattern,
                    alight_stop,
                    board_time,
                    alight_time,
                    ..
                } => {
                    write!(
                        f,
                        " ~ {} {} {} ~ {}",
                        data.pattern(*pattern).name(),
                        format_time(*board_time),
                        format_time(*alight_time),
                        data.stop_name(*alight_stop)
                    )?;
                }
                PathLeg::Transfer {
                    to,
                    departure_time,
                    arrival_time,
                    ..
                } => {
                    write!(f, " ~ ")?;
                    write_walk(f, *departure_time, *arrival_time)?;
                    write!(f, " ~ {}", data.stop_name(*to))?;
                }
                PathLeg::Egress {
                    departure_time,
                    arrival_time,
                    ..
                } => {
                    if departure_time != arrival_time {
                        write!(f, " ~ ")?;
                        write_walk(f, *departure_time, *arrival_time)?;
                    }
                }
            }
        }
        write!(
            f,
            " [{} {} {} {}tx {}",
            format_time(self.path.departure_time),
            format_time(self.path.arrival_time),
            format_duration(self.path.duration().saturating_seconds()),
            self.path.number_of_transfers,
            format_cost(self.path.c1)
        )?;
        if self.path.c2 != 0 {
            write!(f, " c2:{}", self.path.c2)?;
        }
        write!(f, "]")
    }
}
