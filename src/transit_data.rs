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

pub mod builder;
pub mod timetable;

use crate::error::ConfigurationError;
use crate::time::PositiveDuration;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
pub use timetable::{HeuristicTrip, Timetable, TripRef, TripSchedule, TripTimes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stop {
    pub(crate) idx: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern {
    pub(crate) idx: usize,
}

impl Stop {
    pub fn new(idx: usize) -> Self {
        Self { idx }
    }

    pub fn idx(&self) -> usize {
        self.idx
    }
}

impl Pattern {
    pub fn idx(&self) -> usize {
        self.idx
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitMode {
    Bus,
    Tram,
    Subway,
    Rail,
    Ferry,
}

pub const NB_OF_TRANSIT_MODES: usize = 5;

impl TransitMode {
    pub const ALL: [TransitMode; NB_OF_TRANSIT_MODES] = [
        TransitMode::Bus,
        TransitMode::Tram,
        TransitMode::Subway,
        TransitMode::Rail,
        TransitMode::Ferry,
    ];

    pub fn index(&self) -> usize {
        match self {
            TransitMode::Bus => 0,
            TransitMode::Tram => 1,
            TransitMode::Subway => 2,
            TransitMode::Rail => 3,
            TransitMode::Ferry => 4,
        }
    }
}

impl Default for TransitMode {
    fn default() -> Self {
        TransitMode::Bus
    }
}

impl Display for TransitMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransitMode::Bus => "bus",
            TransitMode::Tram => "tram",
            TransitMode::Subway => "subway",
            TransitMode::Rail => "rail",
            TransitMode::Ferry => "ferry",
        };
        write!(f, "{}", name)
    }
}

/// A sequence of stops served by trips that never overtake each other.
#[derive(Debug, Clone)]
pub struct PatternData {
    pub(crate) name: String,
    pub(crate) mode: TransitMode,
    pub(crate) stops: Vec<Stop>,
    pub(crate) board_allowed: Vec<bool>,
    pub(crate) alight_allowed: Vec<bool>,
    pub(crate) timetable: Timetable,
}

impl PatternData {
    pub fn new(
        name: String,
        mode: TransitMode,
        stops: Vec<Stop>,
        board_allowed: Vec<bool>,
        alight_allowed: Vec<bool>,
        timetable: Timetable,
    ) -> Self {
        Self {
            name,
            mode,
            stops,
            board_allowed,
            alight_allowed,
            timetable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> TransitMode {
        self.mode
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn nb_of_positions(&self) -> usize {
        self.stops.len()
    }

    pub fn stop_at(&self, position: usize) -> Stop {
        self.stops[position]
    }

    pub fn can_board(&self, position: usize) -> bool {
        self.board_allowed[position]
    }

    pub fn can_alight(&self, position: usize) -> bool {
        self.alight_allowed[position]
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }
}

/// A walking edge between two stops.
///
/// `stop` is the stop reached in the direction of the search :
/// the destination of an outgoing transfer, the origin of an incoming one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub stop: Stop,
    pub duration: PositiveDuration,
    pub c1: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripStop {
    pub pattern: Pattern,
    pub trip: usize,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferConstraintKind {
    Guaranteed,
    StaySeated,
}

/// A transfer from a trip to another one that is kept whatever
/// the board and transfer slacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstrainedTransfer {
    pub from: TripStop,
    pub to: TripStop,
    pub kind: TransferConstraintKind,
}

/// A constrained transfer seen from the direction of a search :
/// `source` is reached first, `target` is boarded afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectedConstraint {
    pub source: TripStop,
    pub target: TripStop,
    pub kind: TransferConstraintKind,
}

/// Immutable view of the transit network a search runs on.
///
/// Shared between the routers of a query : nothing is mutated during a search.
#[derive(Debug)]
pub struct TransitData {
    stop_names: Vec<String>,
    stop_by_name: HashMap<String, Stop>,
    patterns: Vec<PatternData>,
    patterns_of_stop: Vec<Vec<(Pattern, usize)>>,
    outgoing_transfers: Vec<Vec<Transfer>>,
    incoming_transfers: Vec<Vec<Transfer>>,
    forward_constraints: Vec<Vec<DirectedConstraint>>,
    reverse_constraints: Vec<Vec<DirectedConstraint>>,
    max_priority_group: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEdge {
    pub from: Stop,
    pub to: Stop,
    pub duration: PositiveDuration,
    pub c1: i32,
}

impl TransitData {
    pub fn new(
        stop_names: Vec<String>,
        patterns: Vec<PatternData>,
        transfers: Vec<TransferEdge>,
        constraints: Vec<ConstrainedTransfer>,
    ) -> Result<Self, ConfigurationError> {
        let nb_of_stops = stop_names.len();
        let check_stop = |stop: Stop| {
            if stop.idx < nb_of_stops {
                Ok(())
            } else {
                Err(ConfigurationError::StopOutOfRange {
                    stop: stop.idx,
                    nb_of_stops,
                })
            }
        };

        let mut stop_by_name = HashMap::new();
        for (idx, name) in stop_names.iter().enumerate() {
            if stop_by_name.insert(name.clone(), Stop { idx }).is_some() {
                return Err(ConfigurationError::InvalidTransitData(format!(
                    "stop {} is defined twice",
                    name
                )));
            }
        }

        let mut patterns_of_stop = vec![Vec::new(); nb_of_stops];
        let mut max_priority_group = 0;
        for (idx, pattern) in patterns.iter().enumerate() {
            let nb_of_positions = pattern.stops.len();
            if nb_of_positions < 2 {
                return Err(ConfigurationError::InvalidTransitData(format!(
                    "pattern {} has less than two stops",
                    pattern.name
                )));
            }
            if pattern.board_allowed.len() != nb_of_positions
                || pattern.alight_allowed.len() != nb_of_positions
                || pattern.timetable.nb_of_positions() != nb_of_positions
            {
                return Err(ConfigurationError::InvalidTransitData(format!(
                    "pattern {} has a timetable or permissions that do not match its {} stops",
                    pattern.name, nb_of_positions
                )));
            }
            for (position, stop) in pattern.stops.iter().enumerate() {
                check_stop(*stop)?;
                patterns_of_stop[stop.idx].push((Pattern { idx }, position));
            }
            max_priority_group = max_priority_group.max(pattern.timetable.max_priority_group());
        }

        let mut outgoing_transfers = vec![Vec::new(); nb_of_stops];
        let mut incoming_transfers = vec![Vec::new(); nb_of_stops];
        for edge in transfers {
            check_stop(edge.from)?;
            check_stop(edge.to)?;
            outgoing_transfers[edge.from.idx].push(Transfer {
                stop: edge.to,
                duration: edge.duration,
                c1: edge.c1,
            });
            incoming_transfers[edge.to.idx].push(Transfer {
                stop: edge.from,
                duration: edge.duration,
                c1: edge.c1,
            });
        }

        let mut forward_constraints = vec![Vec::new(); patterns.len()];
        let mut reverse_constraints = vec![Vec::new(); patterns.len()];
        for constraint in constraints {
            for trip_stop in [constraint.from, constraint.to].iter() {
                let pattern = patterns.get(trip_stop.pattern.idx).ok_or_else(|| {
                    ConfigurationError::InvalidTransitData(format!(
                        "constrained transfer on unknown pattern {}",
                        trip_stop.pattern.idx
                    ))
                })?;
                if trip_stop.trip >= pattern.timetable.nb_of_trips()
                    || trip_stop.position >= pattern.nb_of_positions()
                {
                    return Err(ConfigurationError::InvalidTransitData(format!(
                        "constrained transfer on unknown trip {} or position {} of pattern {}",
                        trip_stop.trip, trip_stop.position, pattern.name
                    )));
                }
            }
            forward_constraints[constraint.to.pattern.idx].push(DirectedConstraint {
                source: constraint.from,
                target: constraint.to,
                kind: constraint.kind,
            });
            reverse_constraints[constraint.from.pattern.idx].push(DirectedConstraint {
                source: constraint.to,
                target: constraint.from,
                kind: constraint.kind,
            });
        }

        Ok(Self {
            stop_names,
            stop_by_name,
            patterns,
            patterns_of_stop,
            outgoing_transfers,
            incoming_transfers,
            forward_constraints,
            reverse_constraints,
            max_priority_group,
        })
    }

    pub fn nb_of_stops(&self) -> usize {
        self.stop_names.len()
    }

    pub fn nb_of_patterns(&self) -> usize {
        self.patterns.len()
    }

    pub fn stop_name(&self, stop: Stop) -> &str {
        &self.stop_names[stop.idx]
    }

    pub fn stop_by_name(&self, name: &str) -> Option<Stop> {
        self.stop_by_name.get(name).copied()
    }

    pub fn pattern(&self, pattern: Pattern) -> &PatternData {
        &self.patterns[pattern.idx]
    }

    pub fn patterns(&self) -> impl Iterator<Item = Pattern> + '_ {
        (0..self.patterns.len()).map(|idx| Pattern { idx })
    }

    /// The patterns serving `stop`, with the position of `stop` in each of them.
    pub fn patterns_of_stop(&self, stop: Stop) -> &[(Pattern, usize)] {
        &self.patterns_of_stop[stop.idx]
    }

    pub fn outgoing_transfers(&self, stop: Stop) -> &[Transfer] {
        &self.outgoing_transfers[stop.idx]
    }

    pub fn incoming_transfers(&self, stop: Stop) -> &[Transfer] {
        &self.incoming_transfers[stop.idx]
    }

    /// Constrained transfers boarding `pattern`, in forward direction.
    pub fn forward_constraints(&self, pattern: Pattern) -> &[DirectedConstraint] {
        &self.forward_constraints[pattern.idx]
    }

    /// Constrained transfers alighting `pattern`, seen from a reverse search.
    pub fn reverse_constraints(&self, pattern: Pattern) -> &[DirectedConstraint] {
        &self.reverse_constraints[pattern.idx]
    }

    pub fn max_priority_group(&self) -> usize {
        self.max_priority_group
    }
}
