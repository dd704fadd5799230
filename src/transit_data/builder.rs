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

use super::{
    ConstrainedTransfer, Pattern, PatternData, Stop, Timetable, TransferConstraintKind,
    TransferEdge, TransitData, TransitMode, TripSchedule, TripStop,
};
use crate::error::ConfigurationError;
use crate::time::{BadTime, PositiveDuration, SecondsSinceDayStart};
use std::collections::HashMap;

/// Default cost of a transfer edge, per second of walk, in centi-seconds.
pub const DEFAULT_TRANSFER_COST_FACTOR: i32 = 100;

/// Builder used to easily create a `TransitData`.
///
/// ```
/// # use rangeraptor::transit_data::builder::TransitDataBuilder;
/// # fn main() -> Result<(), rangeraptor::error::ConfigurationError> {
/// let data = TransitDataBuilder::default()
///     .route("L1", &["A", "B"], |r| r.trip(&["10:00", "10:05"]))
///     .route("L2", &["C", "D"], |r| {
///         r.trip(&["10:10", "10:20"]).trip(&["10:40", "10:50"])
///     })
///     .transfer("B", "C", 120)
///     .build()?;
/// assert_eq!(data.nb_of_stops(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct TransitDataBuilder {
    stop_names: Vec<String>,
    stop_by_name: HashMap<String, Stop>,
    routes: Vec<RouteBuilder>,
    transfers: Vec<TransferEdge>,
    constraints: Vec<PendingConstraint>,
    error: Option<String>,
}

/// Builder of the stops and trips of a single pattern.
#[derive(Debug)]
pub struct RouteBuilder {
    name: String,
    mode: TransitMode,
    stop_names: Vec<String>,
    board_allowed: Vec<bool>,
    alight_allowed: Vec<bool>,
    trips: Vec<TripSchedule>,
    priority_group: usize,
    error: Option<String>,
}

#[derive(Debug)]
struct PendingConstraint {
    from_trip: String,
    from_stop: String,
    to_trip: String,
    to_stop: String,
    kind: TransferConstraintKind,
}

pub trait IntoTime {
    fn into_time(&self) -> Result<SecondsSinceDayStart, BadTime>;
}

impl IntoTime for SecondsSinceDayStart {
    fn into_time(&self) -> Result<SecondsSinceDayStart, BadTime> {
        Ok(*self)
    }
}

impl IntoTime for &str {
    fn into_time(&self) -> Result<SecondsSinceDayStart, BadTime> {
        self.parse()
    }
}

impl IntoTime for String {
    fn into_time(&self) -> Result<SecondsSinceDayStart, BadTime> {
        self.parse()
    }
}

impl TransitDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_or_create_stop(&mut self, name: &str) -> Stop {
        if let Some(stop) = self.stop_by_name.get(name) {
            return *stop;
        }
        let stop = Stop::new(self.stop_names.len());
        self.stop_names.push(name.to_string());
        self.stop_by_name.insert(name.to_string(), stop);
        stop
    }

    /// Declares a stop, useful for stops served by no pattern.
    pub fn stop(mut self, name: &str) -> Self {
        self.find_or_create_stop(name);
        self
    }

    /// Adds a pattern serving `stops` in this order.
    ///
    /// Trips are added in `route_initer`. Unnamed trips are named
    /// `<route name>_<n>` with `n` the creation rank of the trip.
    pub fn route<F>(mut self, name: &str, stops: &[&str], route_initer: F) -> Self
    where
        F: FnOnce(RouteBuilder) -> RouteBuilder,
    {
        for stop in stops {
            self.find_or_create_stop(stop);
        }
        let route = RouteBuilder {
            name: name.to_string(),
            mode: TransitMode::default(),
            stop_names: stops.iter().map(|stop| stop.to_string()).collect(),
            board_allowed: vec![true; stops.len()],
            alight_allowed: vec![true; stops.len()],
            trips: Vec::new(),
            priority_group: 0,
            error: None,
        };
        self.routes.push(route_initer(route));
        self
    }

    /// Adds a transfer costing its duration times `DEFAULT_TRANSFER_COST_FACTOR`.
    pub fn transfer(self, from: &str, to: &str, duration_in_seconds: u32) -> Self {
        let c1 = PositiveDuration::from_seconds(duration_in_seconds)
            .saturating_seconds()
            .saturating_mul(DEFAULT_TRANSFER_COST_FACTOR);
        self.transfer_with_cost(from, to, duration_in_seconds, c1)
    }

    pub fn transfer_with_cost(
        mut self,
        from: &str,
        to: &str,
        duration_in_seconds: u32,
        c1: i32,
    ) -> Self {
        let from = self.find_or_create_stop(from);
        let to = self.find_or_create_stop(to);
        self.transfers.push(TransferEdge {
            from,
            to,
            duration: PositiveDuration::from_seconds(duration_in_seconds),
            c1,
        });
        self
    }

    /// Guarantees the transfer from trip `from_trip` alighting at `from_stop`
    /// to trip `to_trip` boarding at `to_stop`.
    pub fn guaranteed_transfer(
        self,
        from_trip: &str,
        from_stop: &str,
        to_trip: &str,
        to_stop: &str,
    ) -> Self {
        self.constrained_transfer(
            from_trip,
            from_stop,
            to_trip,
            to_stop,
            TransferConstraintKind::Guaranteed,
        )
    }

    pub fn stay_seated(self, from_trip: &str, to_trip: &str, stop: &str) -> Self {
        self.constrained_transfer(
            from_trip,
            stop,
            to_trip,
            stop,
            TransferConstraintKind::StaySeated,
        )
    }

    fn constrained_transfer(
        mut self,
        from_trip: &str,
        from_stop: &str,
        to_trip: &str,
        to_stop: &str,
        kind: TransferConstraintKind,
    ) -> Self {
        self.constraints.push(PendingConstraint {
            from_trip: from_trip.to_string(),
            from_stop: from_stop.to_string(),
            to_trip: to_trip.to_string(),
            to_stop: to_stop.to_string(),
            kind,
        });
        self
    }

    /// Consume the builder to create the transit data.
    pub fn build(self) -> Result<TransitData, ConfigurationError> {
        let Self {
            stop_names,
            stop_by_name,
            routes,
            transfers,
            constraints: pending_constraints,
            error,
        } = self;
        if let Some(error) = error {
            return Err(ConfigurationError::InvalidTransitData(error));
        }

        let mut patterns = Vec::with_capacity(routes.len());
        for route in routes {
            let name = route.name;
            let invalid =
                |error: String| ConfigurationError::InvalidTransitData(format!("route {} : {}", name, error));
            if let Some(error) = route.error {
                return Err(invalid(error));
            }
            let stops: Vec<Stop> = route
                .stop_names
                .iter()
                .map(|stop_name| stop_by_name[stop_name.as_str()])
                .collect();
            let timetable = Timetable::new(stops.len(), route.trips).map_err(invalid)?;
            patterns.push(PatternData::new(
                name,
                route.mode,
                stops,
                route.board_allowed,
                route.alight_allowed,
                timetable,
            ));
        }

        let mut constraints = Vec::with_capacity(pending_constraints.len());
        for constraint in &pending_constraints {
            constraints.push(ConstrainedTransfer {
                from: find_trip_stop(&patterns, &stop_by_name, &constraint.from_trip, &constraint.from_stop)?,
                to: find_trip_stop(&patterns, &stop_by_name, &constraint.to_trip, &constraint.to_stop)?,
                kind: constraint.kind,
            });
        }

        TransitData::new(stop_names, patterns, transfers, constraints)
    }
}

fn find_trip_stop(
    patterns: &[PatternData],
    stop_by_name: &HashMap<String, Stop>,
    trip_name: &str,
    stop_name: &str,
) -> Result<TripStop, ConfigurationError> {
    let unknown = |what: &str| {
        ConfigurationError::InvalidTransitData(format!(
            "constrained transfer on unknown {} (trip {}, stop {})",
            what, trip_name, stop_name
        ))
    };
    let stop = stop_by_name.get(stop_name).ok_or_else(|| unknown("stop"))?;
    patterns
        .iter()
        .enumerate()
        .find_map(|(idx, pattern)| {
            let trip = pattern.timetable().trip_index(trip_name)?;
            let position = pattern.stops().iter().position(|s| s == stop)?;
            Some(TripStop {
                pattern: Pattern { idx },
                trip,
                position,
            })
        })
        .ok_or_else(|| unknown("trip"))
}

impl RouteBuilder {
    pub fn mode(mut self, mode: TransitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Priority group of the trips added after this call.
    pub fn priority_group(mut self, group: usize) -> Self {
        self.priority_group = group;
        self
    }

    pub fn no_boarding_at(mut self, position: usize) -> Self {
        if let Some(allowed) = self.board_allowed.get_mut(position) {
            *allowed = false;
        }
        self
    }

    pub fn no_alighting_at(mut self, position: usize) -> Self {
        if let Some(allowed) = self.alight_allowed.get_mut(position) {
            *allowed = false;
        }
        self
    }

    /// Adds a trip arriving and departing at the same time at each stop.
    pub fn trip<T: IntoTime>(self, times: &[T]) -> Self {
        let name = format!("{}_{}", self.name, self.trips.len());
        self.named_trip(&name, times)
    }

    pub fn named_trip<T: IntoTime>(self, name: &str, times: &[T]) -> Self {
        self.trip_with_dwell(name, times, times)
    }

    pub fn trip_with_dwell<T: IntoTime>(
        mut self,
        name: &str,
        arrivals: &[T],
        departures: &[T],
    ) -> Self {
        let arrivals = self.parse_times(arrivals);
        let departures = self.parse_times(departures);
        self.trips.push(TripSchedule {
            name: name.to_string(),
            arrivals,
            departures,
            priority_group: self.priority_group,
        });
        self
    }

    /// Adds a trip every `headway_in_seconds` from `first` to `last` included,
    /// `running_times` giving the departure offset of each stop.
    pub fn frequency<T: IntoTime>(
        mut self,
        first: T,
        last: T,
        headway_in_seconds: u32,
        running_times: &[u32],
    ) -> Self {
        let (first, last) = match (first.into_time(), last.into_time()) {
            (Ok(first), Ok(last)) => (first, last),
            (Err(err), _) | (_, Err(err)) => {
                self.error.get_or_insert(err.to_string());
                return self;
            }
        };
        if headway_in_seconds == 0 {
            self.error.get_or_insert_with(|| "frequency with a zero headway".to_string());
            return self;
        }
        let mut start = first;
        while start <= last {
            let times: Vec<SecondsSinceDayStart> = running_times
                .iter()
                .map(|offset| start + PositiveDuration::from_seconds(*offset))
                .collect();
            self = self.trip(&times[..]);
            start = start + PositiveDuration::from_seconds(headway_in_seconds);
        }
        self
    }

    fn parse_times<T: IntoTime>(&mut self, times: &[T]) -> Vec<i32> {
        let mut result = Vec::with_capacity(times.len());
        for time in times {
            match time.into_time() {
                Ok(time) => result.push(time.seconds()),
                Err(err) => {
                    self.error.get_or_insert(err.to_string());
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transit_data::TripTimes;

    #[test]
    fn build_simple_network() {
        let data = TransitDataBuilder::default()
            .route("L1", &["A", "B", "C"], |r| {
                r.trip(&["10:00", "10:05", "10:10"])
                    .trip(&["09:00", "09:05", "09:10"])
            })
            .transfer("C", "D", 60)
            .build()
            .unwrap();

        assert_eq!(data.nb_of_stops(), 4);
        assert_eq!(data.nb_of_patterns(), 1);
        let b = data.stop_by_name("B").unwrap();
        let pattern = data.patterns_of_stop(b)[0];
        assert_eq!(pattern.1, 1);
        let timetable = data.pattern(pattern.0).timetable();
        assert_eq!(timetable.trip_name(0), "L1_1");
        assert_eq!(timetable.trip(0).departure(1), 9 * 3600 + 5 * 60);

        let c = data.stop_by_name("C").unwrap();
        let d = data.stop_by_name("D").unwrap();
        assert_eq!(data.outgoing_transfers(c)[0].stop, d);
        assert_eq!(data.outgoing_transfers(c)[0].c1, 6000);
        assert_eq!(data.incoming_transfers(d)[0].stop, c);
    }

    #[test]
    fn frequency_trips() {
        let data = TransitDataBuilder::default()
            .route("L99", &["E", "F"], |r| r.frequency("00:03", "00:12", 60, &[0, 120]))
            .build()
            .unwrap();
        let timetable = data.pattern(data.patterns().next().unwrap()).timetable();
        assert_eq!(timetable.nb_of_trips(), 10);
        assert_eq!(timetable.departures_at(0)[9], 12 * 60);
        assert_eq!(timetable.arrivals_at(1)[0], 5 * 60);
    }

    #[test]
    fn invalid_time_is_reported() {
        let result = TransitDataBuilder::default()
            .route("L1", &["A", "B"], |r| r.trip(&["10:00", "bad"]))
            .build();
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidTransitData(_))
        ));
    }

    #[test]
    fn constrained_transfer_is_resolved() {
        let data = TransitDataBuilder::default()
            .route("L1", &["A", "B"], |r| r.named_trip("t1", &["10:00", "10:10"]))
            .route("L2", &["B", "C"], |r| r.named_trip("t2", &["10:10", "10:20"]))
            .guaranteed_transfer("t1", "B", "t2", "B")
            .build()
            .unwrap();
        let l2 = data.patterns().nth(1).unwrap();
        let constraints = data.forward_constraints(l2);
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].source.position, 1);
        assert_eq!(constraints[0].target.position, 0);
        let l1 = data.patterns().next().unwrap();
        assert_eq!(data.reverse_constraints(l1)[0].target.position, 1);
    }

    #[test]
    fn unknown_trip_in_constraint() {
        let result = TransitDataBuilder::default()
            .route("L1", &["A", "B"], |r| r.trip(&["10:00", "10:10"]))
            .guaranteed_transfer("nope", "B", "L1_0", "A")
            .build();
        assert!(result.is_err());
    }
}
