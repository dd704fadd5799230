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

/// Arrival and departure times of a trip at each position of its pattern,
/// in seconds since the service day start.
pub trait TripTimes {
    fn arrival(&self, position: usize) -> i32;
    fn departure(&self, position: usize) -> i32;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSchedule {
    pub name: String,
    pub arrivals: Vec<i32>,
    pub departures: Vec<i32>,
    pub priority_group: usize,
}

/// The trips of a pattern.
///
/// Times are stored position by position, so that the trips can be
/// searched by time at each position.
/// At every position, trips are sorted by both arrival and departure time.
#[derive(Debug, Clone)]
pub struct Timetable {
    arrivals: Vec<Vec<i32>>,
    departures: Vec<Vec<i32>>,
    trip_names: Vec<String>,
    priority_groups: Vec<usize>,
    heuristic_trip: HeuristicTrip,
}

#[derive(Debug, Clone, Copy)]
pub struct TripRef<'a> {
    timetable: &'a Timetable,
    index: usize,
}

/// A synthetic trip made of the shortest dwell and running times
/// observed between consecutive positions, starting at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicTrip {
    arrivals: Vec<i32>,
    departures: Vec<i32>,
}

impl Timetable {
    pub fn new(nb_of_positions: usize, mut trips: Vec<TripSchedule>) -> Result<Self, String> {
        for trip in &trips {
            if trip.arrivals.len() != nb_of_positions || trip.departures.len() != nb_of_positions {
                return Err(format!(
                    "trip {} has {} arrivals and {} departures but the pattern has {} stops",
                    trip.name,
                    trip.arrivals.len(),
                    trip.departures.len(),
                    nb_of_positions
                ));
            }
            for position in 0..nb_of_positions {
                if trip.arrivals[position] > trip.departures[position] {
                    return Err(format!(
                        "trip {} departs before it arrives at position {}",
                        trip.name, position
                    ));
                }
                if position > 0 && trip.departures[position - 1] > trip.arrivals[position] {
                    return Err(format!(
                        "trip {} goes back in time at position {}",
                        trip.name, position
                    ));
                }
            }
        }

        trips.sort_by_key(|trip| (trip.departures.first().copied(), trip.arrivals.last().copied()));

        for (previous, next) in trips.iter().zip(trips.iter().skip(1)) {
            for position in 0..nb_of_positions {
                if previous.departures[position] > next.departures[position]
                    || previous.arrivals[position] > next.arrivals[position]
                {
                    return Err(format!(
                        "trip {} overtakes trip {} at position {}",
                        next.name, previous.name, position
                    ));
                }
            }
        }

        let heuristic_trip = HeuristicTrip::new(nb_of_positions, &trips);
        let mut arrivals = vec![Vec::with_capacity(trips.len()); nb_of_positions];
        let mut departures = vec![Vec::with_capacity(trips.len()); nb_of_positions];
        for trip in &trips {
            for position in 0..nb_of_positions {
                arrivals[position].push(trip.arrivals[position]);
                departures[position].push(trip.departures[position]);
            }
        }

        Ok(Self {
            arrivals,
            departures,
            trip_names: trips.iter().map(|trip| trip.name.clone()).collect(),
            priority_groups: trips.iter().map(|trip| trip.priority_group).collect(),
            heuristic_trip,
        })
    }

    pub fn nb_of_positions(&self) -> usize {
        self.arrivals.len()
    }

    pub fn nb_of_trips(&self) -> usize {
        self.trip_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trip_names.is_empty()
    }

    /// Panics if `index` is not a trip of this timetable.
    pub fn trip(&self, index: usize) -> TripRef<'_> {
        assert!(index < self.nb_of_trips());
        TripRef {
            timetable: self,
            index,
        }
    }

    pub fn trip_name(&self, index: usize) -> &str {
        &self.trip_names[index]
    }

    pub fn trip_index(&self, name: &str) -> Option<usize> {
        self.trip_names.iter().position(|trip_name| trip_name == name)
    }

    pub fn priority_group(&self, index: usize) -> usize {
        self.priority_groups[index]
    }

    pub fn max_priority_group(&self) -> usize {
        self.priority_groups.iter().copied().max().unwrap_or(0)
    }

    /// Departure times of all trips at `position`, in increasing order.
    pub fn departures_at(&self, position: usize) -> &[i32] {
        &self.departures[position]
    }

    /// Arrival times of all trips at `position`, in increasing order.
    pub fn arrivals_at(&self, position: usize) -> &[i32] {
        &self.arrivals[position]
    }

    pub fn heuristic_trip(&self) -> &HeuristicTrip {
        &self.heuristic_trip
    }
}

impl<'a> TripRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'a str {
        self.timetable.trip_name(self.index)
    }

    pub fn priority_group(&self) -> usize {
        self.timetable.priority_group(self.index)
    }
}

impl<'a> TripTimes for TripRef<'a> {
    fn arrival(&self, position: usize) -> i32 {
        self.timetable.arrivals[position][self.index]
    }

    fn departure(&self, position: usize) -> i32 {
        self.timetable.departures[position][self.index]
    }
}

impl HeuristicTrip {
    fn new(nb_of_positions: usize, trips: &[TripSchedule]) -> Self {
        let mut arrivals = vec![0; nb_of_positions];
        let mut departures = vec![0; nb_of_positions];
        if trips.is_empty() {
            return Self {
                arrivals,
                departures,
            };
        }
        for position in 0..nb_of_positions {
            if position > 0 {
                let min_running_time = trips
                    .iter()
                    .map(|trip| trip.arrivals[position] - trip.departures[position - 1])
                    .min()
                    .unwrap_or(0);
                arrivals[position] = departures[position - 1] + min_running_time;
            }
            let min_dwell_time = trips
                .iter()
                .map(|trip| trip.departures[position] - trip.arrivals[position])
                .min()
                .unwrap_or(0);
            departures[position] = arrivals[position] + min_dwell_time;
        }
        Self {
            arrivals,
            departures,
        }
    }
}

impl TripTimes for HeuristicTrip {
    fn arrival(&self, position: usize) -> i32 {
        self.arrivals[position]
    }

    fn departure(&self, position: usize) -> i32 {
        self.departures[position]
    }
}
