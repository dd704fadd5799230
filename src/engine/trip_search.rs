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

use crate::engine::time_calculator::TimeCalculator;
use crate::transit_data::{
    Pattern, Timetable, TransferConstraintKind, TransitData, TripStop,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripSearchStatus {
    Found,
    NotFound,
    /// No trip of the current service day is late (or early) enough.
    /// Looking for a trip on another day is the job of a service calendar.
    SearchNextDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferConstraintClass {
    Regular,
    Constrained(TransferConstraintKind),
}

/// Result of a search for a trip to board (or to alight in reverse direction)
/// at a stop position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripSearchEvent {
    status: TripSearchStatus,
    trip_index: usize,
    time: i32,
    earliest_board_time: i32,
    constraint: TransferConstraintClass,
}

impl TripSearchEvent {
    fn found(
        trip_index: usize,
        time: i32,
        earliest_board_time: i32,
        constraint: TransferConstraintClass,
    ) -> Self {
        Self {
            status: TripSearchStatus::Found,
            trip_index,
            time,
            earliest_board_time,
            constraint,
        }
    }

    fn empty(status: TripSearchStatus, earliest_board_time: i32) -> Self {
        Self {
            status,
            trip_index: 0,
            time: earliest_board_time,
            earliest_board_time,
            constraint: TransferConstraintClass::Regular,
        }
    }

    pub fn status(&self) -> TripSearchStatus {
        self.status
    }

    pub fn is_found(&self) -> bool {
        self.status == TripSearchStatus::Found
    }

    /// Panics if no trip was found.
    pub fn trip_index(&self) -> usize {
        assert!(
            self.is_found(),
            "Requested the trip of an empty board/alight event ({:?})",
            self.status
        );
        self.trip_index
    }

    /// Board time (alight time in reverse direction) of the trip found.
    ///
    /// Panics if no trip was found.
    pub fn time(&self) -> i32 {
        assert!(
            self.is_found(),
            "Requested the time of an empty board/alight event ({:?})",
            self.status
        );
        self.time
    }

    /// The bound the search was made with.
    pub fn earliest_board_time(&self) -> i32 {
        self.earliest_board_time
    }

    pub fn is_constrained(&self) -> bool {
        self.constraint != TransferConstraintClass::Regular
    }
}

/// Finds the first trip departing from `position` at or after `earliest_board_time`.
///
/// With `trip_index_limit`, only trips before the limit are searched :
/// used to look for a better trip than the one currently boarded.
pub fn board_search(
    timetable: &Timetable,
    position: usize,
    earliest_board_time: i32,
    trip_index_limit: Option<usize>,
) -> TripSearchEvent {
    let departures = timetable.departures_at(position);
    let trip_index = departures.partition_point(|departure| *departure < earliest_board_time);
    if trip_index == departures.len() {
        return TripSearchEvent::empty(TripSearchStatus::SearchNextDay, earliest_board_time);
    }
    if let Some(limit) = trip_index_limit {
        if trip_index >= limit {
            return TripSearchEvent::empty(TripSearchStatus::NotFound, earliest_board_time);
        }
    }
    TripSearchEvent::found(
        trip_index,
        departures[trip_index],
        earliest_board_time,
        TransferConstraintClass::Regular,
    )
}

/// Finds the last trip arriving at `position` at or before `latest_alight_time`.
///
/// With `trip_index_limit`, only trips after the limit are searched.
pub fn alight_search(
    timetable: &Timetable,
    position: usize,
    latest_alight_time: i32,
    trip_index_limit: Option<usize>,
) -> TripSearchEvent {
    let arrivals = timetable.arrivals_at(position);
    let nb_of_candidates = arrivals.partition_point(|arrival| *arrival <= latest_alight_time);
    if nb_of_candidates == 0 {
        return TripSearchEvent::empty(TripSearchStatus::SearchNextDay, latest_alight_time);
    }
    let trip_index = nb_of_candidates - 1;
    if let Some(limit) = trip_index_limit {
        if trip_index <= limit {
            return TripSearchEvent::empty(TripSearchStatus::NotFound, latest_alight_time);
        }
    }
    TripSearchEvent::found(
        trip_index,
        arrivals[trip_index],
        latest_alight_time,
        TransferConstraintClass::Regular,
    )
}

/// Looks for a constrained transfer from the trip `source`, reached at
/// `source_time`, to a trip of `pattern` at `position`.
///
/// Slacks do not apply : the target trip only has to leave after
/// `source_time` in the direction of the search.
pub fn constrained_search<C: TimeCalculator>(
    calculator: &C,
    data: &TransitData,
    pattern: Pattern,
    position: usize,
    source: &TripStop,
    source_time: i32,
) -> Option<TripSearchEvent> {
    let timetable = data.pattern(pattern).timetable();
    calculator
        .constraints(data, pattern)
        .iter()
        .filter(|constraint| constraint.source == *source && constraint.target.position == position)
        .find_map(|constraint| {
            let trip = timetable.trip(constraint.target.trip);
            let time = calculator.stop_departure_time(&trip, position);
            if calculator.is_better(time, source_time) {
                return None;
            }
            Some(TripSearchEvent::found(
                trip.index(),
                time,
                source_time,
                TransferConstraintClass::Constrained(constraint.kind),
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transit_data::TripSchedule;

    fn timetable() -> Timetable {
        let trip = |name: &str, start: i32| TripSchedule {
            name: name.to_string(),
            arrivals: vec![start, start + 600],
            departures: vec![start, start + 600],
            priority_group: 0,
        };
        Timetable::new(2, vec![trip("t0", 1000), trip("t1", 2000), trip("t2", 3000)]).unwrap()
    }

    #[test]
    fn board_first_trip_after_bound() {
        let timetable = timetable();
        let event = board_search(&timetable, 0, 1500, None);
        assert!(event.is_found());
        assert_eq!(event.trip_index(), 1);
        assert_eq!(event.time(), 2000);
        assert_eq!(event.earliest_board_time(), 1500);
        assert!(!event.is_constrained());

        let exact = board_search(&timetable, 0, 2000, None);
        assert_eq!(exact.trip_index(), 1);
    }

    #[test]
    fn board_search_next_day() {
        let timetable = timetable();
        let event = board_search(&timetable, 0, 3001, None);
        assert_eq!(event.status(), TripSearchStatus::SearchNextDay);
    }

    #[test]
    fn board_search_with_limit() {
        let timetable = timetable();
        assert_eq!(board_search(&timetable, 0, 900, Some(1)).trip_index(), 0);
        let event = board_search(&timetable, 0, 1500, Some(1));
        assert_eq!(event.status(), TripSearchStatus::NotFound);
    }

    #[test]
    fn alight_last_trip_before_bound() {
        let timetable = timetable();
        let event = alight_search(&timetable, 1, 3000, None);
        assert_eq!(event.trip_index(), 1);
        assert_eq!(event.time(), 2600);

        assert_eq!(
            alight_search(&timetable, 1, 1599, None).status(),
            TripSearchStatus::SearchNextDay
        );
        assert_eq!(
            alight_search(&timetable, 1, 3000, Some(1)).status(),
            TripSearchStatus::NotFound
        );
        assert_eq!(alight_search(&timetable, 1, 5000, Some(1)).trip_index(), 2);
    }

    #[test]
    #[should_panic(expected = "empty board/alight event")]
    fn trip_of_empty_event() {
        let timetable = timetable();
        board_search(&timetable, 0, 5000, None).trip_index();
    }
}
