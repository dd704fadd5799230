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

use crate::engine::slack::SlackProvider;
use crate::engine::trip_search::{alight_search, board_search, TripSearchEvent};
use crate::time::SecondsSinceDayStart;
use crate::transit_data::{
    DirectedConstraint, Pattern, PatternData, Stop, Timetable, Transfer, TransitData, TripTimes,
};

/// Seconds between two Range-RAPTOR iterations.
pub const RANGE_RAPTOR_STEP: i32 = 60;

/// Hides the direction of the search from the rest of the engine.
///
/// In a forward search times increase from the earliest departure time.
/// In a reverse search they decrease from the latest arrival time,
/// and "boarding" a trip means alighting from it in real time.
/// All times are in seconds since the service day start.
pub trait TimeCalculator: Clone + Send + Sync {
    fn plus_duration(&self, time: i32, duration: i32) -> i32;

    fn minus_duration(&self, time: i32, duration: i32) -> i32;

    /// Duration between two times in the direction of the search, never negative
    /// when `to` comes after `from`.
    fn duration(&self, from: i32, to: i32) -> i32;

    /// `subject` comes strictly before `candidate` in the direction of the search.
    fn is_better(&self, subject: i32, candidate: i32) -> bool;

    /// A time every real time is better than.
    fn unreached_time(&self) -> i32;

    /// True if `time` is beyond the time limit. A time exactly at the limit is accepted.
    fn exceeds_time_limit(&self, time: i32) -> bool;

    fn exceeds_time_limit_reason(&self) -> String;

    /// The start times of the Range-RAPTOR iterations, in processing order.
    fn range_raptor_minutes(&self) -> RangeRaptorMinutes;

    fn one_iteration_only(&self) -> bool;

    /// Positions of a pattern with `nb_of_stops` stops, in traversal order.
    fn pattern_stop_iterator(&self, nb_of_stops: usize) -> PatternStopIterator;

    /// Time a trip leaves `position` in the direction of the search.
    fn stop_departure_time<T: TripTimes>(&self, trip: &T, position: usize) -> i32;

    /// Time a trip reaches `position` in the direction of the search.
    fn stop_arrival_time<T: TripTimes>(&self, trip: &T, position: usize) -> i32;

    fn get_transfers<'a>(&self, data: &'a TransitData, stop: Stop) -> &'a [Transfer];

    fn constraints<'a>(&self, data: &'a TransitData, pattern: Pattern) -> &'a [DirectedConstraint];

    fn board_allowed(&self, pattern: &PatternData, position: usize) -> bool;

    fn alight_allowed(&self, pattern: &PatternData, position: usize) -> bool;

    fn board_slack(&self, slack: &SlackProvider, pattern: &PatternData) -> i32;

    fn alight_slack(&self, slack: &SlackProvider, pattern: &PatternData) -> i32;

    /// Finds the best trip to board at `position` given the earliest board time.
    fn trip_search(
        &self,
        timetable: &Timetable,
        position: usize,
        earliest_board_time: i32,
        trip_index_limit: Option<usize>,
    ) -> TripSearchEvent;

    /// Increases along the direction of the search.
    fn progress(&self, time: i32) -> i32;

    /// Lower is better : the earliest trip forward, the latest one in reverse.
    fn trip_rank(&self, trip_index: usize) -> i64;

    /// The two ends `(first, last)` of something traversed in the direction
    /// of the search, in real time order.
    fn real_time_ends<T>(&self, first: T, last: T) -> (T, T);

    /// Puts a sequence built in the direction of the search in real time order.
    fn to_real_time_order<T>(&self, sequence: &mut [T]);
}

/// The Range-RAPTOR iteration start times.
#[derive(Debug, Clone)]
pub struct RangeRaptorMinutes {
    next: i32,
    step: i32,
    remaining: usize,
}

impl Iterator for RangeRaptorMinutes {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let minute = self.next;
        self.next += self.step;
        self.remaining -= 1;
        Some(minute)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RangeRaptorMinutes {}

#[derive(Debug, Clone)]
pub struct PatternStopIterator {
    forward: bool,
    next: usize,
    remaining: usize,
}

impl Iterator for PatternStopIterator {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let position = self.next;
        self.remaining -= 1;
        if self.forward {
            self.next += 1;
        } else {
            self.next = self.next.saturating_sub(1);
        }
        Some(position)
    }
}

fn nb_of_iterations(search_window: i32, step: i32) -> usize {
    if search_window <= 0 {
        1
    } else {
        ((search_window + step - 1) / step) as usize
    }
}

/// Depart after search.
#[derive(Debug, Clone)]
pub struct ForwardCalculator {
    earliest_departure_time: i32,
    search_window: i32,
    latest_acceptable_arrival_time: Option<i32>,
    step: i32,
}

impl ForwardCalculator {
    pub fn new(
        earliest_departure_time: i32,
        search_window: i32,
        latest_acceptable_arrival_time: Option<i32>,
    ) -> Self {
        Self::with_step(
            earliest_departure_time,
            search_window,
            latest_acceptable_arrival_time,
            RANGE_RAPTOR_STEP,
        )
    }

    pub fn with_step(
        earliest_departure_time: i32,
        search_window: i32,
        latest_acceptable_arrival_time: Option<i32>,
        step: i32,
    ) -> Self {
        Self {
            earliest_departure_time,
            search_window,
            latest_acceptable_arrival_time,
            step,
        }
    }
}

impl TimeCalculator for ForwardCalculator {
    fn plus_duration(&self, time: i32, duration: i32) -> i32 {
        time.saturating_add(duration)
    }

    fn minus_duration(&self, time: i32, duration: i32) -> i32 {
        time.saturating_sub(duration)
    }

    fn duration(&self, from: i32, to: i32) -> i32 {
        to - from
    }

    fn is_better(&self, subject: i32, candidate: i32) -> bool {
        subject < candidate
    }

    fn unreached_time(&self) -> i32 {
        i32::MAX
    }

    fn exceeds_time_limit(&self, time: i32) -> bool {
        match self.latest_acceptable_arrival_time {
            Some(limit) => time > limit,
            None => false,
        }
    }

    fn exceeds_time_limit_reason(&self) -> String {
        let limit = self.latest_acceptable_arrival_time.unwrap_or(i32::MAX);
        format!(
            "The arrival time exceeds the time limit, arrive to late: {}.",
            SecondsSinceDayStart::from_seconds(limit)
        )
    }

    fn range_raptor_minutes(&self) -> RangeRaptorMinutes {
        let nb_of_iterations = nb_of_iterations(self.search_window, self.step);
        RangeRaptorMinutes {
            next: self.earliest_departure_time + (nb_of_iterations as i32 - 1) * self.step,
            step: -self.step,
            remaining: nb_of_iterations,
        }
    }

    fn one_iteration_only(&self) -> bool {
        self.search_window <= 0
    }

    fn pattern_stop_iterator(&self, nb_of_stops: usize) -> PatternStopIterator {
        PatternStopIterator {
            forward: true,
            next: 0,
            remaining: nb_of_stops,
        }
    }

    fn stop_departure_time<T: TripTimes>(&self, trip: &T, position: usize) -> i32 {
        trip.departure(position)
    }

    fn stop_arrival_time<T: TripTimes>(&self, trip: &T, position: usize) -> i32 {
        trip.arrival(position)
    }

    fn get_transfers<'a>(&self, data: &'a TransitData, stop: Stop) -> &'a [Transfer] {
        data.outgoing_transfers(stop)
    }

    fn constraints<'a>(&self, data: &'a TransitData, pattern: Pattern) -> &'a [DirectedConstraint] {
        data.forward_constraints(pattern)
    }

    fn board_allowed(&self, pattern: &PatternData, position: usize) -> bool {
        pattern.can_board(position)
    }

    fn alight_allowed(&self, pattern: &PatternData, position: usize) -> bool {
        pattern.can_alight(position)
    }

    fn board_slack(&self, slack: &SlackProvider, pattern: &PatternData) -> i32 {
        slack.board_slack(pattern.mode())
    }

    fn alight_slack(&self, slack: &SlackProvider, pattern: &PatternData) -> i32 {
        slack.alight_slack(pattern.mode())
    }

    fn trip_search(
        &self,
        timetable: &Timetable,
        position: usize,
        earliest_board_time: i32,
        trip_index_limit: Option<usize>,
    ) -> TripSearchEvent {
        board_search(timetable, position, earliest_board_time, trip_index_limit)
    }

    fn progress(&self, time: i32) -> i32 {
        time
    }

    fn trip_rank(&self, trip_index: usize) -> i64 {
        trip_index as i64
    }

    fn real_time_ends<T>(&self, first: T, last: T) -> (T, T) {
        (first, last)
    }

    fn to_real_time_order<T>(&self, _sequence: &mut [T]) {}
}

/// Arrive before search.
#[derive(Debug, Clone)]
pub struct ReverseCalculator {
    latest_arrival_time: i32,
    search_window: i32,
    earliest_acceptable_departure_time: Option<i32>,
    step: i32,
}

impl ReverseCalculator {
    pub fn new(
        latest_arrival_time: i32,
        search_window: i32,
        earliest_acceptable_departure_time: Option<i32>,
    ) -> Self {
        Self::with_step(
            latest_arrival_time,
            search_window,
            earliest_acceptable_departure_time,
            RANGE_RAPTOR_STEP,
        )
    }

    pub fn with_step(
        latest_arrival_time: i32,
        search_window: i32,
        earliest_acceptable_departure_time: Option<i32>,
        step: i32,
    ) -> Self {
        Self {
            latest_arrival_time,
            search_window,
            earliest_acceptable_departure_time,
            step,
        }
    }
}

impl TimeCalculator for ReverseCalculator {
    fn plus_duration(&self, time: i32, duration: i32) -> i32 {
        time.saturating_sub(duration)
    }

    fn minus_duration(&self, time: i32, duration: i32) -> i32 {
        time.saturating_add(duration)
    }

    fn duration(&self, from: i32, to: i32) -> i32 {
        from - to
    }

    fn is_better(&self, subject: i32, candidate: i32) -> bool {
        subject > candidate
    }

    fn unreached_time(&self) -> i32 {
        i32::MIN
    }

    fn exceeds_time_limit(&self, time: i32) -> bool {
        match self.earliest_acceptable_departure_time {
            Some(limit) => time < limit,
            None => false,
        }
    }

    fn exceeds_time_limit_reason(&self) -> String {
        let limit = self.earliest_acceptable_departure_time.unwrap_or(i32::MIN);
        format!(
            "The departure time exceeds the time limit, depart to early: {}.",
            SecondsSinceDayStart::from_seconds(limit)
        )
    }

    fn range_raptor_minutes(&self) -> RangeRaptorMinutes {
        let nb_of_iterations = nb_of_iterations(self.search_window, self.step);
        RangeRaptorMinutes {
            next: self.latest_arrival_time - (nb_of_iterations as i32 - 1) * self.step,
            step: self.step,
            remaining: nb_of_iterations,
        }
    }

    fn one_iteration_only(&self) -> bool {
        self.search_window <= 0
    }

    fn pattern_stop_iterator(&self, nb_of_stops: usize) -> PatternStopIterator {
        PatternStopIterator {
            forward: false,
            next: nb_of_stops.saturating_sub(1),
            remaining: nb_of_stops,
        }
    }

    fn stop_departure_time<T: TripTimes>(&self, trip: &T, position: usize) -> i32 {
        trip.arrival(position)
    }

    fn stop_arrival_time<T: TripTimes>(&self, trip: &T, position: usize) -> i32 {
        trip.departure(position)
    }

    fn get_transfers<'a>(&self, data: &'a TransitData, stop: Stop) -> &'a [Transfer] {
        data.incoming_transfers(stop)
    }

    fn constraints<'a>(&self, data: &'a TransitData, pattern: Pattern) -> &'a [DirectedConstraint] {
        data.reverse_constraints(pattern)
    }

    fn board_allowed(&self, pattern: &PatternData, position: usize) -> bool {
        pattern.can_alight(position)
    }

    fn alight_allowed(&self, pattern: &PatternData, position: usize) -> bool {
        pattern.can_board(position)
    }

    fn board_slack(&self, slack: &SlackProvider, pattern: &PatternData) -> i32 {
        slack.alight_slack(pattern.mode())
    }

    fn alight_slack(&self, slack: &SlackProvider, pattern: &PatternData) -> i32 {
        slack.board_slack(pattern.mode())
    }

    fn trip_search(
        &self,
        timetable: &Timetable,
        position: usize,
        earliest_board_time: i32,
        trip_index_limit: Option<usize>,
    ) -> TripSearchEvent {
        alight_search(timetable, position, earliest_board_time, trip_index_limit)
    }

    fn progress(&self, time: i32) -> i32 {
        -time
    }

    fn trip_rank(&self, trip_index: usize) -> i64 {
        -(trip_index as i64)
    }

    fn real_time_ends<T>(&self, first: T, last: T) -> (T, T) {
        (last, first)
    }

    fn to_real_time_order<T>(&self, sequence: &mut [T]) {
        sequence.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::PositiveDuration;
    use crate::transit_data::builder::TransitDataBuilder;
    use crate::transit_data::TripSchedule;

    const EIGHT: i32 = 8 * 3600;
    const SIXTEEN: i32 = 16 * 3600;

    fn schedule(arrival: i32, departure: i32) -> Timetable {
        Timetable::new(
            2,
            vec![TripSchedule {
                name: "t".to_string(),
                arrivals: vec![arrival, departure + 100],
                departures: vec![departure, departure + 100],
                priority_group: 0,
            }],
        )
        .unwrap()
    }

    #[test]
    fn forward_exceeds_time_limit() {
        let subject = ForwardCalculator::new(EIGHT, 7200, Some(1200));
        assert!(!subject.exceeds_time_limit(0));
        assert!(!subject.exceeds_time_limit(1200));
        assert!(subject.exceeds_time_limit(1201));

        let subject = ForwardCalculator::new(EIGHT, 7200, Some(SIXTEEN));
        assert_eq!(
            subject.exceeds_time_limit_reason(),
            "The arrival time exceeds the time limit, arrive to late: 16:00:00."
        );

        let unbounded = ForwardCalculator::new(EIGHT, 7200, None);
        assert!(!unbounded.exceeds_time_limit(2_000_000_000));
    }

    #[test]
    fn reverse_exceeds_time_limit() {
        let subject = ReverseCalculator::new(EIGHT, 7200, Some(1200));
        assert!(!subject.exceeds_time_limit(200_000));
        assert!(!subject.exceeds_time_limit(1200));
        assert!(subject.exceeds_time_limit(1199));

        let subject = ReverseCalculator::new(EIGHT, 7200, Some(SIXTEEN));
        assert_eq!(
            subject.exceeds_time_limit_reason(),
            "The departure time exceeds the time limit, depart to early: 16:00:00."
        );

        let unbounded = ReverseCalculator::new(EIGHT, 7200, None);
        assert!(!unbounded.exceeds_time_limit(0));
        assert!(!unbounded.exceeds_time_limit(2_000_000_000));
    }

    #[test]
    fn one_iteration_only() {
        assert!(!ForwardCalculator::new(EIGHT, 7200, None).one_iteration_only());
        assert!(ForwardCalculator::new(EIGHT, 0, None).one_iteration_only());
        assert!(!ReverseCalculator::new(EIGHT, 7200, None).one_iteration_only());
        assert!(ReverseCalculator::new(EIGHT, 0, None).one_iteration_only());
    }

    #[test]
    fn range_raptor_minutes() {
        let forward = ForwardCalculator::with_step(500, 200, None, 100);
        assert_eq!(forward.range_raptor_minutes().collect::<Vec<_>>(), vec![600, 500]);

        let reverse = ReverseCalculator::with_step(500, 200, None, 100);
        assert_eq!(reverse.range_raptor_minutes().collect::<Vec<_>>(), vec![400, 500]);

        let single = ForwardCalculator::new(500, 0, None);
        assert_eq!(single.range_raptor_minutes().collect::<Vec<_>>(), vec![500]);

        let hour = ForwardCalculator::new(0, 3600, None);
        let minutes: Vec<i32> = hour.range_raptor_minutes().collect();
        assert_eq!(minutes.len(), 60);
        assert_eq!(minutes[0], 3540);
        assert_eq!(minutes[59], 0);
    }

    #[test]
    fn pattern_stop_iterator() {
        let forward = ForwardCalculator::new(0, 0, None);
        assert_eq!(forward.pattern_stop_iterator(3).collect::<Vec<_>>(), vec![0, 1, 2]);
        let reverse = ReverseCalculator::new(0, 0, None);
        assert_eq!(reverse.pattern_stop_iterator(2).collect::<Vec<_>>(), vec![1, 0]);
        assert_eq!(reverse.pattern_stop_iterator(0).count(), 0);
    }

    #[test]
    fn stop_arrival_departure_time() {
        let timetable = schedule(10, 20);
        let trip = timetable.trip(0);
        let forward = ForwardCalculator::new(0, 0, None);
        assert_eq!(forward.stop_departure_time(&trip, 0), 20);
        assert_eq!(forward.stop_arrival_time(&trip, 0), 10);
        let reverse = ReverseCalculator::new(0, 0, None);
        assert_eq!(reverse.stop_departure_time(&trip, 0), 10);
        assert_eq!(reverse.stop_arrival_time(&trip, 0), 20);
    }

    #[test]
    fn reverse_arrival_time_with_slack() {
        let timetable = schedule(500, 500);
        let reverse = ReverseCalculator::new(0, 0, None);
        let slack = 75;
        let time = reverse.plus_duration(reverse.stop_arrival_time(&timetable.trip(0), 0), slack);
        assert_eq!(time, 425);
        assert_eq!(reverse.duration(500, 425), 75);
    }

    #[test]
    fn get_transfers() {
        let data = TransitDataBuilder::default()
            .transfer("A", "B", 60)
            .build()
            .unwrap();
        let a = data.stop_by_name("A").unwrap();
        let b = data.stop_by_name("B").unwrap();

        let reverse = ReverseCalculator::new(0, 0, None);
        let transfers = reverse.get_transfers(&data, b);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].stop, a);
        assert_eq!(transfers[0].duration, PositiveDuration::from_seconds(60));
        assert!(reverse.get_transfers(&data, a).is_empty());

        let forward = ForwardCalculator::new(0, 0, None);
        assert_eq!(forward.get_transfers(&data, a)[0].stop, b);
        assert!(forward.get_transfers(&data, b).is_empty());
    }

    #[test]
    fn progress_and_rank() {
        let forward = ForwardCalculator::new(0, 0, None);
        let reverse = ReverseCalculator::new(0, 0, None);
        assert!(forward.progress(200) > forward.progress(100));
        assert!(reverse.progress(100) > reverse.progress(200));
        assert!(forward.trip_rank(1) < forward.trip_rank(2));
        assert!(reverse.trip_rank(2) < reverse.trip_rank(1));
        assert!(forward.is_better(100, 200));
        assert!(reverse.is_better(200, 100));
    }

    #[test]
    fn real_time_order() {
        let forward = ForwardCalculator::new(0, 0, None);
        let reverse = ReverseCalculator::new(0, 0, None);
        assert_eq!(forward.real_time_ends("board", "alight"), ("board", "alight"));
        assert_eq!(reverse.real_time_ends("alight", "board"), ("board", "alight"));

        let mut legs = vec![1, 2, 3];
        forward.to_real_time_order(&mut legs);
        assert_eq!(legs, vec![1, 2, 3]);
        reverse.to_real_time_order(&mut legs);
        assert_eq!(legs, vec![3, 2, 1]);
    }
}
