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

mod utils;

use anyhow::Error;
use chrono::NaiveDate;
use launch::logger::init_test_logger;
use launch::rangeraptor::transit_data::builder::TransitDataBuilder;
use launch::rangeraptor::{PathLeg, PositiveDuration, SecondsSinceDayStart};
use launch::{RequestInput, Solver};
use utils::{display, make_input, params_with_window};

#[test]
fn test_simple_routing() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = TransitDataBuilder::default()
        .route("1", &["A", "B", "C"], |r| {
            r.named_trip("toto", &["10:00:00", "10:05:00", "10:10:00"])
        })
        .build()?;

    let mut solver = Solver::new();
    let paths = solver.solve_request(
        &data,
        &make_input("09:59", &["A"], &["B"]),
        &params_with_window("01:00:00"),
    )?;

    assert_eq!(paths.len(), 1);
    let path = &paths[0];
    assert_eq!(path.number_of_transfers, 0);
    assert_eq!(path.departure_time, SecondsSinceDayStart::from_hms(10, 0, 0));
    assert_eq!(path.arrival_time, SecondsSinceDayStart::from_hms(10, 5, 0));
    assert_eq!(path.duration(), PositiveDuration::from_seconds(300));
    assert_eq!(path.transit_legs().count(), 1);
    match &path.legs[1] {
        PathLeg::Transit {
            board_stop,
            alight_stop,
            trip_index,
            ..
        } => {
            assert_eq!(data.stop_name(*board_stop), "A");
            assert_eq!(data.stop_name(*alight_stop), "B");
            assert_eq!(*trip_index, 0);
        }
        leg => panic!("Expected a transit leg, got {:?}", leg),
    }

    Ok(())
}

#[test]
fn test_datetime_on_service_day() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = TransitDataBuilder::default()
        .route("1", &["A", "B"], |r| r.trip(&["10:00", "10:05"]))
        .build()?;
    let service_day =
        NaiveDate::from_ymd_opt(2021, 1, 1).ok_or_else(|| anyhow::format_err!("Bad date"))?;
    let fallback = |stop: &str| vec![(stop.to_string(), PositiveDuration::zero())];

    let mut solver = Solver::new();
    let same_day =
        RequestInput::on_service_day("20210101T095900", service_day, fallback("A"), fallback("B"))?;
    assert_eq!(same_day.datetime, SecondsSinceDayStart::from_hms(9, 59, 0));
    let paths = solver.solve_request(&data, &same_day, &params_with_window("00:10:00"))?;
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].departure_time, SecondsSinceDayStart::from_hms(10, 0, 0));

    // the next morning is 24 hours after the trip of the service day
    let next_day =
        RequestInput::on_service_day("20210102T095900", service_day, fallback("A"), fallback("B"))?;
    assert_eq!(next_day.datetime, SecondsSinceDayStart::from_hms(33, 59, 0));
    let paths = solver.solve_request(&data, &next_day, &params_with_window("00:10:00"))?;
    assert!(paths.is_empty());

    let bad = RequestInput::on_service_day("2021-01-01 09:59", service_day, fallback("A"), fallback("B"));
    assert!(bad.is_err());

    Ok(())
}

#[test]
fn test_routing_with_transfers() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = TransitDataBuilder::default()
        .route("L1", &["A", "B", "C"], |r| {
            r.trip(&["10:00", "10:05", "10:10"])
        })
        .route("L2", &["E", "F", "G"], |r| {
            r.trip(&["10:10", "10:20", "10:30"])
        })
        .transfer("B", "F", 120)
        .build()?;

    let mut solver = Solver::new();
    let paths = solver.solve_request(
        &data,
        &make_input("09:59", &["A"], &["G"]),
        &params_with_window("01:00:00"),
    )?;

    assert_eq!(
        display(&paths, &data),
        vec!["A ~ L1 10:00 10:05 ~ B ~ Walk 2m ~ F ~ L2 10:20 10:30 ~ G [10:00 10:30 30m 1tx $3000]"]
    );
    assert_eq!(paths[0].number_of_transfers, 1);

    Ok(())
}

#[test]
fn test_routing_with_fallback_durations() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = TransitDataBuilder::default()
        .route("L1", &["A", "B", "C"], |r| {
            r.trip(&["10:00", "10:05", "10:10"])
        })
        .build()?;

    let request_input = RequestInput {
        datetime: SecondsSinceDayStart::from_hms(9, 50, 0),
        departures_stop_and_fallback_duration: vec![(
            "A".to_string(),
            PositiveDuration::from_hms(0, 5, 0),
        )],
        arrivals_stop_and_fallback_duration: vec![(
            "C".to_string(),
            PositiveDuration::from_hms(0, 2, 0),
        )],
    };
    let mut solver = Solver::new();
    let paths = solver.solve_request(&data, &request_input, &params_with_window("00:00:00"))?;

    assert_eq!(
        display(&paths, &data),
        vec!["Walk 5m ~ A ~ L1 10:00 10:10 ~ C ~ Walk 2m [09:55 10:12 17m 0tx $1620]"]
    );

    Ok(())
}

#[test]
fn test_no_journey_after_the_last_trip() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = TransitDataBuilder::default()
        .route("L1", &["A", "B"], |r| r.trip(&["10:00", "10:05"]))
        .build()?;

    let mut solver = Solver::new();
    let paths = solver.solve_request(
        &data,
        &make_input("11:00", &["A"], &["B"]),
        &params_with_window("00:10:00"),
    )?;
    assert!(paths.is_empty());

    Ok(())
}

#[test]
fn test_unknown_stop() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = TransitDataBuilder::default()
        .route("L1", &["A", "B"], |r| r.trip(&["10:00", "10:05"]))
        .build()?;

    let mut solver = Solver::new();
    let result = solver.solve_request(
        &data,
        &make_input("09:00", &["A"], &["Z"]),
        &params_with_window("01:00:00"),
    );
    assert!(result.is_err());

    Ok(())
}
