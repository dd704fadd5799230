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
use launch::logger::init_test_logger;
use launch::rangeraptor::{
    AccessEgress, PositiveDuration, Profile, RangeRaptorRouter, RaptorRequest, RaptorRouter,
    SearchDirection, SecondsSinceDayStart, TransitData,
};
use rstest::rstest;
use utils::{display, two_lines_to_f};

fn request(
    data: &TransitData,
    profile: Profile,
    direction: SearchDirection,
) -> Result<RaptorRequest, Error> {
    let stop = |name: &str| {
        data.stop_by_name(name)
            .ok_or_else(|| anyhow::format_err!("Unknown stop {}", name))
    };
    let builder = RaptorRequest::builder()
        .profile(profile)
        .direction(direction)
        .access(AccessEgress::free(stop("A")?))
        .access(AccessEgress::free(stop("C")?))
        .egress(AccessEgress::free(stop("F")?));
    let builder = match direction {
        SearchDirection::Forward => builder
            .earliest_departure_time(SecondsSinceDayStart::zero())
            .search_window(PositiveDuration::from_hms(0, 5, 0)),
        SearchDirection::Reverse => builder
            .latest_arrival_time(SecondsSinceDayStart::from_hms(0, 12, 0))
            .search_window(PositiveDuration::from_hms(0, 6, 0)),
    };
    Ok(builder.build()?)
}

#[rstest]
#[case(SearchDirection::Forward)]
#[case(SearchDirection::Reverse)]
fn test_standard_and_multicriteria_agree_on_times(
    #[case] direction: SearchDirection,
) -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = two_lines_to_f(0)?;
    let mut router = RangeRaptorRouter::new();

    let standard = router.route(&data, &request(&data, Profile::Standard, direction)?)?;
    let multi_criteria = router.route(&data, &request(&data, Profile::MultiCriteria, direction)?)?;

    assert_eq!(standard.paths.len(), 3);
    assert_eq!(
        display(&standard.paths, &data),
        display(&multi_criteria.paths, &data)
    );
    assert_eq!(standard.stats.nb_of_arrivals, 0);
    assert!(multi_criteria.stats.nb_of_arrivals > 0);

    Ok(())
}

#[test]
fn test_max_number_of_transfers() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = two_lines_to_f(0)?;
    let mut router = RangeRaptorRouter::new();

    for profile in [Profile::Standard, Profile::MultiCriteria].iter() {
        let request = RaptorRequest::builder()
            .profile(*profile)
            .earliest_departure_time(SecondsSinceDayStart::zero())
            .search_window(PositiveDuration::from_hms(0, 5, 0))
            .max_number_of_transfers(0)
            .access(AccessEgress::free(data.stop_by_name("A").unwrap()))
            .egress(AccessEgress::free(data.stop_by_name("F").unwrap()))
            .build()?;
        let result = router.route(&data, &request)?;
        assert!(result.paths.is_empty());
        assert_eq!(result.stats.nb_of_rounds, 1);
    }

    Ok(())
}
