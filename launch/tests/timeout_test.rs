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
use launch::rangeraptor::engine::cancel::CancellationToken;
use launch::rangeraptor::engine::priority_group::{PriorityGroup32n, PriorityGroupPolicy};
use launch::rangeraptor::router::CompositeRouter;
use launch::rangeraptor::{
    AccessEgress, Profile, RangeRaptorRouter, RaptorError, RaptorRequest, RaptorRouter,
    SecondsSinceDayStart, TransitData,
};
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use utils::two_lines_to_f;

fn request(
    data: &TransitData,
    profile: Profile,
    cancellation: CancellationToken,
    parallel: bool,
) -> Result<RaptorRequest, Error> {
    let stop = |name: &str| {
        data.stop_by_name(name)
            .ok_or_else(|| anyhow::format_err!("Unknown stop {}", name))
    };
    let request = RaptorRequest::builder()
        .profile(profile)
        .earliest_departure_time(SecondsSinceDayStart::zero())
        .access(AccessEgress::free(stop("A")?))
        .egress(AccessEgress::free(stop("F")?))
        .cancellation(cancellation)
        .parallel(parallel)
        .build()?;
    Ok(request)
}

#[rstest]
#[case(Profile::Standard)]
#[case(Profile::MultiCriteria)]
fn test_cancelled_search_fails(#[case] profile: Profile) -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = two_lines_to_f(0)?;
    let cancellation = CancellationToken::new();
    cancellation.cancel();
    let request = request(&data, profile, cancellation, false)?;

    let mut router = RangeRaptorRouter::new();
    let result = router.route(&data, &request);
    assert_eq!(
        result.unwrap_err(),
        RaptorError::Timeout {
            iteration: 0,
            round: 0
        }
    );

    Ok(())
}

#[test]
fn test_elapsed_deadline_fails() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = two_lines_to_f(0)?;
    let cancellation = CancellationToken::with_timeout(Duration::from_secs(0));
    let request = request(&data, Profile::MultiCriteria, cancellation, false)?;

    let mut router = RangeRaptorRouter::new();
    let result = router.route(&data, &request);
    assert!(matches!(result, Err(RaptorError::Timeout { .. })));

    Ok(())
}

#[test]
fn test_router_is_reusable_after_a_timeout() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = two_lines_to_f(0)?;
    let mut router = RangeRaptorRouter::new();

    let cancellation = CancellationToken::new();
    cancellation.cancel();
    let cancelled = request(&data, Profile::MultiCriteria, cancellation, false)?;
    assert!(router.route(&data, &cancelled).is_err());

    let request = request(&data, Profile::MultiCriteria, CancellationToken::new(), false)?;
    let result = router.route(&data, &request)?;
    assert!(!result.paths.is_empty());

    Ok(())
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_cancelled_composite_search_fails(#[case] parallel: bool) -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = two_lines_to_f(0)?;
    let cancellation = CancellationToken::new();
    cancellation.cancel();
    let main = request(&data, Profile::MultiCriteria, cancellation.clone(), parallel)?;
    let alternative = request(&data, Profile::Standard, cancellation, parallel)?;

    let mut router = CompositeRouter::new(RangeRaptorRouter::new(), RangeRaptorRouter::new());
    let result = router.route(&data, &main, &alternative);
    assert!(matches!(result, Err(RaptorError::Timeout { .. })));

    Ok(())
}

// cancels its token the first time a trip is boarded
#[derive(Debug)]
struct CancelOnBoarding {
    cancellation: CancellationToken,
}

impl PriorityGroupPolicy for CancelOnBoarding {
    fn group_id(&self, group_index: usize) -> u32 {
        PriorityGroup32n.group_id(group_index)
    }

    fn max_group_index(&self) -> usize {
        PriorityGroup32n.max_group_index()
    }

    fn merge(&self, left: u32, right: u32) -> u32 {
        self.cancellation.cancel();
        PriorityGroup32n.merge(left, right)
    }

    fn dominate(&self, left: u32, right: u32) -> bool {
        PriorityGroup32n.dominate(left, right)
    }
}

fn cancelled_on_boarding(data: &TransitData, parallel: bool) -> Result<RaptorRequest, Error> {
    let cancellation = CancellationToken::new();
    let policy = CancelOnBoarding {
        cancellation: cancellation.clone(),
    };
    let stop = |name: &str| {
        data.stop_by_name(name)
            .ok_or_else(|| anyhow::format_err!("Unknown stop {}", name))
    };
    let request = RaptorRequest::builder()
        .profile(Profile::MultiCriteria)
        .earliest_departure_time(SecondsSinceDayStart::zero())
        .access(AccessEgress::free(stop("A")?))
        .egress(AccessEgress::free(stop("F")?))
        .priority_group_policy(Arc::new(policy))
        .cancellation(cancellation)
        .parallel(parallel)
        .build()?;
    Ok(request)
}

#[test]
fn test_search_cancelled_during_a_round_fails() -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = two_lines_to_f(0)?;
    let request = cancelled_on_boarding(&data, false)?;

    let mut router = RangeRaptorRouter::new();
    let result = router.route(&data, &request);
    // the first boarding happens in round 1 of the iteration leaving at 00:03,
    // the next check is at the start of round 2
    assert_eq!(
        result.unwrap_err(),
        RaptorError::Timeout {
            iteration: 56,
            round: 2
        }
    );

    Ok(())
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_composite_search_cancelled_during_a_round_fails(
    #[case] parallel: bool,
) -> Result<(), Error> {
    let _log_guard = init_test_logger();

    let data = two_lines_to_f(0)?;
    let main = cancelled_on_boarding(&data, parallel)?;
    let alternative = request(&data, Profile::Standard, CancellationToken::new(), parallel)?;

    let mut router = CompositeRouter::new(RangeRaptorRouter::new(), RangeRaptorRouter::new());
    let result = router.route(&data, &main, &alternative);
    assert!(matches!(
        result,
        Err(RaptorError::Timeout { round, .. }) if round > 0
    ));

    Ok(())
}
