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

use crate::engine::multicriteria::{McCriteria, McWorker};
use crate::engine::path::{sort_paths, Path, PathSource};
use crate::engine::standard::{destination_heuristics, StdMode, StdWorker};
use crate::engine::time_calculator::{ForwardCalculator, ReverseCalculator, TimeCalculator};
use crate::engine::SearchContext;
use crate::error::{ConfigurationError, RaptorError};
use crate::request::{Optimization, Profile, RaptorRequest, SearchDirection};
use crate::transit_data::TransitData;
use std::any::Any;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Runs searches on a transit data view.
///
/// A router owns the mutable state of its searches : it may be reused
/// for several requests but must not be shared between threads while a
/// search runs.
pub trait RaptorRouter: Send {
    fn route(
        &mut self,
        data: &TransitData,
        request: &RaptorRequest,
    ) -> Result<RouterResult, RaptorError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub nb_of_iterations: usize,
    pub nb_of_rounds: usize,
    pub nb_of_arrivals: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct RouterResult {
    pub paths: Vec<Path>,
    pub stats: RouterStats,
}

/// Range-RAPTOR router, running the worker selected by the profile
/// and the direction of each request.
#[derive(Debug, Default)]
pub struct RangeRaptorRouter {
    standard_worker: StdWorker,
    heuristic_worker: StdWorker,
    multicriteria_worker: McWorker,
}

impl RangeRaptorRouter {
    pub fn new() -> Self {
        Self::default()
    }

    fn run<C: TimeCalculator>(
        &mut self,
        calculator: C,
        data: &TransitData,
        request: &RaptorRequest,
    ) -> Result<RouterResult, RaptorError> {
        let start = Instant::now();
        let ctx = SearchContext::new(
            calculator,
            data,
            request.search_access_paths(),
            request.search_egress_paths(),
            *request.slack(),
            *request.cost(),
            request.search_params().nb_of_rounds(),
            request.cancellation(),
        );
        let (paths, mut stats) = match request.profile() {
            Profile::Standard => {
                let outcome = self.standard_worker.route(&ctx, StdMode::Regular)?;
                let stats = RouterStats {
                    nb_of_iterations: outcome.nb_of_iterations,
                    nb_of_rounds: outcome.nb_of_rounds,
                    ..RouterStats::default()
                };
                (outcome.paths, stats)
            }
            Profile::MultiCriteria => {
                let heuristics = if request.use_optimization(Optimization::DestinationPruning) {
                    Some(destination_heuristics(
                        &mut self.heuristic_worker,
                        data,
                        request,
                    )?)
                } else {
                    None
                };
                let multi_criteria = request.multi_criteria();
                let criteria = McCriteria {
                    relax_c1: multi_criteria.relax_c1,
                    policy: multi_criteria.priority_group_policy.as_deref(),
                    heuristics: heuristics.as_ref(),
                };
                let outcome = self.multicriteria_worker.route(&ctx, criteria)?;
                let stats = RouterStats {
                    nb_of_iterations: outcome.nb_of_iterations,
                    nb_of_rounds: outcome.nb_of_rounds,
                    nb_of_arrivals: outcome.nb_of_arrivals,
                    ..RouterStats::default()
                };
                (outcome.paths, stats)
            }
        };
        stats.elapsed = start.elapsed();
        debug!(
            "{:?} search done in {} ms : {} iterations, {} rounds, {} arrivals, {} paths",
            request.profile(),
            stats.elapsed.as_millis(),
            stats.nb_of_iterations,
            stats.nb_of_rounds,
            stats.nb_of_arrivals,
            paths.len()
        );
        Ok(RouterResult { paths, stats })
    }
}

impl RaptorRouter for RangeRaptorRouter {
    fn route(
        &mut self,
        data: &TransitData,
        request: &RaptorRequest,
    ) -> Result<RouterResult, RaptorError> {
        request.validate(data)?;
        let params = request.search_params();
        let search_window = params.search_window().signed_seconds().ok_or(
            ConfigurationError::DurationOutOfRange {
                what: "search window",
                duration: params.search_window(),
            },
        )?;
        match request.direction() {
            SearchDirection::Forward => {
                let earliest_departure_time = params
                    .earliest_departure_time()
                    .ok_or(ConfigurationError::MissingEarliestDepartureTime)?;
                debug!(
                    "Forward search from {} in a window of {}",
                    earliest_departure_time,
                    params.search_window()
                );
                let calculator = ForwardCalculator::new(
                    earliest_departure_time.seconds(),
                    search_window,
                    Some(request.latest_acceptable_arrival_time()),
                );
                self.run(calculator, data, request)
            }
            SearchDirection::Reverse => {
                let latest_arrival_time = params
                    .latest_arrival_time()
                    .ok_or(ConfigurationError::MissingLatestArrivalTime)?;
                debug!(
                    "Reverse search from {} in a window of {}",
                    latest_arrival_time,
                    params.search_window()
                );
                let calculator = ReverseCalculator::new(
                    latest_arrival_time.seconds(),
                    search_window,
                    Some(request.earliest_acceptable_departure_time()),
                );
                self.run(calculator, data, request)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompositeResult {
    /// Paths of both searches, sorted, without duplicates.
    pub paths: Vec<Path>,
    pub main_stats: RouterStats,
    pub alternative_stats: RouterStats,
}

/// Runs a main and an alternative search on the same data and merges
/// their paths.
///
/// With `parallel()` set on the main request, each search runs in its
/// own thread. The merged result does not depend on it.
#[derive(Debug, Default)]
pub struct CompositeRouter<M, A> {
    main: M,
    alternative: A,
}

impl<M: RaptorRouter, A: RaptorRouter> CompositeRouter<M, A> {
    pub fn new(main: M, alternative: A) -> Self {
        Self { main, alternative }
    }

    pub fn route(
        &mut self,
        data: &TransitData,
        main_request: &RaptorRequest,
        alternative_request: &RaptorRequest,
    ) -> Result<CompositeResult, RaptorError> {
        let (main, alternative) = if main_request.parallel() {
            let main_router = &mut self.main;
            let alternative_router = &mut self.alternative;
            thread::scope(|scope| -> Result<(RouterResult, RouterResult), RaptorError> {
                let main = thread::Builder::new()
                    .name("raptor-main".to_string())
                    .spawn_scoped(scope, move || main_router.route(data, main_request))
                    .map_err(|err| RaptorError::WorkerFailed(err.to_string()))?;
                let alternative = thread::Builder::new()
                    .name("raptor-alternative".to_string())
                    .spawn_scoped(scope, move || {
                        alternative_router.route(data, alternative_request)
                    })
                    .map_err(|err| RaptorError::WorkerFailed(err.to_string()))?;
                let main = main.join().map_err(|panic| worker_failed("main", panic));
                let alternative = alternative
                    .join()
                    .map_err(|panic| worker_failed("alternative", panic));
                Ok((main??, alternative??))
            })?
        } else {
            let main = self.main.route(data, main_request)?;
            let alternative = self.alternative.route(data, alternative_request)?;
            (main, alternative)
        };

        let paths = merge_paths(main.paths, alternative.paths);
        info!(
            "Composite search done : {} paths, {} ms for the main search, {} ms for the alternative one",
            paths.len(),
            main.stats.elapsed.as_millis(),
            alternative.stats.elapsed.as_millis()
        );
        Ok(CompositeResult {
            paths,
            main_stats: main.stats,
            alternative_stats: alternative.stats,
        })
    }
}

fn worker_failed(name: &str, panic: Box<dyn Any + Send>) -> RaptorError {
    let message = if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    };
    RaptorError::WorkerFailed(format!("{} worker panicked : {}", name, message))
}

fn merge_paths(main: Vec<Path>, alternative: Vec<Path>) -> Vec<Path> {
    let mut paths: Vec<Path> = main
        .into_iter()
        .map(|path| Path {
            source: PathSource::Main,
            ..path
        })
        .collect();
    for path in alternative {
        if paths.iter().all(|kept| kept.legs != path.legs) {
            paths.push(Path {
                source: PathSource::Alternative,
                ..path
            });
        }
    }
    sort_paths(&mut paths);
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::AccessEgress;
    use crate::time::{PositiveDuration, SecondsSinceDayStart};
    use crate::transit_data::builder::TransitDataBuilder;

    struct Failing;

    impl RaptorRouter for Failing {
        fn route(
            &mut self,
            _data: &TransitData,
            _request: &RaptorRequest,
        ) -> Result<RouterResult, RaptorError> {
            panic!("no route today")
        }
    }

    fn data() -> TransitData {
        TransitDataBuilder::new()
            .route("L1", &["A", "B"], |route| {
                route.trip(&["10:00", "10:10"]).trip(&["10:20", "10:30"])
            })
            .route("L2", &["A", "C", "B"], |route| route.trip(&["10:05", "10:15", "10:40"]))
            .build()
            .unwrap()
    }

    fn request(data: &TransitData, profile: Profile, parallel: bool) -> RaptorRequest {
        let stop = |name: &str| data.stop_by_name(name).unwrap();
        RaptorRequest::builder()
            .profile(profile)
            .earliest_departure_time(SecondsSinceDayStart::from_hms(10, 0, 0))
            .access(AccessEgress::free(stop("A")))
            .egress(AccessEgress::free(stop("B")))
            .parallel(parallel)
            .build()
            .unwrap()
    }

    #[test]
    fn router_is_reusable() {
        let data = data();
        let mut router = RangeRaptorRouter::new();
        let request = request(&data, Profile::MultiCriteria, false);
        let first = router.route(&data, &request).unwrap();
        let second = router.route(&data, &request).unwrap();
        assert_eq!(first.paths, second.paths);
        assert_eq!(first.paths.len(), 2);
    }

    #[test]
    fn invalid_request_is_rejected() {
        let data = data();
        let request = RaptorRequest::builder()
            .earliest_departure_time(SecondsSinceDayStart::from_hms(10, 0, 0))
            .access(AccessEgress::free(crate::transit_data::Stop::new(42)))
            .egress(AccessEgress::free(crate::transit_data::Stop::new(0)))
            .build()
            .unwrap();
        let result = RangeRaptorRouter::new().route(&data, &request);
        assert!(matches!(
            result,
            Err(RaptorError::Configuration(
                ConfigurationError::StopOutOfRange { stop: 42, .. }
            ))
        ));
    }

    #[test]
    fn duplicated_paths_are_merged() {
        let data = data();
        let mut composite = CompositeRouter::new(RangeRaptorRouter::new(), RangeRaptorRouter::new());
        let main_request = request(&data, Profile::MultiCriteria, false);
        let alternative_request = request(&data, Profile::Standard, false);
        let result = composite
            .route(&data, &main_request, &alternative_request)
            .unwrap();
        assert_eq!(result.paths.len(), 2);
        assert!(result
            .paths
            .iter()
            .all(|path| path.source == PathSource::Main));
    }

    #[test]
    fn arrivals_without_enough_rounds_left_are_pruned() {
        // A -> B -> C with two rides, or A -> C directly with a slower one
        let data = TransitDataBuilder::new()
            .route("L1", &["A", "B"], |route| route.trip(&["10:00", "10:10"]))
            .route("L2", &["B", "C"], |route| route.trip(&["10:20", "10:30"]))
            .route("L3", &["A", "C"], |route| route.trip(&["10:00", "11:00"]))
            .build()
            .unwrap();
        let stop = |name: &str| data.stop_by_name(name).unwrap();
        let route = |max_number_of_transfers: usize, pruning: bool| {
            let mut builder = RaptorRequest::builder()
                .earliest_departure_time(SecondsSinceDayStart::from_hms(10, 0, 0))
                .search_window(PositiveDuration::zero())
                .max_number_of_transfers(max_number_of_transfers)
                .access(AccessEgress::free(stop("A")))
                .egress(AccessEgress::free(stop("C")));
            if pruning {
                builder = builder.optimization(Optimization::DestinationPruning);
            }
            RangeRaptorRouter::new()
                .route(&data, &builder.build().unwrap())
                .unwrap()
        };

        // without transfers, the arrival at B can not reach C
        let full = route(0, false);
        let pruned = route(0, true);
        assert_eq!(full.paths, pruned.paths);
        assert_eq!(full.paths.len(), 1);
        assert_eq!(full.stats.nb_of_arrivals, 3);
        assert_eq!(pruned.stats.nb_of_arrivals, 2);

        let full = route(1, false);
        let pruned = route(1, true);
        assert_eq!(full.paths, pruned.paths);
        assert_eq!(full.paths.len(), 2);
        assert_eq!(pruned.stats.nb_of_arrivals, 4);
    }

    #[test]
    fn panicking_worker_fails_the_query() {
        let data = data();
        let mut composite = CompositeRouter::new(RangeRaptorRouter::new(), Failing);
        let main_request = request(&data, Profile::MultiCriteria, true);
        let result = composite.route(&data, &main_request, &main_request);
        match result {
            Err(RaptorError::WorkerFailed(message)) => {
                assert!(message.contains("no route today"), "{}", message)
            }
            other => panic!("unexpected result {:?}", other.map(|result| result.paths)),
        }
    }
}
