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

use crate::engine::cancel::CancellationToken;
use crate::engine::cost::CostCalculator;
use crate::engine::priority_group::PriorityGroupPolicy;
use crate::engine::relax::RelaxFunction;
use crate::engine::slack::SlackProvider;
use crate::error::ConfigurationError;
use crate::time::{PositiveDuration, SecondsSinceDayStart};
use crate::transit_data::{Stop, TransitData};
use std::sync::Arc;

/// A walk between the origin (or the destination) and a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessEgress {
    pub stop: Stop,
    pub duration: PositiveDuration,
    pub c1: i32,
}

impl AccessEgress {
    pub fn new(stop: Stop, duration: PositiveDuration, c1: i32) -> Self {
        Self { stop, duration, c1 }
    }

    /// Zero duration and zero cost.
    pub fn free(stop: Stop) -> Self {
        Self::new(stop, PositiveDuration::zero(), 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Depart after the earliest departure time.
    Forward,
    /// Arrive before the latest arrival time.
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Best arrival time for each number of transfers.
    Standard,
    /// Pareto optimal paths on departure, arrival, transfers and cost.
    MultiCriteria,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optimization {
    /// Discard the arrivals that can not reach the destination within the
    /// time limit, using lower bounds computed by a heuristic search.
    DestinationPruning,
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    earliest_departure_time: Option<SecondsSinceDayStart>,
    latest_arrival_time: Option<SecondsSinceDayStart>,
    search_window: PositiveDuration,
    max_number_of_transfers: usize,
    max_journey_duration: PositiveDuration,
    access_paths: Vec<AccessEgress>,
    egress_paths: Vec<AccessEgress>,
}

#[derive(Debug, Clone, Default)]
pub struct MultiCriteriaParams {
    pub relax_c1: RelaxFunction,
    pub priority_group_policy: Option<Arc<dyn PriorityGroupPolicy>>,
}

/// Everything a router needs to run one search.
#[derive(Debug, Clone)]
pub struct RaptorRequest {
    profile: Profile,
    direction: SearchDirection,
    search_params: SearchParams,
    slack: SlackProvider,
    cost: CostCalculator,
    multi_criteria: MultiCriteriaParams,
    optimizations: Vec<Optimization>,
    parallel: bool,
    cancellation: CancellationToken,
    latest_acceptable_arrival_time: i32,
    earliest_acceptable_departure_time: i32,
}

impl SearchParams {
    pub fn earliest_departure_time(&self) -> Option<SecondsSinceDayStart> {
        self.earliest_departure_time
    }

    pub fn latest_arrival_time(&self) -> Option<SecondsSinceDayStart> {
        self.latest_arrival_time
    }

    pub fn search_window(&self) -> PositiveDuration {
        self.search_window
    }

    pub fn max_number_of_transfers(&self) -> usize {
        self.max_number_of_transfers
    }

    pub fn max_journey_duration(&self) -> PositiveDuration {
        self.max_journey_duration
    }

    pub fn access_paths(&self) -> &[AccessEgress] {
        &self.access_paths
    }

    pub fn egress_paths(&self) -> &[AccessEgress] {
        &self.egress_paths
    }

    /// Number of rounds of the search, the access round included.
    pub fn nb_of_rounds(&self) -> usize {
        self.max_number_of_transfers + 2
    }
}

impl RaptorRequest {
    pub fn builder() -> RaptorRequestBuilder {
        RaptorRequestBuilder::default()
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn direction(&self) -> SearchDirection {
        self.direction
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.search_params
    }

    pub fn slack(&self) -> &SlackProvider {
        &self.slack
    }

    pub fn cost(&self) -> &CostCalculator {
        &self.cost
    }

    pub fn multi_criteria(&self) -> &MultiCriteriaParams {
        &self.multi_criteria
    }

    pub fn optimizations(&self) -> &[Optimization] {
        &self.optimizations
    }

    pub fn use_optimization(&self, optimization: Optimization) -> bool {
        self.optimizations.contains(&optimization)
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// The access paths in the direction of the search :
    /// the egress paths of a reverse search are its starting points.
    pub fn search_access_paths(&self) -> &[AccessEgress] {
        match self.direction {
            SearchDirection::Forward => &self.search_params.access_paths,
            SearchDirection::Reverse => &self.search_params.egress_paths,
        }
    }

    pub fn search_egress_paths(&self) -> &[AccessEgress] {
        match self.direction {
            SearchDirection::Forward => &self.search_params.egress_paths,
            SearchDirection::Reverse => &self.search_params.access_paths,
        }
    }

    /// Latest arrival accepted by a forward search.
    pub fn latest_acceptable_arrival_time(&self) -> i32 {
        self.latest_acceptable_arrival_time
    }

    /// Earliest departure accepted by a reverse search.
    pub fn earliest_acceptable_departure_time(&self) -> i32 {
        self.earliest_acceptable_departure_time
    }

    /// Checks the request against the transit data it will run on.
    pub fn validate(&self, data: &TransitData) -> Result<(), ConfigurationError> {
        let nb_of_stops = data.nb_of_stops();
        let paths = self
            .search_params
            .access_paths
            .iter()
            .chain(self.search_params.egress_paths.iter());
        for path in paths {
            if path.stop.idx() >= nb_of_stops {
                return Err(ConfigurationError::StopOutOfRange {
                    stop: path.stop.idx(),
                    nb_of_stops,
                });
            }
        }
        if let Some(policy) = &self.multi_criteria.priority_group_policy {
            if data.max_priority_group() > policy.max_group_index() {
                return Err(ConfigurationError::InvalidPriorityGroup {
                    group: data.max_priority_group(),
                    max: policy.max_group_index(),
                });
            }
        }
        Ok(())
    }
}

/// Builder of a `RaptorRequest`, checking its consistency in `build()`.
#[derive(Debug, Clone)]
pub struct RaptorRequestBuilder {
    profile: Profile,
    direction: SearchDirection,
    earliest_departure_time: Option<SecondsSinceDayStart>,
    latest_arrival_time: Option<SecondsSinceDayStart>,
    search_window: PositiveDuration,
    max_number_of_transfers: usize,
    max_journey_duration: PositiveDuration,
    access_paths: Vec<AccessEgress>,
    egress_paths: Vec<AccessEgress>,
    slack: SlackProvider,
    cost: CostCalculator,
    multi_criteria: MultiCriteriaParams,
    optimizations: Vec<Optimization>,
    parallel: bool,
    cancellation: CancellationToken,
}

pub const DEFAULT_MAX_NUMBER_OF_TRANSFERS: usize = 12;
pub const DEFAULT_SEARCH_WINDOW: PositiveDuration = PositiveDuration::from_hms(1, 0, 0);
pub const DEFAULT_MAX_JOURNEY_DURATION: PositiveDuration = PositiveDuration::from_hms(24, 0, 0);

impl Default for RaptorRequestBuilder {
    fn default() -> Self {
        Self {
            profile: Profile::MultiCriteria,
            direction: SearchDirection::Forward,
            earliest_departure_time: None,
            latest_arrival_time: None,
            search_window: DEFAULT_SEARCH_WINDOW,
            max_number_of_transfers: DEFAULT_MAX_NUMBER_OF_TRANSFERS,
            max_journey_duration: DEFAULT_MAX_JOURNEY_DURATION,
            access_paths: Vec::new(),
            egress_paths: Vec::new(),
            slack: SlackProvider::default(),
            cost: CostCalculator::default(),
            multi_criteria: MultiCriteriaParams::default(),
            optimizations: Vec::new(),
            parallel: false,
            cancellation: CancellationToken::default(),
        }
    }
}

impl RaptorRequestBuilder {
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn direction(mut self, direction: SearchDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn earliest_departure_time(mut self, time: SecondsSinceDayStart) -> Self {
        self.earliest_departure_time = Some(time);
        self
    }

    pub fn latest_arrival_time(mut self, time: SecondsSinceDayStart) -> Self {
        self.latest_arrival_time = Some(time);
        self
    }

    pub fn search_window(mut self, search_window: PositiveDuration) -> Self {
        self.search_window = search_window;
        self
    }

    pub fn max_number_of_transfers(mut self, max_number_of_transfers: usize) -> Self {
        self.max_number_of_transfers = max_number_of_transfers;
        self
    }

    pub fn max_journey_duration(mut self, max_journey_duration: PositiveDuration) -> Self {
        self.max_journey_duration = max_journey_duration;
        self
    }

    pub fn access(mut self, access: AccessEgress) -> Self {
        self.access_paths.push(access);
        self
    }

    pub fn egress(mut self, egress: AccessEgress) -> Self {
        self.egress_paths.push(egress);
        self
    }

    pub fn slack(mut self, slack: SlackProvider) -> Self {
        self.slack = slack;
        self
    }

    pub fn cost(mut self, cost: CostCalculator) -> Self {
        self.cost = cost;
        self
    }

    pub fn relax_c1(mut self, relax_c1: RelaxFunction) -> Self {
        self.multi_criteria.relax_c1 = relax_c1;
        self
    }

    pub fn priority_group_policy(mut self, policy: Arc<dyn PriorityGroupPolicy>) -> Self {
        self.multi_criteria.priority_group_policy = Some(policy);
        self
    }

    pub fn optimization(mut self, optimization: Optimization) -> Self {
        if !self.optimizations.contains(&optimization) {
            self.optimizations.push(optimization);
        }
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn build(self) -> Result<RaptorRequest, ConfigurationError> {
        match self.direction {
            SearchDirection::Forward if self.earliest_departure_time.is_none() => {
                return Err(ConfigurationError::MissingEarliestDepartureTime);
            }
            SearchDirection::Reverse if self.latest_arrival_time.is_none() => {
                return Err(ConfigurationError::MissingLatestArrivalTime);
            }
            _ => (),
        }
        if self.access_paths.is_empty() {
            return Err(ConfigurationError::NoAccessPaths);
        }
        if self.egress_paths.is_empty() {
            return Err(ConfigurationError::NoEgressPaths);
        }
        check_duration("search window", self.search_window)?;
        check_duration("max journey duration", self.max_journey_duration)?;
        for path in self.access_paths.iter().chain(self.egress_paths.iter()) {
            check_duration("access or egress duration", path.duration)?;
        }
        let latest_acceptable_arrival_time =
            match (self.latest_arrival_time, self.earliest_departure_time) {
                (Some(latest_arrival_time), _) => Some(latest_arrival_time),
                (None, Some(earliest_departure_time)) => earliest_departure_time
                    .checked_add(self.search_window)
                    .and_then(|time| time.checked_add(self.max_journey_duration)),
                (None, None) => None,
            }
            .ok_or(ConfigurationError::TimeLimitOutOfRange)?;
        let earliest_acceptable_departure_time =
            match (self.earliest_departure_time, self.latest_arrival_time) {
                (Some(earliest_departure_time), _) => Some(earliest_departure_time),
                (None, Some(latest_arrival_time)) => latest_arrival_time
                    .checked_sub(self.search_window)
                    .and_then(|time| time.checked_sub(self.max_journey_duration)),
                (None, None) => None,
            }
            .ok_or(ConfigurationError::TimeLimitOutOfRange)?;
        Ok(RaptorRequest {
            profile: self.profile,
            direction: self.direction,
            search_params: SearchParams {
                earliest_departure_time: self.earliest_departure_time,
                latest_arrival_time: self.latest_arrival_time,
                search_window: self.search_window,
                max_number_of_transfers: self.max_number_of_transfers,
                max_journey_duration: self.max_journey_duration,
                access_paths: self.access_paths,
                egress_paths: self.egress_paths,
            },
            slack: self.slack,
            cost: self.cost,
            multi_criteria: self.multi_criteria,
            optimizations: self.optimizations,
            parallel: self.parallel,
            cancellation: self.cancellation,
            latest_acceptable_arrival_time: latest_acceptable_arrival_time.seconds(),
            earliest_acceptable_departure_time: earliest_acceptable_departure_time.seconds(),
        })
    }
}

fn check_duration(what: &'static str, duration: PositiveDuration) -> Result<(), ConfigurationError> {
    match duration.signed_seconds() {
        Some(_) => Ok(()),
        None => Err(ConfigurationError::DurationOutOfRange { what, duration }),
    }
}
