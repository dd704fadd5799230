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

use std::sync::Arc;
use std::time::Instant;

use anyhow::{format_err, Context, Error};
use chrono::NaiveDate;

use rangeraptor::engine::cost::{cost_of_seconds, CostCalculator};
use rangeraptor::engine::priority_group::PriorityGroup32n;
use rangeraptor::engine::relax::RelaxFunction;
use rangeraptor::engine::slack::SlackProvider;
use rangeraptor::request::{Optimization, RaptorRequestBuilder};
use rangeraptor::router::CompositeResult;
use rangeraptor::tracing::{debug, info};
use rangeraptor::transit_data::TransitMode;
use rangeraptor::{
    AccessEgress, CompositeRouter, Path, PositiveDuration, Profile, RangeRaptorRouter,
    RaptorRequest, RaptorRouter, SearchDirection, SecondsSinceDayStart, TransitData,
};

use crate::config::{AlternativeType, RequestParams};
use crate::datetime::{parse_datetime, seconds_since_day_start, BadDateTime};
use crate::timer;

/// What the user asks for : stops to start from and to reach, each with
/// the walking duration between the stop and the actual origin or destination.
#[derive(Debug, Clone)]
pub struct RequestInput {
    /// departure datetime for a `departure` search, arrival datetime
    /// for an `arrival` one
    pub datetime: SecondsSinceDayStart,
    pub departures_stop_and_fallback_duration: Vec<(String, PositiveDuration)>,
    pub arrivals_stop_and_fallback_duration: Vec<(String, PositiveDuration)>,
}

impl RequestInput {
    /// `datetime` is formatted like `20210101T083000` and is counted from
    /// the start of `service_day`.
    pub fn on_service_day(
        datetime: &str,
        service_day: NaiveDate,
        departures_stop_and_fallback_duration: Vec<(String, PositiveDuration)>,
        arrivals_stop_and_fallback_duration: Vec<(String, PositiveDuration)>,
    ) -> Result<Self, BadDateTime> {
        let datetime = parse_datetime(datetime)?;
        Ok(Self {
            datetime: seconds_since_day_start(&datetime, service_day)?,
            departures_stop_and_fallback_duration,
            arrivals_stop_and_fallback_duration,
        })
    }
}

/// Owns the routers, so that their memory is reused between requests.
#[derive(Debug, Default)]
pub struct Solver {
    router: RangeRaptorRouter,
    composite: CompositeRouter<RangeRaptorRouter, RangeRaptorRouter>,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solve_request(
        &mut self,
        data: &TransitData,
        request_input: &RequestInput,
        params: &RequestParams,
    ) -> Result<Vec<Path>, Error> {
        let request = main_request(data, request_input, params)?;
        debug!("Start computing journeys");
        let request_timer = Instant::now();
        let result = self
            .router
            .route(data, &request)
            .context("Multi-criteria search failed")?;
        info!(
            "Journeys computed in {} ms with {} rounds",
            timer::millis_since(request_timer),
            result.stats.nb_of_rounds
        );
        info!("Nb of journeys found : {}", result.paths.len());
        info!("Nb of arrivals : {}", result.stats.nb_of_arrivals);
        Ok(result.paths)
    }

    /// Runs the multi-criteria search along with the alternative search
    /// selected by `params.alternative`, and merges their journeys.
    pub fn solve_with_alternative(
        &mut self,
        data: &TransitData,
        request_input: &RequestInput,
        params: &RequestParams,
    ) -> Result<CompositeResult, Error> {
        let request = main_request(data, request_input, params)?;
        let alternative_request = alternative_request(data, request_input, params)?;
        debug!(
            "Start computing journeys with the {} alternative, parallel : {}",
            params.alternative,
            request.parallel()
        );
        let request_timer = Instant::now();
        let result = self
            .composite
            .route(data, &request, &alternative_request)
            .context("Composite search failed")?;
        info!(
            "Journeys computed in {} ms, main search in {} ms, alternative search in {} ms",
            timer::millis_since(request_timer),
            timer::format_millis(result.main_stats.elapsed),
            timer::format_millis(result.alternative_stats.elapsed)
        );
        info!("Nb of journeys found : {}", result.paths.len());
        Ok(result)
    }
}

pub fn main_request(
    data: &TransitData,
    request_input: &RequestInput,
    params: &RequestParams,
) -> Result<RaptorRequest, Error> {
    let mut builder = request_builder(data, request_input, params)?.profile(Profile::MultiCriteria);
    if params.relax_c1_ratio.is_some() || params.relax_c1_slack.is_some() {
        let relax_c1 = RelaxFunction::of_cost(
            params.relax_c1_ratio.unwrap_or(1.0),
            params.relax_c1_slack.unwrap_or(0),
        )?;
        builder = builder.relax_c1(relax_c1);
    }
    if params.use_priority_groups {
        builder = builder.priority_group_policy(Arc::new(PriorityGroup32n));
    }
    if params.destination_pruning {
        builder = builder.optimization(Optimization::DestinationPruning);
    }
    let request = builder.build()?;
    Ok(request)
}

pub fn alternative_request(
    data: &TransitData,
    request_input: &RequestInput,
    params: &RequestParams,
) -> Result<RaptorRequest, Error> {
    let builder = request_builder(data, request_input, params)?;
    let builder = match params.alternative {
        AlternativeType::Standard => builder.profile(Profile::Standard),
        AlternativeType::Reluctant => builder.profile(Profile::MultiCriteria).cost(
            cost_calculator(params).with_transit_reluctance(TransitMode::Bus, params.bus_reluctance),
        ),
    };
    let request = builder.build()?;
    Ok(request)
}

fn cost_calculator(params: &RequestParams) -> CostCalculator {
    CostCalculator::new(
        params.board_cost,
        params.transfer_cost,
        params.wait_reluctance,
    )
}

fn request_builder(
    data: &TransitData,
    request_input: &RequestInput,
    params: &RequestParams,
) -> Result<RaptorRequestBuilder, Error> {
    let direction = SearchDirection::from(params.search_direction);
    let mut builder = RaptorRequest::builder()
        .direction(direction)
        .search_window(params.search_window)
        .max_number_of_transfers(params.max_nb_of_transfers)
        .max_journey_duration(params.max_journey_duration)
        .cost(cost_calculator(params))
        .slack(SlackProvider::new(
            params.board_slack,
            params.alight_slack,
            params.transfer_slack,
        ))
        .parallel(params.parallel);
    builder = match direction {
        SearchDirection::Forward => builder.earliest_departure_time(request_input.datetime),
        SearchDirection::Reverse => builder.latest_arrival_time(request_input.datetime),
    };
    for (stop_name, duration) in &request_input.departures_stop_and_fallback_duration {
        builder = builder.access(fallback(data, stop_name, *duration)?);
    }
    for (stop_name, duration) in &request_input.arrivals_stop_and_fallback_duration {
        builder = builder.egress(fallback(data, stop_name, *duration)?);
    }
    Ok(builder)
}

fn fallback(
    data: &TransitData,
    stop_name: &str,
    duration: PositiveDuration,
) -> Result<AccessEgress, Error> {
    let stop = data
        .stop_by_name(stop_name)
        .ok_or_else(|| format_err!("The stop {} is not in the data", stop_name))?;
    let c1 = cost_of_seconds(duration.total_seconds());
    Ok(AccessEgress::new(stop, duration, c1))
}
