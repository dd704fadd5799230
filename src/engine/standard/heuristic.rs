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

use super::worker::{StdMode, StdWorker};
use super::UNREACHED;
use crate::engine::slack::SlackProvider;
use crate::engine::time_calculator::{ForwardCalculator, ReverseCalculator, TimeCalculator};
use crate::engine::SearchContext;
use crate::error::RaptorError;
use crate::request::{RaptorRequest, SearchDirection};
use crate::transit_data::{Stop, TransitData};
use tracing::debug;

/// Lower bounds computed by a standard search run from the destination
/// of the main search, on heuristic trips and without slack.
#[derive(Debug, Clone)]
pub struct Heuristics {
    best_durations: Vec<i32>,
    min_rounds: Vec<usize>,
}

impl Heuristics {
    fn from_worker<C: TimeCalculator>(worker: &StdWorker, calculator: &C, nb_of_stops: usize) -> Self {
        let mut best_durations = Vec::with_capacity(nb_of_stops);
        let mut min_rounds = Vec::with_capacity(nb_of_stops);
        for idx in 0..nb_of_stops {
            match worker.arena().overall_best(Stop::new(idx)) {
                Some((time, round)) => {
                    best_durations.push(calculator.duration(0, time));
                    min_rounds.push(round);
                }
                None => {
                    best_durations.push(UNREACHED);
                    min_rounds.push(usize::MAX);
                }
            }
        }
        Self {
            best_durations,
            min_rounds,
        }
    }

    pub fn nb_of_stops(&self) -> usize {
        self.best_durations.len()
    }

    pub fn is_reachable(&self, stop: Stop) -> bool {
        self.best_durations[stop.idx()] != UNREACHED
    }

    /// Shortest duration between `stop` and the destination of the main
    /// search, or `UNREACHED`.
    pub fn best_duration(&self, stop: Stop) -> i32 {
        self.best_durations[stop.idx()]
    }

    /// Least number of rides between `stop` and the destination of the main
    /// search, ignoring the time of the rides.
    pub fn min_number_of_rides(&self, stop: Stop) -> Option<usize> {
        match self.min_rounds[stop.idx()] {
            usize::MAX => None,
            round => Some(round),
        }
    }

    pub fn best_overall_duration(&self) -> Option<i32> {
        self.best_durations
            .iter()
            .copied()
            .filter(|duration| *duration != UNREACHED)
            .min()
    }
}

/// Runs the heuristic search in the direction opposite to the one of
/// `request`, seeded from its egress paths.
pub(crate) fn destination_heuristics(
    worker: &mut StdWorker,
    data: &TransitData,
    request: &RaptorRequest,
) -> Result<Heuristics, RaptorError> {
    let max_duration = request.search_params().max_journey_duration().saturating_seconds();
    let no_slack = SlackProvider::without_slack();
    let nb_of_rounds = request.search_params().nb_of_rounds();
    let seeds = request.search_egress_paths();
    let heuristics = match request.direction() {
        SearchDirection::Forward => {
            let calculator = ReverseCalculator::new(0, 0, Some(-max_duration));
            let ctx = SearchContext::new(
                calculator,
                data,
                seeds,
                &[],
                no_slack,
                *request.cost(),
                nb_of_rounds,
                request.cancellation(),
            );
            worker.route(&ctx, StdMode::Heuristic)?;
            Heuristics::from_worker(worker, &ctx.calculator, data.nb_of_stops())
        }
        SearchDirection::Reverse => {
            let calculator = ForwardCalculator::new(0, 0, Some(max_duration));
            let ctx = SearchContext::new(
                calculator,
                data,
                seeds,
                &[],
                no_slack,
                *request.cost(),
                nb_of_rounds,
                request.cancellation(),
            );
            worker.route(&ctx, StdMode::Heuristic)?;
            Heuristics::from_worker(worker, &ctx.calculator, data.nb_of_stops())
        }
    };
    debug!(
        "Heuristics computed, best overall duration {:?}",
        heuristics.best_overall_duration()
    );
    Ok(heuristics)
}
