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

pub mod cancel;
pub mod cost;
pub mod multicriteria;
pub mod pareto_set;
pub mod path;
pub mod priority_group;
pub mod relax;
pub mod slack;
pub mod standard;
pub mod time_calculator;
pub mod trip_search;

use crate::engine::cancel::CancellationToken;
use crate::engine::cost::CostCalculator;
use crate::engine::slack::SlackProvider;
use crate::engine::time_calculator::TimeCalculator;
use crate::error::RaptorError;
use crate::request::AccessEgress;
use crate::transit_data::{Stop, TransitData};

/// What a worker needs to run a search, with paths already oriented
/// in the direction of the search.
pub(crate) struct SearchContext<'a, C: TimeCalculator> {
    pub calculator: C,
    pub data: &'a TransitData,
    pub access_paths: &'a [AccessEgress],
    pub egress_by_stop: Vec<Vec<AccessEgress>>,
    pub slack: SlackProvider,
    pub cost: CostCalculator,
    pub nb_of_rounds: usize,
    pub cancellation: &'a CancellationToken,
}

impl<'a, C: TimeCalculator> SearchContext<'a, C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        calculator: C,
        data: &'a TransitData,
        access_paths: &'a [AccessEgress],
        egress_paths: &[AccessEgress],
        slack: SlackProvider,
        cost: CostCalculator,
        nb_of_rounds: usize,
        cancellation: &'a CancellationToken,
    ) -> Self {
        let mut egress_by_stop = vec![Vec::new(); data.nb_of_stops()];
        for egress in egress_paths {
            egress_by_stop[egress.stop.idx()].push(*egress);
        }
        Self {
            calculator,
            data,
            access_paths,
            egress_by_stop,
            slack,
            cost,
            nb_of_rounds,
            cancellation,
        }
    }

    pub fn egress_paths(&self, stop: Stop) -> &[AccessEgress] {
        &self.egress_by_stop[stop.idx()]
    }

    pub fn has_egress(&self, stop: Stop) -> bool {
        !self.egress_by_stop[stop.idx()].is_empty()
    }

    pub fn check_cancelled(&self, iteration: usize, round: usize) -> Result<(), RaptorError> {
        if self.cancellation.is_cancelled() {
            return Err(RaptorError::Timeout { iteration, round });
        }
        Ok(())
    }
}

/// A set of indexes below a fixed bound, cleared in time proportional
/// to its length.
#[derive(Debug, Clone, Default)]
pub(crate) struct IndexSet {
    contains: Vec<bool>,
    indexes: Vec<usize>,
}

impl IndexSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            contains: vec![false; capacity],
            indexes: Vec::new(),
        }
    }

    pub fn resize(&mut self, capacity: usize) {
        self.clear();
        self.contains.resize(capacity, false);
    }

    pub fn insert(&mut self, index: usize) -> bool {
        if self.contains[index] {
            return false;
        }
        self.contains[index] = true;
        self.indexes.push(index);
        true
    }

    pub fn contains(&self, index: usize) -> bool {
        self.contains[index]
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn clear(&mut self) {
        for index in self.indexes.drain(..) {
            self.contains[index] = false;
        }
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    pub fn sort(&mut self) {
        self.indexes.sort_unstable();
    }
}
