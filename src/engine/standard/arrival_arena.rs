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

use crate::request::AccessEgress;
use crate::time::PositiveDuration;
use crate::transit_data::{Pattern, Stop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StdArrivalKind {
    Access {
        access: AccessEgress,
    },
    Transit {
        pattern: Pattern,
        trip_index: usize,
        board_stop: Stop,
        board_position: usize,
        alight_position: usize,
        constrained: bool,
    },
    Transfer {
        from: Stop,
        duration: PositiveDuration,
        c1: i32,
    },
    /// A ride on a heuristic trip, no path is built from it.
    Heuristic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StdStopArrival {
    pub time: i32,
    pub kind: StdArrivalKind,
}

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    generation: u32,
    best: Option<StdStopArrival>,
    transit: Option<StdStopArrival>,
}

/// Best arrivals indexed by (round, stop).
///
/// Each cell keeps the best arrival of any kind, and the best arrival by
/// transit. Cells are valid only for the current generation : a new search
/// increments the generation instead of clearing the arena.
#[derive(Debug, Default)]
pub(crate) struct StopArrivalArena {
    nb_of_rounds: usize,
    nb_of_stops: usize,
    generation: u32,
    cells: Vec<Cell>,
    overall_best: Vec<(u32, i32, usize)>,
}

impl StopArrivalArena {
    /// Prepares the arena for a new search.
    pub fn reset(&mut self, nb_of_rounds: usize, nb_of_stops: usize) {
        if nb_of_rounds != self.nb_of_rounds || nb_of_stops != self.nb_of_stops {
            self.nb_of_rounds = nb_of_rounds;
            self.nb_of_stops = nb_of_stops;
            self.cells = vec![Cell::default(); nb_of_rounds * nb_of_stops];
            self.overall_best = vec![(0, 0, 0); nb_of_stops];
            self.generation = 0;
        }
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.cells.iter_mut().for_each(|cell| cell.generation = 0);
            self.overall_best.iter_mut().for_each(|best| best.0 = 0);
            self.generation = 1;
        }
    }

    pub fn nb_of_rounds(&self) -> usize {
        self.nb_of_rounds
    }

    fn cell(&self, round: usize, stop: Stop) -> Option<&Cell> {
        let cell = &self.cells[round * self.nb_of_stops + stop.idx()];
        if cell.generation == self.generation {
            Some(cell)
        } else {
            None
        }
    }

    fn cell_mut(&mut self, round: usize, stop: Stop) -> &mut Cell {
        let generation = self.generation;
        let cell = &mut self.cells[round * self.nb_of_stops + stop.idx()];
        if cell.generation != generation {
            *cell = Cell {
                generation,
                best: None,
                transit: None,
            };
        }
        cell
    }

    pub fn best(&self, round: usize, stop: Stop) -> Option<&StdStopArrival> {
        self.cell(round, stop).and_then(|cell| cell.best.as_ref())
    }

    pub fn transit(&self, round: usize, stop: Stop) -> Option<&StdStopArrival> {
        self.cell(round, stop).and_then(|cell| cell.transit.as_ref())
    }

    /// Best time at `stop` over the rounds up to `round` included.
    pub fn best_time_up_to<F>(&self, round: usize, stop: Stop, is_better: F) -> Option<i32>
    where
        F: Fn(i32, i32) -> bool,
    {
        (0..=round)
            .filter_map(|r| self.best(r, stop).map(|arrival| arrival.time))
            .fold(None, |best, time| match best {
                Some(best) if !is_better(time, best) => Some(best),
                _ => Some(time),
            })
    }

    /// Best transit time at `stop` over the rounds up to `round` included.
    pub fn transit_time_up_to<F>(&self, round: usize, stop: Stop, is_better: F) -> Option<i32>
    where
        F: Fn(i32, i32) -> bool,
    {
        (0..=round)
            .filter_map(|r| self.transit(r, stop).map(|arrival| arrival.time))
            .fold(None, |best, time| match best {
                Some(best) if !is_better(time, best) => Some(best),
                _ => Some(time),
            })
    }

    pub fn set_best(&mut self, round: usize, stop: Stop, arrival: StdStopArrival) {
        self.cell_mut(round, stop).best = Some(arrival);
    }

    pub fn set_transit(&mut self, round: usize, stop: Stop, arrival: StdStopArrival) {
        self.cell_mut(round, stop).transit = Some(arrival);
    }

    /// Records `time` as the best time ever reached at `stop` if it is,
    /// and `round` if no earlier round reached `stop`.
    pub fn update_overall_best<F>(&mut self, round: usize, stop: Stop, time: i32, is_better: F)
    where
        F: Fn(i32, i32) -> bool,
    {
        let generation = self.generation;
        let best = &mut self.overall_best[stop.idx()];
        if best.0 != generation {
            *best = (generation, time, round);
            return;
        }
        if is_better(time, best.1) {
            best.1 = time;
        }
        best.2 = best.2.min(round);
    }

    /// Best time ever reached at `stop`, and the first round that reached it.
    pub fn overall_best(&self, stop: Stop) -> Option<(i32, usize)> {
        let best = &self.overall_best[stop.idx()];
        if best.0 == self.generation {
            Some((best.1, best.2))
        } else {
            None
        }
    }
}
