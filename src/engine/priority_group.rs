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

use crate::engine::relax::RelaxFunction;
use std::fmt::Debug;

/// Strategy computing the opaque priority code `c2` of an arrival.
///
/// The engine never reads the code itself : it only merges the code of
/// each boarded trip's group into the code of the arrival, and asks
/// the policy if one code dominates another.
pub trait PriorityGroupPolicy: Debug + Send + Sync {
    /// Code of the group with the given index.
    ///
    /// Panics if `group_index` is greater than `max_group_index()`.
    fn group_id(&self, group_index: usize) -> u32;

    fn max_group_index(&self) -> usize;

    fn merge(&self, left: u32, right: u32) -> u32;

    fn dominate(&self, left: u32, right: u32) -> bool;
}

/// Up to 32 groups, encoded as a bitset.
///
/// Group 0 is the empty set, group `i > 0` is the bit `i - 1`.
/// Any two distinct sets of groups are incomparable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityGroup32n;

const MAX_GROUP_INDEX_32N: usize = 32;

impl PriorityGroupPolicy for PriorityGroup32n {
    fn group_id(&self, group_index: usize) -> u32 {
        assert!(
            group_index <= MAX_GROUP_INDEX_32N,
            "Priority group {} is out of range [0, {}]",
            group_index,
            MAX_GROUP_INDEX_32N
        );
        if group_index == 0 {
            0
        } else {
            1 << (group_index - 1)
        }
    }

    fn max_group_index(&self) -> usize {
        MAX_GROUP_INDEX_32N
    }

    fn merge(&self, left: u32, right: u32) -> u32 {
        left | right
    }

    fn dominate(&self, left: u32, right: u32) -> bool {
        left != right
    }
}

/// Used when priority groups are not part of the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPriorityGroups;

impl PriorityGroupPolicy for NoPriorityGroups {
    fn group_id(&self, _group_index: usize) -> u32 {
        0
    }

    fn max_group_index(&self) -> usize {
        usize::MAX
    }

    fn merge(&self, _left: u32, _right: u32) -> u32 {
        0
    }

    fn dominate(&self, _left: u32, _right: u32) -> bool {
        false
    }
}

/// `left` costs less than `right`, given as `(c1, c2)` pairs.
///
/// The cost of `right` is relaxed when there is no policy, or when the
/// priority code of `left` dominates the one of `right`.
pub(crate) fn c1_is_better(
    relax_c1: RelaxFunction,
    policy: Option<&dyn PriorityGroupPolicy>,
    left: (i32, u32),
    right: (i32, u32),
) -> bool {
    match policy {
        Some(policy) if !policy.dominate(left.1, right.1) => left.0 < right.0,
        _ => relax_c1.is_better(left.0, right.0),
    }
}
