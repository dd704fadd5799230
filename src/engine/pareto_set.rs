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

/// Tells if `left` is better than `right` on at least one criterion.
///
/// Multi-criteria comparators are an `||` of single criterion tests,
/// so `left` and `right` may each be better than the other.
pub trait ParetoComparator<T> {
    fn left_dominance_exist(&self, left: &T, right: &T) -> bool;
}

impl<T, F> ParetoComparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn left_dominance_exist(&self, left: &T, right: &T) -> bool {
        self(left, right)
    }
}

/// A set of elements where no element dominates another one.
///
/// `a` dominates `b` when `a` is better than `b` on some criterion
/// while `b` is better than `a` on none.
/// Two elements that are each better than the other on some criterion
/// are both kept.
#[derive(Debug, Clone)]
pub struct ParetoSet<T> {
    elements: Vec<T>,
}

impl<T> Default for ParetoSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ParetoSet<T> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }

    /// True when some element of the set dominates `candidate`.
    pub fn dominates<C>(&self, candidate: &T, comparator: &C) -> bool
    where
        C: ParetoComparator<T>,
    {
        self.elements.iter().any(|old| {
            comparator.left_dominance_exist(old, candidate)
                && !comparator.left_dominance_exist(candidate, old)
        })
    }

    /// Inserts `new_element` if no element of the set dominates it,
    /// removing the elements it dominates.
    ///
    /// A candidate equivalent to every element of the set
    /// (better on no criterion, worse on none) is rejected.
    /// Returns `true` when the element was added.
    pub fn add<C>(&mut self, new_element: T, comparator: &C) -> bool
    where
        C: ParetoComparator<T>,
    {
        let mut mutual_dominance_exist = false;
        let mut equivalent_exist = false;

        for (idx, old) in self.elements.iter().enumerate() {
            let left = comparator.left_dominance_exist(&new_element, old);
            let right = comparator.left_dominance_exist(old, &new_element);
            match (left, right) {
                (true, true) => mutual_dominance_exist = true,
                (true, false) => {
                    self.remove_dominated_from(idx, &new_element, comparator);
                    self.elements.push(new_element);
                    return true;
                }
                (false, true) => return false,
                (false, false) => equivalent_exist = true,
            }
        }

        if self.elements.is_empty() || (mutual_dominance_exist && !equivalent_exist) {
            self.elements.push(new_element);
            return true;
        }
        false
    }

    // removes the elements dominated by `new_element`, starting at `start`
    // which is known to be dominated
    fn remove_dominated_from<C>(&mut self, start: usize, new_element: &T, comparator: &C)
    where
        C: ParetoComparator<T>,
    {
        let mut idx = 0;
        self.elements.retain(|old| {
            let keep = idx < start
                || !comparator.left_dominance_exist(new_element, old)
                || comparator.left_dominance_exist(old, new_element);
            idx += 1;
            keep
        });
    }
}

impl<'a, T> IntoIterator for &'a ParetoSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // (arrival time, number of transfers), lower is better on both
    type Vector = (i32, i32);

    fn comparator(left: &Vector, right: &Vector) -> bool {
        left.0 < right.0 || left.1 < right.1
    }

    fn sorted(set: &ParetoSet<Vector>) -> Vec<Vector> {
        let mut elements: Vec<Vector> = set.iter().copied().collect();
        elements.sort_unstable();
        elements
    }

    fn assert_pareto_invariant(set: &ParetoSet<Vector>) {
        for left in set {
            for right in set {
                let dominates = comparator(left, right) && !comparator(right, left);
                assert!(!dominates, "{:?} dominates {:?}", left, right);
            }
        }
    }

    #[test]
    fn first_element_is_added() {
        let mut set = ParetoSet::new();
        assert!(set.add((10, 1), &comparator));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn dominated_element_is_rejected() {
        let mut set = ParetoSet::new();
        set.add((10, 1), &comparator);
        assert!(!set.add((11, 1), &comparator));
        assert!(!set.add((11, 2), &comparator));
        assert_eq!(sorted(&set), vec![(10, 1)]);
    }

    #[test]
    fn equivalent_element_is_rejected() {
        let mut set = ParetoSet::new();
        set.add((10, 1), &comparator);
        assert!(!set.add((10, 1), &comparator));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn dominating_element_removes_others() {
        let mut set = ParetoSet::new();
        set.add((10, 3), &comparator);
        set.add((12, 2), &comparator);
        set.add((14, 1), &comparator);
        assert_eq!(set.len(), 3);

        assert!(set.add((11, 2), &comparator));
        assert_eq!(sorted(&set), vec![(10, 3), (11, 2), (14, 1)]);

        assert!(set.add((9, 1), &comparator));
        assert_eq!(sorted(&set), vec![(9, 1)]);
    }

    #[test]
    fn keeps_pareto_invariant() {
        let mut set = ParetoSet::new();
        let candidates = [
            (20, 0),
            (15, 2),
            (18, 1),
            (15, 1),
            (30, 0),
            (12, 4),
            (12, 3),
            (18, 1),
            (25, 0),
            (11, 5),
        ];
        for candidate in candidates.iter() {
            set.add(*candidate, &comparator);
            assert_pareto_invariant(&set);
        }
        assert_eq!(sorted(&set), vec![(11, 5), (12, 3), (15, 1), (20, 0)]);
    }

    #[test]
    fn dominates_query() {
        let mut set = ParetoSet::new();
        set.add((10, 2), &comparator);
        assert!(set.dominates(&(11, 2), &comparator));
        assert!(!set.dominates(&(10, 2), &comparator));
        assert!(!set.dominates(&(11, 1), &comparator));
    }
}
