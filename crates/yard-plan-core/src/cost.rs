// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use num_traits::{CheckedAdd, SaturatingAdd, Zero};
use std::{fmt::Display, iter::Sum, ops::Add};

/// Plan cost measured in reshuffle moves, plus search-ranking penalties.
///
/// The maximum representable value doubles as the infeasibility
/// sentinel: a simulation that cannot complete reports
/// [`Cost::INFEASIBLE`], which sorts after every finite cost. All
/// arithmetic saturates at the sentinel, so an infeasible branch stays
/// infeasible no matter what is added to it.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Cost(u64);

impl Cost {
    pub const ZERO: Cost = Cost(0);
    pub const INFEASIBLE: Cost = Cost(u64::MAX);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Cost(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_infeasible(self) -> bool {
        self.0 == u64::MAX
    }

    #[inline]
    pub const fn saturating_add(self, other: Cost) -> Self {
        Cost(self.0.saturating_add(other.0))
    }

    #[inline]
    pub fn checked_add(self, other: Cost) -> Option<Self> {
        self.0.checked_add(other.0).map(Cost)
    }

    #[inline]
    pub const fn saturating_sub(self, other: Cost) -> Self {
        Cost(self.0.saturating_sub(other.0))
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_infeasible() {
            write!(f, "Cost(inf)")
        } else {
            write!(f, "Cost({})", self.0)
        }
    }
}

impl From<u64> for Cost {
    #[inline]
    fn from(value: u64) -> Self {
        Cost(value)
    }
}

impl Add for Cost {
    type Output = Cost;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Zero for Cost {
    #[inline]
    fn zero() -> Self {
        Cost::ZERO
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl CheckedAdd for Cost {
    #[inline]
    fn checked_add(&self, rhs: &Self) -> Option<Self> {
        Cost::checked_add(*self, *rhs)
    }
}

impl SaturatingAdd for Cost {
    #[inline]
    fn saturating_add(&self, rhs: &Self) -> Self {
        Cost::saturating_add(*self, *rhs)
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::ZERO, |acc, c| acc.saturating_add(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_sorts_after_every_finite_cost() {
        assert!(Cost::new(0) < Cost::INFEASIBLE);
        assert!(Cost::new(u64::MAX - 1) < Cost::INFEASIBLE);
    }

    #[test]
    fn infeasible_is_absorbing_under_addition() {
        let c = Cost::INFEASIBLE.saturating_add(Cost::new(5));
        assert!(c.is_infeasible());
        assert_eq!(Cost::INFEASIBLE + Cost::new(1), Cost::INFEASIBLE);
    }

    #[test]
    fn checked_add_detects_overflow_into_sentinel() {
        assert_eq!(
            Cost::new(3).checked_add(Cost::new(4)),
            Some(Cost::new(7))
        );
        assert_eq!(Cost::new(u64::MAX - 1).checked_add(Cost::new(2)), None);
    }

    #[test]
    fn sum_saturates() {
        let total: Cost = [Cost::new(2), Cost::new(3)].into_iter().sum();
        assert_eq!(total, Cost::new(5));
        let inf: Cost = [Cost::new(1), Cost::INFEASIBLE].into_iter().sum();
        assert!(inf.is_infeasible());
    }

    #[test]
    fn display_marks_the_sentinel() {
        assert_eq!(Cost::new(7).to_string(), "Cost(7)");
        assert_eq!(Cost::INFEASIBLE.to_string(), "Cost(inf)");
    }
}
