// reservoir-core/src/visibility/filters.rs

use super::results::ResultAddress;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    Include,
    Exclude,
}

/// Box in structured index space, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    min: [usize; 3],
    max: [usize; 3],
}

impl CellRange {
    pub fn new(min: [usize; 3], max: [usize; 3]) -> Self {
        Self {
            min: [min[0].min(max[0]), min[1].min(max[1]), min[2].min(max[2])],
            max: [min[0].max(max[0]), min[1].max(max[1]), min[2].max(max[2])],
        }
    }

    /// Single K layer spanning every I and J.
    pub fn k_layer(k: usize) -> Self {
        Self::new([0, 0, k], [usize::MAX, usize::MAX, k])
    }

    pub fn contains(&self, ijk: [usize; 3]) -> bool {
        (0..3).all(|axis| self.min[axis] <= ijk[axis] && ijk[axis] <= self.max[axis])
    }
}

/// Union of include boxes minus union of exclude boxes.
#[derive(Clone, Debug)]
pub struct CellRangeFilter {
    pub active: bool,
    includes: Vec<CellRange>,
    excludes: Vec<CellRange>,
}

impl Default for CellRangeFilter {
    fn default() -> Self {
        Self {
            active: true,
            includes: Vec::new(),
            excludes: Vec::new(),
        }
    }
}

impl CellRangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_range(&mut self, range: CellRange, mode: FilterMode) -> &mut Self {
        match mode {
            FilterMode::Include => self.includes.push(range),
            FilterMode::Exclude => self.excludes.push(range),
        }
        self
    }

    pub fn has_include_ranges(&self) -> bool {
        !self.includes.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.active && !(self.includes.is_empty() && self.excludes.is_empty())
    }

    pub fn is_cell_excluded(&self, ijk: [usize; 3]) -> bool {
        self.excludes.iter().any(|range| range.contains(ijk))
    }

    pub fn is_cell_visible(&self, ijk: [usize; 3]) -> bool {
        let included =
            self.includes.is_empty() || self.includes.iter().any(|range| range.contains(ijk));
        included && !self.is_cell_excluded(ijk)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyFilter {
    pub result: ResultAddress,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub mode: FilterMode,
    pub active: bool,
    /// Accepted category codes for discrete results.
    pub categories: Option<Vec<i32>>,
}

impl PropertyFilter {
    pub fn range(result: ResultAddress, lower_bound: f64, upper_bound: f64, mode: FilterMode) -> Self {
        Self {
            result,
            lower_bound,
            upper_bound,
            mode,
            active: true,
            categories: None,
        }
    }

    pub fn categories(result: ResultAddress, categories: Vec<i32>, mode: FilterMode) -> Self {
        Self {
            result,
            lower_bound: f64::NEG_INFINITY,
            upper_bound: f64::INFINITY,
            mode,
            active: true,
            categories: Some(categories),
        }
    }

    pub fn category_set(&self) -> Option<HashSet<i32>> {
        self.categories
            .as_ref()
            .map(|categories| categories.iter().copied().collect())
    }

    /// Whether one raw sub-value hides its element.
    pub(crate) fn hides(&self, value: f64, category_set: Option<&HashSet<i32>>) -> bool {
        let accepted = match category_set {
            Some(set) => value.is_finite() && set.contains(&(value.round() as i32)),
            None => self.lower_bound <= value && value <= self.upper_bound,
        };
        match self.mode {
            FilterMode::Include => !accepted,
            FilterMode::Exclude => accepted,
        }
    }
}

/// Range and property filters of one view.
#[derive(Clone, Debug, Default)]
pub struct CellFilterState {
    pub range_filter: CellRangeFilter,
    pub property_filters: Vec<PropertyFilter>,
}

impl CellFilterState {
    pub fn has_active_range_filter(&self) -> bool {
        self.range_filter.is_active()
    }

    pub fn has_active_property_filters(&self) -> bool {
        self.property_filters.iter().any(|filter| filter.active)
    }
}
