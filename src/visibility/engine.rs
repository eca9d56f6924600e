// reservoir-core/src/visibility/engine.rs

use super::errors::VisibilityError;
use super::filters::{CellFilterState, PropertyFilter};
use super::grid::{ElementGrid, HEX_FACE_NODE_COUNT, HEX_NODE_COUNT};
use super::results::{ResultPosition, ResultValueProvider};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryType {
    AllCells,
    RangeFiltered,
    PropertyFiltered,
    OverriddenCellVisibility,
}

/// Cache key of one generated visibility. `frame_index` is `-1` for
/// geometry that does not change with time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisibilityKey {
    pub geometry_type: GeometryType,
    pub frame_index: i32,
}

impl VisibilityKey {
    pub fn new(geometry_type: GeometryType, frame_index: i32) -> Self {
        Self {
            geometry_type,
            frame_index,
        }
    }

    pub fn static_key(geometry_type: GeometryType) -> Self {
        Self::new(geometry_type, -1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryState {
    Dirty,
    Regenerating,
    Clean,
}

#[derive(Debug)]
struct CachedVisibility {
    state: GeometryState,
    parts: Vec<Vec<bool>>,
}

impl CachedVisibility {
    fn dirty() -> Self {
        Self {
            state: GeometryState::Dirty,
            parts: Vec::new(),
        }
    }
}

/// Element to master cell correspondence stored as offsets into one flat
/// index list. Elements are numbered across all parts, part after part.
#[derive(Clone, Debug, Default)]
pub struct CellCorrespondence {
    offsets: Vec<usize>,
    master_cells: Vec<usize>,
}

impl CellCorrespondence {
    pub fn from_lists(lists: &[Vec<usize>]) -> Self {
        let mut offsets = Vec::with_capacity(lists.len() + 1);
        let mut master_cells = Vec::new();
        offsets.push(0);
        for list in lists {
            master_cells.extend_from_slice(list);
            offsets.push(master_cells.len());
        }
        Self {
            offsets,
            master_cells,
        }
    }

    pub fn one_to_one(element_count: usize) -> Self {
        Self {
            offsets: (0..=element_count).collect(),
            master_cells: (0..element_count).collect(),
        }
    }

    pub fn element_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn master_cells(&self, element: usize) -> &[usize] {
        match (self.offsets.get(element), self.offsets.get(element + 1)) {
            (Some(&start), Some(&end)) => &self.master_cells[start..end],
            _ => &[],
        }
    }
}

/// Master view link: this grid shows whatever the master shows.
#[derive(Clone, Copy)]
pub struct CellOverride<'a> {
    pub correspondence: &'a CellCorrespondence,
    pub master_visibility: &'a [bool],
}

/// Everything a regeneration reads. Borrowed per call so the engine owns
/// nothing but its cache.
#[derive(Clone, Copy)]
pub struct VisibilityContext<'a> {
    pub parts: &'a [&'a dyn ElementGrid],
    pub filters: &'a CellFilterState,
    pub results: &'a dyn ResultValueProvider,
    pub cell_override: Option<CellOverride<'a>>,
}

impl<'a> VisibilityContext<'a> {
    pub fn total_element_count(&self) -> usize {
        self.parts.iter().map(|part| part.element_count()).sum()
    }
}

/// Generates and caches per-element visibility for each geometry type and
/// frame.
///
/// Regeneration takes `&mut self`, so a key moves from dirty through
/// regenerating to clean without any other access in between.
#[derive(Debug, Default)]
pub struct VisibilityEngine {
    cache: HashMap<VisibilityKey, CachedVisibility>,
}

impl VisibilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if the key was never generated.
    pub fn state(&self, key: &VisibilityKey) -> Option<GeometryState> {
        self.cache.get(key).map(|entry| entry.state)
    }

    /// Marks cached geometry of `geometry_type` and everything derived from
    /// it as dirty, for every frame.
    pub fn schedule_geometry_regen(&mut self, geometry_type: GeometryType) {
        let dirty_types: &[GeometryType] = match geometry_type {
            GeometryType::AllCells => &[
                GeometryType::AllCells,
                GeometryType::RangeFiltered,
                GeometryType::PropertyFiltered,
                GeometryType::OverriddenCellVisibility,
            ],
            GeometryType::RangeFiltered => {
                &[GeometryType::RangeFiltered, GeometryType::PropertyFiltered]
            }
            GeometryType::PropertyFiltered => &[GeometryType::PropertyFiltered],
            GeometryType::OverriddenCellVisibility => &[GeometryType::OverriddenCellVisibility],
        };
        let mut count = 0;
        for (key, entry) in self.cache.iter_mut() {
            if dirty_types.contains(&key.geometry_type) {
                entry.state = GeometryState::Dirty;
                count += 1;
            }
        }
        debug!("Scheduled {:?} regeneration, {} keys dirty", geometry_type, count);
    }

    pub fn clear_geometry_cache(&mut self) {
        self.cache.clear();
    }

    /// Visibility per part for `key`, regenerated first if needed. The
    /// returned arrays are copies owned by the caller.
    pub fn visibility(
        &mut self,
        key: VisibilityKey,
        context: &VisibilityContext<'_>,
    ) -> Result<Vec<Vec<bool>>, VisibilityError> {
        self.ensure_generated(key, context)?;
        Ok(self
            .cache
            .get(&key)
            .map(|entry| entry.parts.clone())
            .unwrap_or_default())
    }

    pub fn part_visibility(
        &mut self,
        key: VisibilityKey,
        part_index: usize,
        context: &VisibilityContext<'_>,
    ) -> Result<Vec<bool>, VisibilityError> {
        let part_count = context.parts.len();
        if part_index >= part_count {
            return Err(VisibilityError::PartIndexOutOfRange(part_index, part_count));
        }
        self.ensure_generated(key, context)?;
        Ok(self
            .cache
            .get(&key)
            .and_then(|entry| entry.parts.get(part_index).cloned())
            .unwrap_or_default())
    }

    /// The single geometry type that decides what is shown at `frame_index`.
    pub fn active_geometry_type(
        context: &VisibilityContext<'_>,
        frame_index: i32,
    ) -> GeometryType {
        if context.cell_override.is_some() {
            GeometryType::OverriddenCellVisibility
        } else if frame_index >= 0 && context.filters.has_active_property_filters() {
            GeometryType::PropertyFiltered
        } else if context.filters.has_active_range_filter() {
            GeometryType::RangeFiltered
        } else {
            GeometryType::AllCells
        }
    }

    /// ORs the visibility active at `frame_index` into `total`, one slot per
    /// element with parts laid out back to back. `total` grows to the total
    /// element count if shorter.
    pub fn calculate_current_total_cell_visibility(
        &mut self,
        total: &mut Vec<bool>,
        frame_index: i32,
        context: &VisibilityContext<'_>,
    ) -> Result<(), VisibilityError> {
        let geometry_type = Self::active_geometry_type(context, frame_index);
        let key = match geometry_type {
            GeometryType::AllCells | GeometryType::RangeFiltered => {
                VisibilityKey::static_key(geometry_type)
            }
            GeometryType::PropertyFiltered | GeometryType::OverriddenCellVisibility => {
                VisibilityKey::new(geometry_type, frame_index)
            }
        };
        trace!("Total visibility at frame {} from {:?}", frame_index, key);
        let parts = self.visibility(key, context)?;

        let total_count = context.total_element_count();
        if total.len() < total_count {
            total.resize(total_count, false);
        }
        let mut offset = 0;
        for (part, part_visibility) in context.parts.iter().zip(&parts) {
            for (element, &visible) in part_visibility.iter().enumerate() {
                total[offset + element] |= visible;
            }
            offset += part.element_count();
        }
        Ok(())
    }

    fn ensure_generated(
        &mut self,
        key: VisibilityKey,
        context: &VisibilityContext<'_>,
    ) -> Result<(), VisibilityError> {
        match self.state(&key) {
            Some(GeometryState::Clean) => return Ok(()),
            Some(GeometryState::Regenerating) => {
                return Err(VisibilityError::RegenerationInProgress(key))
            }
            Some(GeometryState::Dirty) | None => {}
        }

        let now = Instant::now();
        self.cache
            .entry(key)
            .or_insert_with(CachedVisibility::dirty)
            .state = GeometryState::Regenerating;

        let generated = self.generate(key, context);
        let entry = self
            .cache
            .entry(key)
            .or_insert_with(CachedVisibility::dirty);
        match generated {
            Ok(parts) => {
                entry.parts = parts;
                entry.state = GeometryState::Clean;
                info!(
                    "Generated {:?} visibility in {}",
                    key,
                    humantime::format_duration(now.elapsed())
                );
                Ok(())
            }
            Err(e) => {
                entry.state = GeometryState::Dirty;
                Err(e)
            }
        }
    }

    fn generate(
        &mut self,
        key: VisibilityKey,
        context: &VisibilityContext<'_>,
    ) -> Result<Vec<Vec<bool>>, VisibilityError> {
        match key.geometry_type {
            GeometryType::AllCells => Ok(context
                .parts
                .iter()
                .map(|part| vec![true; part.element_count()])
                .collect()),
            GeometryType::RangeFiltered => Ok(compute_range_filtered(context)),
            GeometryType::PropertyFiltered => {
                if key.frame_index < 0 {
                    return Err(VisibilityError::MissingFrameIndex(key.frame_index));
                }
                let base_type = if context.filters.has_active_range_filter() {
                    GeometryType::RangeFiltered
                } else {
                    GeometryType::AllCells
                };
                let mut parts = self.visibility(VisibilityKey::static_key(base_type), context)?;
                apply_property_filters(&mut parts, key.frame_index as usize, context);
                Ok(parts)
            }
            GeometryType::OverriddenCellVisibility => compute_overridden(context),
        }
    }
}

fn compute_range_filtered(context: &VisibilityContext<'_>) -> Vec<Vec<bool>> {
    let range_filter = &context.filters.range_filter;
    context
        .parts
        .iter()
        .map(|part| {
            (0..part.element_count())
                .into_par_iter()
                .map(|element| match part.ijk_from_element_index(element) {
                    Some(ijk) => range_filter.is_cell_visible(ijk),
                    None => !range_filter.has_include_ranges(),
                })
                .collect::<Vec<bool>>()
        })
        .collect()
}

fn compute_overridden(context: &VisibilityContext<'_>) -> Result<Vec<Vec<bool>>, VisibilityError> {
    let cell_override = context
        .cell_override
        .ok_or(VisibilityError::MissingCellOverride)?;
    let total_count = context.total_element_count();
    let mapped_count = cell_override.correspondence.element_count();
    if mapped_count != total_count {
        return Err(VisibilityError::OverrideMappingMismatch(total_count, mapped_count));
    }

    let mut offset = 0;
    let mut parts = Vec::with_capacity(context.parts.len());
    for part in context.parts {
        let part_offset = offset;
        let visibility: Vec<bool> = (0..part.element_count())
            .into_par_iter()
            .map(|element| {
                cell_override
                    .correspondence
                    .master_cells(part_offset + element)
                    .iter()
                    .any(|&master| {
                        cell_override
                            .master_visibility
                            .get(master)
                            .copied()
                            .unwrap_or(false)
                    })
            })
            .collect();
        offset += part.element_count();
        parts.push(visibility);
    }
    Ok(parts)
}

fn apply_property_filters(
    parts: &mut [Vec<bool>],
    view_step: usize,
    context: &VisibilityContext<'_>,
) {
    let (time_step, frame) = context.results.time_step_and_frame(view_step);
    for filter in context.filters.property_filters.iter().filter(|f| f.active) {
        for (part_id, (grid, visibility)) in context.parts.iter().zip(parts.iter_mut()).enumerate()
        {
            let values = context
                .results
                .result_values(&filter.result, part_id, time_step, frame)
                .filter(|values| !values.is_empty());
            match values {
                Some(values) => apply_property_filter(*grid, visibility, values, filter),
                None => warn!(
                    "No values for {:?} on part {} at time step {} frame {}, filter skipped",
                    filter.result, part_id, time_step, frame
                ),
            }
        }
    }
}

fn expected_value_count(grid: &dyn ElementGrid, position: ResultPosition) -> usize {
    match position {
        ResultPosition::Element | ResultPosition::Formation => grid.element_count(),
        ResultPosition::Node => grid.node_count(),
        ResultPosition::ElementNode => grid.element_count() * HEX_NODE_COUNT,
        ResultPosition::ElementNodeFace => grid.element_count() * HEX_FACE_NODE_COUNT,
    }
}

/// Hides visible elements rejected by `filter`. Already hidden elements are
/// never shown again.
fn apply_property_filter(
    grid: &dyn ElementGrid,
    visibility: &mut [bool],
    values: &[f32],
    filter: &PropertyFilter,
) {
    let position = filter.result.position;
    let expected = expected_value_count(grid, position);
    if values.len() < expected || visibility.len() != grid.element_count() {
        warn!(
            "{:?} has {} values, expected {}, filter skipped",
            filter.result,
            values.len(),
            expected
        );
        return;
    }

    let category_set: Option<HashSet<i32>> = match position {
        ResultPosition::Formation => Some(filter.category_set().unwrap_or_default()),
        _ => filter.category_set(),
    };
    let category_set = category_set.as_ref();
    let hides = |index: usize| -> bool {
        values
            .get(index)
            .map_or(false, |&value| filter.hides(value as f64, category_set))
    };

    visibility
        .par_iter_mut()
        .enumerate()
        .for_each(|(element, visible)| {
            if !*visible {
                return;
            }
            let hidden = match position {
                ResultPosition::Element | ResultPosition::Formation => hides(element),
                ResultPosition::Node => grid
                    .element_nodes(element)
                    .iter()
                    .any(|&node| hides(node)),
                ResultPosition::ElementNode => (0..grid.element_nodes(element).len())
                    .any(|local| hides(element * HEX_NODE_COUNT + local)),
                ResultPosition::ElementNodeFace => (0..HEX_FACE_NODE_COUNT)
                    .any(|local| hides(element * HEX_FACE_NODE_COUNT + local)),
            };
            if hidden {
                *visible = false;
            }
        });
}
