// reservoir-core/src/contour/projection.rs

use super::aggregation::{aggregate, ResultAggregation, WeightedMeanCalculator};
use super::errors::ContourMapError;
use super::geometry::{
    overlap_volume, vertical_ray_length, BoundingBox, CellSearchIndex, HexGeometry, Vec3,
};
use derive_builder::Builder;
use humantime::format_duration;
use log::{debug, info, trace};
use ndarray::{Array1, Array2, Zip};
use ndarray_stats::QuantileExt;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;

/// Parameter weights below this are treated as zero.
const MIN_PARAMETER_WEIGHT: f64 = 1e-6;

#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct ContourMapSettings {
    pub aggregation: ResultAggregation,
    /// Raster cell size as a fraction of the characteristic horizontal cell size.
    pub relative_sample_spacing: f64,
}

impl Default for ContourMapSettings {
    fn default() -> Self {
        Self {
            aggregation: ResultAggregation::Mean,
            relative_sample_spacing: 0.75,
        }
    }
}

/// Static and dynamic cell values feeding the column aggregations.
#[derive(Clone, Copy, Debug)]
pub struct ColumnInputs<'a> {
    pub porosity: &'a [f64],
    pub net_to_gross: &'a [f64],
    pub dz: &'a [f64],
    pub oil_saturation: Option<&'a [f64]>,
    pub gas_saturation: Option<&'a [f64]>,
}

impl<'a> ColumnInputs<'a> {
    fn validate(&self, cell_count: usize) -> Result<(), ContourMapError> {
        let mut named = vec![
            ("porosity", self.porosity),
            ("net_to_gross", self.net_to_gross),
            ("dz", self.dz),
        ];
        if let Some(oil) = self.oil_saturation {
            named.push(("oil_saturation", oil));
        }
        if let Some(gas) = self.gas_saturation {
            named.push(("gas_saturation", gas));
        }
        for (name, values) in named {
            if values.len() != cell_count {
                return Err(ContourMapError::LengthMismatch(
                    name.to_string(),
                    values.len(),
                    cell_count,
                ));
            }
        }
        Ok(())
    }

    /// Hydrocarbon thickness of one cell: saturation * poro * ntg * dz.
    pub fn column_value(&self, aggregation: ResultAggregation, cell: usize) -> f64 {
        let mut saturation = 0.0;
        if matches!(
            aggregation,
            ResultAggregation::OilColumn | ResultAggregation::HydrocarbonColumn
        ) {
            saturation += self.oil_saturation.map_or(0.0, |values| values[cell]);
        }
        if matches!(
            aggregation,
            ResultAggregation::GasColumn | ResultAggregation::HydrocarbonColumn
        ) {
            saturation += self.gas_saturation.map_or(0.0, |values| values[cell]);
        }
        saturation * self.porosity[cell] * self.net_to_gross[cell] * self.dz[cell]
    }
}

/// Cells under one raster cell with their weights, shallowest K layer first.
pub type CellWeights = Vec<(usize, f64)>;

/// 2-D raster of a 3-D cell result aggregated over depth.
///
/// Raster cell `(i, j)` covers `[origin + i * spacing, origin + (i + 1) * spacing]`
/// in x and likewise in y. Cells without contributions hold `f64::INFINITY`.
#[derive(Debug)]
pub struct ContourMapProjection {
    settings: ContourMapSettings,
    sample_spacing: f64,
    origin: (f64, f64),
    map_size: (usize, usize),
    full_bounding_box: BoundingBox,
    projected_cells: Vec<CellWeights>,
    aggregated_values: Array2<f64>,
    vertex_values: Array2<f64>,
}

impl ContourMapProjection {
    pub fn settings(&self) -> &ContourMapSettings {
        &self.settings
    }

    pub fn sample_spacing(&self) -> f64 {
        self.sample_spacing
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    /// Number of raster cells along x and y.
    pub fn map_size(&self) -> (usize, usize) {
        self.map_size
    }

    pub fn full_bounding_box(&self) -> &BoundingBox {
        &self.full_bounding_box
    }

    pub fn cell_center(&self, i: usize, j: usize) -> (f64, f64) {
        cell_center(self.origin, self.sample_spacing, i, j)
    }

    /// Aggregated values indexed `[i, j]`.
    pub fn aggregated_values(&self) -> &Array2<f64> {
        &self.aggregated_values
    }

    /// Values at raster corners indexed `[vi, vj]`, shape `(nx + 1, ny + 1)`.
    pub fn vertex_values(&self) -> &Array2<f64> {
        &self.vertex_values
    }

    pub fn value_at(&self, i: usize, j: usize) -> f64 {
        self.aggregated_values
            .get((i, j))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    pub fn cells_at(&self, i: usize, j: usize) -> &[(usize, f64)] {
        let (nx, ny) = self.map_size;
        if i >= nx || j >= ny {
            return &[];
        }
        &self.projected_cells[i + j * nx]
    }

    pub fn has_result_in_cell(&self, i: usize, j: usize) -> bool {
        !self.cells_at(i, j).is_empty()
    }

    /// Min and max of the finite aggregated values.
    pub fn value_range(&self) -> Result<Option<(f64, f64)>, ContourMapError> {
        let finite: Array1<f64> = self
            .aggregated_values
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .collect();
        if finite.is_empty() {
            return Ok(None);
        }
        Ok(Some((*finite.min()?, *finite.max()?)))
    }
}

fn cell_center(origin: (f64, f64), spacing: f64, i: usize, j: usize) -> (f64, f64) {
    (
        origin.0 + (i as f64 + 0.5) * spacing,
        origin.1 + (j as f64 + 0.5) * spacing,
    )
}

/// Mean horizontal cell size.
fn characteristic_cell_size(grid: &dyn HexGeometry) -> f64 {
    let count = grid.cell_count();
    let summed: f64 = (0..count)
        .map(|cell| {
            let extent = grid.cell_bounding_box(cell).extent();
            0.5 * (extent.x + extent.y)
        })
        .sum();
    summed / count as f64
}

fn flatten_by_k(per_k_layer: BTreeMap<usize, CellWeights>) -> CellWeights {
    per_k_layer.into_values().flatten().collect()
}

struct GridMapper<'a> {
    grid: &'a dyn HexGeometry,
    visibility: &'a [bool],
    weighting_values: Option<&'a [f64]>,
    search_index: CellSearchIndex,
    full_bounding_box: BoundingBox,
    sample_spacing: f64,
}

impl<'a> GridMapper<'a> {
    fn parameter_weight(&self, cell: usize) -> f64 {
        match self.weighting_values {
            None => 1.0,
            Some(values) => {
                let value = values[cell].max(0.0);
                if value < MIN_PARAMETER_WEIGHT {
                    0.0
                } else {
                    value
                }
            }
        }
    }

    /// Visible cells overlapping the raster column, weighted by overlap volume.
    fn cells_and_overlap_volume(&self, center: (f64, f64)) -> CellWeights {
        let half = 0.5 * self.sample_spacing;
        let column = BoundingBox::new(
            Vec3::new(center.0 - half, center.1 - half, self.full_bounding_box.min.z),
            Vec3::new(center.0 + half, center.1 + half, self.full_bounding_box.max.z),
        );
        let mut per_k_layer: BTreeMap<usize, CellWeights> = BTreeMap::new();
        for cell in self.search_index.find_intersecting_cells(&column) {
            if !self.visibility[cell] {
                continue;
            }
            let volume = overlap_volume(&self.grid.cell_corners(cell), &column);
            if volume <= 0.0 {
                continue;
            }
            let weight = volume * self.parameter_weight(cell);
            if weight > 0.0 {
                per_k_layer
                    .entry(self.grid.cell_k(cell))
                    .or_default()
                    .push((cell, weight));
            }
        }
        flatten_by_k(per_k_layer)
    }

    /// Visible cells hit by the vertical ray through the raster center. The
    /// weights of each K layer sum to one.
    fn cells_and_length_in_cell(&self, center: (f64, f64)) -> CellWeights {
        let ray = BoundingBox::new(
            Vec3::new(center.0, center.1, self.full_bounding_box.min.z),
            Vec3::new(center.0, center.1, self.full_bounding_box.max.z),
        );
        let mut per_k_layer: BTreeMap<usize, CellWeights> = BTreeMap::new();
        for cell in self.search_index.find_intersecting_cells(&ray) {
            if !self.visibility[cell] {
                continue;
            }
            let length = vertical_ray_length(&self.grid.cell_corners(cell), center.0, center.1);
            if length > 0.0 {
                per_k_layer
                    .entry(self.grid.cell_k(cell))
                    .or_default()
                    .push((cell, length));
            }
        }
        for layer in per_k_layer.values_mut() {
            let layer_length: f64 = layer.iter().map(|(_, length)| length).sum();
            for (_, weight) in layer.iter_mut() {
                *weight /= layer_length;
            }
        }
        flatten_by_k(per_k_layer)
    }
}

#[derive(Default)]
pub struct ContourMapProjectionBuilder<'a> {
    grid: Option<&'a dyn HexGeometry>,
    visibility: Option<&'a [bool]>,
    cell_values: Option<&'a [f64]>,
    settings: Option<&'a ContourMapSettings>,
    weighting_values: Option<&'a [f64]>,
    column_inputs: Option<ColumnInputs<'a>>,
}

impl<'a> ContourMapProjectionBuilder<'a> {
    pub fn build(&self) -> Result<ContourMapProjection, ContourMapError> {
        let grid = self
            .grid
            .ok_or_else(|| ContourMapError::UninitializedFieldError("grid".to_string()))?;
        let visibility = self
            .visibility
            .ok_or_else(|| ContourMapError::UninitializedFieldError("visibility".to_string()))?;
        let default_settings = ContourMapSettings::default();
        let settings = self.settings.unwrap_or(&default_settings);
        let aggregation = settings.aggregation;

        let cell_count = grid.cell_count();
        if cell_count == 0 {
            return Err(ContourMapError::EmptyGrid);
        }
        Self::check_length("visibility", visibility, cell_count)?;
        if let Some(weights) = self.weighting_values {
            Self::check_length("weighting_values", weights, cell_count)?;
        }

        let cell_value: Box<dyn Fn(usize) -> f64 + Sync + '_> = if aggregation.is_column_result() {
            let inputs = self
                .column_inputs
                .ok_or(ContourMapError::MissingColumnInputs(aggregation))?;
            inputs.validate(cell_count)?;
            Box::new(move |cell| inputs.column_value(aggregation, cell))
        } else {
            let values = self.cell_values.ok_or_else(|| {
                ContourMapError::UninitializedFieldError("cell_values".to_string())
            })?;
            Self::check_length("cell_values", values, cell_count)?;
            Box::new(move |cell| values[cell])
        };

        let sample_spacing = settings.relative_sample_spacing * characteristic_cell_size(grid);
        if !(sample_spacing.is_finite() && sample_spacing > 0.0) {
            return Err(ContourMapError::InvalidSampleSpacing(sample_spacing));
        }

        let now = Instant::now();
        info!(
            "Projecting {} cells to a contour map using {:?}",
            cell_count, aggregation
        );
        let search_index = CellSearchIndex::new(grid);
        let mut full_bounding_box = BoundingBox::default();
        for cell in 0..cell_count {
            full_bounding_box.add_box(search_index.cell_box(cell));
        }
        let extent = full_bounding_box.extent();
        let map_size = (
            ((extent.x / sample_spacing).ceil() as usize).max(1),
            ((extent.y / sample_spacing).ceil() as usize).max(1),
        );
        let origin = (full_bounding_box.min.x, full_bounding_box.min.y);
        debug!(
            "Sample spacing {:.3}, map size {}x{}",
            sample_spacing, map_size.0, map_size.1
        );

        let mapper = GridMapper {
            grid,
            visibility,
            weighting_values: self.weighting_values,
            search_index,
            full_bounding_box,
            sample_spacing,
        };
        let (nx, ny) = map_size;
        let projected_cells: Vec<CellWeights> = (0..nx * ny)
            .into_par_iter()
            .map(|index| {
                let center = cell_center(origin, sample_spacing, index % nx, index / nx);
                if aggregation.is_straight_summation_result() {
                    mapper.cells_and_length_in_cell(center)
                } else {
                    mapper.cells_and_overlap_volume(center)
                }
            })
            .collect();
        debug!(
            "Grid mapping done in {}",
            format_duration(now.elapsed())
        );

        let mut aggregated_values = Array2::from_elem(map_size, f64::INFINITY);
        Zip::indexed(&mut aggregated_values).par_for_each(|(i, j), value| {
            let contributions: Vec<(f64, f64)> = projected_cells[i + j * nx]
                .iter()
                .map(|&(cell, weight)| (cell_value(cell), weight))
                .collect();
            *value = aggregate(aggregation, &contributions);
        });

        let mut vertex_values = Array2::from_elem((nx + 1, ny + 1), f64::INFINITY);
        Zip::indexed(&mut vertex_values).par_for_each(|(vi, vj), value| {
            *value = vertex_value(&aggregated_values, &projected_cells, map_size, vi, vj);
        });
        trace!("Vertex values: {:?}", vertex_values.dim());

        info!(
            "Contour map {}x{} generated in {}",
            nx,
            ny,
            format_duration(now.elapsed())
        );
        Ok(ContourMapProjection {
            settings: settings.clone(),
            sample_spacing,
            origin,
            map_size,
            full_bounding_box,
            projected_cells,
            aggregated_values,
            vertex_values,
        })
    }

    fn check_length<T>(name: &str, values: &[T], cell_count: usize) -> Result<(), ContourMapError> {
        if values.len() != cell_count {
            return Err(ContourMapError::LengthMismatch(
                name.to_string(),
                values.len(),
                cell_count,
            ));
        }
        Ok(())
    }

    pub fn grid(&mut self, grid: &'a dyn HexGeometry) -> &mut Self {
        self.grid = Some(grid);
        self
    }

    /// Current total cell visibility, one flag per grid cell.
    pub fn visibility(&mut self, visibility: &'a [bool]) -> &mut Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn cell_values(&mut self, cell_values: &'a [f64]) -> &mut Self {
        self.cell_values = Some(cell_values);
        self
    }

    pub fn settings(&mut self, settings: &'a ContourMapSettings) -> &mut Self {
        self.settings = Some(settings);
        self
    }

    /// Per cell parameter multiplied into volume weights.
    pub fn weighting_values(&mut self, weighting_values: &'a [f64]) -> &mut Self {
        self.weighting_values = Some(weighting_values);
        self
    }

    pub fn column_inputs(&mut self, column_inputs: ColumnInputs<'a>) -> &mut Self {
        self.column_inputs = Some(column_inputs);
        self
    }
}

/// Mean of the up to four raster cells sharing the vertex that hold a finite result.
fn vertex_value(
    aggregated_values: &Array2<f64>,
    projected_cells: &[CellWeights],
    map_size: (usize, usize),
    vi: usize,
    vj: usize,
) -> f64 {
    let (nx, ny) = map_size;
    let i_range = vi.saturating_sub(1)..(vi + 1).min(nx);
    let mut calculator = WeightedMeanCalculator::default();
    for j in vj.saturating_sub(1)..(vj + 1).min(ny) {
        for i in i_range.clone() {
            let value = aggregated_values[(i, j)];
            if !projected_cells[i + j * nx].is_empty() && value.is_finite() {
                calculator.add(value, 1.0);
            }
        }
    }
    if calculator.valid_aggregated_weight() {
        calculator.weighted_mean()
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::HexGridPart;

    // 2x2x2 cells of 10x10x1, value 10 * i + k + 1.
    fn grid() -> HexGridPart {
        HexGridPart::regular([2, 2, 2], [0.0, 0.0, 0.0], [10.0, 10.0, 1.0])
    }

    fn values(grid: &HexGridPart) -> Vec<f64> {
        let mut values = vec![0.0; 8];
        for k in 0..2 {
            for j in 0..2 {
                for i in 0..2 {
                    values[grid.element_index(i, j, k)] = 10.0 * i as f64 + k as f64 + 1.0;
                }
            }
        }
        values
    }

    fn settings(aggregation: ResultAggregation) -> ContourMapSettings {
        ContourMapSettings {
            aggregation,
            relative_sample_spacing: 1.0,
        }
    }

    fn project(
        grid: &HexGridPart,
        visibility: &[bool],
        values: &[f64],
        aggregation: ResultAggregation,
    ) -> ContourMapProjection {
        let settings = settings(aggregation);
        ContourMapProjectionBuilder::default()
            .grid(grid)
            .visibility(visibility)
            .cell_values(values)
            .settings(&settings)
            .build()
            .unwrap()
    }

    #[test]
    fn test_map_sizing() {
        let grid = grid();
        let visibility = vec![true; 8];
        let values = values(&grid);
        let projection = project(&grid, &visibility, &values, ResultAggregation::Mean);
        assert_eq!(projection.map_size(), (2, 2));
        assert!((projection.sample_spacing() - 10.0).abs() < 1e-12);
        assert_eq!(projection.origin(), (0.0, 0.0));

        let projection = ContourMapProjectionBuilder::default()
            .grid(&grid)
            .visibility(&visibility)
            .cell_values(&values)
            .build()
            .unwrap();
        assert!((projection.sample_spacing() - 7.5).abs() < 1e-12);
        assert_eq!(projection.map_size(), (3, 3));
    }

    #[test]
    fn test_value_aggregations() {
        let grid = grid();
        let visibility = vec![true; 8];
        let values = values(&grid);
        let check = |aggregation, expected: [f64; 2]| {
            let projection = project(&grid, &visibility, &values, aggregation);
            assert!((projection.value_at(0, 1) - expected[0]).abs() < 1e-9);
            assert!((projection.value_at(1, 0) - expected[1]).abs() < 1e-9);
        };
        check(ResultAggregation::Mean, [1.5, 11.5]);
        check(ResultAggregation::TopValue, [1.0, 11.0]);
        check(ResultAggregation::MinValue, [1.0, 11.0]);
        check(ResultAggregation::MaxValue, [2.0, 12.0]);
        check(ResultAggregation::Sum, [3.0, 23.0]);
    }

    #[test]
    fn test_cells_ordered_by_k() {
        let grid = grid();
        let visibility = vec![true; 8];
        let values = values(&grid);
        let projection = project(&grid, &visibility, &values, ResultAggregation::Mean);
        let cells: Vec<usize> = projection.cells_at(1, 1).iter().map(|(cell, _)| *cell).collect();
        assert_eq!(cells, vec![grid.element_index(1, 1, 0), grid.element_index(1, 1, 1)]);
        for (_, weight) in projection.cells_at(1, 1) {
            assert!((weight - 100.0).abs() < 1e-9);
        }
        assert!(projection.cells_at(5, 0).is_empty());
    }

    #[test]
    fn test_invisible_and_non_finite_cells_give_no_data() {
        let grid = grid();
        let mut visibility = vec![true; 8];
        visibility[grid.element_index(0, 0, 0)] = false;
        visibility[grid.element_index(0, 0, 1)] = false;
        let mut values = values(&grid);
        values[grid.element_index(1, 1, 0)] = f64::INFINITY;
        values[grid.element_index(1, 1, 1)] = f64::NAN;

        for aggregation in [
            ResultAggregation::Mean,
            ResultAggregation::Sum,
            ResultAggregation::TopValue,
            ResultAggregation::VolumeWeightedSum,
        ] {
            let projection = project(&grid, &visibility, &values, aggregation);
            assert!(!projection.has_result_in_cell(0, 0));
            assert_eq!(projection.value_at(0, 0), f64::INFINITY);
            assert!(projection.has_result_in_cell(1, 1));
            assert_eq!(projection.value_at(1, 1), f64::INFINITY);
        }
    }

    #[test]
    fn test_top_value_skips_non_finite() {
        let grid = grid();
        let visibility = vec![true; 8];
        let mut values = values(&grid);
        values[grid.element_index(0, 0, 0)] = f64::INFINITY;
        let projection = project(&grid, &visibility, &values, ResultAggregation::TopValue);
        assert_eq!(projection.value_at(0, 0), 2.0);
    }

    #[test]
    fn test_parameter_weighting() {
        let grid = grid();
        let visibility = vec![true; 8];
        let values = values(&grid);
        let settings = settings(ResultAggregation::Mean);
        let mut weights = vec![1.0; 8];
        weights[grid.element_index(0, 0, 0)] = 3.0;
        weights[grid.element_index(0, 1, 1)] = 1e-7;
        let projection = ContourMapProjectionBuilder::default()
            .grid(&grid)
            .visibility(&visibility)
            .cell_values(&values)
            .settings(&settings)
            .weighting_values(&weights)
            .build()
            .unwrap();
        assert!((projection.value_at(0, 0) - 1.25).abs() < 1e-9);
        assert!((projection.value_at(0, 1) - 1.0).abs() < 1e-9);
        assert_eq!(projection.cells_at(0, 1).len(), 1);
    }

    #[test]
    fn test_column_aggregations() {
        let grid = grid();
        let visibility = vec![true; 8];
        let porosity = vec![0.2; 8];
        let net_to_gross = vec![1.0; 8];
        let dz = vec![1.0; 8];
        let oil = vec![0.5; 8];
        let gas = vec![0.25; 8];
        let inputs = ColumnInputs {
            porosity: &porosity,
            net_to_gross: &net_to_gross,
            dz: &dz,
            oil_saturation: Some(&oil),
            gas_saturation: Some(&gas),
        };
        let column = |aggregation| {
            let settings = settings(aggregation);
            ContourMapProjectionBuilder::default()
                .grid(&grid)
                .visibility(&visibility)
                .settings(&settings)
                .column_inputs(inputs)
                .build()
                .unwrap()
                .value_at(1, 1)
        };
        assert!((column(ResultAggregation::OilColumn) - 0.2).abs() < 1e-9);
        assert!((column(ResultAggregation::GasColumn) - 0.1).abs() < 1e-9);
        assert!((column(ResultAggregation::HydrocarbonColumn) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_vertex_values_and_range() {
        let grid = grid();
        let visibility = vec![true; 8];
        let values = values(&grid);
        let projection = project(&grid, &visibility, &values, ResultAggregation::Mean);
        assert_eq!(projection.vertex_values().dim(), (3, 3));
        assert!((projection.vertex_values()[(0, 0)] - 1.5).abs() < 1e-9);
        assert!((projection.vertex_values()[(1, 1)] - 6.5).abs() < 1e-9);
        assert!((projection.vertex_values()[(2, 2)] - 11.5).abs() < 1e-9);
        let (min, max) = projection.value_range().unwrap().unwrap();
        assert!((min - 1.5).abs() < 1e-9);
        assert!((max - 11.5).abs() < 1e-9);

        let hidden = vec![false; 8];
        let empty = project(&grid, &hidden, &values, ResultAggregation::Mean);
        assert_eq!(empty.value_range().unwrap(), None);
        assert_eq!(empty.vertex_values()[(1, 1)], f64::INFINITY);
    }

    #[test]
    fn test_builder_errors() {
        let grid = grid();
        let visibility = vec![true; 8];
        let values = values(&grid);
        assert!(matches!(
            ContourMapProjectionBuilder::default()
                .visibility(&visibility)
                .build(),
            Err(ContourMapError::UninitializedFieldError(field)) if field == "grid"
        ));
        assert!(matches!(
            ContourMapProjectionBuilder::default()
                .grid(&grid)
                .visibility(&visibility[..4])
                .cell_values(&values)
                .build(),
            Err(ContourMapError::LengthMismatch(_, 4, 8))
        ));
        let settings = settings(ResultAggregation::OilColumn);
        assert!(matches!(
            ContourMapProjectionBuilder::default()
                .grid(&grid)
                .visibility(&visibility)
                .settings(&settings)
                .build(),
            Err(ContourMapError::MissingColumnInputs(ResultAggregation::OilColumn))
        ));
        let settings = ContourMapSettings {
            aggregation: ResultAggregation::Mean,
            relative_sample_spacing: 0.0,
        };
        assert!(matches!(
            ContourMapProjectionBuilder::default()
                .grid(&grid)
                .visibility(&visibility)
                .cell_values(&values)
                .settings(&settings)
                .build(),
            Err(ContourMapError::InvalidSampleSpacing(_))
        ));
    }

    #[test]
    fn test_settings_builder_defaults() {
        let settings = ContourMapSettingsBuilder::default()
            .aggregation(ResultAggregation::TopValue)
            .build()
            .unwrap();
        assert_eq!(settings.aggregation, ResultAggregation::TopValue);
        assert!((settings.relative_sample_spacing - 0.75).abs() < 1e-12);
    }
}
