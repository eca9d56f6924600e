// reservoir-core/src/contour/geometry.rs

use crate::visibility::{ElementGrid, HexGridPart};
use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(p: [f64; 3]) -> Self {
        Vec3::new(p[0], p[1], p[2])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Vec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Vec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounding_box = Self::default();
        for point in points {
            bounding_box.add(point);
        }
        bounding_box
    }

    pub fn add(&mut self, point: &Vec3) {
        self.min = Vec3::new(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = Vec3::new(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    pub fn add_box(&mut self, other: &BoundingBox) {
        if other.is_valid() {
            self.add(&other.min);
            self.add(&other.max);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    pub fn clamp(&self, point: &Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }
}

/// Corner numbering: 0-3 one face counter-clockwise, 4-7 the opposite face
/// in the same order.
pub type HexCorners = [Vec3; 8];

const HEX_FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
];

/// Geometry of a hexahedral grid as seen by the map projection.
pub trait HexGeometry: Sync {
    fn cell_count(&self) -> usize;

    fn cell_corners(&self, cell: usize) -> HexCorners;

    /// K layer of a cell, smaller is shallower.
    fn cell_k(&self, cell: usize) -> usize;

    fn cell_bounding_box(&self, cell: usize) -> BoundingBox {
        BoundingBox::from_points(&self.cell_corners(cell))
    }
}

impl HexGeometry for HexGridPart {
    fn cell_count(&self) -> usize {
        self.element_count()
    }

    fn cell_corners(&self, cell: usize) -> HexCorners {
        let nodes = self.element_nodes(cell);
        let mut corners = [Vec3::default(); 8];
        for (corner, &node) in corners.iter_mut().zip(nodes) {
            *corner = Vec3::from(self.node(node));
        }
        corners
    }

    fn cell_k(&self, cell: usize) -> usize {
        self.ijk_from_element_index(cell).map_or(0, |[_, _, k]| k)
    }
}

fn tetrahedron_signed_volume(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> f64 {
    (b - a).dot(&(c - a).cross(&(d - a))) / 6.0
}

/// Volume from six tetrahedra sharing the 0-6 diagonal.
pub fn hex_volume(corners: &HexCorners) -> f64 {
    const TETRAHEDRA: [[usize; 3]; 6] = [
        [1, 2, 6],
        [2, 3, 6],
        [3, 7, 6],
        [7, 4, 6],
        [4, 5, 6],
        [5, 1, 6],
    ];
    let origin = corners[0];
    TETRAHEDRA
        .iter()
        .map(|[a, b, c]| {
            tetrahedron_signed_volume(origin, corners[*a], corners[*b], corners[*c])
        })
        .sum::<f64>()
        .abs()
}

/// Plane through the first three distinct corners of a face, as a point and a
/// normal. `None` for degenerate faces.
fn face_plane(face: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let mut points: Vec<Vec3> = Vec::with_capacity(face.len());
    for corner in face {
        if points.last() != Some(corner) {
            points.push(*corner);
        }
    }
    if points.len() < 3 {
        return None;
    }
    let normal = (points[1] - points[0]).cross(&(points[2] - points[0]));
    if normal.dot(&normal) < 1e-24 {
        return None;
    }
    Some((points[0], normal))
}

/// Height of `plane` above `(x, y)` if the vertical line hits it within
/// `[min_z, max_z]`.
fn plane_height(plane: &(Vec3, Vec3), x: f64, y: f64, min_z: f64, max_z: f64) -> Option<f64> {
    let (origin, normal) = plane;
    if normal.z.abs() < 1e-12 {
        return None;
    }
    let z = origin.z - (normal.x * (x - origin.x) + normal.y * (y - origin.y)) / normal.z;
    (min_z..=max_z).contains(&z).then_some(z)
}

/// Approximate volume of the part of the cell inside `bounding_box`. Corners
/// are clamped horizontally and then dropped back onto the plane of their
/// own face, so dipping faces keep their slope. Exact for cells with planar
/// faces spanning the full height of the box.
pub fn overlap_volume(corners: &HexCorners, bounding_box: &BoundingBox) -> f64 {
    let planes = [face_plane(&corners[0..4]), face_plane(&corners[4..8])];
    let mut clamped = *corners;
    for (index, corner) in clamped.iter_mut().enumerate() {
        *corner = bounding_box.clamp(corner);
        if let Some(plane) = &planes[index / 4] {
            if let Some(z) = plane_height(
                plane,
                corner.x,
                corner.y,
                bounding_box.min.z,
                bounding_box.max.z,
            ) {
                corner.z = z;
            }
        }
    }
    hex_volume(&clamped)
}

/// Height at `(x, y)` of the triangle `a b c` if the point lies inside its
/// horizontal projection.
fn vertical_hit(a: Vec3, b: Vec3, c: Vec3, x: f64, y: f64) -> Option<f64> {
    let denominator = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
    if denominator.abs() < 1e-12 {
        return None;
    }
    let wa = ((b.y - c.y) * (x - c.x) + (c.x - b.x) * (y - c.y)) / denominator;
    let wb = ((c.y - a.y) * (x - c.x) + (a.x - c.x) * (y - c.y)) / denominator;
    let wc = 1.0 - wa - wb;
    const EPS: f64 = -1e-9;
    if wa < EPS || wb < EPS || wc < EPS {
        return None;
    }
    Some(wa * a.z + wb * b.z + wc * c.z)
}

/// Length of the vertical line through `(x, y)` inside the cell.
pub fn vertical_ray_length(corners: &HexCorners, x: f64, y: f64) -> f64 {
    let mut lowest = f64::INFINITY;
    let mut highest = f64::NEG_INFINITY;
    for face in HEX_FACES.iter() {
        let [p0, p1, p2, p3] = face.map(|corner| corners[corner]);
        for (a, b, c) in [(p0, p1, p2), (p0, p2, p3)] {
            if let Some(z) = vertical_hit(a, b, c, x, y) {
                lowest = lowest.min(z);
                highest = highest.max(z);
            }
        }
    }
    if highest > lowest {
        highest - lowest
    } else {
        0.0
    }
}

/// Uniform 2-D bucket grid over cell bounding boxes.
pub struct CellSearchIndex {
    origin: (f64, f64),
    bucket_size: f64,
    bucket_counts: (usize, usize),
    buckets: Vec<Vec<usize>>,
    cell_boxes: Vec<BoundingBox>,
}

impl CellSearchIndex {
    pub fn new(geometry: &dyn HexGeometry) -> Self {
        let cell_boxes: Vec<BoundingBox> = (0..geometry.cell_count())
            .map(|cell| geometry.cell_bounding_box(cell))
            .collect();
        let mut grid_box = BoundingBox::default();
        let mut summed_size = 0.0;
        for cell_box in &cell_boxes {
            grid_box.add_box(cell_box);
            let extent = cell_box.extent();
            summed_size += extent.x.max(extent.y);
        }
        let bucket_size = if cell_boxes.is_empty() || summed_size <= 0.0 {
            1.0
        } else {
            summed_size / cell_boxes.len() as f64
        };
        let extent = if grid_box.is_valid() {
            grid_box.extent()
        } else {
            Vec3::default()
        };
        let bucket_counts = (
            (extent.x / bucket_size).floor() as usize + 1,
            (extent.y / bucket_size).floor() as usize + 1,
        );
        let origin = if grid_box.is_valid() {
            (grid_box.min.x, grid_box.min.y)
        } else {
            (0.0, 0.0)
        };
        let mut index = Self {
            origin,
            bucket_size,
            bucket_counts,
            buckets: vec![Vec::new(); bucket_counts.0 * bucket_counts.1],
            cell_boxes,
        };
        for cell in 0..index.cell_boxes.len() {
            let cell_box = index.cell_boxes[cell];
            let (i_range, j_range) = index.bucket_ranges(&cell_box);
            for j in j_range {
                for i in i_range.clone() {
                    index.buckets[i + j * bucket_counts.0].push(cell);
                }
            }
        }
        index
    }

    fn bucket_ranges(
        &self,
        query: &BoundingBox,
    ) -> (std::ops::RangeInclusive<usize>, std::ops::RangeInclusive<usize>) {
        let bucket = |value: f64, origin: f64, count: usize| -> usize {
            let position = ((value - origin) / self.bucket_size).floor();
            if position <= 0.0 {
                0
            } else {
                (position as usize).min(count - 1)
            }
        };
        let (ni, nj) = self.bucket_counts;
        (
            bucket(query.min.x, self.origin.0, ni)..=bucket(query.max.x, self.origin.0, ni),
            bucket(query.min.y, self.origin.1, nj)..=bucket(query.max.y, self.origin.1, nj),
        )
    }

    /// Cells whose bounding box intersects `query`, ascending.
    pub fn find_intersecting_cells(&self, query: &BoundingBox) -> Vec<usize> {
        let (i_range, j_range) = self.bucket_ranges(query);
        let mut cells = Vec::new();
        for j in j_range {
            for i in i_range.clone() {
                cells.extend(
                    self.buckets[i + j * self.bucket_counts.0]
                        .iter()
                        .copied()
                        .filter(|&cell| self.cell_boxes[cell].intersects(query)),
                );
            }
        }
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    pub fn cell_box(&self, cell: usize) -> &BoundingBox {
        &self.cell_boxes[cell]
    }
}
