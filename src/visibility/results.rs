// reservoir-core/src/visibility/results.rs

use std::collections::HashMap;

/// Where the values of a result live on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultPosition {
    /// One value per element.
    Element,
    /// One value per node, indexed by node id.
    Node,
    /// One value per element corner, `element * 8 + local_node`.
    ElementNode,
    /// One value per element face corner, `element * 24 + face * 4 + local_node`.
    ElementNodeFace,
    /// Discrete formation code per element.
    Formation,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResultAddress {
    pub position: ResultPosition,
    pub field_name: String,
    pub component_name: String,
}

impl ResultAddress {
    pub fn new(position: ResultPosition, field_name: &str, component_name: &str) -> Self {
        Self {
            position,
            field_name: field_name.to_string(),
            component_name: component_name.to_string(),
        }
    }
}

pub trait ResultValueProvider: Sync {
    fn result_values(
        &self,
        address: &ResultAddress,
        part_id: usize,
        time_step: usize,
        frame: usize,
    ) -> Option<&[f32]>;

    /// Maps a view step onto `(time_step, frame)`.
    fn time_step_and_frame(&self, view_step: usize) -> (usize, usize) {
        (view_step, 0)
    }
}

type ResultKey = (ResultAddress, usize, usize, usize);

/// Result values held in memory.
#[derive(Debug)]
pub struct MemoryResults {
    frames_per_time_step: usize,
    values: HashMap<ResultKey, Vec<f32>>,
}

impl Default for MemoryResults {
    fn default() -> Self {
        Self {
            frames_per_time_step: 1,
            values: HashMap::new(),
        }
    }
}

impl MemoryResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// View steps enumerate every frame of every time step.
    pub fn with_frames_per_time_step(mut self, frames: usize) -> Self {
        self.frames_per_time_step = frames.max(1);
        self
    }

    pub fn insert(
        &mut self,
        address: &ResultAddress,
        part_id: usize,
        time_step: usize,
        frame: usize,
        values: Vec<f32>,
    ) -> &mut Self {
        self.values
            .insert((address.clone(), part_id, time_step, frame), values);
        self
    }
}

impl ResultValueProvider for MemoryResults {
    fn result_values(
        &self,
        address: &ResultAddress,
        part_id: usize,
        time_step: usize,
        frame: usize,
    ) -> Option<&[f32]> {
        self.values
            .get(&(address.clone(), part_id, time_step, frame))
            .map(Vec::as_slice)
    }

    fn time_step_and_frame(&self, view_step: usize) -> (usize, usize) {
        (
            view_step / self.frames_per_time_step,
            view_step % self.frames_per_time_step,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_step_mapping() {
        let results = MemoryResults::new().with_frames_per_time_step(3);
        assert_eq!(results.time_step_and_frame(0), (0, 0));
        assert_eq!(results.time_step_and_frame(4), (1, 1));
        assert_eq!(MemoryResults::new().time_step_and_frame(4), (4, 0));
    }

    #[test]
    fn test_lookup() {
        let address = ResultAddress::new(ResultPosition::Node, "U", "U_MAGN");
        let mut results = MemoryResults::new();
        results.insert(&address, 0, 1, 0, vec![1.0, 2.0]);
        assert_eq!(results.result_values(&address, 0, 1, 0), Some(&[1.0f32, 2.0][..]));
        assert_eq!(results.result_values(&address, 1, 1, 0), None);
    }
}
