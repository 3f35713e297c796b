//! Coefficient block storage
//!
//! The transform stage never owns the coefficient planes. It asks a
//! [`BlockStore`] for a window of block rows, fills it, and drops the window
//! before returning. This allows stores that only keep a band of rows
//! resident as well as the simple in-memory [`CoefficientBuffers`].

use crate::consts::DCT_BLOCK_SIZE;
use crate::types::{CoeffBlock, ComponentInfo};

/// Writable window over consecutive block rows of one component
pub struct BlockRowsMut<'a> {
    blocks: &'a mut [CoeffBlock],
    width_in_blocks: usize,
}

impl<'a> BlockRowsMut<'a> {
    /// Wrap `blocks`, which must hold a whole number of rows
    pub fn new(blocks: &'a mut [CoeffBlock], width_in_blocks: usize) -> Self {
        assert!(width_in_blocks > 0, "block rows must be at least one block wide");
        assert_eq!(
            blocks.len() % width_in_blocks,
            0,
            "window does not hold whole block rows"
        );
        Self {
            blocks,
            width_in_blocks,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.blocks.len() / self.width_in_blocks
    }

    pub fn width_in_blocks(&self) -> usize {
        self.width_in_blocks
    }

    /// Blocks of row `iy` relative to the start of the window
    pub fn row_mut(&mut self, iy: usize) -> &mut [CoeffBlock] {
        let start = iy * self.width_in_blocks;
        &mut self.blocks[start..start + self.width_in_blocks]
    }
}

/// Externally owned storage for quantized coefficient blocks
pub trait BlockStore {
    /// Window over `num_rows` block rows of `component` starting at `start_row`
    ///
    /// Requests outside the component's block grid are a programming error
    /// and implementations are expected to panic.
    fn block_rows_mut(
        &mut self,
        component: usize,
        start_row: usize,
        num_rows: usize,
    ) -> BlockRowsMut<'_>;
}

/// In-memory coefficient plane of one component
#[derive(Debug, Clone)]
pub struct CoefficientPlane {
    blocks: Vec<CoeffBlock>,
    width_in_blocks: usize,
    height_in_blocks: usize,
}

impl CoefficientPlane {
    pub fn new(width_in_blocks: usize, height_in_blocks: usize) -> Self {
        Self {
            blocks: vec![[0; DCT_BLOCK_SIZE]; width_in_blocks * height_in_blocks],
            width_in_blocks,
            height_in_blocks,
        }
    }

    pub fn for_component(info: &ComponentInfo) -> Self {
        Self::new(info.width_in_blocks, info.height_in_blocks)
    }

    pub fn width_in_blocks(&self) -> usize {
        self.width_in_blocks
    }

    pub fn height_in_blocks(&self) -> usize {
        self.height_in_blocks
    }

    pub fn block(&self, bx: usize, by: usize) -> &CoeffBlock {
        &self.blocks[by * self.width_in_blocks + bx]
    }

    pub fn blocks(&self) -> &[CoeffBlock] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [CoeffBlock] {
        &mut self.blocks
    }

    /// Window over `num_rows` rows starting at `start_row`
    pub fn rows_mut(&mut self, start_row: usize, num_rows: usize) -> BlockRowsMut<'_> {
        assert!(
            start_row + num_rows <= self.height_in_blocks,
            "block rows {}..{} out of range ({} rows)",
            start_row,
            start_row + num_rows,
            self.height_in_blocks
        );
        let start = start_row * self.width_in_blocks;
        let end = start + num_rows * self.width_in_blocks;
        BlockRowsMut::new(&mut self.blocks[start..end], self.width_in_blocks)
    }
}

/// A single plane serves as the store for a one-component pass
impl BlockStore for CoefficientPlane {
    fn block_rows_mut(
        &mut self,
        component: usize,
        start_row: usize,
        num_rows: usize,
    ) -> BlockRowsMut<'_> {
        assert_eq!(component, 0, "single-plane store only holds component 0");
        self.rows_mut(start_row, num_rows)
    }
}

/// In-memory coefficient planes for every component of a frame
#[derive(Debug, Clone)]
pub struct CoefficientBuffers {
    planes: Vec<CoefficientPlane>,
}

impl CoefficientBuffers {
    pub fn new(components: &[ComponentInfo]) -> Self {
        Self {
            planes: components.iter().map(CoefficientPlane::for_component).collect(),
        }
    }

    pub fn from_planes(planes: Vec<CoefficientPlane>) -> Self {
        Self { planes }
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn plane(&self, component: usize) -> &CoefficientPlane {
        &self.planes[component]
    }
}

impl BlockStore for CoefficientBuffers {
    fn block_rows_mut(
        &mut self,
        component: usize,
        start_row: usize,
        num_rows: usize,
    ) -> BlockRowsMut<'_> {
        self.planes[component].rows_mut(start_row, num_rows)
    }
}
