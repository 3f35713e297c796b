//! Whole-image helpers on top of the per-iMCU-row driver

use jpegli_core::{
    BlockRowsMut, BlockStore, CoeffBlock, CoefficientBuffers, CoefficientPlane, ComponentInfo,
};
use jpegli_dct::{DctKernel, DctParams};
use log::debug;
use rayon::prelude::*;

/// Number of iMCU rows needed to cover every component
pub fn imcu_rows(components: &[ComponentInfo]) -> usize {
    components.iter().map(|c| c.imcu_rows()).max().unwrap_or(0)
}

/// Run every iMCU row in order through the best kernel set
pub fn compute_all_coefficients(params: &DctParams<'_>, store: &mut dyn BlockStore) {
    compute_all_coefficients_with(DctKernel::best(), params, store)
}

/// Run every iMCU row in order through `kernel`
pub fn compute_all_coefficients_with(kernel: &DctKernel, params: &DctParams<'_>, store: &mut dyn BlockStore) {
    let rows = params.imcu_rows();
    debug!(
        "Computing {} iMCU rows for {} components ({})",
        rows,
        params.components().len(),
        kernel.level()
    );
    for imcu_row in 0..rows {
        kernel.compute_dct_coefficients(params, imcu_row, store);
    }
}

/// One iMCU band of a single component plane
struct BandStore<'a> {
    blocks: &'a mut [CoeffBlock],
    width_in_blocks: usize,
    first_row: usize,
}

impl BlockStore for BandStore<'_> {
    fn block_rows_mut(&mut self, component: usize, start_row: usize, num_rows: usize) -> BlockRowsMut<'_> {
        assert_eq!(component, 0, "band store only holds component 0");
        assert!(start_row >= self.first_row, "block row {} precedes band", start_row);
        let start = (start_row - self.first_row) * self.width_in_blocks;
        let end = start + num_rows * self.width_in_blocks;
        BlockRowsMut::new(&mut self.blocks[start..end], self.width_in_blocks)
    }
}

/// Compute every component on the rayon pool
///
/// Components run in parallel, and so do the iMCU bands within each
/// component: a band covers `v_samp_factor` block rows, which no other band
/// touches. Output matches [`compute_all_coefficients`] exactly.
pub fn compute_all_coefficients_parallel(params: &DctParams<'_>) -> CoefficientBuffers {
    let kernel = DctKernel::best();
    debug!(
        "Computing {} components in parallel ({})",
        params.components().len(),
        kernel.level()
    );

    let planes = params
        .components()
        .par_iter()
        .enumerate()
        .map(|(c, comp)| {
            let info = &comp.info;
            let single = params.component_params(c);
            let mut plane = CoefficientPlane::for_component(info);
            let band = info.width_in_blocks * info.v_samp_factor;

            plane
                .blocks_mut()
                .par_chunks_mut(band)
                .enumerate()
                .for_each(|(imcu_row, blocks)| {
                    let mut store = BandStore {
                        blocks,
                        width_in_blocks: info.width_in_blocks,
                        first_row: imcu_row * info.v_samp_factor,
                    };
                    kernel.compute_dct_coefficients(&single, imcu_row, &mut store);
                });
            plane
        })
        .collect();
    CoefficientBuffers::from_planes(planes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imcu_rows_uses_tallest_component() {
        let luma = ComponentInfo::new(2, 2, 2, 2, 48, 40).unwrap();
        let chroma = ComponentInfo::new(1, 1, 2, 2, 48, 40).unwrap();
        assert_eq!(luma.height_in_blocks, 5);
        assert_eq!(chroma.height_in_blocks, 3);
        assert_eq!(imcu_rows(&[luma, chroma]), 3);
        assert_eq!(imcu_rows(&[]), 0);
    }

    #[test]
    fn test_band_store_offsets_rows() {
        let mut blocks = vec![[0i16; 64]; 6];
        let mut store = BandStore {
            blocks: &mut blocks,
            width_in_blocks: 3,
            first_row: 4,
        };
        store.block_rows_mut(0, 5, 1).row_mut(0)[2][0] = 9;
        assert_eq!(blocks[5][0], 9);
    }
}
