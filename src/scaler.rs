use rayon::prelude::*;

/// Per-axis source index for every destination pixel.
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }

    /// Whether this table was built for a `dst_w` x `dst_h` target.
    pub fn fits(&self, dst_w: usize, dst_h: usize) -> bool {
        self.src_x.len() == dst_w && self.src_y.len() == dst_h
    }
}

fn axis(dst: usize, src: usize) -> Vec<usize> {
    // Sample at pixel centres so the first and last source texels get equal coverage
    let scale = src as f32 / dst as f32;
    (0..dst)
        .map(|d| (((d as f32 + 0.5) * scale) as usize).min(src.saturating_sub(1)))
        .collect()
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    ScaleLut {
        src_x: axis(dst_w, src_w),
        src_y: axis(dst_h, src_h),
    }
}

/// Parallel nearest-neighbour stretch
/// Keeps the hard pixel edges of the low-res frame
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], sw: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dw).enumerate().for_each(|(y, dst_row)| {
        let row = lut.src_y[y] * sw;
        let src_row = &src[row..row + sw];
        for (px, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
            *px = src_row[sx];
        }
    });
}
