/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::axis::AxisGeometry;
use crate::images::PlaneBuffer;
use crate::yuv_support::ScalingDirection;

/// Resamples a working plane in place, horizontal pass first.
///
/// The source occupies the top left corner of `plane` and `source_height` rows of it
/// are filtered horizontally. The result lands in the top left
/// `target_width` x `target_height` corner, clipped into `[0, 255]`.
///
/// # Panics
///
/// The plane must be at least as large as both source and target along each axis.
pub(crate) fn resample_plane(
    plane: &mut PlaneBuffer,
    horizontal: &AxisGeometry,
    vertical: &AxisGeometry,
    direction: ScalingDirection,
    target_width: usize,
    target_height: usize,
    source_height: usize,
) {
    let (stride, data, scratch) = plane.working_parts();
    assert!(
        target_width <= stride && scratch.len() >= target_width.max(target_height),
        "Working plane {}x{} cannot hold target {}x{}",
        stride,
        data.len() / stride.max(1),
        target_width,
        target_height
    );

    let tmp_row = &mut scratch[..target_width];
    for row in data.chunks_exact_mut(stride).take(source_height) {
        for (j, dst) in tmp_row.iter_mut().enumerate() {
            *dst = horizontal.convolve(j, |x| row[x]);
        }
        row[..target_width].copy_from_slice(tmp_row);
    }

    let tmp_col = &mut scratch[..target_height];
    for x in 0..target_width {
        for (j, dst) in tmp_col.iter_mut().enumerate() {
            let acc = vertical.convolve(j, |y| data[y * stride + x]);
            *dst = direction.rescale(acc);
        }
        for (y, &v) in tmp_col.iter().enumerate() {
            data[y * stride + x] = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaling_parameters::ScalingParameters;
    use crate::yuv_support::{ChromaFormat, PlaneKind, ScaleAxis};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn geometries(
        params: &ScalingParameters,
        direction: ScalingDirection,
    ) -> (AxisGeometry, AxisGeometry) {
        (
            AxisGeometry::rounded(params, ScaleAxis::Horizontal, direction, PlaneKind::Luma),
            AxisGeometry::rounded(params, ScaleAxis::Vertical, direction, PlaneKind::Luma),
        )
    }

    /// Straightforward two pass filter over separate buffers
    fn reference_resample(
        source: &PlaneBuffer,
        horizontal: &AxisGeometry,
        vertical: &AxisGeometry,
        direction: ScalingDirection,
        target_width: usize,
        target_height: usize,
    ) -> Vec<i32> {
        let mut rows = vec![vec![0i32; target_width]; source.height()];
        for (y, row) in rows.iter_mut().enumerate() {
            for (x, dst) in row.iter_mut().enumerate() {
                *dst = horizontal.convolve(x, |sx| source.sample(sx, y));
            }
        }
        let mut out = vec![0i32; target_width * target_height];
        for y in 0..target_height {
            for x in 0..target_width {
                let acc = vertical.convolve(y, |sy| rows[sy][x]);
                out[y * target_width + x] = direction.rescale(acc);
            }
        }
        out
    }

    #[test]
    fn test_in_place_matches_reference() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for (src, dst, direction) in [
            ((48usize, 40usize), (24usize, 20usize), ScalingDirection::Downscale),
            ((24, 20), (40, 36), ScalingDirection::Upscale),
        ] {
            let params = ScalingParameters::new(
                src.0 as u32,
                src.1 as u32,
                dst.0 as u32,
                dst.1 as u32,
                ChromaFormat::Yuv400,
            );
            let (horizontal, vertical) = geometries(&params, direction);
            let mut source = PlaneBuffer::new(src.0, src.1, false);
            for v in source.data_mut().iter_mut() {
                *v = rng.random_range(0..256);
            }
            let target_width = params.rounded_target_width as usize;
            let target_height = params.rounded_target_height as usize;
            let expected = reference_resample(
                &source,
                &horizontal,
                &vertical,
                direction,
                target_width,
                target_height,
            );

            let mut working = PlaneBuffer::new(
                target_width.max(src.0),
                target_height.max(src.1),
                true,
            );
            working.copy_from(&source, true);
            resample_plane(
                &mut working,
                &horizontal,
                &vertical,
                direction,
                target_width,
                target_height,
                src.1,
            );
            for y in 0..target_height {
                assert_eq!(
                    &working.row(y)[..target_width],
                    &expected[y * target_width..(y + 1) * target_width],
                    "Row {y} differs for {:?}",
                    direction
                );
            }
        }
    }

    #[test]
    fn test_constant_plane_stays_constant() {
        let params = ScalingParameters::new(37, 29, 16, 13, ChromaFormat::Yuv400);
        let (horizontal, vertical) = geometries(&params, ScalingDirection::Downscale);
        let mut working = PlaneBuffer::new(37, 32, true);
        working.data_mut().fill(201);
        resample_plane(
            &mut working,
            &horizontal,
            &vertical,
            ScalingDirection::Downscale,
            16,
            16,
            29,
        );
        for y in 0..16 {
            assert!(working.row(y)[..16].iter().all(|&v| v == 201));
        }
    }
}
