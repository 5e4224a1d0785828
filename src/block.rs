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
use crate::axis::{AxisGeometry, AxisMapping};
use crate::filters::{DOWN_TAPS, LUMA_UP_TAPS};
use crate::images::PlaneBuffer;
use crate::numerics::clip;
use crate::scaling_parameters::UNITY_SCALE;
use crate::yuv_support::{BlockRect, ScaleAxis, ScalingDirection};
use std::ops::RangeInclusive;

/// Computes `block` of the target plane directly with a 2-D kernel, the product of
/// the horizontal and vertical filters.
///
/// `source` is the whole source plane, the block is written with its top left corner
/// at `target_origin`. Integer accumulation makes the result identical to the
/// separable passes.
pub(crate) fn resample_block_2d(
    source: &PlaneBuffer,
    horizontal: &AxisGeometry,
    vertical: &AxisGeometry,
    direction: ScalingDirection,
    block: BlockRect,
    target: &mut PlaneBuffer,
    target_origin: (usize, usize),
) {
    let columns = (block.x..block.right())
        .map(|x| horizontal.window(x))
        .collect::<Vec<_>>();
    let (origin_x, origin_y) = target_origin;

    for (row, y) in (block.y..block.bottom()).enumerate() {
        let (taps_y, first_y) = vertical.window(y);
        let dst_row = &mut target.row_mut(origin_y + row)[origin_x..origin_x + block.width];
        for (dst, &(taps_x, first_x)) in dst_row.iter_mut().zip(columns.iter()) {
            let mut acc = 0i32;
            for (j, &coeff_y) in taps_y.iter().enumerate() {
                let src_row = source.row(vertical.clamp(first_y + j as i32));
                for (i, &coeff_x) in taps_x.iter().enumerate() {
                    let sample = src_row[horizontal.clamp(first_x + i as i32)];
                    acc = acc.wrapping_add(coeff_x.wrapping_mul(coeff_y).wrapping_mul(sample));
                }
            }
            *dst = direction.rescale(acc);
        }
    }
}

/// Runs one pass of the separable filter over `block`.
///
/// Horizontal pass: `block` spans target columns and source rows, unscaled
/// accumulators are written. Vertical pass: `block` spans target columns and target
/// rows, the source holds horizontal accumulators and results are rescaled into
/// `[0, 255]`.
///
/// `source_origin` is the picture position of the first source sample, so a source
/// that only holds the resident window can be addressed with picture coordinates.
#[allow(clippy::too_many_arguments)]
pub(crate) fn resample_block_step(
    source: &PlaneBuffer,
    source_origin: (usize, usize),
    geometry: &AxisGeometry,
    axis: ScaleAxis,
    direction: ScalingDirection,
    block: BlockRect,
    target: &mut PlaneBuffer,
    target_origin: (usize, usize),
) {
    let (source_x, source_y) = source_origin;
    let (origin_x, origin_y) = target_origin;
    match axis {
        ScaleAxis::Horizontal => {
            for (row, y) in (block.y..block.bottom()).enumerate() {
                let src_row = source.row(y - source_y);
                let dst_row =
                    &mut target.row_mut(origin_y + row)[origin_x..origin_x + block.width];
                for (dst, x) in dst_row.iter_mut().zip(block.x..block.right()) {
                    *dst = geometry.convolve(x, |sx| src_row[sx - source_x]);
                }
            }
        }
        ScaleAxis::Vertical => {
            for (row, y) in (block.y..block.bottom()).enumerate() {
                let (taps, first) = geometry.window(y);
                let dst_row =
                    &mut target.row_mut(origin_y + row)[origin_x..origin_x + block.width];
                for (dst, x) in dst_row.iter_mut().zip(block.x..block.right()) {
                    let column = x - source_x;
                    let acc = taps.iter().enumerate().fold(0i32, |acc, (k, &coeff)| {
                        let sy = geometry.clamp(first + k as i32) - source_y;
                        acc.wrapping_add(coeff.wrapping_mul(source.sample(column, sy)))
                    });
                    *dst = direction.rescale(acc);
                }
            }
        }
    }
}

/// Source samples the filter footprint of target samples `low..=high` can reach,
/// clipped into a source axis of `extent` samples.
///
/// A unity axis maps target indices onto themselves.
pub(crate) fn source_range(
    mapping: &AxisMapping,
    low: usize,
    high: usize,
    extent: i32,
) -> RangeInclusive<usize> {
    if mapping.is_unity() {
        return low..=high;
    }
    let taps = if mapping.scale() < UNITY_SCALE {
        LUMA_UP_TAPS
    } else {
        DOWN_TAPS
    } as i32;
    let first = (mapping.position_16(low) >> 4) - (taps >> 1) + 1;
    let last = (mapping.position_16(high) >> 4) - (taps >> 1) + taps;
    let max = (extent - 1).max(0);
    clip(first, 0, max) as usize..=clip(last, 0, max) as usize
}
