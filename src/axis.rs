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
use crate::filter_selector::select_filter;
use crate::filters::PolyphaseFilter;
use crate::numerics::clip;
use crate::scaling_parameters::{ScalingParameters, UNITY_SCALE};
use crate::yuv_support::{PlaneKind, ScaleAxis, ScalingDirection};

/// Maps target sample indices of one axis onto fractional source positions
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct AxisMapping {
    scale: i32,
    add: i32,
    shift: i32,
    delta: i32,
}

impl AxisMapping {
    pub(crate) fn new(params: &ScalingParameters, axis: ScaleAxis) -> AxisMapping {
        match axis {
            ScaleAxis::Horizontal => AxisMapping {
                scale: params.scale_x,
                add: params.add_x,
                shift: params.shift_x,
                delta: params.delta_x,
            },
            ScaleAxis::Vertical => AxisMapping {
                scale: params.scale_y,
                add: params.add_y,
                shift: params.shift_y,
                delta: params.delta_y,
            },
        }
    }

    #[inline]
    pub(crate) fn is_unity(&self) -> bool {
        self.scale == UNITY_SCALE
    }

    #[inline]
    pub(crate) fn scale(&self) -> i32 {
        self.scale
    }

    /// Source position of target sample `index` in 1/16 of a sample.
    ///
    /// The product is formed in unsigned 32 bit arithmetic and reinterpreted
    /// as signed after the shift.
    #[inline(always)]
    pub(crate) fn position_16(&self, index: usize) -> i32 {
        let position = (index as u32)
            .wrapping_mul(self.scale as u32)
            .wrapping_add(self.add as u32)
            >> (self.shift - 4);
        (position as i32).wrapping_sub(self.delta)
    }
}

/// Everything needed to filter one axis of one plane: the index mapping, the filter
/// family and the range source indices are clamped into.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct AxisGeometry {
    mapping: AxisMapping,
    filter: PolyphaseFilter,
    low: i32,
    high: i32,
}

impl AxisGeometry {
    /// Geometry over the padded source, filter band chosen against the rounded target
    pub(crate) fn rounded(
        params: &ScalingParameters,
        axis: ScaleAxis,
        direction: ScalingDirection,
        plane: PlaneKind,
    ) -> AxisGeometry {
        AxisGeometry::with_extents(
            params,
            axis,
            direction,
            plane,
            params.source_extent(axis),
            params.rounded_target_extent(axis),
        )
    }

    /// Geometry over the unpadded source, filter band chosen against the exact target
    pub(crate) fn exact(
        params: &ScalingParameters,
        axis: ScaleAxis,
        direction: ScalingDirection,
        plane: PlaneKind,
    ) -> AxisGeometry {
        let source_extent = match axis {
            ScaleAxis::Horizontal => params.source_width,
            ScaleAxis::Vertical => params.source_height,
        };
        AxisGeometry::with_extents(
            params,
            axis,
            direction,
            plane,
            source_extent,
            params.target_extent(axis),
        )
    }

    fn with_extents(
        params: &ScalingParameters,
        axis: ScaleAxis,
        direction: ScalingDirection,
        plane: PlaneKind,
        source_extent: i32,
        band_target: i32,
    ) -> AxisGeometry {
        let (near, far) = match axis {
            ScaleAxis::Horizontal => (params.left_offset, params.right_offset),
            ScaleAxis::Vertical => (params.top_offset, params.bottom_offset),
        };
        let crop = source_extent - near - far;
        AxisGeometry {
            mapping: AxisMapping::new(params, axis),
            filter: select_filter(direction, plane, crop, band_target),
            low: 0,
            high: source_extent - 1,
        }
    }

    /// Restricts source access to `low..=high`, used when only that part of the
    /// source is resident.
    pub(crate) fn with_resident_window(mut self, low: i32, high: i32) -> AxisGeometry {
        self.low = low;
        self.high = high;
        self
    }

    #[inline]
    pub(crate) fn filter(&self) -> &PolyphaseFilter {
        &self.filter
    }

    /// Coefficients for target sample `index` and the source index of the first tap
    #[inline(always)]
    pub(crate) fn window(&self, index: usize) -> (&'static [i32], i32) {
        let position = self.mapping.position_16(index);
        let taps = self.filter.phase((position & 15) as usize);
        let first = (position >> 4) - (taps.len() as i32 >> 1) + 1;
        (taps, first)
    }

    #[inline(always)]
    pub(crate) fn clamp(&self, position: i32) -> usize {
        clip(position, self.low, self.high.max(self.low)) as usize
    }

    /// Filters target sample `index`, `fetch` reads a source sample by its
    /// clamped index.
    #[inline(always)]
    pub(crate) fn convolve<F: Fn(usize) -> i32>(&self, index: usize, fetch: F) -> i32 {
        let (taps, first) = self.window(index);
        taps.iter().enumerate().fold(0i32, |acc, (k, &coeff)| {
            acc.wrapping_add(coeff.wrapping_mul(fetch(self.clamp(first + k as i32))))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterKind;
    use crate::yuv_support::ChromaFormat;

    #[test]
    fn test_positions_of_halving() {
        let params = ScalingParameters::new(320, 240, 160, 120, ChromaFormat::Yuv420);
        let mapping = AxisMapping::new(&params, ScaleAxis::Horizontal);
        // 2048 offset lands every target sample half way between two sources
        assert_eq!(mapping.position_16(0), 0);
        assert_eq!(mapping.position_16(1), 32);
        assert_eq!(mapping.position_16(10), 320);
    }

    #[test]
    fn test_unity_positions_have_zero_phase() {
        let params = ScalingParameters::new(64, 48, 128, 48, ChromaFormat::Yuv420);
        let luma = AxisMapping::new(&params, ScaleAxis::Vertical);
        let chroma = AxisMapping::new(&params.chroma_parameters(), ScaleAxis::Vertical);
        assert!(luma.is_unity());
        assert!(chroma.is_unity());
        for index in 0..48 {
            assert_eq!(luma.position_16(index), index as i32 * 16);
            assert_eq!(chroma.position_16(index), index as i32 * 16);
        }
    }

    #[test]
    fn test_convolve_clamps_at_edges() {
        let params = ScalingParameters::new(8, 8, 16, 16, ChromaFormat::Yuv444);
        let geometry = AxisGeometry::rounded(
            &params,
            ScaleAxis::Horizontal,
            ScalingDirection::Upscale,
            PlaneKind::Luma,
        );
        assert_eq!(geometry.filter().kind(), FilterKind::LumaUp);
        let source = [7i32; 8];
        for index in 0..16 {
            // a constant row stays constant, scaled by the filter gain
            assert_eq!(geometry.convolve(index, |x| source[x]), 7 * 64);
        }
        let (_, first) = geometry.window(0);
        assert!(first < 0);
        assert_eq!(geometry.clamp(first), 0);
        assert_eq!(geometry.clamp(100), 7);
    }

    #[test]
    fn test_resident_window() {
        let params = ScalingParameters::new(64, 64, 32, 32, ChromaFormat::Yuv400);
        let geometry = AxisGeometry::rounded(
            &params,
            ScaleAxis::Vertical,
            ScalingDirection::Downscale,
            PlaneKind::Luma,
        )
        .with_resident_window(10, 20);
        assert_eq!(geometry.clamp(3), 10);
        assert_eq!(geometry.clamp(15), 15);
        assert_eq!(geometry.clamp(63), 20);
    }

    #[test]
    fn test_exact_geometry_ignores_padding() {
        let params = ScalingParameters::new_unrounded(100, 100, 40, 40, ChromaFormat::Yuv420)
            .with_source_padding(28, 0);
        let exact = AxisGeometry::exact(
            &params,
            ScaleAxis::Horizontal,
            ScalingDirection::Downscale,
            PlaneKind::Luma,
        );
        let rounded = AxisGeometry::rounded(
            &params,
            ScaleAxis::Horizontal,
            ScalingDirection::Downscale,
            PlaneKind::Luma,
        );
        assert_eq!(exact.clamp(1000), 99);
        assert_eq!(rounded.clamp(1000), 127);
    }
}
