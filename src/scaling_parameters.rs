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
use crate::numerics::{round_up_16, shift_by};
use crate::yuv_support::{ChromaFormat, ScaleAxis};

/// Fractional precision of source positions
pub(crate) const SCALER_SHIFT: i32 = 16;
/// Scale factor of an axis that keeps its size
pub(crate) const UNITY_SCALE: i32 = 1 << SCALER_SHIFT;

/// Fixed point description of a resampling from one picture size to another.
///
/// Size fields are inputs, everything from the offsets on is derived from them with
/// SHM arithmetic. Scale factors are Q16, phases and deltas are in quarter samples.
/// Chroma planes use their own set, see [ScalingParameters::chroma_parameters].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScalingParameters {
    pub source_width: i32,
    pub source_height: i32,
    /// Extra columns on the right of the source planes
    pub source_padding_x: i32,
    /// Extra rows below the source planes
    pub source_padding_y: i32,
    pub target_width: i32,
    pub target_height: i32,
    pub target_padding_x: i32,
    pub target_padding_y: i32,
    /// Target width rounded up to a multiple of 16
    pub rounded_target_width: i32,
    /// Target height rounded up to a multiple of 16
    pub rounded_target_height: i32,
    /// Source width as seen from the rounded target
    pub scaled_source_width: i32,
    pub scaled_source_height: i32,
    pub left_offset: i32,
    pub top_offset: i32,
    pub right_offset: i32,
    pub bottom_offset: i32,
    pub shift_x: i32,
    pub shift_y: i32,
    pub scale_x: i32,
    pub scale_y: i32,
    pub phase_x: i32,
    pub phase_y: i32,
    pub add_x: i32,
    pub add_y: i32,
    pub delta_x: i32,
    pub delta_y: i32,
    pub chroma_format: ChromaFormat,
}

impl ScalingParameters {
    /// Parameters for resampling a `source_width` x `source_height` picture
    /// to `target_width` x `target_height`.
    ///
    /// Positions are computed against the target rounded up to a multiple of 16, so
    /// pictures resampled block by block line up with the whole picture result.
    pub fn new(
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
        chroma_format: ChromaFormat,
    ) -> ScalingParameters {
        ScalingParameters::build(
            source_width,
            source_height,
            target_width,
            target_height,
            chroma_format,
            true,
        )
    }

    /// Same as [ScalingParameters::new] but positions are computed against the exact
    /// target size.
    pub fn new_unrounded(
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
        chroma_format: ChromaFormat,
    ) -> ScalingParameters {
        ScalingParameters::build(
            source_width,
            source_height,
            target_width,
            target_height,
            chroma_format,
            false,
        )
    }

    fn build(
        source_width: u32,
        source_height: u32,
        target_width: u32,
        target_height: u32,
        chroma_format: ChromaFormat,
        round_target: bool,
    ) -> ScalingParameters {
        let target_width = target_width as i32;
        let target_height = target_height as i32;
        let (rounded_target_width, rounded_target_height) = if round_target {
            (round_up_16(target_width), round_up_16(target_height))
        } else {
            (target_width, target_height)
        };
        let mut params = ScalingParameters {
            source_width: source_width as i32,
            source_height: source_height as i32,
            source_padding_x: 0,
            source_padding_y: 0,
            target_width,
            target_height,
            target_padding_x: 0,
            target_padding_y: 0,
            rounded_target_width,
            rounded_target_height,
            scaled_source_width: scaled_extent(
                source_width as i32,
                rounded_target_width,
                target_width,
            ),
            scaled_source_height: scaled_extent(
                source_height as i32,
                rounded_target_height,
                target_height,
            ),
            left_offset: 0,
            top_offset: 0,
            right_offset: 0,
            bottom_offset: 0,
            shift_x: SCALER_SHIFT,
            shift_y: SCALER_SHIFT,
            scale_x: 0,
            scale_y: 0,
            phase_x: 0,
            phase_y: 0,
            add_x: 0,
            add_y: 0,
            delta_x: 0,
            delta_y: 0,
            chroma_format,
        };
        params.derive(0, 0, false);
        params
    }

    /// Rescales every size field by signed powers of two and recomputes the derived
    /// fields, `-1` halves a dimension.
    pub(crate) fn derive(&mut self, w_factor: i32, h_factor: i32, is_chroma: bool) {
        self.source_width = shift_by(self.source_width, w_factor);
        self.source_height = shift_by(self.source_height, h_factor);
        self.target_width = shift_by(self.target_width, w_factor);
        self.target_height = shift_by(self.target_height, h_factor);
        self.scaled_source_width = shift_by(self.scaled_source_width, w_factor);
        self.scaled_source_height = shift_by(self.scaled_source_height, h_factor);
        self.rounded_target_width = shift_by(self.rounded_target_width, w_factor);
        self.rounded_target_height = shift_by(self.rounded_target_height, h_factor);
        self.source_padding_x = shift_by(self.source_padding_x, w_factor);
        self.source_padding_y = shift_by(self.source_padding_y, h_factor);
        self.target_padding_x = shift_by(self.target_padding_x, w_factor);
        self.target_padding_y = shift_by(self.target_padding_y, h_factor);

        self.left_offset = 0;
        self.top_offset = 0;
        self.right_offset = self.source_width - self.scaled_source_width;
        self.bottom_offset = self.source_height - self.scaled_source_height;

        self.shift_x = SCALER_SHIFT;
        self.shift_y = SCALER_SHIFT;
        self.scale_x = scale_factor(self.scaled_source_width, self.rounded_target_width, self.shift_x);
        self.scale_y = scale_factor(
            self.scaled_source_height,
            self.rounded_target_height,
            self.shift_y,
        );

        self.phase_x = 0;
        self.phase_y = if is_chroma && self.chroma_format.has_vertical_chroma_phase() {
            1
        } else {
            0
        };
        self.add_x = phase_offset(
            self.scaled_source_width,
            self.rounded_target_width,
            self.phase_x,
            self.shift_x,
        );
        self.add_y = phase_offset(
            self.scaled_source_height,
            self.rounded_target_height,
            self.phase_y,
            self.shift_y,
        );
        self.delta_x = 4 * self.phase_x - (self.left_offset << 4);
        self.delta_y = 4 * self.phase_y - (self.top_offset << 4);
    }

    /// Parameters of the chroma planes, sizes are mapped through the chroma format.
    ///
    /// For a luma-only format the set is returned as is.
    pub fn chroma_parameters(&self) -> ScalingParameters {
        let mut chroma = *self;
        if self.chroma_format.has_chroma() {
            let (w_factor, h_factor) = self.chroma_format.chroma_shift();
            chroma.derive(w_factor, h_factor, true);
        }
        chroma
    }

    /// Declares padding columns and rows present at the right and bottom of source planes
    pub fn with_source_padding(mut self, padding_x: u32, padding_y: u32) -> ScalingParameters {
        self.source_padding_x = padding_x as i32;
        self.source_padding_y = padding_y as i32;
        self
    }

    /// Moves the source size while keeping the scaled source extent, the crop
    /// offsets absorb the difference.
    pub fn with_source_size(mut self, source_width: u32, source_height: u32) -> ScalingParameters {
        self.source_width = source_width as i32;
        self.source_height = source_height as i32;
        self.derive(0, 0, false);
        self
    }

    /// Source samples along `axis` including padding
    #[inline]
    pub fn source_extent(&self, axis: ScaleAxis) -> i32 {
        match axis {
            ScaleAxis::Horizontal => self.source_width + self.source_padding_x,
            ScaleAxis::Vertical => self.source_height + self.source_padding_y,
        }
    }

    #[inline]
    pub fn target_extent(&self, axis: ScaleAxis) -> i32 {
        match axis {
            ScaleAxis::Horizontal => self.target_width,
            ScaleAxis::Vertical => self.target_height,
        }
    }

    #[inline]
    pub fn rounded_target_extent(&self, axis: ScaleAxis) -> i32 {
        match axis {
            ScaleAxis::Horizontal => self.rounded_target_width,
            ScaleAxis::Vertical => self.rounded_target_height,
        }
    }

    /// Source extent covered by the crop window along `axis`
    #[inline]
    pub fn crop_extent(&self, axis: ScaleAxis) -> i32 {
        match axis {
            ScaleAxis::Horizontal => self.source_extent(axis) - self.left_offset - self.right_offset,
            ScaleAxis::Vertical => self.source_extent(axis) - self.top_offset - self.bottom_offset,
        }
    }

    #[inline]
    pub fn is_unity(&self, axis: ScaleAxis) -> bool {
        match axis {
            ScaleAxis::Horizontal => self.scale_x == UNITY_SCALE,
            ScaleAxis::Vertical => self.scale_y == UNITY_SCALE,
        }
    }
}

/// `((source * rounded + target) / (2 * target)) * 2`, the source extent matching the
/// rounded target, kept even.
fn scaled_extent(source: i32, rounded_target: i32, target: i32) -> i32 {
    let divisor = (target as i64) << 1;
    let numerator = source as i64 * rounded_target as i64 + (divisor >> 1);
    (numerator.checked_div(divisor).unwrap_or(0) << 1) as i32
}

/// Q`shift` step between two target samples, in unsigned arithmetic
fn scale_factor(scaled_source: i32, rounded_target: i32, shift: i32) -> i32 {
    let numerator = ((scaled_source as u32) << shift).wrapping_add((rounded_target >> 1) as u32);
    numerator.checked_div(rounded_target as u32).unwrap_or(0) as i32
}

/// Position of the first target sample, rounded to 1/16 of a sample
fn phase_offset(scaled_source: i32, rounded_target: i32, phase: i32, shift: i32) -> i32 {
    let numerator =
        ((scaled_source as i64 * phase as i64) << (shift - 2)) + (rounded_target as i64 >> 1);
    numerator.checked_div(rounded_target as i64).unwrap_or(0) as i32 + (1 << (shift - 5))
}
