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
use crate::numerics::{qrshr, round_shift_by, shift_by};

/// Declares chroma layout of a planar picture
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChromaFormat {
    /// Luma only, chroma planes are empty
    Yuv400 = 0,
    /// Chroma is halved in both directions
    Yuv420 = 1,
    /// Chroma is halved horizontally
    Yuv422 = 2,
    /// Chroma has the same resolution as luma
    Yuv444 = 3,
}

impl From<u8> for ChromaFormat {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => ChromaFormat::Yuv400,
            1 => ChromaFormat::Yuv420,
            2 => ChromaFormat::Yuv422,
            3 => ChromaFormat::Yuv444,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

impl ChromaFormat {
    /// Signed power of two factors mapping luma sizes onto chroma sizes.
    ///
    /// `-1` halves the dimension, `0` keeps it.
    #[inline]
    pub const fn chroma_shift(self) -> (i32, i32) {
        match self {
            ChromaFormat::Yuv400 | ChromaFormat::Yuv444 => (0, 0),
            ChromaFormat::Yuv420 => (-1, -1),
            ChromaFormat::Yuv422 => (-1, 0),
        }
    }

    #[inline]
    pub const fn has_chroma(self) -> bool {
        !matches!(self, ChromaFormat::Yuv400)
    }

    /// Chroma plane size for a luma plane of `width` x `height`
    #[inline]
    pub const fn chroma_dimensions(self, width: usize, height: usize) -> (usize, usize) {
        match self {
            ChromaFormat::Yuv400 => (0, 0),
            ChromaFormat::Yuv420 => (width >> 1, height >> 1),
            ChromaFormat::Yuv422 => (width >> 1, height),
            ChromaFormat::Yuv444 => (width, height),
        }
    }

    /// Chroma samples are sited between luma rows, which moves the vertical
    /// filter phase by a quarter sample.
    #[inline]
    pub(crate) const fn has_vertical_chroma_phase(self) -> bool {
        matches!(self, ChromaFormat::Yuv420 | ChromaFormat::Yuv422)
    }

    /// Detects the layout formed by a luma plane and its chroma planes.
    ///
    /// Returns `None` when chroma planes do not match any supported layout.
    pub fn from_dimensions(
        luma_width: usize,
        luma_height: usize,
        chroma_width: usize,
        chroma_height: usize,
    ) -> Option<ChromaFormat> {
        if chroma_width == 0 && chroma_height == 0 {
            return Some(ChromaFormat::Yuv400);
        }
        if chroma_width == luma_width && chroma_height == luma_height {
            return Some(ChromaFormat::Yuv444);
        }
        if chroma_width == (luma_width >> 1) && chroma_height == luma_height {
            return Some(ChromaFormat::Yuv422);
        }
        if chroma_width == (luma_width >> 1) && chroma_height == (luma_height >> 1) {
            return Some(ChromaFormat::Yuv420);
        }
        None
    }
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScaleAxis {
    Horizontal = 0,
    Vertical = 1,
}

impl From<u8> for ScaleAxis {
    #[inline(always)]
    fn from(value: u8) -> Self {
        match value {
            0 => ScaleAxis::Horizontal,
            1 => ScaleAxis::Vertical,
            _ => {
                panic!("Unknown value")
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ScalingDirection {
    Upscale,
    Downscale,
}

impl ScalingDirection {
    /// Brings a two pass accumulator back into sample range.
    ///
    /// Up filters are normalized to 64 and down filters to 128, so two passes
    /// carry a gain of `2^12` or `2^14` respectively.
    #[inline(always)]
    pub(crate) fn rescale(self, acc: i32) -> i32 {
        match self {
            ScalingDirection::Upscale => qrshr::<12, 8>(acc),
            ScalingDirection::Downscale => qrshr::<14, 8>(acc),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlaneKind {
    Luma,
    Chroma,
}

/// Rectangle inside a plane, `x`/`y` is the top left corner
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlockRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl BlockRect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        BlockRect {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn right(&self) -> usize {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(&self) -> usize {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Maps a luma rectangle onto a chroma plane.
    ///
    /// The origin is rounded down and the size rounded up, so an odd luma block still
    /// covers every chroma sample it touches.
    pub(crate) fn shifted(&self, w_factor: i32, h_factor: i32) -> BlockRect {
        BlockRect {
            x: shift_by(self.x, w_factor),
            y: shift_by(self.y, h_factor),
            width: round_shift_by(self.width, w_factor),
            height: round_shift_by(self.height, h_factor),
        }
    }

    /// Shrinks the rectangle so it does not reach past `width` x `height`
    pub(crate) fn clipped(&self, width: usize, height: usize) -> BlockRect {
        BlockRect {
            x: self.x,
            y: self.y,
            width: self.width.min(width.saturating_sub(self.x)),
            height: self.height.min(height.saturating_sub(self.y)),
        }
    }
}
