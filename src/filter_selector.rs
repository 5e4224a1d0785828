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
use crate::filters::{FilterKind, PolyphaseFilter};
use crate::yuv_support::{PlaneKind, ScalingDirection};

/// Reduction ratio band of the downsampling filter family, `0` is the mildest reduction
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DownscaleBand(u8);

/// `(crop factor, target factor, band)`, first row with `crop * c > target * t` wins
const BAND_LADDER: [(i64, i64, u8); 7] = [
    (4, 15, 7),
    (7, 20, 6),
    (2, 5, 5),
    (1, 2, 4),
    (3, 5, 3),
    (4, 5, 2),
    (19, 20, 1),
];

impl DownscaleBand {
    pub const COUNT: usize = 8;

    pub fn new(index: u8) -> Option<DownscaleBand> {
        if (index as usize) < Self::COUNT {
            Some(DownscaleBand(index))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Band for reducing `crop` source samples onto `target` samples
    pub fn from_ratio(crop: i32, target: i32) -> DownscaleBand {
        let crop = crop as i64;
        let target = target as i64;
        let band = BAND_LADDER
            .iter()
            .find(|&&(c, t, _)| c * crop > t * target)
            .map(|&(_, _, band)| band)
            .unwrap_or(0);
        DownscaleBand(band)
    }
}

/// Filter for one axis of a plane.
///
/// `crop` is the source extent inside the crop window and `target` the extent the
/// band is chosen against; both only matter when downscaling.
pub(crate) fn select_filter(
    direction: ScalingDirection,
    plane: PlaneKind,
    crop: i32,
    target: i32,
) -> PolyphaseFilter {
    let kind = match (direction, plane) {
        (ScalingDirection::Upscale, PlaneKind::Luma) => FilterKind::LumaUp,
        (ScalingDirection::Upscale, PlaneKind::Chroma) => FilterKind::ChromaUp,
        (ScalingDirection::Downscale, _) => FilterKind::Down(DownscaleBand::from_ratio(crop, target)),
    };
    PolyphaseFilter::new(kind)
}
