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
use crate::yuv_support::BlockRect;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct MismatchedSize {
    pub expected: usize,
    pub received: usize,
}

/// Minimum plane size against the size that was provided
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MismatchedDimensions {
    pub expected_width: usize,
    pub expected_height: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BlockBounds {
    pub block: BlockRect,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ScalerError {
    BlockOutOfBounds(BlockBounds),
    SourceTooSmall(MismatchedDimensions),
    DestinationTooSmall(MismatchedDimensions),
    MixedScalingDirection,
    PlaneSizeMismatch(MismatchedSize),
    PointerOverflow,
    ZeroBaseSize,
}

impl Display for ScalerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalerError::BlockOutOfBounds(bounds) => f.write_fmt(format_args!(
                "Specified block {}x{} at ({}, {}) outside given target picture size {}x{}",
                bounds.block.width,
                bounds.block.height,
                bounds.block.x,
                bounds.block.y,
                bounds.width,
                bounds.height
            )),
            ScalerError::SourceTooSmall(size) => f.write_fmt(format_args!(
                "Source buffer smaller than specified in the scaling parameters, it must be at least {}x{}, but it was {}x{}",
                size.expected_width, size.expected_height, size.width, size.height
            )),
            ScalerError::DestinationTooSmall(size) => f.write_fmt(format_args!(
                "Destination buffer not large enough to hold block, it must be at least {}x{}, but it was {}x{}",
                size.expected_width, size.expected_height, size.width, size.height
            )),
            ScalerError::MixedScalingDirection => {
                f.write_str("Both dimensions need to be either upscaled or downscaled")
            }
            ScalerError::PlaneSizeMismatch(size) => f.write_fmt(format_args!(
                "Plane have invalid size, it must be {}, but it was {}",
                size.expected, size.received
            )),
            ScalerError::PointerOverflow => f.write_str("Image size overflow pointer capabilities"),
            ScalerError::ZeroBaseSize => f.write_str("Zero sized images is not supported"),
        }
    }
}

impl Error for ScalerError {}

#[inline]
pub(crate) fn check_overflow_v2(v0: usize, v1: usize) -> Result<(), ScalerError> {
    let (_, overflow) = v0.overflowing_mul(v1);
    if overflow {
        return Err(ScalerError::PointerOverflow);
    }
    Ok(())
}

/// Checks that a strided plane holds exactly `height` rows of `stride` elements
/// and that a row fits `width` samples.
#[inline]
pub(crate) fn check_strided_plane<V>(
    data: &[V],
    stride: u32,
    width: u32,
    height: u32,
) -> Result<(), ScalerError> {
    check_overflow_v2(stride as usize, height as usize)?;
    if stride < width {
        return Err(ScalerError::PlaneSizeMismatch(MismatchedSize {
            expected: width as usize,
            received: stride as usize,
        }));
    }
    if stride as usize * height as usize != data.len() {
        return Err(ScalerError::PlaneSizeMismatch(MismatchedSize {
            expected: stride as usize * height as usize,
            received: data.len(),
        }));
    }
    Ok(())
}

/// Checks that `block` only addresses elements of a strided plane `len` elements long
#[inline]
pub(crate) fn check_strided_region(
    len: usize,
    stride: usize,
    block: BlockRect,
) -> Result<(), ScalerError> {
    if block.is_empty() {
        return Ok(());
    }
    if block.right() > stride {
        return Err(ScalerError::PlaneSizeMismatch(MismatchedSize {
            expected: block.right(),
            received: stride,
        }));
    }
    let required = (block.bottom() - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(block.right()))
        .ok_or(ScalerError::PointerOverflow)?;
    if len < required {
        return Err(ScalerError::PlaneSizeMismatch(MismatchedSize {
            expected: required,
            received: len,
        }));
    }
    Ok(())
}

/// Both dimensions at least the expected ones, `None` when it fits
#[inline]
pub(crate) fn dimensions_shortfall(
    width: usize,
    height: usize,
    expected_width: usize,
    expected_height: usize,
) -> Option<MismatchedDimensions> {
    if width < expected_width || height < expected_height {
        return Some(MismatchedDimensions {
            expected_width,
            expected_height,
            width,
            height,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strided_plane_check() {
        let data = vec![0u8; 16 * 4];
        assert!(check_strided_plane(&data, 16, 12, 4).is_ok());
        assert_eq!(
            check_strided_plane(&data, 16, 12, 5),
            Err(ScalerError::PlaneSizeMismatch(MismatchedSize {
                expected: 80,
                received: 64
            }))
        );
        assert!(check_strided_plane(&data, 8, 12, 8).is_err());
        assert_eq!(
            check_overflow_v2(usize::MAX, 2),
            Err(ScalerError::PointerOverflow)
        );
    }

    #[test]
    fn test_error_messages() {
        let error = ScalerError::BlockOutOfBounds(BlockBounds {
            block: BlockRect::new(8, 8, 16, 16),
            width: 20,
            height: 20,
        });
        assert_eq!(
            error.to_string(),
            "Specified block 16x16 at (8, 8) outside given target picture size 20x20"
        );
        assert_eq!(dimensions_shortfall(10, 10, 10, 10), None);
        assert!(dimensions_shortfall(10, 9, 10, 10).is_some());
    }
}
