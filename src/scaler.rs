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
use crate::block::{resample_block_2d, resample_block_step, source_range};
use crate::images::{PictureBuffer, PlaneBuffer};
use crate::numerics::shift_by;
use crate::scaling_parameters::ScalingParameters;
use crate::separable::resample_plane;
use crate::yuv_error::{dimensions_shortfall, BlockBounds, MismatchedDimensions, ScalerError};
use crate::yuv_support::{BlockRect, ChromaFormat, PlaneKind, ScaleAxis, ScalingDirection};
use std::cmp::Ordering;
use std::ops::RangeInclusive;

const PLANE_KINDS: [PlaneKind; 3] = [PlaneKind::Luma, PlaneKind::Chroma, PlaneKind::Chroma];

/// Computes the scaling parameters of the luma plane, see [ScalingParameters::new]
pub fn compute_scaling_parameters(
    source_width: u32,
    source_height: u32,
    target_width: u32,
    target_height: u32,
    chroma_format: ChromaFormat,
) -> ScalingParameters {
    ScalingParameters::new(
        source_width,
        source_height,
        target_width,
        target_height,
        chroma_format,
    )
}

#[inline]
fn reject(error: ScalerError) -> ScalerError {
    log::warn!("{}", error);
    error
}

#[inline]
fn extent(value: i32) -> usize {
    value.max(0) as usize
}

fn check_base_size(params: &ScalingParameters) -> Result<(), ScalerError> {
    if params.source_width <= 0
        || params.source_height <= 0
        || params.target_width <= 0
        || params.target_height <= 0
    {
        return Err(reject(ScalerError::ZeroBaseSize));
    }
    Ok(())
}

fn check_block_bounds(block: BlockRect, width: i32, height: i32) -> Result<(), ScalerError> {
    let outside = |start: usize, size: usize, bound: i32| {
        start
            .checked_add(size)
            .map_or(true, |end| end > extent(bound))
    };
    if outside(block.x, block.width, width) || outside(block.y, block.height, height) {
        return Err(reject(ScalerError::BlockOutOfBounds(BlockBounds {
            block,
            width: extent(width),
            height: extent(height),
        })));
    }
    Ok(())
}

/// Direction shared by both axes, `None` when the size does not change.
///
/// An axis that keeps its size goes along with the other one.
fn scaling_direction(
    params: &ScalingParameters,
) -> Result<Option<ScalingDirection>, ScalerError> {
    let width = params.source_width.cmp(&params.target_width);
    let height = params.source_height.cmp(&params.target_height);
    match (width, height) {
        (Ordering::Equal, Ordering::Equal) => Ok(None),
        (Ordering::Greater, Ordering::Greater | Ordering::Equal)
        | (Ordering::Equal, Ordering::Greater) => Ok(Some(ScalingDirection::Downscale)),
        (Ordering::Less, Ordering::Less | Ordering::Equal)
        | (Ordering::Equal, Ordering::Less) => Ok(Some(ScalingDirection::Upscale)),
        _ => Err(reject(ScalerError::MixedScalingDirection)),
    }
}

/// Luma parameters followed by the parameters of both chroma planes
fn plane_parameters(params: &ScalingParameters) -> [ScalingParameters; 3] {
    let chroma = params.chroma_parameters();
    [*params, chroma, chroma]
}

/// Chroma planes of a luma only picture and chroma planes collapsed to nothing
/// by a one sample wide luma plane are not resampled.
fn is_plane_active(index: usize, params: &ScalingParameters) -> bool {
    index == 0
        || (params.chroma_format.has_chroma()
            && params.source_width > 0
            && params.source_height > 0
            && params.target_width > 0
            && params.target_height > 0)
}

/// Block of each plane, chroma blocks cover every chroma sample the luma block touches
/// and are clipped by `bounds`.
fn plane_blocks<F>(
    block: BlockRect,
    planes: &[ScalingParameters; 3],
    bounds: F,
) -> [Option<BlockRect>; 3]
where
    F: Fn(&ScalingParameters) -> (i32, i32),
{
    let (w_factor, h_factor) = planes[0].chroma_format.chroma_shift();
    let mut blocks = [None; 3];
    for (index, (slot, params)) in blocks.iter_mut().zip(planes.iter()).enumerate() {
        if !is_plane_active(index, params) {
            continue;
        }
        let plane_block = if index == 0 {
            block
        } else {
            let (width, height) = bounds(params);
            block
                .shifted(w_factor, h_factor)
                .clipped(extent(width), extent(height))
        };
        if !plane_block.is_empty() {
            *slot = Some(plane_block);
        }
    }
    blocks
}

/// Runs `job` once per plane, on the rayon pool when the feature is enabled
fn for_each_plane<T, F>(items: [T; 3], job: F)
where
    T: Send,
    F: Fn(usize, T) + Sync,
{
    let [y, u, v] = items;
    #[cfg(feature = "rayon")]
    {
        rayon::join(|| job(0, y), || rayon::join(|| job(1, u), || job(2, v)));
    }
    #[cfg(not(feature = "rayon"))]
    {
        job(0, y);
        job(1, u);
        job(2, v);
    }
}

/// Makes sure `dst` is a picture of the target size, reallocating when it is not
fn ensure_target_picture(dst: &mut PictureBuffer, params: &ScalingParameters) {
    let width = extent(params.target_width);
    let height = extent(params.target_height);
    let (chroma_width, chroma_height) = params.chroma_format.chroma_dimensions(width, height);
    let matches = dst.format == params.chroma_format
        && dst.y.width() == width
        && dst.y.height() == height
        && dst.u.width() == chroma_width
        && dst.u.height() == chroma_height
        && dst.v.width() == chroma_width
        && dst.v.height() == chroma_height;
    if !matches {
        *dst = PictureBuffer::new(width, height, params.chroma_format, false);
    }
}

/// Intermediate plane size of the whole picture path.
///
/// Follows the SHM sizing rule, grown when needed so it holds both the padded source
/// and the rounded target.
fn working_extent(
    source_extent: i32,
    source: i32,
    target: i32,
    rounded_target: i32,
    min_rounding: i64,
) -> usize {
    let max = source_extent.max(target) as i64;
    let min = source.min(target) as i64;
    let shm = if min > 0 {
        let min_rounded = (min + min_rounding - 1) / min_rounding * min_rounding;
        ((max * min_rounded + (min << 4) - 1) / (min << 4)) << 4
    } else {
        0
    };
    extent(shm.max(rounded_target as i64).max(source_extent as i64) as i32)
}

fn resample_plane_through_buffer(
    source: &PlaneBuffer,
    params: &ScalingParameters,
    direction: ScalingDirection,
    kind: PlaneKind,
    target: &mut PlaneBuffer,
) {
    let horizontal = AxisGeometry::rounded(params, ScaleAxis::Horizontal, direction, kind);
    let vertical = AxisGeometry::rounded(params, ScaleAxis::Vertical, direction, kind);
    log::debug!(
        "Resampling {:?} plane {}x{} -> {}x{} with {:?} x {:?}",
        kind,
        params.source_width,
        params.source_height,
        params.target_width,
        params.target_height,
        horizontal.filter().kind(),
        vertical.filter().kind()
    );

    let working_width = working_extent(
        params.source_extent(ScaleAxis::Horizontal),
        params.source_width,
        params.target_width,
        params.rounded_target_width,
        16,
    );
    let working_height = working_extent(
        params.source_extent(ScaleAxis::Vertical),
        params.source_height,
        params.target_height,
        params.rounded_target_height,
        32,
    );
    let mut working = PlaneBuffer::new(working_width, working_height, true);
    working.copy_from(source, true);
    resample_plane(
        &mut working,
        &horizontal,
        &vertical,
        direction,
        extent(params.rounded_target_width),
        extent(params.rounded_target_height),
        extent(params.source_extent(ScaleAxis::Vertical)),
    );
    target.copy_from(&working, false);
}

/// Resamples a whole picture into a newly allocated target picture.
///
/// When `src` is not the size `params` declares, the parameters are re-derived for the
/// actual source size while keeping the target size.
///
/// # Panics
///
/// Panics when the chroma planes of `src` do not match the chroma format of `params`.
///
/// # Errors
///
/// Fails on zero sized pictures and when one axis is upscaled while the other one is
/// downscaled.
pub fn resample_picture(
    src: &PictureBuffer,
    params: &ScalingParameters,
) -> Result<PictureBuffer, ScalerError> {
    check_base_size(params)?;
    let mut dst = PictureBuffer::new(
        extent(params.target_width),
        extent(params.target_height),
        params.chroma_format,
        false,
    );
    resample_picture_into(src, params, &mut dst)?;
    Ok(dst)
}

/// Same as [resample_picture] but writes into `dst`, which is reallocated when its
/// geometry does not match the target size.
pub fn resample_picture_into(
    src: &PictureBuffer,
    params: &ScalingParameters,
    dst: &mut PictureBuffer,
) -> Result<(), ScalerError> {
    src.assert_layout(params.chroma_format);
    check_base_size(params)?;
    let direction = scaling_direction(params)?;

    let mut params = *params;
    if src.width() != extent(params.source_extent(ScaleAxis::Horizontal))
        || src.height() != extent(params.source_extent(ScaleAxis::Vertical))
    {
        let width = src.width() as i32 - params.source_padding_x;
        let height = src.height() as i32 - params.source_padding_y;
        if width <= 0 || height <= 0 {
            return Err(reject(ScalerError::ZeroBaseSize));
        }
        params = params.with_source_size(width as u32, height as u32);
    }

    ensure_target_picture(dst, &params);

    let Some(direction) = direction else {
        dst.copy_from(src, true);
        return Ok(());
    };

    let planes = plane_parameters(&params);
    let sources = src.planes();
    for_each_plane(dst.planes_mut(), |index, target| {
        let plane = &planes[index];
        if !is_plane_active(index, plane) {
            return;
        }
        resample_plane_through_buffer(sources[index], plane, direction, PLANE_KINDS[index], target);
    });
    Ok(())
}

fn resample_plane_in_place(
    source: &mut PlaneBuffer,
    params: &ScalingParameters,
    direction: ScalingDirection,
    kind: PlaneKind,
    target: &mut PlaneBuffer,
) {
    let horizontal = AxisGeometry::exact(params, ScaleAxis::Horizontal, direction, kind);
    let vertical = AxisGeometry::exact(params, ScaleAxis::Vertical, direction, kind);
    let source_height = extent(params.source_height);
    let target_width = extent(params.target_width);
    let target_height = extent(params.target_height);
    let working_width = extent(params.source_width).max(target_width);
    let working_height = source_height.max(target_height);
    let holds_both =
        |plane: &PlaneBuffer| plane.width() >= working_width && plane.height() >= working_height;

    if holds_both(&*source) {
        resample_plane(
            source,
            &horizontal,
            &vertical,
            direction,
            target_width,
            target_height,
            source_height,
        );
        target.copy_from(source, false);
    } else if holds_both(&*target) {
        target.copy_from(source, true);
        resample_plane(
            target,
            &horizontal,
            &vertical,
            direction,
            target_width,
            target_height,
            source_height,
        );
    } else {
        let mut working = PlaneBuffer::new(working_width, working_height, true);
        working.copy_from(source, true);
        resample_plane(
            &mut working,
            &horizontal,
            &vertical,
            direction,
            target_width,
            target_height,
            source_height,
        );
        target.copy_from(&working, false);
    }
}

/// Resamples a whole picture using `src` or `dst` as the working buffer, no intermediate
/// picture is allocated. Filters are chosen against the exact target size and source
/// padding is ignored.
///
/// Contents of `src` are unspecified afterwards. `dst` is reallocated when its geometry
/// does not match the target size.
///
/// # Panics
///
/// Panics when the chroma planes of `src` do not match the chroma format of `params`.
pub fn resample_picture_in_place(
    src: &mut PictureBuffer,
    params: &ScalingParameters,
    dst: &mut PictureBuffer,
) -> Result<(), ScalerError> {
    src.assert_layout(params.chroma_format);
    check_base_size(params)?;
    let direction = scaling_direction(params)?;

    let mut params = *params;
    if src.width() != extent(params.source_width) || src.height() != extent(params.source_height)
    {
        if src.width() == 0 || src.height() == 0 {
            return Err(reject(ScalerError::ZeroBaseSize));
        }
        params = params.with_source_size(src.width() as u32, src.height() as u32);
    }

    ensure_target_picture(dst, &params);

    let Some(direction) = direction else {
        dst.copy_from(src, true);
        return Ok(());
    };

    let planes = plane_parameters(&params);
    let [src_y, src_u, src_v] = src.planes_mut();
    let [dst_y, dst_u, dst_v] = dst.planes_mut();
    for_each_plane(
        [(src_y, dst_y), (src_u, dst_u), (src_v, dst_v)],
        |index, (source, target)| {
            let plane = &planes[index];
            if !is_plane_active(index, plane) {
                return;
            }
            resample_plane_in_place(source, plane, direction, PLANE_KINDS[index], target);
        },
    );
    Ok(())
}

/// Plane sizes a picture is checked against, `None` for planes that are skipped
fn required_sizes<F>(
    planes: &[ScalingParameters; 3],
    blocks: &[Option<BlockRect>; 3],
    size: F,
) -> [Option<(usize, usize)>; 3]
where
    F: Fn(usize, &ScalingParameters, &BlockRect) -> (usize, usize),
{
    let mut sizes = [None; 3];
    for (index, slot) in sizes.iter_mut().enumerate() {
        if let Some(block) = &blocks[index] {
            *slot = Some(size(index, &planes[index], block));
        }
    }
    sizes
}

/// First plane of `picture` smaller than required, if any
fn picture_shortfall(
    picture: &PictureBuffer,
    sizes: &[Option<(usize, usize)>; 3],
) -> Option<MismatchedDimensions> {
    picture
        .planes()
        .iter()
        .zip(sizes.iter())
        .filter_map(|(plane, size)| size.map(|size| (plane, size)))
        .find_map(|(plane, (width, height))| {
            dimensions_shortfall(plane.width(), plane.height(), width, height)
        })
}

/// Resamples `block` of the target picture with a single 2-D kernel per sample.
///
/// `block` is given in luma target coordinates. When `dst` is at least the size of the
/// target picture the block is written at its own position, otherwise `dst` is treated
/// as holding only the block, written from its top left corner. Chroma blocks cover
/// every chroma sample touched by the luma block. Nothing is written when the request is
/// rejected.
///
/// # Panics
///
/// Panics when the chroma planes of `src` or `dst` do not match the chroma format of
/// `params`.
///
/// # Errors
///
/// Fails when the block lies outside the target picture, when `src` is smaller than the
/// padded source, when `dst` cannot hold the block and on mixed scaling directions.
pub fn resample_block(
    src: &PictureBuffer,
    params: &ScalingParameters,
    dst: &mut PictureBuffer,
    block: BlockRect,
) -> Result<(), ScalerError> {
    check_base_size(params)?;
    check_block_bounds(block, params.target_width, params.target_height)?;
    src.assert_layout(params.chroma_format);
    dst.assert_layout(params.chroma_format);

    let planes = plane_parameters(params);
    let blocks = plane_blocks(block, &planes, |p| (p.target_width, p.target_height));

    let source_sizes = required_sizes(&planes, &blocks, |_, p, _| {
        (
            extent(p.source_extent(ScaleAxis::Horizontal)),
            extent(p.source_extent(ScaleAxis::Vertical)),
        )
    });
    if let Some(shortfall) = picture_shortfall(src, &source_sizes) {
        return Err(reject(ScalerError::SourceTooSmall(shortfall)));
    }

    let full_sizes = required_sizes(&planes, &blocks, |_, p, _| {
        (extent(p.target_width), extent(p.target_height))
    });
    let is_full_target = picture_shortfall(dst, &full_sizes).is_none();
    if !is_full_target {
        let block_sizes = required_sizes(&planes, &blocks, |_, _, b| (b.width, b.height));
        if let Some(shortfall) = picture_shortfall(dst, &block_sizes) {
            return Err(reject(ScalerError::DestinationTooSmall(shortfall)));
        }
    }

    let Some(direction) = scaling_direction(params)? else {
        let (dst_x, dst_y) = if is_full_target {
            (block.x, block.y)
        } else {
            (0, 0)
        };
        dst.copy_block_from(src, block, dst_x, dst_y);
        return Ok(());
    };

    let sources = src.planes();
    for_each_plane(dst.planes_mut(), |index, target| {
        let Some(plane_block) = blocks[index] else {
            return;
        };
        let plane = &planes[index];
        let kind = PLANE_KINDS[index];
        let horizontal = AxisGeometry::rounded(plane, ScaleAxis::Horizontal, direction, kind);
        let vertical = AxisGeometry::rounded(plane, ScaleAxis::Vertical, direction, kind);
        let origin = if is_full_target {
            (plane_block.x, plane_block.y)
        } else {
            (0, 0)
        };
        resample_block_2d(
            sources[index],
            &horizontal,
            &vertical,
            direction,
            plane_block,
            target,
            origin,
        );
    });
    Ok(())
}

/// Extent of the `axis` step's output along each axis: target columns, then target rows
/// for the vertical step or source rows for the horizontal one.
fn step_bounds(params: &ScalingParameters, axis: ScaleAxis) -> (i32, i32) {
    match axis {
        ScaleAxis::Horizontal => (
            params.target_width,
            params.source_extent(ScaleAxis::Vertical),
        ),
        ScaleAxis::Vertical => (params.target_width, params.target_height),
    }
}

/// Size of the `axis` step's input when it holds the whole picture
fn step_full_source(params: &ScalingParameters, axis: ScaleAxis) -> (usize, usize) {
    let width = match axis {
        ScaleAxis::Horizontal => params.source_extent(ScaleAxis::Horizontal),
        ScaleAxis::Vertical => params.target_width,
    };
    (
        extent(width),
        extent(params.source_extent(ScaleAxis::Vertical)),
    )
}

/// Source window read by the `axis` step of `block`: origin and size
fn step_source_window(
    params: &ScalingParameters,
    block: &BlockRect,
    axis: ScaleAxis,
) -> (RangeInclusive<usize>, BlockRect) {
    match axis {
        ScaleAxis::Horizontal => {
            let range = source_range_for_block(params, axis, block.x, block.right() - 1);
            let window = BlockRect::new(
                *range.start(),
                block.y,
                range.end() - range.start() + 1,
                block.height,
            );
            (range, window)
        }
        ScaleAxis::Vertical => {
            let range = source_range_for_block(params, axis, block.y, block.bottom() - 1);
            let window = BlockRect::new(
                block.x,
                *range.start(),
                block.width,
                range.end() - range.start() + 1,
            );
            (range, window)
        }
    }
}

/// Luma size of a picture holding only the source windows read by the `axis` step of
/// `block`, large enough for the chroma windows as well.
///
/// Each plane of such a picture holds its window starting at the top left corner, the
/// window of a plane being given by [source_range_for_block] with that plane's parameters
/// along `axis` and by the plane's block along the other axis.
pub fn block_step_source_size(
    params: &ScalingParameters,
    block: BlockRect,
    axis: ScaleAxis,
) -> (usize, usize) {
    if block.is_empty() {
        return (0, 0);
    }
    let planes = plane_parameters(params);
    let blocks = plane_blocks(block, &planes, |p| step_bounds(p, axis));
    let (w_factor, h_factor) = params.chroma_format.chroma_shift();
    let mut size = (0usize, 0usize);
    for (index, plane_block) in blocks.iter().enumerate() {
        let Some(plane_block) = plane_block else {
            continue;
        };
        let (_, window) = step_source_window(&planes[index], plane_block, axis);
        let (width, height) = if index == 0 {
            (window.width, window.height)
        } else {
            (
                shift_by(window.width, -w_factor),
                shift_by(window.height, -h_factor),
            )
        };
        size = (size.0.max(width), size.1.max(height));
    }
    size
}

/// Runs a single pass of the separable filter over `block`, so the horizontal and the
/// vertical pass can happen in different calls.
///
/// Horizontal step: `block` spans target columns and source rows, `src` is the source
/// picture and `dst` receives unscaled horizontal accumulators. Vertical step: `block`
/// spans target columns and target rows, `src` holds the horizontal accumulators and
/// `dst` receives final samples.
///
/// `src` either holds the whole input of the step, or only the source window of each
/// plane (see [block_step_source_size]). `dst` either holds the whole output of the step
/// or only the block. Nothing is written when the request is rejected.
///
/// # Panics
///
/// Panics when the chroma planes of `src` or `dst` do not match the chroma format of
/// `params`.
pub fn resample_block_axis(
    dst: &mut PictureBuffer,
    src: &PictureBuffer,
    params: &ScalingParameters,
    block: BlockRect,
    axis: ScaleAxis,
) -> Result<(), ScalerError> {
    check_base_size(params)?;
    let (width_bound, height_bound) = step_bounds(params, axis);
    check_block_bounds(block, width_bound, height_bound)?;
    src.assert_layout(params.chroma_format);
    dst.assert_layout(params.chroma_format);
    if block.is_empty() {
        return Ok(());
    }

    let planes = plane_parameters(params);
    let blocks = plane_blocks(block, &planes, |p| step_bounds(p, axis));

    let full_sources = required_sizes(&planes, &blocks, |_, p, _| step_full_source(p, axis));
    let is_full_source = picture_shortfall(src, &full_sources).is_none();
    let mut windows: [Option<(RangeInclusive<usize>, BlockRect)>; 3] = [None, None, None];
    if !is_full_source {
        for (index, slot) in windows.iter_mut().enumerate() {
            if let Some(plane_block) = &blocks[index] {
                *slot = Some(step_source_window(&planes[index], plane_block, axis));
            }
        }
        let window_sizes = required_sizes(&planes, &blocks, |index, _, _| {
            windows[index]
                .as_ref()
                .map_or((0, 0), |(_, window)| (window.width, window.height))
        });
        if let Some(shortfall) = picture_shortfall(src, &window_sizes) {
            return Err(reject(ScalerError::SourceTooSmall(shortfall)));
        }
    }

    let full_targets = required_sizes(&planes, &blocks, |_, p, _| {
        let (width, height) = step_bounds(p, axis);
        (extent(width), extent(height))
    });
    let is_full_target = picture_shortfall(dst, &full_targets).is_none();
    if !is_full_target {
        let block_sizes = required_sizes(&planes, &blocks, |_, _, b| (b.width, b.height));
        if let Some(shortfall) = picture_shortfall(dst, &block_sizes) {
            return Err(reject(ScalerError::DestinationTooSmall(shortfall)));
        }
    }

    let Some(direction) = scaling_direction(params)? else {
        let source_block = if is_full_source {
            block
        } else {
            BlockRect::new(0, 0, block.width, block.height)
        };
        let (dst_x, dst_y) = if is_full_target {
            (block.x, block.y)
        } else {
            (0, 0)
        };
        dst.copy_block_from(src, source_block, dst_x, dst_y);
        return Ok(());
    };

    let sources = src.planes();
    for_each_plane(dst.planes_mut(), |index, target| {
        let Some(plane_block) = blocks[index] else {
            return;
        };
        let plane = &planes[index];
        let kind = PLANE_KINDS[index];
        let geometry = AxisGeometry::rounded(plane, axis, direction, kind);
        let (geometry, source_origin) = match &windows[index] {
            Some((range, window)) => (
                geometry.with_resident_window(*range.start() as i32, *range.end() as i32),
                (window.x, window.y),
            ),
            None => (geometry, (0, 0)),
        };
        let target_origin = if is_full_target {
            (plane_block.x, plane_block.y)
        } else {
            (0, 0)
        };
        log::debug!(
            "{:?} step of {:?} plane block {:?} with {:?}",
            axis,
            kind,
            plane_block,
            geometry.filter().kind()
        );
        resample_block_step(
            sources[index],
            source_origin,
            &geometry,
            axis,
            direction,
            plane_block,
            target,
            target_origin,
        );
    });
    Ok(())
}

/// Source samples along `axis` that the filters of target samples `low..=high` read,
/// clipped into the padded source.
///
/// Use with the parameters of the plane being queried.
pub fn source_range_for_block(
    params: &ScalingParameters,
    axis: ScaleAxis,
    low: usize,
    high: usize,
) -> RangeInclusive<usize> {
    let mapping = AxisMapping::new(params, axis);
    source_range(&mapping, low, high, params.source_extent(axis))
}

/// Source columns read by a block of `width` target columns starting at `x`
pub fn source_width_range(
    params: &ScalingParameters,
    x: usize,
    width: usize,
) -> RangeInclusive<usize> {
    source_range_for_block(
        params,
        ScaleAxis::Horizontal,
        x,
        (x + width).saturating_sub(1).max(x),
    )
}

/// Source rows read by a block of `height` target rows starting at `y`
pub fn source_height_range(
    params: &ScalingParameters,
    y: usize,
    height: usize,
) -> RangeInclusive<usize> {
    source_range_for_block(
        params,
        ScaleAxis::Vertical,
        y,
        (y + height).saturating_sub(1).max(y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_selector::DownscaleBand;
    use crate::filters::FilterKind;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_picture(
        rng: &mut StdRng,
        width: usize,
        height: usize,
        format: ChromaFormat,
    ) -> PictureBuffer {
        let mut picture = PictureBuffer::new(width, height, format, false);
        for plane in picture.planes_mut() {
            for v in plane.data_mut().iter_mut() {
                *v = rng.random_range(0..256);
            }
        }
        picture
    }

    fn sub_rect(plane: &PlaneBuffer, block: BlockRect) -> Vec<i32> {
        (block.y..block.bottom())
            .flat_map(|y| plane.row(y)[block.x..block.right()].iter().copied())
            .collect()
    }

    fn assert_in_range(picture: &PictureBuffer) {
        for plane in picture.planes() {
            assert!(
                plane.data().iter().all(|&v| (0..=255).contains(&v)),
                "Sample out of 8-bit range"
            );
        }
    }

    /// Each plane of the result holds that plane's source window of the `axis` step
    fn cut_source_windows(
        src: &PictureBuffer,
        params: &ScalingParameters,
        block: BlockRect,
        axis: ScaleAxis,
    ) -> PictureBuffer {
        let (width, height) = block_step_source_size(params, block, axis);
        let mut resident = PictureBuffer::new(width, height, src.format, false);
        let chroma = params.chroma_parameters();
        let (w_factor, h_factor) = src.format.chroma_shift();
        let chroma_block = block.shifted(w_factor, h_factor);
        for (index, (plane, source)) in resident
            .planes_mut()
            .into_iter()
            .zip(src.planes())
            .enumerate()
        {
            let (p, b) = if index == 0 {
                (params, block)
            } else {
                (&chroma, chroma_block)
            };
            let window = match axis {
                ScaleAxis::Horizontal => {
                    let range = source_range_for_block(p, axis, b.x, b.right() - 1);
                    BlockRect::new(*range.start(), b.y, range.end() - range.start() + 1, b.height)
                }
                ScaleAxis::Vertical => {
                    let range = source_range_for_block(p, axis, b.y, b.bottom() - 1);
                    BlockRect::new(b.x, *range.start(), b.width, range.end() - range.start() + 1)
                }
            };
            plane.copy_block_from(source, window, 0, 0);
        }
        resident
    }

    #[test]
    fn test_equal_size_is_identity() {
        let mut rng = StdRng::seed_from_u64(176);
        let src = random_picture(&mut rng, 176, 144, ChromaFormat::Yuv420);
        let params = compute_scaling_parameters(176, 144, 176, 144, ChromaFormat::Yuv420);
        let dst = resample_picture(&src, &params).unwrap();
        assert_eq!(dst, src);

        let mut block_dst = PictureBuffer::new(176, 144, ChromaFormat::Yuv420, false);
        resample_block(&src, &params, &mut block_dst, BlockRect::new(0, 0, 176, 144)).unwrap();
        assert_eq!(block_dst, src);
    }

    #[test]
    fn test_output_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for (src, dst) in [((97, 61), (40, 30)), ((33, 21), (80, 50))] {
            let picture = random_picture(&mut rng, src.0, src.1, ChromaFormat::Yuv420);
            let params = compute_scaling_parameters(
                src.0 as u32,
                src.1 as u32,
                dst.0,
                dst.1,
                ChromaFormat::Yuv420,
            );
            let out = resample_picture(&picture, &params).unwrap();
            assert_eq!((out.width(), out.height()), (dst.0 as usize, dst.1 as usize));
            assert_in_range(&out);
        }
    }

    #[test]
    fn test_halving_uses_ratio_band() {
        let mut rng = StdRng::seed_from_u64(320);
        let src = random_picture(&mut rng, 320, 240, ChromaFormat::Yuv420);
        let params = compute_scaling_parameters(320, 240, 160, 120, ChromaFormat::Yuv420);
        let chroma = params.chroma_parameters();
        let band = FilterKind::Down(DownscaleBand::new(3).unwrap());
        for (p, kind) in [(&params, PlaneKind::Luma), (&chroma, PlaneKind::Chroma)] {
            for axis in [ScaleAxis::Horizontal, ScaleAxis::Vertical] {
                let geometry = AxisGeometry::rounded(p, axis, ScalingDirection::Downscale, kind);
                assert_eq!(geometry.filter().kind(), band, "{:?} {:?}", kind, axis);
                assert_eq!(geometry.filter().taps(), 12);
            }
        }

        let dst = resample_picture(&src, &params).unwrap();
        assert_eq!((dst.y.width(), dst.y.height()), (160, 120));
        assert_eq!((dst.u.width(), dst.u.height()), (80, 60));
        assert_eq!((dst.v.width(), dst.v.height()), (80, 60));
        assert_in_range(&dst);
    }

    #[test]
    fn test_doubling_uses_up_filters() {
        let mut rng = StdRng::seed_from_u64(160);
        let src = random_picture(&mut rng, 160, 120, ChromaFormat::Yuv420);
        let params = compute_scaling_parameters(160, 120, 320, 240, ChromaFormat::Yuv420);
        let chroma = params.chroma_parameters();
        assert_eq!(params.phase_y, 0);
        assert_eq!(chroma.phase_y, 1);

        let luma = AxisGeometry::rounded(
            &params,
            ScaleAxis::Horizontal,
            ScalingDirection::Upscale,
            PlaneKind::Luma,
        );
        let chroma_geometry = AxisGeometry::rounded(
            &chroma,
            ScaleAxis::Vertical,
            ScalingDirection::Upscale,
            PlaneKind::Chroma,
        );
        assert_eq!(luma.filter().taps(), 8);
        assert_eq!(chroma_geometry.filter().taps(), 4);

        let dst = resample_picture(&src, &params).unwrap();
        assert_eq!((dst.y.width(), dst.y.height()), (320, 240));
        assert_eq!((dst.u.width(), dst.u.height()), (160, 120));
        assert_in_range(&dst);
    }

    #[test]
    fn test_block_matches_picture() {
        let mut rng = StdRng::seed_from_u64(0xd);
        let plain = compute_scaling_parameters(320, 240, 160, 120, ChromaFormat::Yuv420);
        let padded = plain.with_source_padding(16, 8);
        for (params, size) in [(plain, (320, 240)), (padded, (336, 248))] {
            let src = random_picture(&mut rng, size.0, size.1, ChromaFormat::Yuv420);
            let whole = resample_picture(&src, &params).unwrap();

            for block in [BlockRect::new(32, 16, 48, 40), BlockRect::new(33, 17, 31, 23)] {
                let chroma_block = block.shifted(-1, -1);
                let mut full = PictureBuffer::new(160, 120, ChromaFormat::Yuv420, false);
                resample_block(&src, &params, &mut full, block).unwrap();
                assert_eq!(sub_rect(&full.y, block), sub_rect(&whole.y, block));
                assert_eq!(sub_rect(&full.u, chroma_block), sub_rect(&whole.u, chroma_block));
                assert_eq!(sub_rect(&full.v, chroma_block), sub_rect(&whole.v, chroma_block));
            }

            let block = BlockRect::new(32, 16, 48, 40);
            let chroma_block = block.shifted(-1, -1);
            let mut sized = PictureBuffer::new(48, 40, ChromaFormat::Yuv420, false);
            resample_block(&src, &params, &mut sized, block).unwrap();
            assert_eq!(sized.y.data(), sub_rect(&whole.y, block).as_slice());
            assert_eq!(sized.u.data(), sub_rect(&whole.u, chroma_block).as_slice());
            assert_eq!(sized.v.data(), sub_rect(&whole.v, chroma_block).as_slice());
        }
    }

    #[test]
    fn test_steps_match_picture() {
        let mut rng = StdRng::seed_from_u64(7);
        for format in [ChromaFormat::Yuv420, ChromaFormat::Yuv422, ChromaFormat::Yuv444] {
            for (src_size, dst_size) in [((128usize, 96usize), (72usize, 54usize)), ((40, 30), (100, 76))] {
                let params = compute_scaling_parameters(
                    src_size.0 as u32,
                    src_size.1 as u32,
                    dst_size.0 as u32,
                    dst_size.1 as u32,
                    format,
                );
                let src = random_picture(&mut rng, src_size.0, src_size.1, format);
                let whole = resample_picture(&src, &params).unwrap();

                let mut intermediate = PictureBuffer::new(dst_size.0, src_size.1, format, false);
                resample_block_axis(
                    &mut intermediate,
                    &src,
                    &params,
                    BlockRect::new(0, 0, dst_size.0, src_size.1),
                    ScaleAxis::Horizontal,
                )
                .unwrap();
                let mut out = PictureBuffer::new(dst_size.0, dst_size.1, format, false);
                resample_block_axis(
                    &mut out,
                    &intermediate,
                    &params,
                    BlockRect::new(0, 0, dst_size.0, dst_size.1),
                    ScaleAxis::Vertical,
                )
                .unwrap();
                assert_eq!(out, whole, "{:?} {:?} -> {:?}", format, src_size, dst_size);
            }
        }
    }

    #[test]
    fn test_steps_from_resident_windows() {
        let mut rng = StdRng::seed_from_u64(11);
        let params = compute_scaling_parameters(128, 96, 64, 48, ChromaFormat::Yuv420);
        let src = random_picture(&mut rng, 128, 96, ChromaFormat::Yuv420);
        let whole = resample_picture(&src, &params).unwrap();
        let mut intermediate = PictureBuffer::new(64, 96, ChromaFormat::Yuv420, false);
        resample_block_axis(
            &mut intermediate,
            &src,
            &params,
            BlockRect::new(0, 0, 64, 96),
            ScaleAxis::Horizontal,
        )
        .unwrap();

        let block = BlockRect::new(16, 8, 16, 12);
        let chroma_block = block.shifted(-1, -1);
        assert_eq!(
            block_step_source_size(&params, block, ScaleAxis::Horizontal),
            (52, 12)
        );
        assert_eq!(
            block_step_source_size(&params, block, ScaleAxis::Vertical),
            (16, 44)
        );

        let resident = cut_source_windows(&src, &params, block, ScaleAxis::Horizontal);
        let mut partial = PictureBuffer::new(16, 12, ChromaFormat::Yuv420, false);
        resample_block_axis(&mut partial, &resident, &params, block, ScaleAxis::Horizontal)
            .unwrap();
        assert_eq!(partial.y.data(), sub_rect(&intermediate.y, block).as_slice());
        assert_eq!(
            partial.u.data(),
            sub_rect(&intermediate.u, chroma_block).as_slice()
        );

        let resident = cut_source_windows(&intermediate, &params, block, ScaleAxis::Vertical);
        let mut partial = PictureBuffer::new(16, 12, ChromaFormat::Yuv420, false);
        resample_block_axis(&mut partial, &resident, &params, block, ScaleAxis::Vertical)
            .unwrap();
        assert_eq!(partial.y.data(), sub_rect(&whole.y, block).as_slice());
        assert_eq!(partial.v.data(), sub_rect(&whole.v, chroma_block).as_slice());
    }

    #[test]
    fn test_narrow_sources_replicate_edges() {
        let params = compute_scaling_parameters(1, 10, 4, 20, ChromaFormat::Yuv400);
        let mut src = PictureBuffer::new(1, 10, ChromaFormat::Yuv400, false);
        for y in 0..10 {
            src.y.set_sample(0, y, y as i32 * 25);
        }
        let dst = resample_picture(&src, &params).unwrap();
        for y in 0..20 {
            let row = dst.y.row(y);
            assert!(row.iter().all(|&v| v == row[0]), "Row {y} is not flat {:?}", row);
        }

        let params = compute_scaling_parameters(1, 1, 8, 8, ChromaFormat::Yuv400);
        let mut src = PictureBuffer::new(1, 1, ChromaFormat::Yuv400, false);
        src.y.set_sample(0, 0, 77);
        let dst = resample_picture(&src, &params).unwrap();
        assert!(dst.y.data().iter().all(|&v| v == 77));

        let params = compute_scaling_parameters(1, 1, 4, 4, ChromaFormat::Yuv420);
        let src = PictureBuffer::new(1, 1, ChromaFormat::Yuv420, false);
        assert!(resample_picture(&src, &params).is_ok());
    }

    #[test]
    fn test_rejections_leave_destination_untouched() {
        let mut rng = StdRng::seed_from_u64(99);
        let params = compute_scaling_parameters(320, 240, 160, 120, ChromaFormat::Yuv420);
        let src = random_picture(&mut rng, 320, 240, ChromaFormat::Yuv420);
        let mut dst = PictureBuffer::new(160, 120, ChromaFormat::Yuv420, false);
        dst.y.data_mut().fill(7);
        let before = dst.clone();

        let outside = BlockRect::new(150, 0, 20, 10);
        assert_eq!(
            resample_block(&src, &params, &mut dst, outside),
            Err(ScalerError::BlockOutOfBounds(BlockBounds {
                block: outside,
                width: 160,
                height: 120,
            }))
        );
        let small = random_picture(&mut rng, 100, 100, ChromaFormat::Yuv420);
        assert!(matches!(
            resample_block(&small, &params, &mut dst, BlockRect::new(0, 0, 16, 16)),
            Err(ScalerError::SourceTooSmall(_))
        ));
        let cramped = random_picture(&mut rng, 20, 20, ChromaFormat::Yuv420);
        assert!(matches!(
            resample_block_axis(
                &mut dst,
                &cramped,
                &params,
                BlockRect::new(0, 0, 16, 16),
                ScaleAxis::Horizontal
            ),
            Err(ScalerError::SourceTooSmall(_))
        ));

        let mixed = compute_scaling_parameters(320, 240, 400, 120, ChromaFormat::Yuv420);
        assert_eq!(
            resample_block(&src, &mixed, &mut dst, BlockRect::new(0, 0, 16, 16)),
            Err(ScalerError::MixedScalingDirection)
        );
        assert_eq!(
            resample_block_axis(
                &mut dst,
                &src,
                &mixed,
                BlockRect::new(0, 0, 16, 16),
                ScaleAxis::Horizontal
            ),
            Err(ScalerError::MixedScalingDirection)
        );
        assert_eq!(dst, before);

        let mut tiny = PictureBuffer::new(20, 20, ChromaFormat::Yuv420, false);
        let tiny_before = tiny.clone();
        assert!(matches!(
            resample_block(&src, &params, &mut tiny, BlockRect::new(0, 0, 48, 40)),
            Err(ScalerError::DestinationTooSmall(_))
        ));
        assert_eq!(tiny, tiny_before);

        assert_eq!(
            resample_picture(&src, &mixed),
            Err(ScalerError::MixedScalingDirection)
        );
        let zero = compute_scaling_parameters(320, 240, 0, 0, ChromaFormat::Yuv420);
        assert_eq!(
            resample_picture(&src, &zero),
            Err(ScalerError::ZeroBaseSize)
        );
    }

    #[test]
    #[should_panic]
    fn test_layout_mismatch_panics() {
        let params = compute_scaling_parameters(64, 48, 32, 24, ChromaFormat::Yuv444);
        let src = PictureBuffer::new(64, 48, ChromaFormat::Yuv420, false);
        let _ = resample_picture(&src, &params);
    }

    #[test]
    fn test_in_place_matches_picture() {
        let mut rng = StdRng::seed_from_u64(5);
        for (src_size, dst_size) in [
            ((96usize, 80usize), (48u32, 40u32)),
            ((40, 30), (72, 54)),
            ((64, 48), (64, 30)),
        ] {
            let params = ScalingParameters::new_unrounded(
                src_size.0 as u32,
                src_size.1 as u32,
                dst_size.0,
                dst_size.1,
                ChromaFormat::Yuv420,
            );
            let src = random_picture(&mut rng, src_size.0, src_size.1, ChromaFormat::Yuv420);
            let expected = resample_picture(&src, &params).unwrap();

            let mut working = src.clone();
            let mut dst = PictureBuffer::new(0, 0, ChromaFormat::Yuv420, false);
            resample_picture_in_place(&mut working, &params, &mut dst).unwrap();
            assert_eq!(dst, expected, "{:?} -> {:?}", src_size, dst_size);
        }
    }

    #[test]
    fn test_other_formats() {
        let mut rng = StdRng::seed_from_u64(444);
        for format in [ChromaFormat::Yuv400, ChromaFormat::Yuv422, ChromaFormat::Yuv444] {
            let src = random_picture(&mut rng, 64, 48, format);
            let params = compute_scaling_parameters(64, 48, 32, 24, format);
            let mut dst = PictureBuffer::new(3, 3, ChromaFormat::Yuv420, false);
            resample_picture_into(&src, &params, &mut dst).unwrap();
            dst.assert_layout(format);
            assert_eq!((dst.width(), dst.height()), (32, 24));
            assert_in_range(&dst);
        }
    }

    #[test]
    fn test_source_range_queries() {
        let params = compute_scaling_parameters(128, 96, 64, 48, ChromaFormat::Yuv420);
        assert_eq!(source_width_range(&params, 16, 16), 27..=68);
        assert_eq!(source_height_range(&params, 0, 8), 0..=20);
        assert_eq!(
            source_range_for_block(&params, ScaleAxis::Horizontal, 60, 63),
            115..=127
        );

        let unity = compute_scaling_parameters(64, 48, 64, 96, ChromaFormat::Yuv420);
        assert_eq!(source_width_range(&unity, 5, 10), 5..=14);
    }
}
