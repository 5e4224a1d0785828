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
use crate::numerics::shift_by;
use crate::yuv_error::{
    check_overflow_v2, check_strided_plane, check_strided_region, dimensions_shortfall,
    MismatchedSize, ScalerError,
};
use crate::yuv_support::{BlockRect, ChromaFormat};
use num_traits::AsPrimitive;
use std::fmt::Debug;

/// Single component plane holding samples in intermediate precision.
///
/// Rows are stored contiguously, `width` samples per row. A plane used as a working
/// buffer for the separable passes carries a scratch line of `max(width, height)`
/// samples, its content is never assumed to be zeroed.
#[derive(Debug, Clone, Default)]
pub struct PlaneBuffer {
    width: usize,
    height: usize,
    data: Vec<i32>,
    scratch: Option<Vec<i32>>,
}

impl PartialEq for PlaneBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.data == other.data
    }
}

impl Eq for PlaneBuffer {}

impl PlaneBuffer {
    /// Allocates zero filled plane
    pub fn new(width: usize, height: usize, with_scratch: bool) -> PlaneBuffer {
        let scratch = if with_scratch {
            Some(vec![0i32; width.max(height)])
        } else {
            None
        };
        PlaneBuffer {
            width,
            height,
            data: vec![0i32; width * height],
            scratch,
        }
    }

    /// Wraps row major samples, `data` must hold exactly `width * height` samples
    pub fn from_data(width: usize, height: usize, data: Vec<i32>) -> Result<PlaneBuffer, ScalerError> {
        check_overflow_v2(width, height)?;
        if data.len() != width * height {
            return Err(ScalerError::PlaneSizeMismatch(MismatchedSize {
                expected: width * height,
                received: data.len(),
            }));
        }
        Ok(PlaneBuffer {
            width,
            height,
            data,
            scratch: None,
        })
    }

    /// Reads `width` x `height` samples from a strided external plane
    ///
    /// # Arguments
    ///
    /// * `data`: Plane, must be exactly `stride * height` elements long.
    /// * `stride`: Elements per row.
    /// * `with_scratch`: Allocate the scratch line used by whole plane resampling.
    ///
    /// returns: Result<PlaneBuffer, ScalerError>
    pub fn from_strided<T>(
        data: &[T],
        stride: u32,
        width: u32,
        height: u32,
        with_scratch: bool,
    ) -> Result<PlaneBuffer, ScalerError>
    where
        T: Copy + Debug + AsPrimitive<i32>,
    {
        check_strided_plane(data, stride, width, height)?;
        let mut plane = PlaneBuffer::new(width as usize, height as usize, with_scratch);
        if width == 0 {
            return Ok(plane);
        }
        for (dst, src) in plane
            .data
            .chunks_exact_mut(width as usize)
            .zip(data.chunks_exact(stride as usize))
        {
            for (dst, &src) in dst.iter_mut().zip(src.iter()) {
                *dst = src.as_();
            }
        }
        Ok(plane)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn has_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    #[inline]
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [i32] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<i32> {
        self.data
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[i32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [i32] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline(always)]
    pub fn sample(&self, x: usize, y: usize) -> i32 {
        self.data[y * self.width + x]
    }

    #[inline(always)]
    pub fn set_sample(&mut self, x: usize, y: usize, value: i32) {
        self.data[y * self.width + x] = value;
    }

    /// Row stride, samples and scratch line, the scratch line is allocated on first use.
    pub(crate) fn working_parts(&mut self) -> (usize, &mut [i32], &mut [i32]) {
        let scratch_len = self.width.max(self.height);
        let scratch = self.scratch.get_or_insert_with(|| vec![0i32; scratch_len]);
        (self.width, &mut self.data, scratch)
    }

    /// Copies the overlapping top left region of `src`.
    ///
    /// With `fill` every sample of `self` is written: columns right of the source
    /// repeat the sample to their left and rows below it repeat the row above.
    pub fn copy_from(&mut self, src: &PlaneBuffer, fill: bool) {
        if fill && src.is_empty() {
            return;
        }
        let (max_x, max_y, min_x, min_y) = if fill {
            (self.width, self.height, src.width, src.height)
        } else {
            let x = src.width.min(self.width);
            let y = src.height.min(self.height);
            (x, y, x, y)
        };
        let width = self.width;
        for i in 0..max_y {
            if i < min_y {
                let copied = min_x.min(max_x);
                let dst_row = &mut self.data[i * width..i * width + max_x];
                dst_row[..copied].copy_from_slice(&src.row(i)[..copied]);
                if copied < max_x {
                    let edge = dst_row[copied - 1];
                    dst_row[copied..].fill(edge);
                }
            } else {
                let (head, tail) = self.data.split_at_mut(i * width);
                tail[..max_x].copy_from_slice(&head[(i - 1) * width..(i - 1) * width + max_x]);
            }
        }
    }

    /// Copies `block` of `src` to `dst_x`, `dst_y`, clipped to both planes
    pub fn copy_block_from(&mut self, src: &PlaneBuffer, block: BlockRect, dst_x: usize, dst_y: usize) {
        let width = block
            .width
            .min(src.width.saturating_sub(block.x))
            .min(self.width.saturating_sub(dst_x));
        let height = block
            .height
            .min(src.height.saturating_sub(block.y))
            .min(self.height.saturating_sub(dst_y));
        if width == 0 || height == 0 {
            return;
        }
        for row in 0..height {
            let src_row = &src.row(block.y + row)[block.x..block.x + width];
            let dst_row = &mut self.row_mut(dst_y + row)[dst_x..dst_x + width];
            dst_row.copy_from_slice(src_row);
        }
    }

    /// Writes `block` of a strided external plane at `dst_x`, `dst_y`
    pub fn write_block_from_strided<T>(
        &mut self,
        data: &[T],
        stride: u32,
        block: BlockRect,
        dst_x: usize,
        dst_y: usize,
    ) -> Result<(), ScalerError>
    where
        T: Copy + Debug + AsPrimitive<i32>,
    {
        if block.is_empty() {
            return Ok(());
        }
        check_strided_region(data.len(), stride as usize, block)?;
        if let Some(shortfall) = dimensions_shortfall(
            self.width,
            self.height,
            dst_x + block.width,
            dst_y + block.height,
        ) {
            return Err(ScalerError::DestinationTooSmall(shortfall));
        }
        let stride = stride as usize;
        for row in 0..block.height {
            let src_start = (block.y + row) * stride + block.x;
            let src_row = &data[src_start..src_start + block.width];
            let dst_row = &mut self.row_mut(dst_y + row)[dst_x..dst_x + block.width];
            for (dst, &src) in dst_row.iter_mut().zip(src_row.iter()) {
                *dst = src.as_();
            }
        }
        Ok(())
    }

    /// Writes `block` of this plane into an 8-bit strided plane at `dst_x`, `dst_y`,
    /// samples are clipped into `[0, 255]`.
    pub fn read_block_to_u8(
        &self,
        data: &mut [u8],
        stride: u32,
        block: BlockRect,
        dst_x: usize,
        dst_y: usize,
    ) -> Result<(), ScalerError> {
        if block.is_empty() {
            return Ok(());
        }
        if let Some(shortfall) =
            dimensions_shortfall(self.width, self.height, block.right(), block.bottom())
        {
            return Err(ScalerError::SourceTooSmall(shortfall));
        }
        check_strided_region(
            data.len(),
            stride as usize,
            BlockRect::new(dst_x, dst_y, block.width, block.height),
        )?;
        let stride = stride as usize;
        for row in 0..block.height {
            let src_row = &self.row(block.y + row)[block.x..block.right()];
            let dst_start = (dst_y + row) * stride + dst_x;
            let dst_row = &mut data[dst_start..dst_start + block.width];
            for (dst, &src) in dst_row.iter_mut().zip(src_row.iter()) {
                *dst = src.clamp(0, 255) as u8;
            }
        }
        Ok(())
    }
}

/// Luma plane with two chroma planes laid out according to `format`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureBuffer {
    pub y: PlaneBuffer,
    pub u: PlaneBuffer,
    pub v: PlaneBuffer,
    pub format: ChromaFormat,
}

impl PictureBuffer {
    /// Allocates zero filled picture, chroma planes are sized by `format`
    pub fn new(width: usize, height: usize, format: ChromaFormat, with_scratch: bool) -> PictureBuffer {
        let (chroma_width, chroma_height) = format.chroma_dimensions(width, height);
        PictureBuffer {
            y: PlaneBuffer::new(width, height, with_scratch),
            u: PlaneBuffer::new(chroma_width, chroma_height, with_scratch),
            v: PlaneBuffer::new(chroma_width, chroma_height, with_scratch),
            format,
        }
    }

    /// # Panics
    ///
    /// Panics when chroma planes do not match `format` for the given luma plane.
    pub fn from_planes(
        y: PlaneBuffer,
        u: PlaneBuffer,
        v: PlaneBuffer,
        format: ChromaFormat,
    ) -> PictureBuffer {
        let picture = PictureBuffer { y, u, v, format };
        picture.assert_layout(format);
        picture
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.y.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.y.height
    }

    /// # Panics
    ///
    /// Panics when chroma plane sizes are not the ones `format` derives from the luma plane.
    pub fn assert_layout(&self, format: ChromaFormat) {
        let (chroma_width, chroma_height) = format.chroma_dimensions(self.y.width, self.y.height);
        assert!(
            self.u.width == chroma_width
                && self.u.height == chroma_height
                && self.v.width == chroma_width
                && self.v.height == chroma_height,
            "Chroma planes {}x{} and {}x{} do not form {:?} layout for luma {}x{}",
            self.u.width,
            self.u.height,
            self.v.width,
            self.v.height,
            format,
            self.y.width,
            self.y.height
        );
    }

    #[inline]
    pub fn planes(&self) -> [&PlaneBuffer; 3] {
        [&self.y, &self.u, &self.v]
    }

    #[inline]
    pub fn planes_mut(&mut self) -> [&mut PlaneBuffer; 3] {
        [&mut self.y, &mut self.u, &mut self.v]
    }

    /// Plane wise [PlaneBuffer::copy_from]
    pub fn copy_from(&mut self, src: &PictureBuffer, fill: bool) {
        self.y.copy_from(&src.y, fill);
        self.u.copy_from(&src.u, fill);
        self.v.copy_from(&src.v, fill);
    }

    /// Copies a luma `block` of `src` to `dst_x`, `dst_y` together with the chroma
    /// samples it covers.
    pub fn copy_block_from(&mut self, src: &PictureBuffer, block: BlockRect, dst_x: usize, dst_y: usize) {
        let (w_factor, h_factor) = self.format.chroma_shift();
        let chroma_block = block.shifted(w_factor, h_factor);
        let chroma_x = shift_by(dst_x, w_factor);
        let chroma_y = shift_by(dst_y, h_factor);
        self.y.copy_block_from(&src.y, block, dst_x, dst_y);
        self.u.copy_block_from(&src.u, chroma_block, chroma_x, chroma_y);
        self.v.copy_block_from(&src.v, chroma_block, chroma_x, chroma_y);
    }

    /// Reads a whole external planar image
    pub fn from_planar_image<T>(
        image: &YuvPlanarImage<T>,
        format: ChromaFormat,
        with_scratch: bool,
    ) -> Result<PictureBuffer, ScalerError>
    where
        T: Copy + Debug + AsPrimitive<i32>,
    {
        image.check_constraints(format)?;
        let (chroma_width, chroma_height) =
            format.chroma_dimensions(image.width as usize, image.height as usize);
        let y = PlaneBuffer::from_strided(
            image.y_plane,
            image.y_stride,
            image.width,
            image.height,
            with_scratch,
        )?;
        let u = PlaneBuffer::from_strided(
            image.u_plane,
            image.u_stride,
            chroma_width as u32,
            chroma_height as u32,
            with_scratch,
        )?;
        let v = PlaneBuffer::from_strided(
            image.v_plane,
            image.v_stride,
            chroma_width as u32,
            chroma_height as u32,
            with_scratch,
        )?;
        Ok(PictureBuffer { y, u, v, format })
    }

    /// Writes a luma `block` of an external planar image, and the chroma samples it covers,
    /// at `dst_x`, `dst_y`.
    pub fn write_block_from_planar<T>(
        &mut self,
        image: &YuvPlanarImage<T>,
        block: BlockRect,
        dst_x: usize,
        dst_y: usize,
    ) -> Result<(), ScalerError>
    where
        T: Copy + Debug + AsPrimitive<i32>,
    {
        image.check_constraints(self.format)?;
        let (w_factor, h_factor) = self.format.chroma_shift();
        let chroma_block = block.shifted(w_factor, h_factor);
        let chroma_x = shift_by(dst_x, w_factor);
        let chroma_y = shift_by(dst_y, h_factor);
        self.y
            .write_block_from_strided(image.y_plane, image.y_stride, block, dst_x, dst_y)?;
        if self.format.has_chroma() {
            self.u.write_block_from_strided(
                image.u_plane,
                image.u_stride,
                chroma_block,
                chroma_x,
                chroma_y,
            )?;
            self.v.write_block_from_strided(
                image.v_plane,
                image.v_stride,
                chroma_block,
                chroma_x,
                chroma_y,
            )?;
        }
        Ok(())
    }

    /// Stores a luma `block` of this picture, and the chroma samples it covers, into an
    /// 8-bit planar image at `dst_x`, `dst_y`.
    pub fn read_block_into_planar(
        &self,
        image: &mut YuvPlanarImageMut<u8>,
        block: BlockRect,
        dst_x: usize,
        dst_y: usize,
    ) -> Result<(), ScalerError> {
        image.check_constraints(self.format)?;
        let (w_factor, h_factor) = self.format.chroma_shift();
        let chroma_block = block.shifted(w_factor, h_factor);
        let chroma_x = shift_by(dst_x, w_factor);
        let chroma_y = shift_by(dst_y, h_factor);
        self.y
            .read_block_to_u8(image.y_plane.as_mut(), image.y_stride, block, dst_x, dst_y)?;
        if self.format.has_chroma() {
            self.u.read_block_to_u8(
                image.u_plane.as_mut(),
                image.u_stride,
                chroma_block,
                chroma_x,
                chroma_y,
            )?;
            self.v.read_block_to_u8(
                image.v_plane.as_mut(),
                image.v_stride,
                chroma_block,
                chroma_x,
                chroma_y,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum BufferStoreMut<'a, T: Copy + Debug> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T: Copy + Debug> BufferStoreMut<'_, T> {
    pub fn borrow(&self) -> &[T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }

    pub fn as_mut(&mut self) -> &mut [T] {
        match self {
            Self::Borrowed(p_ref) => p_ref,
            Self::Owned(vec) => vec,
        }
    }
}

#[derive(Debug, Clone)]
/// Planar YUV image in an external sample type
pub struct YuvPlanarImage<'a, T>
where
    T: Copy + Debug,
{
    pub y_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub y_stride: u32,
    pub u_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub u_stride: u32,
    pub v_plane: &'a [T],
    /// Stride here always means Elements per row.
    pub v_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl<T> YuvPlanarImage<'_, T>
where
    T: Copy + Debug,
{
    pub fn check_constraints(&self, format: ChromaFormat) -> Result<(), ScalerError> {
        let (chroma_width, chroma_height) =
            format.chroma_dimensions(self.width as usize, self.height as usize);
        check_strided_plane(self.y_plane, self.y_stride, self.width, self.height)?;
        check_strided_plane(
            self.u_plane,
            self.u_stride,
            chroma_width as u32,
            chroma_height as u32,
        )?;
        check_strided_plane(
            self.v_plane,
            self.v_stride,
            chroma_width as u32,
            chroma_height as u32,
        )?;
        Ok(())
    }
}

#[derive(Debug)]
/// Mutable planar YUV image in an external sample type
pub struct YuvPlanarImageMut<'a, T>
where
    T: Copy + Debug,
{
    pub y_plane: BufferStoreMut<'a, T>,
    /// Stride here always means Elements per row.
    pub y_stride: u32,
    pub u_plane: BufferStoreMut<'a, T>,
    /// Stride here always means Elements per row.
    pub u_stride: u32,
    pub v_plane: BufferStoreMut<'a, T>,
    /// Stride here always means Elements per row.
    pub v_stride: u32,
    pub width: u32,
    pub height: u32,
}

impl<T> YuvPlanarImageMut<'_, T>
where
    T: Copy + Debug,
{
    pub fn check_constraints(&self, format: ChromaFormat) -> Result<(), ScalerError> {
        let (chroma_width, chroma_height) =
            format.chroma_dimensions(self.width as usize, self.height as usize);
        check_strided_plane(
            self.y_plane.borrow(),
            self.y_stride,
            self.width,
            self.height,
        )?;
        check_strided_plane(
            self.u_plane.borrow(),
            self.u_stride,
            chroma_width as u32,
            chroma_height as u32,
        )?;
        check_strided_plane(
            self.v_plane.borrow(),
            self.v_stride,
            chroma_width as u32,
            chroma_height as u32,
        )?;
        Ok(())
    }

    pub fn to_fixed(&self) -> YuvPlanarImage<'_, T> {
        YuvPlanarImage {
            y_plane: self.y_plane.borrow(),
            y_stride: self.y_stride,
            u_plane: self.u_plane.borrow(),
            u_stride: self.u_stride,
            v_plane: self.v_plane.borrow(),
            v_stride: self.v_stride,
            width: self.width,
            height: self.height,
        }
    }
}

impl<T> YuvPlanarImageMut<'_, T>
where
    T: Default + Clone + Copy + Debug,
{
    /// Allocates mutable planar image with chroma planes sized by `format`
    pub fn alloc(width: u32, height: u32, format: ChromaFormat) -> Self {
        let (chroma_width, chroma_height) =
            format.chroma_dimensions(width as usize, height as usize);
        let y_target = vec![T::default(); width as usize * height as usize];
        let u_target = vec![T::default(); chroma_width * chroma_height];
        let v_target = vec![T::default(); chroma_width * chroma_height];
        YuvPlanarImageMut {
            y_plane: BufferStoreMut::Owned(y_target),
            y_stride: width,
            u_plane: BufferStoreMut::Owned(u_target),
            u_stride: chroma_width as u32,
            v_plane: BufferStoreMut::Owned(v_target),
            v_stride: chroma_width as u32,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_plane(rng: &mut StdRng, width: usize, height: usize) -> PlaneBuffer {
        let data = (0..width * height)
            .map(|_| rng.random_range(0..256))
            .collect::<Vec<i32>>();
        PlaneBuffer::from_data(width, height, data).unwrap()
    }

    #[test]
    fn test_copy_with_fill_replicates_edges() {
        let mut rng = StdRng::seed_from_u64(0x5ca1e);
        let src = random_plane(&mut rng, 5, 3);
        let mut dst = PlaneBuffer::new(8, 6, false);
        dst.copy_from(&src, true);
        for y in 0..6 {
            for x in 0..8 {
                let expected = src.sample(x.min(4), y.min(2));
                assert_eq!(
                    dst.sample(x, y),
                    expected,
                    "Sample at ({x}, {y}) expected {expected}, but it was {}",
                    dst.sample(x, y)
                );
            }
        }
    }

    #[test]
    fn test_copy_without_fill_keeps_rest() {
        let mut rng = StdRng::seed_from_u64(0x5ca1e);
        let src = random_plane(&mut rng, 4, 4);
        let mut dst = PlaneBuffer::from_data(6, 2, vec![-1; 12]).unwrap();
        dst.copy_from(&src, false);
        assert_eq!(&dst.row(0)[..4], src.row(0));
        assert_eq!(&dst.row(1)[..4], src.row(1));
        assert_eq!(&dst.row(1)[4..], &[-1, -1]);
    }

    #[test]
    fn test_copy_block_is_clipped() {
        let mut rng = StdRng::seed_from_u64(42);
        let src = random_plane(&mut rng, 10, 10);
        let mut dst = PlaneBuffer::new(4, 4, false);
        dst.copy_block_from(&src, BlockRect::new(6, 7, 8, 8), 1, 1);
        assert_eq!(dst.sample(0, 0), 0);
        assert_eq!(dst.sample(1, 1), src.sample(6, 7));
        assert_eq!(dst.sample(3, 3), src.sample(8, 9));
    }

    #[test]
    fn test_strided_round_trip_through_u8() {
        let width = 7u32;
        let height = 5u32;
        let stride = 9u32;
        let mut rng = StdRng::seed_from_u64(7);
        let source = (0..stride * height)
            .map(|_| rng.random::<u8>())
            .collect::<Vec<u8>>();
        let plane = PlaneBuffer::from_strided(&source, stride, width, height, true).unwrap();
        assert!(plane.has_scratch());
        let mut restored = vec![0u8; (stride * height) as usize];
        plane
            .read_block_to_u8(
                &mut restored,
                stride,
                BlockRect::new(0, 0, width as usize, height as usize),
                0,
                0,
            )
            .unwrap();
        for y in 0..height as usize {
            let row = y * stride as usize;
            assert_eq!(
                &restored[row..row + width as usize],
                &source[row..row + width as usize]
            );
        }
    }

    #[test]
    fn test_read_block_clips_samples() {
        let plane = PlaneBuffer::from_data(2, 1, vec![-20, 300]).unwrap();
        let mut out = vec![7u8; 2];
        plane
            .read_block_to_u8(&mut out, 2, BlockRect::new(0, 0, 2, 1), 0, 0)
            .unwrap();
        assert_eq!(out, vec![0, 255]);
    }

    #[test]
    fn test_write_block_rejects_short_source() {
        let mut plane = PlaneBuffer::new(8, 8, false);
        let data = vec![0u16; 10];
        let result = plane.write_block_from_strided(&data, 4, BlockRect::new(0, 0, 4, 4), 0, 0);
        assert!(result.is_err());
        assert!(plane.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_picture_layouts() {
        let picture = PictureBuffer::new(33, 17, ChromaFormat::Yuv420, false);
        assert_eq!((picture.u.width(), picture.u.height()), (16, 8));
        picture.assert_layout(ChromaFormat::Yuv420);
        let mono = PictureBuffer::new(33, 17, ChromaFormat::Yuv400, false);
        assert!(mono.u.is_empty() && mono.v.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_layout_mismatch_is_fatal() {
        let picture = PictureBuffer::new(32, 16, ChromaFormat::Yuv422, false);
        picture.assert_layout(ChromaFormat::Yuv420);
    }

    #[test]
    fn test_planar_image_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut image = YuvPlanarImageMut::<u8>::alloc(12, 10, ChromaFormat::Yuv420);
        for value in image.y_plane.as_mut().iter_mut() {
            *value = rng.random();
        }
        for value in image.u_plane.as_mut().iter_mut() {
            *value = rng.random();
        }
        for value in image.v_plane.as_mut().iter_mut() {
            *value = rng.random();
        }
        let picture =
            PictureBuffer::from_planar_image(&image.to_fixed(), ChromaFormat::Yuv420, false)
                .unwrap();
        let mut restored = YuvPlanarImageMut::<u8>::alloc(12, 10, ChromaFormat::Yuv420);
        picture
            .read_block_into_planar(&mut restored, BlockRect::new(0, 0, 12, 10), 0, 0)
            .unwrap();
        assert_eq!(restored.y_plane.borrow(), image.y_plane.borrow());
        assert_eq!(restored.u_plane.borrow(), image.u_plane.borrow());
        assert_eq!(restored.v_plane.borrow(), image.v_plane.borrow());
    }
}
