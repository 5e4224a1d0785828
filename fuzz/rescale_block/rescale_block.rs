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

#![no_main]

use libfuzzer_sys::fuzz_target;
use yuv_rescaler::{
    compute_scaling_parameters, resample_block, resample_picture, BlockRect, ChromaFormat,
    PictureBuffer,
};

fuzz_target!(|data: (u8, u8, u8, u8, u8, u8, u8, u8, u8)| {
    let format = ChromaFormat::from(data.4 % 4);
    fuzz_block(
        (data.0, data.1),
        (data.2, data.3),
        format,
        (data.5, data.6, data.7, data.8),
    );
});

fn fuzz_block(source: (u8, u8), target: (u8, u8), format: ChromaFormat, block: (u8, u8, u8, u8)) {
    if source.0 == 0 || source.1 == 0 || target.0 == 0 || target.1 == 0 {
        return;
    }
    let (width, height) = (source.0 as usize, source.1 as usize);
    let mut picture = PictureBuffer::new(width, height, format, false);
    for (index, plane) in picture.planes_mut().into_iter().enumerate() {
        let plane_width = plane.width();
        for (i, v) in plane.data_mut().iter_mut().enumerate() {
            let (x, y) = (i % plane_width.max(1), i / plane_width.max(1));
            *v = ((x * 7 + y * 13 + index * 31) % 256) as i32;
        }
    }
    let params = compute_scaling_parameters(
        source.0 as u32,
        source.1 as u32,
        target.0 as u32,
        target.1 as u32,
        format,
    );
    let Ok(whole) = resample_picture(&picture, &params) else {
        return;
    };

    let x = block.0 as usize % target.0 as usize;
    let y = block.1 as usize % target.1 as usize;
    let block = BlockRect::new(
        x,
        y,
        (block.2 as usize).min(target.0 as usize - x),
        (block.3 as usize).min(target.1 as usize - y),
    );
    let mut blocks = PictureBuffer::new(target.0 as usize, target.1 as usize, format, false);
    resample_block(&picture, &params, &mut blocks, block).unwrap();
    for row in block.y..block.bottom() {
        assert_eq!(
            &whole.y.row(row)[block.x..block.right()],
            &blocks.y.row(row)[block.x..block.right()]
        );
    }
}
