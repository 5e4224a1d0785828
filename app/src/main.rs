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
mod support;

use crate::support::{parse_chroma_format, read_yuv_8bit, save_yuv_8bit};
use image::{GrayImage, ImageBuffer, Luma};
use std::error::Error;
use std::time::Instant;
use yuv_rescaler::{
    compute_scaling_parameters, resample_block, resample_picture, BlockRect, ChromaFormat,
    PictureBuffer, YuvPlanarImageMut,
};

const BLOCK_SIZE: usize = 64;

fn usage() -> String {
    "Usage: app <input.yuv> <width> <height> <target width> <target height> [400|420|422|444] [output.yuv]"
        .to_string()
}

fn parse_size(value: Option<&String>) -> Result<u32, Box<dyn Error>> {
    let value = value.ok_or_else(usage)?;
    Ok(value.parse::<u32>()?)
}

/// Largest sample difference between the picture path and the block path
fn max_divergence(whole: &PictureBuffer, blocks: &PictureBuffer) -> i32 {
    whole
        .planes()
        .iter()
        .zip(blocks.planes().iter())
        .flat_map(|(a, b)| a.data().iter().zip(b.data().iter()))
        .map(|(&a, &b)| (a - b).abs())
        .max()
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let input = args.get(1).ok_or_else(usage)?;
    let width = parse_size(args.get(2))?;
    let height = parse_size(args.get(3))?;
    let target_width = parse_size(args.get(4))?;
    let target_height = parse_size(args.get(5))?;
    let format = match args.get(6) {
        Some(value) => parse_chroma_format(value).ok_or_else(usage)?,
        None => ChromaFormat::Yuv420,
    };
    let output = args
        .get(7)
        .cloned()
        .unwrap_or_else(|| format!("rescaled_{}x{}.yuv", target_width, target_height));

    let image = read_yuv_8bit(input, width as usize, height as usize, format)?;
    let picture = PictureBuffer::from_planar_image(&image.to_fixed(), format, false)?;
    let params = compute_scaling_parameters(width, height, target_width, target_height, format);

    let start_time = Instant::now();
    let rescaled = resample_picture(&picture, &params)?;
    println!("Picture resample time: {:?}", start_time.elapsed());

    let start_time = Instant::now();
    let mut tiled = PictureBuffer::new(rescaled.width(), rescaled.height(), format, false);
    for y in (0..rescaled.height()).step_by(BLOCK_SIZE) {
        for x in (0..rescaled.width()).step_by(BLOCK_SIZE) {
            let block = BlockRect::new(
                x,
                y,
                BLOCK_SIZE.min(rescaled.width() - x),
                BLOCK_SIZE.min(rescaled.height() - y),
            );
            resample_block(&picture, &params, &mut tiled, block)?;
        }
    }
    println!("Block resample time: {:?}", start_time.elapsed());
    println!(
        "Max divergence between picture and blocks: {}",
        max_divergence(&rescaled, &tiled)
    );

    let mut target = YuvPlanarImageMut::<u8>::alloc(target_width, target_height, format);
    rescaled.read_block_into_planar(
        &mut target,
        BlockRect::new(0, 0, rescaled.width(), rescaled.height()),
        0,
        0,
    )?;
    save_yuv_8bit(&output, &target)?;

    let luma: GrayImage = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(
        target_width,
        target_height,
        target.y_plane.borrow().to_vec(),
    )
    .ok_or("Luma plane does not fit target size")?;
    luma.save(format!("{}.png", output))?;

    Ok(())
}
