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
use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use yuv_rescaler::{
    compute_scaling_parameters, resample_block, resample_block_axis, resample_picture,
    BlockRect, ChromaFormat, PictureBuffer, ScaleAxis,
};

fn random_picture(width: usize, height: usize, format: ChromaFormat) -> PictureBuffer {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut picture = PictureBuffer::new(width, height, format, false);
    for plane in picture.planes_mut() {
        for v in plane.data_mut().iter_mut() {
            *v = rng.random_range(0..256);
        }
    }
    picture
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let source = random_picture(1920, 1080, ChromaFormat::Yuv420);
    let down = compute_scaling_parameters(1920, 1080, 960, 540, ChromaFormat::Yuv420);
    let up = compute_scaling_parameters(1920, 1080, 2880, 1620, ChromaFormat::Yuv420);

    c.bench_function("Picture 1920x1080 -> 960x540 4:2:0", |b| {
        b.iter(|| {
            resample_picture(&source, &down).unwrap();
        })
    });

    c.bench_function("Picture 1920x1080 -> 2880x1620 4:2:0", |b| {
        b.iter(|| {
            resample_picture(&source, &up).unwrap();
        })
    });

    c.bench_function("Blocks 64x64 1920x1080 -> 960x540 4:2:0", |b| {
        let mut target = PictureBuffer::new(960, 540, ChromaFormat::Yuv420, false);
        b.iter(|| {
            for y in (0..540).step_by(64) {
                for x in (0..960).step_by(64) {
                    let block = BlockRect::new(x, y, 64.min(960 - x), 64.min(540 - y));
                    resample_block(&source, &down, &mut target, block).unwrap();
                }
            }
        })
    });

    c.bench_function("Axis steps 1920x1080 -> 960x540 4:2:0", |b| {
        let mut intermediate = PictureBuffer::new(960, 1080, ChromaFormat::Yuv420, false);
        let mut target = PictureBuffer::new(960, 540, ChromaFormat::Yuv420, false);
        b.iter(|| {
            resample_block_axis(
                &mut intermediate,
                &source,
                &down,
                BlockRect::new(0, 0, 960, 1080),
                ScaleAxis::Horizontal,
            )
            .unwrap();
            resample_block_axis(
                &mut target,
                &intermediate,
                &down,
                BlockRect::new(0, 0, 960, 540),
                ScaleAxis::Vertical,
            )
            .unwrap();
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
