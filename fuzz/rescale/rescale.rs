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
    compute_scaling_parameters, resample_picture, ChromaFormat, PictureBuffer, ScalerError,
};

fuzz_target!(|data: (u8, u8, u8, u8, u8, u8)| {
    let format = ChromaFormat::from(data.4 % 4);
    fuzz_rescale(data.0, data.1, data.2, data.3, format, data.5);
});

fn fuzz_rescale(
    i_width: u8,
    i_height: u8,
    t_width: u8,
    t_height: u8,
    format: ChromaFormat,
    value: u8,
) {
    let mut picture = PictureBuffer::new(i_width as usize, i_height as usize, format, false);
    for plane in picture.planes_mut() {
        plane.data_mut().fill(value as i32);
    }
    let params = compute_scaling_parameters(
        i_width as u32,
        i_height as u32,
        t_width as u32,
        t_height as u32,
        format,
    );
    match resample_picture(&picture, &params) {
        Ok(rescaled) => {
            assert_eq!(rescaled.width(), t_width as usize);
            assert_eq!(rescaled.height(), t_height as usize);
            // Flat luma stays flat
            assert!(rescaled.y.data().iter().all(|&v| v == value as i32));
        }
        Err(ScalerError::ZeroBaseSize) | Err(ScalerError::MixedScalingDirection) => {}
        Err(error) => panic!("Unexpected error {}", error),
    }
}
