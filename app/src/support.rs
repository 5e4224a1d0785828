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
use std::fs::File;
use std::io::{Error, Read, Write};
use std::path::Path;
use yuv_rescaler::{BufferStoreMut, ChromaFormat, YuvPlanarImageMut};

pub(crate) fn parse_chroma_format(value: &str) -> Option<ChromaFormat> {
    match value {
        "400" => Some(ChromaFormat::Yuv400),
        "420" => Some(ChromaFormat::Yuv420),
        "422" => Some(ChromaFormat::Yuv422),
        "444" => Some(ChromaFormat::Yuv444),
        _ => None,
    }
}

/// Reads one frame of raw planar 8-bit YUV, planes stored back to back without padding
pub fn read_yuv_8bit<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
    format: ChromaFormat,
) -> Result<YuvPlanarImageMut<'static, u8>, Error> {
    let mut file = File::open(path)?;
    let (chroma_width, chroma_height) = format.chroma_dimensions(width, height);

    let mut y = vec![0u8; width * height];
    let mut u = vec![0u8; chroma_width * chroma_height];
    let mut v = vec![0u8; chroma_width * chroma_height];

    file.read_exact(&mut y)?;
    file.read_exact(&mut u)?;
    file.read_exact(&mut v)?;

    Ok(YuvPlanarImageMut {
        y_plane: BufferStoreMut::Owned(y),
        y_stride: width as u32,
        u_plane: BufferStoreMut::Owned(u),
        u_stride: chroma_width as u32,
        v_plane: BufferStoreMut::Owned(v),
        v_stride: chroma_width as u32,
        width: width as u32,
        height: height as u32,
    })
}

pub(crate) fn save_yuv_8bit<P: AsRef<Path>>(
    path: P,
    image: &YuvPlanarImageMut<u8>,
) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(image.y_plane.borrow())?;
    file.write_all(image.u_plane.borrow())?;
    file.write_all(image.v_plane.borrow())?;
    Ok(())
}
