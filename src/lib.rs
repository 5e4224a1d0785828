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
#![forbid(unsafe_code)]
//! Bit exact polyphase resampling of planar 8-bit YUV pictures.
//!
//! Whole pictures are resampled with [resample_picture], independent target blocks with
//! [resample_block], and the separable passes can be driven one axis at a time through
//! [resample_block_axis].
mod axis;
mod block;
mod filter_selector;
mod filters;
mod images;
mod numerics;
mod scaler;
mod scaling_parameters;
mod separable;
mod yuv_error;
mod yuv_support;

pub use yuv_support::BlockRect;
pub use yuv_support::ChromaFormat;
pub use yuv_support::PlaneKind;
pub use yuv_support::ScaleAxis;
pub use yuv_support::ScalingDirection;

pub use yuv_error::BlockBounds;
pub use yuv_error::MismatchedDimensions;
pub use yuv_error::MismatchedSize;
pub use yuv_error::ScalerError;

pub use filter_selector::DownscaleBand;
pub use filters::FilterKind;
pub use filters::PolyphaseFilter;

pub use images::BufferStoreMut;
pub use images::PictureBuffer;
pub use images::PlaneBuffer;
pub use images::YuvPlanarImage;
pub use images::YuvPlanarImageMut;

pub use scaling_parameters::ScalingParameters;

pub use scaler::block_step_source_size;
pub use scaler::compute_scaling_parameters;
pub use scaler::resample_block;
pub use scaler::resample_block_axis;
pub use scaler::resample_picture;
pub use scaler::resample_picture_in_place;
pub use scaler::resample_picture_into;
pub use scaler::source_height_range;
pub use scaler::source_range_for_block;
pub use scaler::source_width_range;
