//! Resample filter selection shared by every resizing stage.

use std::fmt;

use clap::ValueEnum;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Resampling filter used wherever a stage resizes the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Nearest neighbour. Hard edges, no new colours.
    Nearest,
    /// Linear interpolation.
    Bilinear,
    /// Cubic interpolation.
    Bicubic,
    /// Gaussian weighting.
    Gaussian,
    /// Lanczos windowed sinc. Sharpest for downscaling.
    #[default]
    Lanczos,
}

impl ResampleFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::Bicubic => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResampleFilter::Nearest => "nearest",
            ResampleFilter::Bilinear => "bilinear",
            ResampleFilter::Bicubic => "bicubic",
            ResampleFilter::Gaussian => "gaussian",
            ResampleFilter::Lanczos => "lanczos",
        };
        f.write_str(name)
    }
}
