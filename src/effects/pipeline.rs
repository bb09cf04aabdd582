//! The effect pipeline: an ordered list of stages applied to one image.

use image::DynamicImage;

use crate::effects::halftone::HalftoneOptions;
use crate::effects::{adjust, geometry, halftone, quantize, ResampleFilter};
use crate::error::Result;
use crate::types::{shuffle_colours, Colour, ColourSpec};

/// Per-image state shared by every stage of a run.
#[derive(Debug, Clone, Copy)]
pub struct StageContext {
    /// Dimensions at load time, before any stage ran.
    pub original_size: (u32, u32),
    /// Filter for stages that resize.
    pub filter: ResampleFilter,
}

/// One stage of the processing pipeline.
///
/// Stages are applied in the order the pipeline holds them; each consumes the
/// previous stage's output. Randomized stages (shuffled colour picks) draw
/// fresh randomness per image, so a batch reshuffles for every file.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Fit to a target box and/or percentage scale.
    Resize { width: u32, height: u32, scale: u32 },
    /// Gaussian blur with an area-relative sigma.
    Blur { factor: f32 },
    /// Halftone dot rendering.
    Halftone {
        spec: ColourSpec,
        sample: u32,
        shuffle: bool,
    },
    /// Bi-level Floyd-Steinberg dithering.
    Dither,
    /// Reduce to `target` colours, optionally forcing a palette.
    Quantize {
        target: usize,
        spec: Option<ColourSpec>,
        shuffle: bool,
    },
    /// Keep the top `bits` bits per channel.
    Posterize { bits: u8 },
    /// Blocky downsample-upsample.
    Pixelize { size: u32 },
    /// Reduce to luminance.
    Grayscale,
    /// Scale colour channels.
    Brightness { factor: f32 },
    /// Scale HSL saturation.
    Saturation { factor: f32 },
    /// Knock out exact-match colours.
    Transparency { colours: Vec<Colour> },
    /// Rotate counter-clockwise by whole degrees.
    Rotate { degrees: i32 },
    /// Invert colour channels.
    Invert,
    /// Scale the alpha channel.
    Opacity { factor: f32 },
}

impl Effect {
    /// Apply this stage to an image.
    pub fn apply(&self, image: DynamicImage, ctx: &StageContext) -> Result<DynamicImage> {
        let filter = ctx.filter.filter_type();
        match self {
            Effect::Resize {
                width,
                height,
                scale,
            } => Ok(geometry::crop_resize(
                &image, *width, *height, *scale, filter,
            )),
            Effect::Blur { factor } => Ok(adjust::blur(&image, *factor)),
            Effect::Halftone {
                spec,
                sample,
                shuffle,
            } => {
                let options =
                    HalftoneOptions::from_spec(spec, *sample, *shuffle, &mut rand::thread_rng())?;
                let oversample = halftone::oversample_factor(
                    (image.width(), image.height()),
                    ctx.original_size,
                );
                halftone::render(&image, &options, oversample, filter)
            }
            Effect::Dither => Ok(adjust::dither(&image)),
            Effect::Quantize {
                target,
                spec,
                shuffle,
            } => {
                let forced = match spec {
                    Some(spec) => {
                        let (mut colours, _) = spec.resolve_lossy();
                        if *shuffle {
                            shuffle_colours(&mut colours, &mut rand::thread_rng());
                        }
                        colours
                    }
                    None => Vec::new(),
                };
                let forced = (!forced.is_empty()).then_some(forced);
                quantize::quantize(&image, *target, forced.as_deref())
            }
            Effect::Posterize { bits } => adjust::posterize(&image, *bits),
            Effect::Pixelize { size } => Ok(geometry::pixelize(&image, *size)),
            Effect::Grayscale => Ok(adjust::grayscale(&image)),
            Effect::Brightness { factor } => Ok(adjust::brightness(&image, *factor)),
            Effect::Saturation { factor } => Ok(adjust::saturation(&image, *factor)),
            Effect::Transparency { colours } => Ok(adjust::transparent_colours(&image, colours)),
            Effect::Rotate { degrees } => Ok(geometry::rotate(&image, *degrees)),
            Effect::Invert => {
                let mut image = image;
                image.invert();
                Ok(image)
            }
            Effect::Opacity { factor } => Ok(adjust::opacity(&image, *factor)),
        }
    }

    /// The fragment this stage appends to output file names.
    ///
    /// Floats format with a trailing `.0` when whole, so `--brightness 2`
    /// tags as `_br2.0`. Resize and transparency leave no tag; the final
    /// dimensions already carry the resize.
    pub fn filename_tag(&self) -> String {
        match self {
            Effect::Resize { .. } | Effect::Transparency { .. } => String::new(),
            Effect::Blur { factor } => format!("_blur{factor:?}"),
            Effect::Halftone { spec, sample, .. } => {
                format!("_halftone{sample}{}", spec.filename_tag())
            }
            Effect::Dither => "_dither".to_string(),
            Effect::Quantize { target, spec, .. } => {
                let mut tag = format!("_{target}color");
                if let Some(spec) = spec {
                    tag.push_str(&spec.filename_tag());
                }
                tag
            }
            Effect::Posterize { bits } => format!("_posterize{bits}"),
            Effect::Pixelize { size } => format!("_pixelized{size}"),
            Effect::Grayscale => "_grayscale".to_string(),
            Effect::Brightness { factor } => format!("_br{factor:?}"),
            Effect::Saturation { factor } => format!("_sat{factor:?}"),
            Effect::Rotate { degrees } => format!("_rotated{degrees}"),
            Effect::Invert => "_invert".to_string(),
            Effect::Opacity { factor } => format!("_opacity{factor:?}"),
        }
    }
}

/// An ordered list of effects plus the shared resample filter.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    effects: Vec<Effect>,
    filter: ResampleFilter,
}

impl Pipeline {
    pub fn new(filter: ResampleFilter) -> Self {
        Self {
            effects: Vec::new(),
            filter,
        }
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Run every stage in order.
    ///
    /// The load-time dimensions are captured here so later stages can tell
    /// how far earlier ones have scaled the image.
    pub fn process(&self, image: DynamicImage) -> Result<DynamicImage> {
        let ctx = StageContext {
            original_size: (image.width(), image.height()),
            filter: self.filter,
        };

        let mut image = image;
        for effect in &self.effects {
            image = effect.apply(image, &ctx)?;
        }
        Ok(image)
    }

    /// Concatenated filename tags in stage order.
    pub fn filename_tags(&self) -> String {
        self.effects.iter().map(Effect::filename_tag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 80, 40, 255]),
        ))
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = Pipeline::new(ResampleFilter::Nearest);
        let out = pipeline.process(solid(6, 4)).unwrap();
        assert_eq!((out.width(), out.height()), (6, 4));
        assert_eq!(out.to_rgba8().get_pixel(0, 0).0, [120, 80, 40, 255]);
    }

    #[test]
    fn test_stages_run_in_order() {
        let mut pipeline = Pipeline::new(ResampleFilter::Nearest);
        pipeline.push(Effect::Resize {
            width: 10,
            height: 0,
            scale: 0,
        });
        pipeline.push(Effect::Rotate { degrees: 90 });

        let out = pipeline.process(solid(20, 10)).unwrap();
        assert_eq!((out.width(), out.height()), (5, 10));
    }

    #[test]
    fn test_filename_tags_concatenate_in_order() {
        let mut pipeline = Pipeline::new(ResampleFilter::Lanczos);
        pipeline.push(Effect::Resize {
            width: 64,
            height: 0,
            scale: 0,
        });
        pipeline.push(Effect::Halftone {
            spec: ColourSpec::new("GameBoy"),
            sample: 10,
            shuffle: false,
        });
        pipeline.push(Effect::Brightness { factor: 2.0 });
        pipeline.push(Effect::Invert);

        assert_eq!(
            pipeline.filename_tags(),
            "_halftone10_gameboy_colorpalette_br2.0_invert"
        );
    }

    #[test]
    fn test_quantize_tag_includes_count_and_palette() {
        let effect = Effect::Quantize {
            target: 8,
            spec: Some(ColourSpec::new("#112233,#445566")),
            shuffle: false,
        };
        assert_eq!(effect.filename_tag(), "_8color_colors_112233_445566");
    }

    #[test]
    fn test_float_tags_keep_trailing_zero() {
        assert_eq!(
            Effect::Opacity { factor: 0.5 }.filename_tag(),
            "_opacity0.5"
        );
        assert_eq!(Effect::Blur { factor: 1.0 }.filename_tag(), "_blur1.0");
        assert_eq!(
            Effect::Saturation { factor: 1.25 }.filename_tag(),
            "_sat1.25"
        );
    }

    #[test]
    fn test_quantize_with_unresolvable_spec_falls_back_to_adaptive() {
        let effect = Effect::Quantize {
            target: 4,
            spec: Some(ColourSpec::new("bogus,tokens")),
            shuffle: false,
        };
        let ctx = StageContext {
            original_size: (6, 6),
            filter: ResampleFilter::Nearest,
        };
        let out = effect.apply(solid(6, 6), &ctx).unwrap();
        assert_eq!((out.width(), out.height()), (6, 6));
    }

    #[test]
    fn test_halftone_stage_errors_on_bad_colour() {
        let effect = Effect::Halftone {
            spec: ColourSpec::new("#nothex"),
            sample: 5,
            shuffle: false,
        };
        let ctx = StageContext {
            original_size: (10, 10),
            filter: ResampleFilter::Nearest,
        };
        assert!(effect.apply(solid(10, 10), &ctx).is_err());
    }
}
