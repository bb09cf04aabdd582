//! Batch discovery and processing of source images.
//!
//! The batch runner scans a source directory (non-recursively), pushes every
//! image through the pipeline, and writes results named after the stages
//! that ran: `mona.png` processed at 64x64 with dithering becomes
//! `mona_64x64_dither.png`. One bad file does not stop the rest of the
//! batch.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use walkdir::WalkDir;

use crate::effects::Pipeline;
use crate::error::{FxError, Result};
use crate::manifest::Manifest;
use crate::output::{display_path, Printer};

/// File extensions the batch runner picks up.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Counts for a finished batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Collect the image files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not entered. Files matching a manifest exclude
/// pattern are skipped.
pub fn image_files(dir: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| has_image_extension(p))
        .filter(|p| !manifest.is_excluded(p))
        .collect();

    files.sort_by_key(|p| p.file_name().map(std::ffi::OsStr::to_os_string));
    files
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// The output file name for a processed image.
///
/// The name is the source stem, the processed dimensions, then the tags of
/// every stage that ran. The extension is `filetype` when forced, otherwise
/// the source extension.
pub fn output_name(
    source: &Path,
    processed: &DynamicImage,
    pipeline: &Pipeline,
    filetype: Option<&str>,
) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let extension = match filetype {
        Some(forced) => forced,
        None => source.extension().and_then(|e| e.to_str()).unwrap_or("png"),
    };

    format!(
        "{}_{}x{}{}.{}",
        stem,
        processed.width(),
        processed.height(),
        pipeline.filename_tags(),
        extension
    )
}

/// Process one image through the pipeline and write the result.
///
/// Returns the path written. JPEG output is flattened to RGB first since the
/// format cannot hold alpha.
pub fn process_file(
    source: &Path,
    pipeline: &Pipeline,
    output_dir: &Path,
    filetype: Option<&str>,
) -> Result<PathBuf> {
    let image = image::open(source).map_err(|e| FxError::Image {
        path: source.to_path_buf(),
        message: format!("Failed to load image: {}", e),
    })?;

    let processed = pipeline.process(image)?;
    let name = output_name(source, &processed, pipeline, filetype);
    let destination = output_dir.join(&name);

    let extension = destination
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let writable = if extension.eq_ignore_ascii_case("jpg") || extension.eq_ignore_ascii_case("jpeg")
    {
        DynamicImage::ImageRgb8(processed.to_rgb8())
    } else {
        processed
    };

    writable.save(&destination).map_err(|e| FxError::Image {
        path: destination.clone(),
        message: format!("Failed to save image: {}", e),
    })?;

    Ok(destination)
}

/// Run the pipeline over every file, reporting progress as it goes.
///
/// Failures are reported and counted but do not stop the batch.
pub fn process_all(
    files: &[PathBuf],
    pipeline: &Pipeline,
    output_dir: &Path,
    filetype: Option<&str>,
    printer: &Printer,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for file in files {
        printer.status("Processing", &display_path(file));
        match process_file(file, pipeline, output_dir, filetype) {
            Ok(written) => {
                printer.info("Wrote", &display_path(&written));
                summary.processed += 1;
            }
            Err(e) => {
                printer.error("Failed", &format!("{}: {}", display_path(file), e));
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Effect, ResampleFilter};
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn write_test_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_image_files_filters_and_sorts() {
        let dir = tempdir().unwrap();
        write_test_png(&dir.path().join("b.png"), 2, 2);
        write_test_png(&dir.path().join("a.PNG"), 2, 2);
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let files = image_files(dir.path(), &Manifest::default());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
    }

    #[test]
    fn test_image_files_is_not_recursive() {
        let dir = tempdir().unwrap();
        write_test_png(&dir.path().join("top.png"), 2, 2);
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write_test_png(&dir.path().join("nested").join("deep.png"), 2, 2);

        let files = image_files(dir.path(), &Manifest::default());
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_image_files_respects_excludes() {
        let dir = tempdir().unwrap();
        write_test_png(&dir.path().join("keep.png"), 2, 2);
        write_test_png(&dir.path().join("wip_draft.png"), 2, 2);

        let manifest = Manifest {
            excludes: vec!["wip".to_string()],
            ..Default::default()
        };
        let files = image_files(dir.path(), &manifest);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.png"));
    }

    #[test]
    fn test_output_name_carries_dimensions_and_tags() {
        let mut pipeline = Pipeline::new(ResampleFilter::Nearest);
        pipeline.push(Effect::Invert);

        let processed =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255])));
        let name = output_name(Path::new("src/mona.png"), &processed, &pipeline, None);
        assert_eq!(name, "mona_4x2_invert.png");
    }

    #[test]
    fn test_output_name_forced_filetype() {
        let pipeline = Pipeline::new(ResampleFilter::Nearest);
        let processed =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255])));
        let name = output_name(Path::new("mona.png"), &processed, &pipeline, Some("jpg"));
        assert_eq!(name, "mona_4x2.jpg");
    }

    #[test]
    fn test_process_file_writes_resized_output() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("img.png");
        write_test_png(&source, 8, 4);

        let mut pipeline = Pipeline::new(ResampleFilter::Nearest);
        pipeline.push(Effect::Resize {
            width: 4,
            height: 0,
            scale: 0,
        });

        let written = process_file(&source, &pipeline, dir.path(), None).unwrap();
        assert!(written.ends_with("img_4x2.png"));

        let reloaded = image::open(&written).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (4, 2));
    }

    #[test]
    fn test_process_file_jpg_output_drops_alpha() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("img.png");
        let img = RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 128]));
        img.save(&source).unwrap();

        let pipeline = Pipeline::new(ResampleFilter::Nearest);
        let written = process_file(&source, &pipeline, dir.path(), Some("jpg")).unwrap();
        assert!(written.ends_with("img_4x4.jpg"));
        assert!(image::open(&written).is_ok());
    }

    #[test]
    fn test_process_file_missing_source_errors() {
        let dir = tempdir().unwrap();
        let pipeline = Pipeline::new(ResampleFilter::Nearest);
        let result = process_file(
            &dir.path().join("missing.png"),
            &pipeline,
            dir.path(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_process_all_continues_after_failure() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.png");
        write_test_png(&good, 2, 2);
        std::fs::write(&bad, b"not a png").unwrap();

        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();

        let pipeline = Pipeline::new(ResampleFilter::Nearest);
        let summary = process_all(
            &[bad, good],
            &pipeline,
            &out,
            None,
            &Printer::new(),
        );
        assert_eq!(summary, BatchSummary { processed: 1, failed: 1 });
    }
}
