//! End-to-end tests of the red-eye pipeline on synthetic images.
//!
//! Run with: `cargo test -p redeye-core`

use image::{Rgba, RgbaImage};
use redeye_core::color_space::rgb8_to_lab;
use redeye_core::{RedEyeConfig, RedEyeError, RedEyeTool};

const BACKGROUND: Rgba<u8> = Rgba([40, 160, 60, 255]);
const RED_EYE: Rgba<u8> = Rgba([200, 30, 40, 255]);

/// A `size`×`size` green image with red squares `(x, y, side)`.
fn image_with_patches(size: u32, patches: &[(u32, u32, u32)]) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        let red = patches
            .iter()
            .any(|&(px, py, side)| (px..px + side).contains(&x) && (py..py + side).contains(&y));
        if red { RED_EYE } else { BACKGROUND }
    })
}

fn assert_close(actual: &Rgba<u8>, expected: &Rgba<u8>, x: u32, y: u32) {
    for c in 0..3 {
        assert!(
            actual.0[c].abs_diff(expected.0[c]) <= 1,
            "channel {c} at ({x}, {y}): {:?} vs {:?}",
            actual.0,
            expected.0
        );
    }
    assert_eq!(actual.0[3], expected.0[3], "alpha at ({x}, {y})");
}

fn assert_neutral(px: &Rgba<u8>, x: u32, y: u32) {
    let lab = rgb8_to_lab([px.0[0], px.0[1], px.0[2]]);
    assert!(
        lab.a.abs() < 2.0 && lab.b.abs() < 2.0,
        "({x}, {y}) is still colored: {:?}",
        px.0
    );
}

#[test]
fn test_all_black_image_is_unchanged() {
    let src = RgbaImage::from_pixel(16, 12, Rgba([0, 0, 0, 255]));
    let out = RedEyeTool::default().process_image(&src).unwrap();
    assert_eq!(out, src);
}

#[test]
fn test_red_patch_is_neutralized_and_surroundings_kept() {
    let src = image_with_patches(20, &[(8, 8, 5)]);
    let out = RedEyeTool::default().process_image(&src).unwrap();

    for y in 8..13 {
        for x in 8..13 {
            assert_neutral(out.get_pixel(x, y), x, y);
        }
    }
    // the pupil is the darkest region, so it is stretched to black
    assert_eq!(out.get_pixel(10, 10).0, [0, 0, 0, 255]);

    // mask dilation and soft edges reach two pixels past the patch
    for (x, y, px) in out.enumerate_pixels() {
        if x < 5 || x >= 16 || y < 5 || y >= 16 {
            assert_close(px, src.get_pixel(x, y), x, y);
        }
    }
}

#[test]
fn test_only_largest_red_region_is_corrected() {
    let src = image_with_patches(24, &[(3, 3, 5), (15, 15, 2)]);
    let out = RedEyeTool::default().process_image(&src).unwrap();

    assert_neutral(out.get_pixel(5, 5), 5, 5);
    for y in 15..17 {
        for x in 15..17 {
            assert_close(out.get_pixel(x, y), &RED_EYE, x, y);
        }
    }
}

#[test]
fn test_source_alpha_is_carried_through() {
    let mut src = image_with_patches(18, &[(6, 6, 5)]);
    for (x, y, px) in src.enumerate_pixels_mut() {
        px.0[3] = (x * 13 + y * 7) as u8;
    }
    let out = RedEyeTool::default().process_image(&src).unwrap();
    for (a, b) in out.pixels().zip(src.pixels()) {
        assert_eq!(a.0[3], b.0[3]);
    }
}

#[test]
fn test_analyze_matches_process_image() {
    let src = image_with_patches(20, &[(6, 9, 4)]);
    let tool = RedEyeTool::default();
    let stages = tool.analyze(&src).unwrap();
    assert_eq!(stages.output, tool.process_image(&src).unwrap());
    assert_eq!(stages.islands.get_pixel(7, 10).0, [255, 0, 0, 255]);
    assert_eq!(stages.alpha.get_pixel(7, 10).0[0], 255);
    assert_eq!(stages.alpha.get_pixel(0, 0).0[0], 0);
}

#[test]
fn test_config_from_json_drives_the_pipeline() {
    // a threshold of 255 can never be exceeded, so nothing is corrected
    let config = RedEyeConfig::from_json(r#"{ "mask_threshold": 255 }"#).unwrap();
    let src = image_with_patches(16, &[(5, 5, 4)]);
    let out = RedEyeTool::new(config).unwrap().process_image(&src).unwrap();
    for (x, y, px) in out.enumerate_pixels() {
        assert_close(px, src.get_pixel(x, y), x, y);
    }
}

#[test]
fn test_tiny_image_is_rejected() {
    let src = RgbaImage::from_pixel(2, 5, RED_EYE);
    assert!(matches!(
        RedEyeTool::default().process_image(&src),
        Err(RedEyeError::InvalidParameter(_))
    ));
}
