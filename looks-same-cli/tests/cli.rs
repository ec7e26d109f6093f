//! Integration tests for the looks-same CLI.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn looks_same_bin() -> &'static str {
    env!("CARGO_BIN_EXE_looks-same")
}

/// Per-test scratch directory under the system temp dir.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "looks-same-cli-{}-{}",
        std::process::id(),
        name
    ));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

/// Writes a `width` x `height` PNG filled with `fill`, with `patch` pixels
/// painted in `patch_color`.
fn write_png(
    path: &Path,
    width: u32,
    height: u32,
    fill: [u8; 3],
    patch: &[(u32, u32)],
    patch_color: [u8; 3],
) {
    let mut img = image::RgbImage::from_pixel(width, height, image::Rgb(fill));
    for &(x, y) in patch {
        img.put_pixel(x, y, image::Rgb(patch_color));
    }
    img.save(path).expect("write png");
}

fn run(args: &[&str]) -> Output {
    Command::new(looks_same_bin())
        .args(args)
        .args(["--color", "never"])
        .output()
        .expect("run looks-same")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

const GRAY: [u8; 3] = [128, 128, 128];
const RED: [u8; 3] = [255, 0, 0];
const PATCH: &[(u32, u32)] = &[(3, 3), (4, 3), (3, 4), (4, 4)];

#[test]
fn test_identical_images_exit_zero() {
    let dir = scratch_dir("identical");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    write_png(&a, 16, 16, GRAY, &[], GRAY);
    write_png(&b, 16, 16, GRAY, &[], GRAY);

    let output = run(&[path_str(&a), path_str(&b)]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("look the same"), "stdout: {stdout}");
}

#[test]
fn test_different_images_exit_one_and_write_diff() {
    let dir = scratch_dir("different");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    let diff = dir.join("diff.png");
    write_png(&a, 16, 16, GRAY, &[], GRAY);
    write_png(&b, 16, 16, GRAY, PATCH, RED);

    let output = run(&["--diff", path_str(&diff), path_str(&a), path_str(&b)]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Images differ"), "stdout: {stdout}");
    assert!(stdout.contains("2x2 at (3, 3)"), "stdout: {stdout}");

    let written = image::open(&diff).expect("diff written").to_rgba8();
    assert_eq!(written.dimensions(), (16, 16));
    assert_eq!(written.get_pixel(3, 3).0, [255, 0, 255, 255]);
}

#[test]
fn test_equal_images_do_not_write_diff() {
    let dir = scratch_dir("no-diff");
    let a = dir.join("a.png");
    let diff = dir.join("diff.png");
    write_png(&a, 8, 8, GRAY, &[], GRAY);

    let output = run(&["--diff", path_str(&diff), path_str(&a), path_str(&a)]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!diff.exists());
}

#[test]
fn test_single_pixel_noise_is_ignored() {
    let dir = scratch_dir("noise");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    write_png(&a, 8, 8, GRAY, &[], GRAY);
    write_png(&b, 8, 8, GRAY, &[(5, 2)], RED);

    let output = run(&["--strict", path_str(&a), path_str(&b)]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_json_report() {
    let dir = scratch_dir("json");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    write_png(&a, 16, 16, GRAY, &[], GRAY);
    write_png(&b, 16, 16, GRAY, PATCH, RED);

    let output = run(&["--json", "--cluster", path_str(&a), path_str(&b)]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid JSON output");
    assert_eq!(json["equal"], false);
    assert_eq!(json["different_pixels"], 4);
    assert_eq!(json["total_pixels"], 256);
    assert_eq!(json["diff_bounds"]["left"], 3);
    assert_eq!(json["diff_bounds"]["width"], 2);
    assert_eq!(json["diff_clusters"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["options"]["tolerance"], 2.3);
}

#[test]
fn test_size_mismatch_reports_whole_canvas() {
    let dir = scratch_dir("size");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    write_png(&a, 10, 10, GRAY, &[], GRAY);
    write_png(&b, 12, 10, GRAY, &[], GRAY);

    let output = run(&["--format", "json", path_str(&a), path_str(&b)]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["diff_bounds"]["width"], 12);
    assert_eq!(json["diff_bounds"]["height"], 10);
}

#[test]
fn test_missing_file_exit_two() {
    let dir = scratch_dir("missing");
    let a = dir.join("a.png");
    write_png(&a, 4, 4, GRAY, &[], GRAY);
    let missing = dir.join("missing.png");

    let output = run(&[path_str(&a), path_str(&missing)]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.png"), "stderr: {stderr}");
}

#[test]
fn test_strict_with_tolerance_rejected() {
    let output = run(&["--strict", "--tolerance", "3", "a.png", "b.png"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_pixel_ratio_exit_two() {
    let dir = scratch_dir("ratio");
    let a = dir.join("a.png");
    write_png(&a, 4, 4, GRAY, &[], GRAY);

    let output = run(&["--pixel-ratio", "0.5", path_str(&a), path_str(&a)]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pixel ratio"), "stderr: {stderr}");
}

#[test]
fn test_ignore_pair_hides_difference() {
    let dir = scratch_dir("ignore");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    let diff = dir.join("diff.png");
    write_png(&a, 16, 16, GRAY, &[], GRAY);
    write_png(&b, 16, 16, GRAY, PATCH, RED);

    let output = run(&[
        "--diff",
        path_str(&diff),
        "--ignore-reference",
        path_str(&a),
        "--ignore-current",
        path_str(&b),
        path_str(&a),
        path_str(&b),
    ]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!diff.exists());
}

#[test]
fn test_ignore_pair_applies_without_diff() {
    let dir = scratch_dir("ignore-no-diff");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    write_png(&a, 16, 16, GRAY, &[], GRAY);
    write_png(&b, 16, 16, GRAY, PATCH, RED);

    let output = run(&[
        "--ignore-reference",
        path_str(&a),
        "--ignore-current",
        path_str(&b),
        path_str(&a),
        path_str(&b),
    ]);
    assert_eq!(output.status.code(), Some(0));

    let unmasked = run(&[path_str(&a), path_str(&b)]);
    assert_eq!(unmasked.status.code(), Some(1));
}

#[test]
fn test_missing_ignore_file_exit_two() {
    let dir = scratch_dir("ignore-missing");
    let a = dir.join("a.png");
    let missing = dir.join("missing-mask.png");
    write_png(&a, 8, 8, GRAY, &[], GRAY);

    let output = run(&[
        "--ignore-reference",
        path_str(&a),
        "--ignore-current",
        path_str(&missing),
        path_str(&a),
        path_str(&a),
    ]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing-mask.png"), "stderr: {stderr}");
}

#[test]
fn test_quiet_prints_nothing() {
    let dir = scratch_dir("quiet");
    let a = dir.join("a.png");
    let b = dir.join("b.png");
    write_png(&a, 16, 16, GRAY, &[], GRAY);
    write_png(&b, 16, 16, GRAY, PATCH, RED);

    let output = run(&["--quiet", path_str(&a), path_str(&b)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("EXIT CODES"));
}
