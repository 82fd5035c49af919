//! PNG and GIF rendering of lattices

use color_eyre::eyre::{eyre, Result, WrapErr};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, ImageBuffer, Rgba, RgbaImage};
use ising_sim::{SimulationResult, SpinGrid};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Viridis at the bottom, middle and top of the [-1, 1] range.
const SPIN_DOWN: Rgba<u8> = Rgba([0x44, 0x01, 0x54, 0xff]);
const EMPTY: Rgba<u8> = Rgba([0x21, 0x91, 0x8c, 0xff]);
const SPIN_UP: Rgba<u8> = Rgba([0xfd, 0xe7, 0x25, 0xff]);
const BACKGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

const FRAME_DELAY_MS: u32 = 100;

fn spin_color(s: i8) -> Rgba<u8> {
    match s {
        s if s < 0 => SPIN_DOWN,
        0 => EMPTY,
        _ => SPIN_UP,
    }
}

/// Pixel length of `sites` blocks of `scale` pixels each.
fn scaled(sites: usize, scale: u32) -> Result<u32> {
    u32::try_from(sites)
        .ok()
        .and_then(|n| n.checked_mul(scale))
        .ok_or_else(|| eyre!("{sites} sites at scale {scale} do not fit in an image"))
}

/// Pixel dimensions of `grid` drawn at `scale`.
fn image_size(grid: &SpinGrid, scale: u32) -> Result<(u32, u32)> {
    Ok((scaled(grid.cols(), scale)?, scaled(grid.rows(), scale)?))
}

/// One `scale x scale` block per logical site.
pub fn lattice_image(grid: &SpinGrid, scale: u32) -> Result<RgbaImage> {
    let scale = scale.max(1);
    let (width, height) = image_size(grid, scale)?;
    let cols = grid.cols();
    let values = grid.values();
    Ok(ImageBuffer::from_fn(width, height, |x, y| {
        let (row, col) = ((y / scale) as usize, (x / scale) as usize);
        spin_color(values[row * cols + col])
    }))
}

/// Two lattices side by side, separated by a blank strip.
pub fn comparison_image(left: &SpinGrid, right: &SpinGrid, scale: u32) -> Result<RgbaImage> {
    let scale = scale.max(1);
    let (left_w, left_h) = image_size(left, scale)?;
    let (right_w, right_h) = image_size(right, scale)?;
    let offset = scaled(4, scale)?
        .checked_add(left_w)
        .ok_or_else(|| eyre!("comparison image at scale {scale} is too wide"))?;
    let width = offset
        .checked_add(right_w)
        .ok_or_else(|| eyre!("comparison image at scale {scale} is too wide"))?;

    let mut img: RgbaImage = ImageBuffer::from_pixel(width, left_h.max(right_h), BACKGROUND);
    image::imageops::replace(&mut img, &lattice_image(left, scale)?, 0, 0);
    image::imageops::replace(&mut img, &lattice_image(right, scale)?, offset as i64, 0);
    Ok(img)
}

/// Title of a rendered run, e.g. for the log line next to the written file.
pub fn caption(result: &SimulationResult) -> String {
    format!(
        "Spin lattice vs spin lattice after {} steps, temperature={}",
        result.steps, result.temperature
    )
}

fn output_path(dir: &Path, result: &SimulationResult, ext: &str) -> PathBuf {
    dir.join(format!(
        "ising_T{}_{}steps.{ext}",
        result.temperature, result.steps
    ))
}

/// Write the initial and final lattices side by side as a PNG.
pub fn write_comparison(result: &SimulationResult, dir: &Path, scale: u32) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Could not create output directory: {}", dir.display()))?;
    let path = output_path(dir, result, "png");
    comparison_image(&result.initial, &result.grid, scale)?
        .save(&path)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Write every snapshot as one frame of an endlessly looping GIF.
pub fn write_animation(result: &SimulationResult, dir: &Path, scale: u32) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Could not create output directory: {}", dir.display()))?;
    let path = output_path(dir, result, "gif");

    let frames = result
        .snapshots
        .iter()
        .map(|snap| {
            Ok(Frame::from_parts(
                lattice_image(&snap.grid, scale)?,
                0,
                0,
                Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1),
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let file =
        File::create(&path).wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;
    encoder
        .encode_frames(frames)
        .wrap_err_with(|| format!("Failed to encode {}", path.display()))?;
    Ok(path)
}
