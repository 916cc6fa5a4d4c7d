#![forbid(unsafe_code)]

//! Explode effect demo: renders a test pattern, explodes it, writes a PNG.
//!
//! Usage: shatter-demo [--radius R] [--seed N] [--size WxH] [--out PATH]

use image::RgbaImage;
use shatter_raster::{ExplodeConfig, ExplodeEffect, PackedBgra, PixelBuffer};
use std::process::ExitCode;

struct Opts {
    radius: f64,
    seed: u32,
    width: u32,
    height: u32,
    out: String,
}

impl Opts {
    fn parse() -> Result<Self, String> {
        let mut opts = Self {
            radius: 1.5,
            seed: 0x29A,
            width: 256,
            height: 256,
            out: "exploded.png".to_string(),
        };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| format!("missing value for {name}"))
            };
            match arg.as_str() {
                "--radius" => {
                    opts.radius = value("--radius")?
                        .parse()
                        .map_err(|e| format!("bad radius: {e}"))?;
                }
                "--seed" => {
                    opts.seed = value("--seed")?
                        .parse()
                        .map_err(|e| format!("bad seed: {e}"))?;
                }
                "--size" => {
                    let raw = value("--size")?;
                    let (w, h) = raw
                        .split_once('x')
                        .ok_or_else(|| format!("bad size {raw:?}, expected WxH"))?;
                    opts.width = w.parse().map_err(|e| format!("bad width: {e}"))?;
                    opts.height = h.parse().map_err(|e| format!("bad height: {e}"))?;
                }
                "--out" => {
                    opts.out = value("--out")?;
                }
                other => return Err(format!("unknown argument {other:?}")),
            }
        }
        Ok(opts)
    }
}

/// Checkerboard over a diagonal gradient, so shard boundaries are visible.
fn test_pattern(width: u32, height: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let shade = ((x + y) * 255 / (width + height - 2).max(1)) as u8;
            let pixel = if (x / 16 + y / 16) % 2 == 0 {
                PackedBgra::rgb(shade, 64, 255 - shade)
            } else {
                PackedBgra::rgb(255 - shade, 192, shade)
            };
            buf.set(x, y, pixel);
        }
    }
    buf
}

fn to_rgba_image(buf: &PixelBuffer) -> RgbaImage {
    let mut img = RgbaImage::new(buf.width(), buf.height());
    for (i, pixel) in buf.pixels().iter().enumerate() {
        let x = i as u32 % buf.width();
        let y = i as u32 / buf.width();
        img.put_pixel(x, y, image::Rgba([pixel.r(), pixel.g(), pixel.b(), pixel.a()]));
    }
    img
}

fn run(opts: &Opts) -> Result<(), String> {
    let mut config = ExplodeConfig::new();
    config
        .set_radius(opts.radius)
        .map_err(|e| e.to_string())?;
    config
        .set_seed_number(opts.seed)
        .map_err(|e| e.to_string())?;

    let src = test_pattern(opts.width, opts.height);
    let mut effect = ExplodeEffect::new(config);
    let dst = effect.apply(&src).map_err(|e| e.to_string())?;

    to_rgba_image(&dst)
        .save(&opts.out)
        .map_err(|e| format!("failed to write {}: {e}", opts.out))?;

    println!(
        "exploded {}x{} -> {}x{} (radius {}, seed {:#x}) into {}",
        src.width(),
        src.height(),
        dst.width(),
        dst.height(),
        opts.radius,
        opts.seed,
        opts.out
    );
    Ok(())
}

fn main() -> ExitCode {
    let opts = match Opts::parse() {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("shatter-demo: {err}");
            eprintln!("usage: shatter-demo [--radius R] [--seed N] [--size WxH] [--out PATH]");
            return ExitCode::FAILURE;
        }
    };
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("shatter-demo: {err}");
            ExitCode::FAILURE
        }
    }
}
