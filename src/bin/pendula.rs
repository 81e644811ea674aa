extern crate clap;
#[macro_use]
extern crate failure;
extern crate image;
extern crate num_cpus;
extern crate pendulabrot;

use clap::{App, Arg, ArgMatches};
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use pendulabrot::{
    AdaptiveConfig, AdaptiveRenderer, AnglePoint, PendulumParams, PixelSurface, PlaneMapper,
    RegionGrid,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive_float(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(f) if f > 0.0 && f.is_finite() => Ok(()),
        _ => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const THETA1: &str = "theta1";
const THETA2: &str = "theta2";
const THREADS: &str = "threads";
const MAXTIME: &str = "max-time";
const DT: &str = "dt";
const STEPS: &str = "update-steps";
const MINPIXEL: &str = "min-pixel";
const LATTICE: &str = "lattice";
const TICKS: &str = "ticks";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("pendula")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Double-pendulum flip-fractal renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(THETA1)
                .required(false)
                .long(THETA1)
                .takes_value(true)
                .default_value("0.0,6.283185307179586")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse theta1 window"))
                .help("First-arm angle window mapped across the canvas width"),
        )
        .arg(
            Arg::with_name(THETA2)
                .required(false)
                .long(THETA2)
                .takes_value(true)
                .default_value("0.0,3.141592653589793")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse theta2 window"))
                .help("Second-arm angle window mapped across the canvas height"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in the per-tick integration"),
        )
        .arg(
            Arg::with_name(MAXTIME)
                .required(false)
                .long(MAXTIME)
                .takes_value(true)
                .default_value("120.0")
                .validator(|s| {
                    validate_positive_float(&s, "The time budget must be a positive number")
                })
                .help("Simulated time a pendulum may run without flipping"),
        )
        .arg(
            Arg::with_name(DT)
                .required(false)
                .long(DT)
                .takes_value(true)
                .default_value("0.01")
                .validator(|s| {
                    validate_positive_float(&s, "The integration step must be a positive number")
                })
                .help("Integration step in simulated time"),
        )
        .arg(
            Arg::with_name(STEPS)
                .required(false)
                .long(STEPS)
                .takes_value(true)
                .default_value("120")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse steps-per-tick",
                        "Steps per tick must be between 1 and 100000",
                    )
                })
                .help("Integration steps per tick"),
        )
        .arg(
            Arg::with_name(MINPIXEL)
                .required(false)
                .long(MINPIXEL)
                .short("p")
                .takes_value(true)
                .default_value("8")
                .validator(|s| {
                    validate_range(
                        &s,
                        2,
                        4096,
                        "Could not parse the minimum region size",
                        "The minimum region size must be between 2 and 4096",
                    )
                })
                .help("Smallest region size, in pixels, that may still be split"),
        )
        .arg(
            Arg::with_name(LATTICE)
                .required(false)
                .long(LATTICE)
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        256,
                        "Could not parse the initial lattice size",
                        "The initial lattice must be between 1 and 256 cells on a side",
                    )
                })
                .help("Pre-tile the canvas into an NxN lattice of regions"),
        )
        .arg(
            Arg::with_name(TICKS)
                .required(false)
                .long(TICKS)
                .takes_value(true)
                .default_value("20000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        10_000_000,
                        "Could not parse the tick cap",
                        "The tick cap must be between 1 and 10000000",
                    )
                })
                .help("Give up after this many ticks even if regions are still running"),
        )
        .get_matches()
}

#[derive(Debug, Fail)]
enum SetupError {
    #[fail(display = "invalid canvas or angle window: {}", _0)]
    Geometry(String),
    #[fail(display = "invalid engine configuration: {}", _0)]
    Engine(String),
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), std::io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGB(8))?;
    Ok(())
}

fn run() -> Result<(), failure::Error> {
    let matches = args();

    // Every value here passed its clap validator already.
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap(), 'x')
        .expect("Error parsing image dimensions");
    let theta1 = parse_pair::<f64>(matches.value_of(THETA1).unwrap(), ',')
        .expect("Error parsing theta1 window");
    let theta2 = parse_pair::<f64>(matches.value_of(THETA2).unwrap(), ',')
        .expect("Error parsing theta2 window");
    let threads = usize::from_str(matches.value_of(THREADS).unwrap()).unwrap();
    let max_time = f64::from_str(matches.value_of(MAXTIME).unwrap()).unwrap();
    let dt = f64::from_str(matches.value_of(DT).unwrap()).unwrap();
    let substeps = usize::from_str(matches.value_of(STEPS).unwrap()).unwrap();
    let min_pixel = usize::from_str(matches.value_of(MINPIXEL).unwrap()).unwrap();
    let lattice = usize::from_str(matches.value_of(LATTICE).unwrap()).unwrap();
    let max_ticks = usize::from_str(matches.value_of(TICKS).unwrap()).unwrap();

    let mapper = PlaneMapper::new(
        width,
        height,
        AnglePoint(theta1.0, theta2.0),
        AnglePoint(theta1.1, theta2.1),
    )
    .map_err(SetupError::Geometry)?;
    let grid =
        RegionGrid::with_uniform_grid(mapper, min_pixel, lattice).map_err(SetupError::Geometry)?;

    let config = AdaptiveConfig {
        dt,
        substeps,
        max_time,
        threads,
    };
    let mut engine = AdaptiveRenderer::new(grid, PendulumParams::standard(), config)
        .map_err(SetupError::Engine)?;

    println!(
        "tick = {:.2}; stop after {:.1}; dive under {}; min pixel = {}",
        dt * (substeps as f64),
        max_time,
        pendulabrot::refine::FLIP_TIME_THRESHOLD,
        min_pixel
    );

    let mut ticks = 0;
    while !engine.is_settled() && ticks < max_ticks {
        engine.tick();
        ticks += 1;
        if ticks % 100 == 0 {
            println!(
                "tick {}: active: {}, done: {}",
                ticks,
                engine.grid().running_count(),
                engine.grid().stopped_count()
            );
        }
    }
    println!(
        "settled after {} ticks: {} regions ({} still running)",
        ticks,
        engine.grid().len(),
        engine.grid().running_count()
    );

    let mut surface = PixelSurface::new(width, height);
    engine.render(&mut surface);
    write_image(
        matches.value_of(OUTPUT).unwrap(),
        surface.pixels(),
        (width, height),
    )?;
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
