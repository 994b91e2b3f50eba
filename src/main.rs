//! Upsample a ground-truth pose file into a pseudo-IMU CSV.
//!
//! # Usage
//!
//! ```bash
//! upsample_se3_poses data/groundtruth.txt                 # 400 Hz, next to input
//! upsample_se3_poses data/groundtruth.txt imu.csv 200     # explicit output and rate
//! upsample_se3_poses data/groundtruth.txt --pose-output     # UpsampledFrameTrajectory.txt too
//! upsample_se3_poses data/groundtruth.txt --end-condition not-a-knot
//! ```
//!
//! For later correlation against real sensors, pick a rate of at least twice
//! the fastest measurement frequency.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use log::{error, info};

use se3_upsample::io::{self, ParseMode};
use se3_upsample::{EndCondition, ResampleConfig, Resampler, DEFAULT_FREQUENCY};

/// Boundary condition of the position spline.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum EndArg {
    /// Zero acceleration at the first and last pose
    Natural,
    /// Third derivative continuous across the second and second-to-last knot
    NotAKnot,
}

impl From<EndArg> for EndCondition {
    fn from(arg: EndArg) -> Self {
        match arg {
            EndArg::Natural => Self::Natural,
            EndArg::NotAKnot => Self::NotAKnot,
        }
    }
}

#[derive(Parser)]
#[command(name = "upsample_se3_poses")]
#[command(about = "Interpolate timestamped SE(3) poses into uniformly sampled pseudo inertial data")]
struct Args {
    /// Pose file, rows of: time[s] tx ty tz qx qy qz qw (sensor to world)
    pose_file: PathBuf,

    /// Inertial output CSV (default: UpsampledPseudoImu.csv next to the pose file)
    inertial_output: Option<PathBuf>,

    /// Output frequency in Hz
    #[arg(default_value_t = DEFAULT_FREQUENCY)]
    frequency: f64,

    /// Also write the resampled poses (default: UpsampledFrameTrajectory.txt next to the pose file)
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    pose_output: Option<Option<PathBuf>>,

    /// Spline boundary condition
    #[arg(long, value_enum, default_value_t = EndArg::Natural)]
    end_condition: EndArg,

    /// Fail on a malformed pose row instead of stopping there
    #[arg(long)]
    strict: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> se3_upsample::Result<()> {
    let mode = if args.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    let poses = io::read_pose_table_with_mode(&args.pose_file, mode)?;
    info!("Load #poses: {} from {}", poses.len(), args.pose_file.display());

    let config = ResampleConfig::new(args.frequency).with_end_condition(args.end_condition.into());
    let resampler = Resampler::new(config)?;
    let resampled = resampler.resample_poses(poses)?;
    info!(
        "Interpolated {} pseudo inertial data at {} Hz",
        resampled.len(),
        resampler.config().frequency
    );
    info!(
        "Peak angular rate {:.4} rad/s, peak acceleration {:.4} m/s^2",
        resampled.peak_angular_rate(),
        resampled.peak_acceleration()
    );

    let inertial_path = args
        .inertial_output
        .clone()
        .unwrap_or_else(|| io::default_inertial_path(&args.pose_file));
    io::write_inertial_samples(&inertial_path, &resampled.samples)?;
    info!(
        "Interpolated pseudo inertial data saved to {}",
        inertial_path.display()
    );

    if let Some(pose_output) = &args.pose_output {
        let pose_path = pose_output
            .clone()
            .unwrap_or_else(|| io::default_pose_path(&args.pose_file));
        io::write_pose_table(&pose_path, &resampled.poses)?;
        info!("Resampled poses saved to {}", pose_path.display());
    }

    Ok(())
}
