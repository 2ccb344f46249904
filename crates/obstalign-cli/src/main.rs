use std::path::PathBuf;

use argh::FromArgs;
use glam::DVec2;
use obstalign::{
    apply::OffsetTransform,
    calibrate,
    io::{
        points::{read_points, write_points},
        read_artifact, read_recording_obstacles, read_scenario_obstacles, write_artifact,
        CalibrationArtifact,
    },
    CalibrationParams, FitConfidence, MatchingParams,
};

/// Calibrate the offset between scenario and recorded obstacle sets
#[derive(FromArgs)]
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Calibrate(CalibrateArgs),
    Apply(ApplyArgs),
}

/// Match obstacles and fit the rigid transform between the two sets
#[derive(FromArgs)]
#[argh(subcommand, name = "calibrate")]
struct CalibrateArgs {
    /// path to the scenario file
    #[argh(option)]
    scenario: PathBuf,

    /// path to the recorded obstacle file
    #[argh(option)]
    recording: PathBuf,

    /// path of the result artifact to write
    #[argh(option, default = "PathBuf::from(\"offset_results.json\")")]
    output: PathBuf,

    /// maximum position distance of a valid pair in meters
    #[argh(option, default = "50.0")]
    max_distance: f64,

    /// weight of the dimension mismatch in the matching cost
    #[argh(option, default = "100.0")]
    dimension_weight: f64,

    /// initial x offset; the centroid difference is used when omitted
    #[argh(option)]
    initial_dx: Option<f64>,

    /// initial y offset; the centroid difference is used when omitted
    #[argh(option)]
    initial_dy: Option<f64>,

    /// fail instead of reporting an identity rotation when it is underdetermined
    #[argh(switch)]
    strict: bool,

    /// number of matched pairs to print
    #[argh(option, default = "20")]
    show: usize,
}

/// Reposition a list of points with a calibration result
#[derive(FromArgs)]
#[argh(subcommand, name = "apply")]
struct ApplyArgs {
    /// path to the result artifact; unused when the offset is given manually
    #[argh(option, default = "PathBuf::from(\"offset_results.json\")")]
    results: PathBuf,

    /// JSON file with a list of [x, y] points
    #[argh(option)]
    points: PathBuf,

    /// path of the transformed points to write
    #[argh(option)]
    output: PathBuf,

    /// rotation in radians overriding the artifact's value
    #[argh(option)]
    rotation: Option<f64>,

    /// manual x offset in meters; skips the artifact, rotation defaults to 0
    #[argh(option)]
    offset_dx: Option<f64>,

    /// manual y offset in meters; skips the artifact, rotation defaults to 0
    #[argh(option)]
    offset_dy: Option<f64>,
}

fn initial_offset(args: &CalibrateArgs) -> Result<Option<DVec2>, Box<dyn std::error::Error>> {
    match (args.initial_dx, args.initial_dy) {
        (Some(dx), Some(dy)) => Ok(Some(DVec2::new(dx, dy))),
        (None, None) => Ok(None),
        _ => Err("--initial-dx and --initial-dy must be given together".into()),
    }
}

fn offset_transform(args: &ApplyArgs) -> Result<OffsetTransform, Box<dyn std::error::Error>> {
    match (args.offset_dx, args.offset_dy) {
        (Some(dx), Some(dy)) => Ok(OffsetTransform::new(
            DVec2::new(dx, dy),
            args.rotation.unwrap_or(0.0),
        )),
        (None, None) => {
            let artifact = read_artifact(&args.results)?;
            let mut transform = OffsetTransform::from_artifact(&artifact);
            if let Some(rotation) = args.rotation {
                transform.rotation = rotation;
            }
            Ok(transform)
        }
        _ => Err("--offset-dx and --offset-dy must be given together".into()),
    }
}

fn print_summary(artifact: &CalibrationArtifact, show: usize) {
    let t = &artifact.transformation;
    let acc = &artifact.accuracy;
    let simple = &artifact.simple_offset_stats;

    println!("Matched pairs: {}", acc.num_matches);
    println!("Translation: dx = {:.6} m, dy = {:.6} m", t.translation.x, t.translation.y);
    println!(
        "Rotation: {:.6} deg ({:.6} rad)",
        t.rotation_degrees, t.rotation_radians
    );
    if t.confidence == FitConfidence::RotationUnderdetermined {
        println!("  (rotation underdetermined by the matches, reported as identity)");
    }
    for row in &t.rotation_matrix {
        println!("  [{:9.6}  {:9.6}]", row[0], row[1]);
    }
    println!(
        "Error: mean={:.4} median={:.4} max={:.4} min={:.4} std={:.4} m",
        acc.mean_error, acc.median_error, acc.max_error, acc.min_error, acc.std_error
    );
    println!(
        "Raw offsets: dx mean={:.2} std={:.2}, dy mean={:.2} std={:.2}",
        simple.dx_mean, simple.dx_std, simple.dy_mean, simple.dy_std
    );
    println!(
        "Unmatched: scenario={} recording={}",
        artifact.unmatched.scenarios_count, artifact.unmatched.data_count
    );

    if show == 0 {
        return;
    }
    println!(
        "{:<4} {:<10} {:<10} {:<10} {:<10} {:<25} {:<25}",
        "No.", "Src ID", "Dst ID", "Cost", "Error(m)", "Src Pos", "Dst Pos"
    );
    for (i, pair) in artifact.matched_pairs.iter().take(show).enumerate() {
        let src_pos = format!("({:.2}, {:.2})", pair.src_pos.x, pair.src_pos.y);
        let dst_pos = format!("({:.2}, {:.2})", pair.dst_pos.x, pair.dst_pos.y);
        println!(
            "{:<4} {:<10} {:<10} {:<10.4} {:<10.4} {:<25} {:<25}",
            i + 1,
            pair.src_id,
            pair.dst_id,
            pair.matching_cost,
            pair.transform_error,
            src_pos,
            dst_pos
        );
    }
}

fn run_calibrate(args: CalibrateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let src = read_scenario_obstacles(&args.scenario)?;
    let dst = read_recording_obstacles(&args.recording)?;
    println!("Scenario obstacles: {}", src.len());
    println!("Recorded obstacles: {}", dst.len());

    let params = CalibrationParams {
        matching: MatchingParams {
            initial_offset: initial_offset(&args)?,
            max_distance: args.max_distance,
            dimension_weight: args.dimension_weight,
        },
        reject_underdetermined: args.strict,
    };

    let calibration = calibrate(&src, &dst, &params)?;
    let artifact = CalibrationArtifact::new(&calibration, &src, &dst)?;
    print_summary(&artifact, args.show);

    write_artifact(&args.output, &artifact)?;
    println!("Results written to {}", args.output.display());

    Ok(())
}

fn run_apply(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let transform = offset_transform(&args)?;
    log::info!(
        "Applying offset ({:.4}, {:.4}) m with rotation {:.6} rad",
        transform.offset.x,
        transform.offset.y,
        transform.rotation
    );

    let points = read_points(&args.points)?;
    let moved = transform.transform_points(&points);
    write_points(&args.output, &moved)?;
    println!("Transformed {} points into {}", moved.len(), args.output.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    match args.command {
        Command::Calibrate(args) => run_calibrate(args),
        Command::Apply(args) => run_apply(args),
    }
}
