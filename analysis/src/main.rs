//! Offline grasp analysis: reads a motion-capture recording, derives the
//! two-link joint angles for both fingers, and renders the trajectory,
//! joint-angle, and grasp-pose figures.

mod plots;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use openhand::kinematics::{extract_phases, grasp_pose, raw_polyline, Finger, GraspPhase};
use openhand::recording::{Joint, Recording};

#[derive(Parser)]
#[command(about = "Joint-angle and grasp-phase analysis of a recorded grasp")]
struct Args {
    /// Motion-capture CSV recording (8 columns, no header).
    recording: PathBuf,
    /// Directory the figures are written to.
    #[arg(long, default_value = "figures")]
    out_dir: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("analysis failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let recording = Recording::load(&args.recording)?;
    let n = recording.len();
    if n == 0 {
        return Err(Box::new(openhand::HandError::EmptySequence));
    }
    info!(rows = n, "recording loaded");
    std::fs::create_dir_all(&args.out_dir)?;
    let out = |name: &str| args.out_dir.join(name);

    // Marker trajectories, one figure per finger.
    plots::trajectory_figure(
        &out("finger1_trajectory.png"),
        "Finger 1 Joint Trajectory",
        &Recording::trajectory(&recording.finger1, Joint::Proximal),
        &Recording::trajectory(&recording.finger1, Joint::Distal),
    )?;
    plots::trajectory_figure(
        &out("finger2_trajectory.png"),
        "Finger 2 Joint Trajectory",
        &Recording::trajectory(&recording.finger2, Joint::Proximal),
        &Recording::trajectory(&recording.finger2, Joint::Distal),
    )?;

    // Joint angles over time, two figures per finger.
    let kin1 = Finger::One.config().solve_sequence(&recording.finger1)?;
    let kin2 = Finger::Two.config().solve_sequence(&recording.finger2)?;
    for (finger_no, kin) in [(1, &kin1), (2, &kin2)] {
        let proximal: Vec<f64> = kin.iter().map(|k| k.proximal_angle).collect();
        let distal: Vec<f64> = kin.iter().map(|k| k.distal_angle).collect();
        plots::joint_angle_figure(
            &out(&format!("finger{}_proximal_angles.png", finger_no)),
            &format!("Finger {} Proximal Joint Angles", finger_no),
            &proximal,
        )?;
        plots::joint_angle_figure(
            &out(&format!("finger{}_distal_angles.png", finger_no)),
            &format!("Finger {} Distal Joint Angles", finger_no),
            &distal,
        )?;
    }

    // Raw marker overlay of the three grasp phases.
    let config1 = Finger::One.config();
    let config2 = Finger::Two.config();
    let phase_samples = |samples: &[openhand::JointSample], finger: &openhand::kinematics::FingerConfig| {
        GraspPhase::ALL.map(|phase| raw_polyline(finger, &samples[phase.index(n)]))
    };
    plots::raw_grasp_figure(
        &out("raw_grasp_positions.png"),
        [
            (config1.origin.x, config1.origin.y),
            (config2.origin.x, config2.origin.y),
        ],
        &phase_samples(&recording.finger1, &config1),
        &phase_samples(&recording.finger2, &config2),
    )?;

    // Angle-reconstructed pose, one figure per grasp phase.
    let phases1 = extract_phases(&kin1)?;
    let phases2 = extract_phases(&kin2)?;
    for (phase, name) in [
        (GraspPhase::Setup, "grasp_pose_setup.png"),
        (GraspPhase::PreGrasp, "grasp_pose_pre_grasp.png"),
        (GraspPhase::Final, "grasp_pose_final.png"),
    ] {
        let pose = grasp_pose(phases1.get(phase), phases2.get(phase));
        plots::grasp_pose_figure(&out(name), phase.label(), &pose)?;
    }

    info!(dir = %args.out_dir.display(), "10 figures rendered");
    Ok(())
}
