//! Figure rendering for the offline grasp analysis.
//!
//! Pure rendering collaborator: every function takes already-computed series
//! from the `openhand` kinematics core and writes one labelled PNG.

use std::f64::consts::PI;
use std::path::Path;

use openhand::kinematics::{FingerPolyline, GraspPose};
use plotters::prelude::*;

pub type PlotResult = Result<(), Box<dyn std::error::Error>>;

const FIGURE_SIZE: (u32, u32) = (800, 600);

fn polyline_points(poly: &FingerPolyline) -> Vec<(f64, f64)> {
    poly.iter().map(|p| (p.x, p.y)).collect()
}

/// Axis ranges covering all given series with a small margin.
fn bounds(series: &[&[(f64, f64)]]) -> ((f64, f64), (f64, f64)) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for s in series {
        for (px, py) in *s {
            x = (x.0.min(*px), x.1.max(*px));
            y = (y.0.min(*py), y.1.max(*py));
        }
    }
    let pad_x = ((x.1 - x.0) * 0.1).max(1e-3);
    let pad_y = ((y.1 - y.0) * 0.1).max(1e-3);
    ((x.0 - pad_x, x.1 + pad_x), (y.0 - pad_y, y.1 + pad_y))
}

/// Proximal and distal marker trajectory of one finger in the capture plane.
pub fn trajectory_figure(
    path: &Path,
    title: &str,
    proximal: &[(f64, f64)],
    distal: &[(f64, f64)],
) -> PlotResult {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let ((x0, x1), (y0, y1)) = bounds(&[proximal, distal]);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)?;
    chart.configure_mesh().x_desc("X-axis").y_desc("Z-axis").draw()?;

    chart
        .draw_series(LineSeries::new(proximal.iter().copied(), &RED))?
        .label("proximal joint")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .draw_series(LineSeries::new(distal.iter().copied(), &BLACK))?
        .label("distal joint")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// One joint's angle against the time step.
pub fn joint_angle_figure(path: &Path, title: &str, angles: &[f64]) -> PlotResult {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let last_step = angles.len().saturating_sub(1).max(1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..last_step, 0.0..PI)?;
    chart
        .configure_mesh()
        .x_desc("Time Step")
        .y_desc("Joint Angles (Radian)")
        .draw()?;

    chart.draw_series(LineSeries::new(
        angles.iter().enumerate().map(|(i, a)| (i as f64, *a)),
        &BLUE,
    ))?;
    root.present()?;
    Ok(())
}

/// Raw marker positions of both fingers at the three grasp phases, overlaid
/// in physical coordinates, with the hand base segment for reference.
pub fn raw_grasp_figure(
    path: &Path,
    base: [(f64, f64); 2],
    finger1_phases: &[FingerPolyline; 3],
    finger2_phases: &[FingerPolyline; 3],
) -> PlotResult {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let f1: Vec<Vec<(f64, f64)>> = finger1_phases.iter().map(polyline_points).collect();
    let f2: Vec<Vec<(f64, f64)>> = finger2_phases.iter().map(polyline_points).collect();
    let mut all: Vec<&[(f64, f64)]> = vec![&base];
    all.extend(f1.iter().map(|v| v.as_slice()));
    all.extend(f2.iter().map(|v| v.as_slice()));
    let ((x0, x1), (y0, y1)) = bounds(&all);

    let mut chart = ChartBuilder::on(&root)
        .caption("Grasp Position with raw finger data", ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)?;
    chart.configure_mesh().x_desc("X-axis").y_desc("Z-axis").draw()?;

    chart
        .draw_series(LineSeries::new(base.iter().copied(), &BLUE))?
        .label("Hand Base")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    let labels = ["setup", "pre grasp", "final grasp"];
    for (i, label) in labels.iter().enumerate() {
        let shade = 255 - (i as u8) * 90;
        let c1 = RGBColor(shade, 0, 0);
        let c2 = RGBColor(0, 0, 0).mix(1.0 - i as f64 * 0.3);
        chart
            .draw_series(LineSeries::new(f1[i].iter().copied(), &c1))?
            .label(format!("finger 1 {}", label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &c1));
        chart
            .draw_series(LineSeries::new(f2[i].iter().copied(), &c2))?
            .label(format!("finger 2 {}", label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &c2));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// One angle-reconstructed grasp pose with unit links, fixed axes matching
/// the rig's display convention.
pub fn grasp_pose_figure(path: &Path, status_of_grasp: &str, pose: &GraspPose) -> PlotResult {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Status of grasp: {}", status_of_grasp), ("sans-serif", 28))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-2.5..3.0, -1.0..2.0)?;
    chart.configure_mesh().x_desc("X-axis").y_desc("Z-axis").draw()?;

    let base: Vec<(f64, f64)> = pose.base.iter().map(|p| (p.x, p.y)).collect();
    chart
        .draw_series(LineSeries::new(base, &BLUE))?
        .label("Hand Base")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new(polyline_points(&pose.finger1), &RED))?
        .label("Finger 1")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart
        .draw_series(LineSeries::new(polyline_points(&pose.finger2), &BLACK))?
        .label("Finger 2")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
