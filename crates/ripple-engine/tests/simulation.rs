//! End-to-end runs of the plane-wave simulation.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ripple_engine::{DiagnosticsConfig, RunMetrics, Simulation, SimulationConfig};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn quiet(config: SimulationConfig) -> Simulation {
    Simulation::with_sink(config, Box::new(io::sink())).unwrap()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ripple-sim-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn playground_defaults_reach_t8_accurately() {
    let mut sim = quiet(SimulationConfig::default());
    assert_eq!(sim.steps(), 51);
    let report = sim.run().unwrap();
    assert_eq!(report.iterations, 51);
    assert!((report.final_time - 51.0 * 0.15625).abs() < 1e-12);
    assert!(
        report.center_relative_error < 1e-3,
        "centre relative error {}",
        report.center_relative_error
    );
    assert_eq!(report.metrics.steps(), 51);
    assert!(report.metrics.phase_us(RunMetrics::RHS).is_some());
    assert!(report.diagnostics.is_none());
}

#[test]
fn error_falls_at_fourth_order() {
    let run = |n: usize| {
        let mut sim = quiet(SimulationConfig {
            t_final: 2.5,
            ..SimulationConfig::with_resolution(n)
        });
        let report = sim.run().unwrap();
        assert!((report.final_time - 2.5).abs() < 1e-12);
        // Boundary errors travel at most c * t = 2.5 inward.
        (sim.max_uu_error_within(5.0), sim.center_relative_error())
    };
    let (coarse, coarse_center) = run(24);
    let (fine, fine_center) = run(48);
    // Halving dx ideally divides both by 16; measured ratios are ~16.8
    // over the region and ~14.7 at the centre at this short final time.
    assert!(
        coarse / fine > 10.0,
        "coarse {coarse:e}, fine {fine:e}, ratio {}",
        coarse / fine
    );
    assert!(
        coarse_center / fine_center > 10.0,
        "centre coarse {coarse_center:e}, fine {fine_center:e}, ratio {}",
        coarse_center / fine_center
    );
}

#[test]
fn zero_steps_leave_seeded_state() {
    let config = SimulationConfig {
        t_final: 0.0,
        ..SimulationConfig::with_resolution(10)
    };
    let seeded = quiet(config.clone());
    let mut sim = quiet(config);
    let report = sim.run().unwrap();
    assert_eq!(report.iterations, 0);
    assert_eq!(report.final_time, 0.0);
    assert_eq!(
        sim.integrator().state().as_slice(),
        seeded.integrator().state().as_slice()
    );
}

#[test]
fn scalar_and_batched_runs_are_identical() {
    let config = SimulationConfig {
        resolution: [11, 9, 10],
        t_final: 3.0,
        ..SimulationConfig::default()
    };
    let mut batched = quiet(config.clone());
    let mut scalar = quiet(SimulationConfig {
        vectorized: false,
        ..config
    });
    batched.run().unwrap();
    scalar.run().unwrap();
    assert_eq!(
        batched.integrator().state().as_slice(),
        scalar.integrator().state().as_slice()
    );
}

#[test]
fn diagnostics_written_at_cadence() {
    let dir = scratch_dir("cadence");
    let out = Captured::default();
    // dx = 2.5, dt = 1.25, Nt = floor(8 / 1.25 + 0.5) = 6.
    let config = SimulationConfig {
        diagnostics: Some(DiagnosticsConfig {
            plane_every: 2,
            output_dir: dir.clone(),
            ..DiagnosticsConfig::default()
        }),
        ..SimulationConfig::with_resolution(8)
    };
    let mut sim = Simulation::with_sink(config, Box::new(out.clone())).unwrap();
    assert_eq!(sim.steps(), 6);
    let report = sim.run().unwrap();

    let summary = report.diagnostics.unwrap();
    assert_eq!(summary.center_lines, 7);
    let names: Vec<_> = summary
        .plane_files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "out2D__resolution_8x8x8__iter_0.txt",
            "out2D__resolution_8x8x8__iter_2.txt",
            "out2D__resolution_8x8x8__iter_4.txt",
            "out2D__resolution_8x8x8__iter_6.txt",
        ]
    );

    // Extent 12, central half 4..=8: 25 points of four columns each.
    let plane = std::fs::read_to_string(dir.join(&names[0])).unwrap();
    assert_eq!(plane.lines().count(), 25);
    for line in plane.lines() {
        let cols: Vec<f64> = line
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect();
        assert_eq!(cols.len(), 4);
        // Seeded from the exact solution at t = 0.
        assert_eq!(cols[2], cols[3]);
    }

    let text = out.text();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("0.000000e+00 "));
    assert!(lines[6].starts_with("7.500000e+00 "));
    for line in &lines {
        assert!(line.contains(" || "));
        assert!(line.contains(": "));
    }

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn unwritable_output_dir_fails_the_run() {
    let missing = std::env::temp_dir().join("ripple-sim-missing-dir/nested/deeper");
    let config = SimulationConfig {
        diagnostics: Some(DiagnosticsConfig {
            output_dir: missing,
            ..DiagnosticsConfig::default()
        }),
        ..SimulationConfig::with_resolution(6)
    };
    let mut sim = Simulation::with_sink(config, Box::new(io::sink())).unwrap();
    let err = sim.run().unwrap_err();
    assert!(err.to_string().starts_with("diagnostics: "), "{err}");
}
