//! Off-critical-path diagnostics output.
//!
//! The driver samples the state at fixed cadences and hands cheap copies
//! to a dedicated worker thread over a bounded crossbeam channel. The
//! worker evaluates the exact solution, formats the lines, and performs
//! all I/O; it never sees the integration buffers.
//!
//! ```text
//! driver thread                      ripple-diagnostics
//!   CenterSample ──┐                   time log10(err) || x y z: num exact
//!   PlaneSample  ──┴─ bounded(cap) ──► out2D__resolution_NxNxN__iter_n.txt
//! ```
//!
//! I/O failures stop the worker; they surface from
//! [`DiagnosticsWorker::finish`].

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use ripple_propagators::PlaneWave;

use crate::config::ConfigError;

// ── DiagnosticsConfig ─────────────────────────────────────────────

/// Cadences and destination for diagnostics output.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticsConfig {
    /// Emit a centre line every this many iterations. Default: 1.
    pub center_every: u64,
    /// Write a 2D plane file every this many iterations. Default: 10.
    pub plane_every: u64,
    /// Directory for plane files. Default: `.`.
    pub output_dir: PathBuf,
    /// Samples buffered between driver and worker. Default: 16.
    pub channel_capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            center_every: 1,
            plane_every: 10,
            output_dir: PathBuf::from("."),
            channel_capacity: 16,
        }
    }
}

impl DiagnosticsConfig {
    /// Reject zero cadences and a zero-capacity channel.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.center_every == 0 {
            return Err(ConfigError::InvalidCadence {
                name: "center_every",
            });
        }
        if self.plane_every == 0 {
            return Err(ConfigError::InvalidCadence {
                name: "plane_every",
            });
        }
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidCadence {
                name: "channel_capacity",
            });
        }
        Ok(())
    }

    /// Whether iteration `n` gets a centre line.
    pub fn wants_center(&self, n: u64) -> bool {
        n % self.center_every == 0
    }

    /// Whether iteration `n` gets a plane file.
    pub fn wants_plane(&self, n: u64) -> bool {
        n % self.plane_every == 0
    }
}

// ── DiagnosticsError ──────────────────────────────────────────────

/// Errors surfaced by the diagnostics worker.
#[derive(Debug)]
pub enum DiagnosticsError {
    /// Writing a plane file or the centre stream failed.
    Io {
        /// The plane file, or `None` for the centre stream.
        path: Option<PathBuf>,
        /// The underlying error.
        source: io::Error,
    },
    /// The worker thread panicked.
    WorkerPanicked,
    /// The worker has already stopped; call
    /// [`finish`](DiagnosticsWorker::finish) for the cause.
    Disconnected,
}

impl fmt::Display for DiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io {
                path: Some(path),
                source,
            } => write!(f, "writing {}: {source}", path.display()),
            Self::Io { path: None, source } => write!(f, "writing centre output: {source}"),
            Self::WorkerPanicked => write!(f, "diagnostics worker panicked"),
            Self::Disconnected => write!(f, "diagnostics worker has stopped"),
        }
    }
}

impl Error for DiagnosticsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ── Samples ───────────────────────────────────────────────────────

/// Numerical `uu` at the grid centre.
#[derive(Clone, Debug, PartialEq)]
pub struct CenterSample {
    /// Simulation time `n * dt`.
    pub time: f64,
    /// Coordinates of the centre point.
    pub position: [f64; 3],
    /// Numerical displacement there.
    pub uu: f64,
}

/// Numerical `uu` over the central part of one constant-`z` plane.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneSample {
    /// Iteration number, used in the file name.
    pub iteration: u64,
    /// Simulation time `n * dt`.
    pub time: f64,
    /// Interior resolution, used in the file name.
    pub resolution: [usize; 3],
    /// The plane's `z` coordinate.
    pub z: f64,
    /// `(x, y, uu)` per point, x-major.
    pub points: Vec<[f64; 3]>,
}

impl PlaneSample {
    /// File name for this sample.
    pub fn file_name(&self) -> String {
        let [nx, ny, nz] = self.resolution;
        format!(
            "out2D__resolution_{nx}x{ny}x{nz}__iter_{}.txt",
            self.iteration
        )
    }
}

enum Task {
    Center(CenterSample),
    Plane(PlaneSample),
}

/// What the worker wrote.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiagnosticsSummary {
    /// Centre lines written.
    pub center_lines: u64,
    /// Plane files written, in order.
    pub plane_files: Vec<PathBuf>,
}

// ── Formatting ────────────────────────────────────────────────────

/// Format like C's `%e`: six fraction digits and a signed, at least
/// two-digit exponent (`1.500000e+00`).
pub fn format_sci(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = format!("{v:.6e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// One centre line: `time log10(rel_err) || x y z: numerical exact`.
pub fn center_line(sample: &CenterSample, exact: f64) -> String {
    let rel = ((exact - sample.uu) / exact).abs();
    let [x, y, z] = sample.position;
    format!(
        "{} {} || {} {} {}: {} {}",
        format_sci(sample.time),
        format_sci(rel.log10()),
        format_sci(x),
        format_sci(y),
        format_sci(z),
        format_sci(sample.uu),
        format_sci(exact),
    )
}

// ── Worker ────────────────────────────────────────────────────────

/// Handle to the diagnostics worker thread.
///
/// Dropping the handle closes the channel and joins the worker,
/// discarding any error; call [`finish`](Self::finish) to observe it.
pub struct DiagnosticsWorker {
    config: DiagnosticsConfig,
    tx: Option<Sender<Task>>,
    handle: Option<JoinHandle<Result<DiagnosticsSummary, DiagnosticsError>>>,
}

impl DiagnosticsWorker {
    /// Spawn a worker that writes centre lines to stdout.
    pub fn spawn(config: DiagnosticsConfig, wave: PlaneWave) -> Result<Self, ConfigError> {
        Self::spawn_with_sink(config, wave, Box::new(io::stdout()))
    }

    /// Spawn a worker that writes centre lines to `sink`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidCadence`] for a bad `config`,
    /// [`ConfigError::ThreadSpawnFailed`] if the OS refuses the thread.
    pub fn spawn_with_sink(
        config: DiagnosticsConfig,
        wave: PlaneWave,
        sink: Box<dyn Write + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (tx, rx) = crossbeam_channel::bounded(config.channel_capacity);
        let output_dir = config.output_dir.clone();
        let handle = thread::Builder::new()
            .name("ripple-diagnostics".into())
            .spawn(move || worker_loop(rx, wave, output_dir, sink))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("diagnostics worker: {e}"),
            })?;
        Ok(Self {
            config,
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// The configuration the worker was spawned with.
    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    /// Queue a centre sample. Blocks while the channel is full.
    pub fn submit_center(&self, sample: CenterSample) -> Result<(), DiagnosticsError> {
        self.send(Task::Center(sample))
    }

    /// Queue a plane sample. Blocks while the channel is full.
    pub fn submit_plane(&self, sample: PlaneSample) -> Result<(), DiagnosticsError> {
        self.send(Task::Plane(sample))
    }

    fn send(&self, task: Task) -> Result<(), DiagnosticsError> {
        let tx = self.tx.as_ref().ok_or(DiagnosticsError::Disconnected)?;
        tx.send(task).map_err(|_| DiagnosticsError::Disconnected)
    }

    /// Close the channel, wait for queued samples to be written, and
    /// return what the worker produced.
    pub fn finish(mut self) -> Result<DiagnosticsSummary, DiagnosticsError> {
        self.tx.take();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| DiagnosticsError::WorkerPanicked)?,
            None => Err(DiagnosticsError::Disconnected),
        }
    }
}

impl Drop for DiagnosticsWorker {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if let Ok(Err(e)) = handle.join() {
                log::warn!("diagnostics worker stopped with error: {e}");
            }
        }
    }
}

fn worker_loop(
    rx: Receiver<Task>,
    wave: PlaneWave,
    output_dir: PathBuf,
    mut sink: Box<dyn Write + Send>,
) -> Result<DiagnosticsSummary, DiagnosticsError> {
    let mut summary = DiagnosticsSummary::default();
    while let Ok(task) = rx.recv() {
        match task {
            Task::Center(sample) => {
                let exact = wave.at(sample.position, sample.time).uu;
                writeln!(sink, "{}", center_line(&sample, exact))
                    .map_err(|source| DiagnosticsError::Io { path: None, source })?;
                summary.center_lines += 1;
            }
            Task::Plane(sample) => {
                let path = output_dir.join(sample.file_name());
                write_plane(&path, &sample, &wave).map_err(|source| DiagnosticsError::Io {
                    path: Some(path.clone()),
                    source,
                })?;
                summary.plane_files.push(path);
            }
        }
    }
    sink.flush()
        .map_err(|source| DiagnosticsError::Io { path: None, source })?;
    Ok(summary)
}

fn write_plane(path: &PathBuf, sample: &PlaneSample, wave: &PlaneWave) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for &[x, y, uu] in &sample.points {
        let exact = wave.at([x, y, sample.z], sample.time).uu;
        writeln!(
            out,
            "{} {} {} {}",
            format_sci(x),
            format_sci(y),
            format_sci(uu),
            format_sci(exact)
        )?;
    }
    out.flush()
}
