use crate::config::{OutputFormat, SessionConfig};
use crate::error::RunError;
use crate::input::{AxisDiscovery, DeviceSession, InputBackend};
use crate::rate::{EffectiveSampleFilter, RateReport, RateTracker};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Instant;

/// Source of "now" for rate measurements.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Where discovered axes and rate reports end up.
pub trait ReportSink {
    fn axis_discovered(&mut self, axis: &AxisDiscovery) -> io::Result<()>;
    fn window_report(&mut self, report: &RateReport) -> io::Result<()>;
    fn final_report(&mut self, report: &RateReport) -> io::Result<()>;
}

fn format_hz(hz: Option<f64>) -> String {
    match hz {
        Some(hz) => format!("{hz:.1}Hz"),
        None => "n/a".to_string(),
    }
}

/// Human readable report lines.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn axis_discovered(&mut self, axis: &AxisDiscovery) -> io::Result<()> {
        writeln!(
            self.out,
            "Axis {}: {} min: {} max: {}",
            axis.index, axis.name, axis.min, axis.max
        )
    }

    fn window_report(&mut self, report: &RateReport) -> io::Result<()> {
        writeln!(
            self.out,
            "Rate: {}, Effective rate: {}",
            format_hz(report.hz),
            format_hz(report.effective_hz)
        )?;
        self.out.flush()
    }

    fn final_report(&mut self, report: &RateReport) -> io::Result<()> {
        writeln!(
            self.out,
            "Total rate: {}, Total effective rate: {}",
            format_hz(report.hz),
            format_hz(report.effective_hz)
        )?;
        writeln!(self.out, "Done")?;
        self.out.flush()
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonLine<'a> {
    Axis(&'a AxisDiscovery),
    Window(&'a RateReport),
    Total(&'a RateReport),
}

/// One JSON object per line, tagged by `event`.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &JsonLine<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, line)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn axis_discovered(&mut self, axis: &AxisDiscovery) -> io::Result<()> {
        self.emit(&JsonLine::Axis(axis))
    }

    fn window_report(&mut self, report: &RateReport) -> io::Result<()> {
        self.emit(&JsonLine::Window(report))
    }

    fn final_report(&mut self, report: &RateReport) -> io::Result<()> {
        self.emit(&JsonLine::Total(report))
    }
}

pub fn stdout_sink(format: OutputFormat) -> Box<dyn ReportSink> {
    match format {
        OutputFormat::Text => Box::new(TextSink::new(io::stdout().lock())),
        OutputFormat::Json => Box::new(JsonSink::new(io::stdout().lock())),
    }
}

/// Poll `session` until the sample limit is reached or a read fails.
///
/// Emits a window report every `UPDATE_INTERVAL` samples and returns the whole-session
/// report, which has also been sent to `sink`. The session is left open; the caller
/// (or dropping the session) closes it.
pub fn run<B: InputBackend>(
    session: &mut DeviceSession<B>,
    config: &SessionConfig,
    clock: &impl Clock,
    sink: &mut dyn ReportSink,
) -> Result<RateReport, RunError> {
    if let Some((weak, strong)) = config.rumble {
        session.set_rumble(weak, strong);
    }

    log::debug!("Warming up with {} samples", config.warmup_samples);
    for _ in 0..config.warmup_samples {
        session.read()?;
    }

    let (x_axis, y_axis) = config.tracked_axes;
    let mut filter = EffectiveSampleFilter::new();
    let mut tracker = RateTracker::new(clock.now());

    while config
        .max_samples
        .map_or(true, |limit| tracker.total_samples() < limit)
    {
        session.read()?;

        let effective = filter.observe(session.axis_value(x_axis), session.axis_value(y_axis));
        tracker.record_sample(effective);

        if tracker.window_complete() {
            let report = tracker.window_report(clock.now());
            sink.window_report(&report)?;
        }
    }

    let report = tracker.final_report(clock.now());
    log::info!(
        "{} samples ({} effective) in {} ms",
        report.samples,
        report.effective_samples,
        report.elapsed_ms
    );
    sink.final_report(&report)?;
    Ok(report)
}
