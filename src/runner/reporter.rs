use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::time::Instant;

/// Pluggable progress sink. Never changes simulation state; kept off the
/// hot path so a silent run pays nothing for it.
pub trait Reporter {
    fn start(&mut self, stage: &str, total: u64);
    fn tick(&mut self, step: u64);
    fn finish(&mut self);
}

/// Default reporter, backed by `indicatif`, playing the role the
/// distilled source gave `tqdm`.
pub struct IndicatifReporter {
    bar: Option<ProgressBar>,
}

impl IndicatifReporter {
    pub fn new() -> Self {
        Self { bar: None }
    }
}

impl Default for IndicatifReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for IndicatifReporter {
    fn start(&mut self, stage: &str, total: u64) {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template("{msg} {bar:40.cyan/blue} {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(stage.to_string());
        self.bar = Some(bar);
    }

    fn tick(&mut self, step: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(step);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Reporter that does nothing; used in tests and non-interactive runs.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn start(&mut self, _stage: &str, _total: u64) {}
    fn tick(&mut self, _step: u64) {}
    fn finish(&mut self) {}
}

/// Reporter that logs progress every `miniters` steps instead of drawing a
/// bar, mirroring `original_source/src/runner.py`'s `prog_disabled`/
/// `i % miniters == 0` gating (there, configuring `miniters` disables
/// `tqdm` in favor of periodic `it/s` log lines).
pub struct MinitersReporter {
    miniters: u64,
    stage: String,
    total: u64,
    last_tick: Option<Instant>,
}

impl MinitersReporter {
    pub fn new(miniters: u64) -> Self {
        Self {
            miniters,
            stage: String::new(),
            total: 0,
            last_tick: None,
        }
    }
}

impl Reporter for MinitersReporter {
    fn start(&mut self, stage: &str, total: u64) {
        self.stage = stage.to_string();
        self.total = total;
        self.last_tick = None;
    }

    fn tick(&mut self, step: u64) {
        if self.miniters == 0 || step % self.miniters != 0 {
            return;
        }
        let now = Instant::now();
        let rate = match self.last_tick {
            Some(prev) => self.miniters as f64 / now.duration_since(prev).as_secs_f64(),
            None => 0.0,
        };
        info!("{} {}/{} {:.2} it/s", self.stage, step, self.total, rate);
        self.last_tick = Some(now);
    }

    fn finish(&mut self) {}
}
