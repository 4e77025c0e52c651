use serde::{Deserialize, Serialize};

/// The attributes written alongside every snapshot record, matching the
/// state bag the runner carries between steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunState {
    pub step: u64,
    pub time: f64,
    pub dt: f64,
    pub current: f64,
    pub flow: f64,
    pub magnetic_field: f64,
    pub complex_time_scale: f64,
    pub gamma: f64,
}

impl RunState {
    pub fn new(magnetic_field: f64, complex_time_scale: f64, gamma: f64, current: f64) -> Self {
        Self {
            step: 0,
            time: 0.0,
            dt: 0.0,
            current,
            flow: 0.0,
            magnetic_field,
            complex_time_scale,
            gamma,
        }
    }
}

/// Accumulated per-step scalars flushed in bulk at each snapshot boundary.
/// Sized `save_every + 1` (see DESIGN.md, Open Question 1) so the sample
/// produced on the step that triggers a flush is never written out of
/// bounds before the buffer is cleared.
#[derive(Clone, Debug, Default)]
pub struct RunningBuffers {
    pub voltage: Vec<f64>,
    pub current: Vec<f64>,
}

impl RunningBuffers {
    pub fn with_capacity(save_every: u64) -> Self {
        let cap = save_every as usize + 1;
        Self {
            voltage: Vec::with_capacity(cap),
            current: Vec::with_capacity(cap),
        }
    }

    pub fn clear(&mut self) {
        self.voltage.clear();
        self.current.clear();
    }
}
