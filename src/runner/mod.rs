//! Drives the TDGL integrator: a thermalization pass, the main loop,
//! snapshot cadence, and running-state buffers.

pub mod reporter;

use crate::error::{Result, TdglError};
use crate::mesh::Mesh;
use crate::persistence::records::{RunState, RunningBuffers};
use crate::persistence::DataHandler;
use crate::tdgl::current_ramp::current_at_step;
use crate::tdgl::{step, StepParams, TdglOperators, TdglState};
use log::{error, info};
use reporter::Reporter;

/// Configuration for one simulation run, independent of the mesh and the
/// persistence target.
pub struct RunConfig {
    pub steps: u64,
    pub save_every: u64,
    pub skip: u64,
    pub current: f64,
    pub current_max: Option<f64>,
    pub steps_per_current: u64,
    pub vector_potential: Vec<(f64, f64)>,
    pub magnetic_field: f64,
    pub params: StepParams,
    pub metal_boundary: Vec<usize>,
    pub input_edges: Vec<usize>,
    pub output_edges: Vec<usize>,
    pub voltage_points: [usize; 2],
}

pub struct Runner<'a> {
    mesh: &'a Mesh,
    operators: TdglOperators,
    config: RunConfig,
    data_handler: &'a DataHandler,
    reporter: &'a mut dyn Reporter,
}

impl<'a> Runner<'a> {
    pub fn new(
        mesh: &'a Mesh,
        operators: TdglOperators,
        config: RunConfig,
        data_handler: &'a DataHandler,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            mesh,
            operators,
            config,
            data_handler,
            reporter,
        }
    }

    pub fn run(mut self) -> Result<()> {
        let mut state = TdglState::initial(
            self.mesh.num_sites(),
            self.mesh.edge_mesh.len(),
            &self.config.metal_boundary,
        );
        let mut mu_boundary = vec![0.0; self.mesh.edge_mesh.boundary_edge_indices.len()];
        apply_boundary_current(&mut mu_boundary, &self.config, self.config.current);

        if self.config.skip > 0 {
            info!("thermalizing for {} steps", self.config.skip);
            let mut run_state = RunState::new(
                self.config.magnetic_field,
                self.config.params.complex_time_scale,
                self.config.params.gamma,
                self.config.current,
            );
            let mut running = RunningBuffers::with_capacity(self.config.save_every);
            state = self.run_stage(0, self.config.skip, &mut run_state, &mut running, &mut mu_boundary, state, false)?;
        }

        info!("simulating for {} steps", self.config.steps);
        let mut run_state = RunState::new(
            self.config.magnetic_field,
            self.config.params.complex_time_scale,
            self.config.params.gamma,
            self.config.current,
        );
        let mut running = RunningBuffers::with_capacity(self.config.save_every);
        self.run_stage(0, self.config.steps, &mut run_state, &mut running, &mut mu_boundary, state, true)?;

        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn run_stage(
        &mut self,
        start: u64,
        end: u64,
        run_state: &mut RunState,
        running: &mut RunningBuffers,
        mu_boundary: &mut [f64],
        mut state: TdglState,
        save: bool,
    ) -> Result<TdglState> {
        self.reporter.start(if save { "simulating" } else { "thermalizing" }, end - start);

        for i in start..=end {
            run_state.step = i;
            run_state.dt = self.config.params.dt;

            if save && i % self.config.save_every == 0 {
                if let Some(field) = state.all_finite() {
                    error!("non-finite {} detected at step {}", field, i);
                    return Err(TdglError::SolveFailure {
                        step: i,
                        reason: format!("non-finite {} at snapshot boundary", field),
                    });
                }
                let a = if i == 0 { Some(self.config.vector_potential.as_slice()) } else { None };
                self.data_handler
                    .save_time_step(run_state, &state, a, running)
                    .map_err(|e| {
                        error!("failed to save snapshot at step {}: {}", i, e);
                        e
                    })?;
                running.clear();
            }

            let current = current_at_step(
                self.config.current,
                self.config.current_max,
                self.config.steps_per_current,
                i,
                self.config.steps,
            );
            apply_boundary_current(mu_boundary, &self.config, current);
            run_state.current = current;
            running.current.push(current);

            let output = step(self.mesh, &mut self.operators, &state, &self.config.params, mu_boundary, self.config.voltage_points)?;
            run_state.flow += output.voltage * run_state.dt;
            running.voltage.push(output.voltage);
            state = output.state;

            run_state.time += run_state.dt;
            self.reporter.tick(i - start);
        }

        self.reporter.finish();
        Ok(state)
    }
}

fn apply_boundary_current(mu_boundary: &mut [f64], config: &RunConfig, current: f64) {
    for &local in &config.input_edges {
        mu_boundary[local] = current;
    }
    for &local in &config.output_edges {
        mu_boundary[local] = -current;
    }
}
