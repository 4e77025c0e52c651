use crate::error::Result;
use crate::mesh::Mesh;
use crate::tdgl::operators::TdglOperators;
use crate::tdgl::state::TdglState;
use num_complex::Complex64;
use rayon::prelude::*;

/// Parameters held fixed for the run (besides the boundary current, which
/// the caller updates every step via the current ramp).
#[derive(Clone, Debug)]
pub struct StepParams {
    pub dt: f64,
    pub complex_time_scale: f64,
    pub gamma: f64,
    pub alpha: Vec<f64>,
}

pub struct StepOutput {
    pub state: TdglState,
    pub voltage: f64,
}

/// One semi-implicit, gauge-invariant TDGL time step.
pub fn step(
    mesh: &Mesh,
    operators: &mut TdglOperators,
    state: &TdglState,
    params: &StepParams,
    mu_boundary: &[f64],
    voltage_points: [usize; 2],
) -> Result<StepOutput> {
    let sq_gamma = params.gamma * params.gamma;
    let dt = params.dt;
    let u = params.complex_time_scale;

    let lap_psi = operators.psi_laplacian.matvec(&state.psi);

    let new_psi: Vec<Complex64> = (0..state.psi.len())
        .into_par_iter()
        .map(|i| {
            let psi_i = state.psi[i];
            let r = psi_i.norm_sqr();
            let phase = Complex64::new(0.0, -state.mu[i] * dt).exp();

            let z = phase * (sq_gamma / 2.0) * psi_i;
            let w = z * r
                + phase
                    * (psi_i
                        + (dt / u)
                            * (1.0 + sq_gamma * r).sqrt()
                            * ((params.alpha[i] - r) * psi_i + lap_psi[i]));

            let a_coef = w.re * z.re + w.im * z.im;
            let w_abs_sq = w.norm_sqr();
            let z_abs_sq = z.norm_sqr();
            let discriminant = (2.0 * a_coef + 1.0).powi(2) - 4.0 * z_abs_sq * w_abs_sq;
            let r_new = 2.0 * w_abs_sq / (2.0 * a_coef + 1.0 + discriminant.max(0.0).sqrt());

            w - z * r_new
        })
        .collect();

    let grad_psi = operators.psi_gradient.matvec(&new_psi);
    let supercurrent: Vec<f64> = grad_psi
        .iter()
        .zip(mesh.edge_mesh.edges.iter())
        .map(|(g, &(u0, _))| (g * new_psi[u0].conj()).im)
        .collect();

    let div_js = operators.divergence.matvec(&supercurrent)?;
    let nb_mu = operators.mu_boundary_laplacian.matvec(mu_boundary)?;
    let rhs: Vec<f64> = div_js.iter().zip(nb_mu.iter()).map(|(a, b)| a - b).collect();
    let new_mu = operators.mu_laplacian_lu.solve(&rhs)?;

    let normal_current: Vec<f64> = operators
        .mu_gradient
        .matvec(&new_mu)?
        .into_iter()
        .map(|v| -v)
        .collect();

    let voltage = new_mu[voltage_points[0]] - new_mu[voltage_points[1]];

    Ok(StepOutput {
        state: TdglState {
            psi: new_psi,
            mu: new_mu,
            supercurrent,
            normal_current,
        },
        voltage,
    })
}
