use num_complex::Complex64;

/// Per-step field values. `supercurrent`/`normal_current` are edge-valued;
/// `psi`/`mu`/`alpha` are site-valued.
#[derive(Clone, Debug)]
pub struct TdglState {
    pub psi: Vec<Complex64>,
    pub mu: Vec<f64>,
    pub supercurrent: Vec<f64>,
    pub normal_current: Vec<f64>,
}

impl TdglState {
    /// Initial condition: psi = 1 everywhere except at the metal contacts
    /// (zero), mu = 0, and zero currents.
    pub fn initial(num_sites: usize, num_edges: usize, metal_contacts: &[usize]) -> Self {
        let mut psi = vec![Complex64::new(1.0, 0.0); num_sites];
        for &s in metal_contacts {
            psi[s] = Complex64::new(0.0, 0.0);
        }
        Self {
            psi,
            mu: vec![0.0; num_sites],
            supercurrent: vec![0.0; num_edges],
            normal_current: vec![0.0; num_edges],
        }
    }

    /// `true` if every field value is finite; used by the runner at
    /// snapshot boundaries to detect a numerical failure of the integrator.
    pub fn all_finite(&self) -> Option<&'static str> {
        if self.psi.iter().any(|p| !p.re.is_finite() || !p.im.is_finite()) {
            return Some("psi");
        }
        if self.mu.iter().any(|m| !m.is_finite()) {
            return Some("mu");
        }
        None
    }
}
