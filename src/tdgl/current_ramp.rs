/// Linear interpolation between `current` at step 0 and `current_max` at
/// the final step, updated every `steps_per_current` steps. Returns
/// `current` unchanged when no maximum is configured.
pub fn current_at_step(
    current: f64,
    current_max: Option<f64>,
    steps_per_current: u64,
    step: u64,
    steps: u64,
) -> f64 {
    match current_max {
        None => current,
        Some(max) => {
            let numerator = (max - current) * (step / steps_per_current) as f64;
            let denominator = (steps / steps_per_current) as f64;
            numerator / denominator + current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ramp_returns_base_current() {
        assert_eq!(current_at_step(1.0, None, 1, 500, 1000), 1.0);
    }

    #[test]
    fn ramp_reaches_max_at_final_step() {
        let value = current_at_step(0.0, Some(2.0), 1, 1000, 1000);
        assert!((value - 2.0).abs() < 1e-9);
    }

    #[test]
    fn ramp_is_at_base_at_step_zero() {
        let value = current_at_step(1.0, Some(3.0), 1, 0, 1000);
        assert!((value - 1.0).abs() < 1e-9);
    }
}
