// ── Descriptive statistics ────────────────────────────────────────────────────

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// Returns `None` when fewer than two values are available.
pub fn sample_std_dev(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let m = mean(data)?;
    let sum_sq: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
    Some((sum_sq / (data.len() as f64 - 1.0)).sqrt())
}

/// Round `value` to `decimals` places, resolving exact halves to the even
/// neighbour (`0.03125` becomes `0.0312`, `0.09375` becomes `0.0938`).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10_f64.powi(decimals as i32);
    let scaled = value * factor;
    let mut rounded = scaled.round();
    if (rounded - scaled).abs() == 0.5 {
        rounded = 2.0 * (scaled / 2.0).round();
    }
    rounded / factor
}

// ── PopulationStats ───────────────────────────────────────────────────────────

/// Mean and spread of the comment counts across every post.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    pub count: usize,
    /// `None` for an empty population.
    pub mean: Option<f64>,
    /// `None` for fewer than two values.
    pub std_dev: Option<f64>,
}

impl PopulationStats {
    /// Summarise a population of counts.
    pub fn from_counts(counts: impl IntoIterator<Item = u64>) -> Self {
        let values: Vec<f64> = counts.into_iter().map(|c| c as f64).collect();
        Self {
            count: values.len(),
            mean: mean(&values),
            std_dev: sample_std_dev(&values),
        }
    }

    /// Standard score of `value`, or `None` when the spread is undefined or
    /// zero.
    pub fn z_score(&self, value: f64) -> Option<f64> {
        let mean = self.mean?;
        let std_dev = self.std_dev.filter(|s| *s > 0.0)?;
        Some((value - mean) / std_dev)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
