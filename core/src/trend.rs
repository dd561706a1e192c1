use serde::{Deserialize, Serialize};

pub const MA_WINDOW: usize = 5;
pub const TREND_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
    Na,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovingAverageTrend {
    pub ma_last5: Option<f64>,
    pub ma_prev5: Option<f64>,
    pub trend: Trend,
}

impl MovingAverageTrend {
    /// Improvement between the two windows, positive = better.
    /// Smaller-is-better metrics improve when the average drops.
    pub fn delta(&self, smaller_is_better: bool) -> Option<f64> {
        let (last, prev) = (self.ma_last5?, self.ma_prev5?);
        Some(if smaller_is_better { prev - last } else { last - prev })
    }
}

fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

/// Trailing 5-value average, the 5 values before it, and the direction.
/// `values` are oldest first; non-finite entries are dropped up front.
pub fn moving_average_trend(values: &[f64]) -> MovingAverageTrend {
    let data: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = data.len();

    let ma_last5 = if n >= MA_WINDOW {
        mean(&data[n - MA_WINDOW..])
    } else {
        None
    };
    let ma_prev5 = if n >= 2 * MA_WINDOW {
        mean(&data[n - 2 * MA_WINDOW..n - MA_WINDOW])
    } else {
        None
    };

    let trend = match (ma_last5, ma_prev5) {
        (Some(last), Some(prev)) => {
            let diff = last - prev;
            if diff > TREND_EPSILON {
                Trend::Up
            } else if diff < -TREND_EPSILON {
                Trend::Down
            } else {
                Trend::Flat
            }
        }
        _ => Trend::Na,
    };

    MovingAverageTrend {
        ma_last5,
        ma_prev5,
        trend,
    }
}
