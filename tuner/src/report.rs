use crate::error::TunerError;
use crate::measure::Sample;
use crate::memory::MemorySize;

/// Approximate Lambda price in USD per GB-second.
pub const DEFAULT_UNIT_PRICE: f64 = 0.0000166667;

/// Estimated cost of one invocation; not what AWS bills.
pub fn derived_cost(memory: MemorySize, duration_ms: f64, unit_price: f64) -> f64 {
    (duration_ms / 1000.0) * (f64::from(memory.mb()) / 1024.0) * unit_price
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub memory: MemorySize,
    pub duration_ms: f64,
    pub cost: f64,
}

/// A run's samples with their costs, and the sizes that minimize each metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub points: Vec<Point>,
    pub best_performance: Point,
    pub best_cost: Point,
}

impl Summary {
    pub fn performance_line(&self) -> String {
        format!(
            "Best configuration for performance: {}MB (Duration: {:.2}ms)",
            self.best_performance.memory, self.best_performance.duration_ms
        )
    }

    pub fn cost_line(&self) -> String {
        format!(
            "Best configuration for cost: {}MB (Cost: ${:.8})",
            self.best_cost.memory, self.best_cost.cost
        )
    }

    pub fn durations(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|point| [f64::from(point.memory.mb()), point.duration_ms])
            .collect()
    }

    pub fn costs(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|point| [f64::from(point.memory.mb()), point.cost])
            .collect()
    }
}

pub fn summarize(results: &[Sample], unit_price: f64) -> Result<Summary, TunerError> {
    let points: Vec<Point> = results
        .iter()
        .map(|sample| Point {
            memory: sample.memory,
            duration_ms: sample.duration_ms,
            cost: derived_cost(sample.memory, sample.duration_ms, unit_price),
        })
        .collect();

    let best_performance = first_min_by(&points, |point| point.duration_ms)
        .ok_or(TunerError::NoValidResults)?;
    let best_cost = first_min_by(&points, |point| point.cost).ok_or(TunerError::NoValidResults)?;

    Ok(Summary {
        points,
        best_performance,
        best_cost,
    })
}

/// Ties go to the earliest point.
fn first_min_by<F>(points: &[Point], metric: F) -> Option<Point>
where
    F: Fn(&Point) -> f64,
{
    points.iter().copied().fold(None, |best, point| match best {
        Some(best) if metric(&best) <= metric(&point) => Some(best),
        _ => Some(point),
    })
}
