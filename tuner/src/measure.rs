use crate::analysis::Settings;
use crate::lambda::FunctionApi;
use crate::memory::MemorySize;
use anyhow::Result;
use tokio::time::Instant;
use tracing::{error, info};

/// A successful measurement: the function ran for `duration_ms` under `memory`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub memory: MemorySize,
    pub duration_ms: f64,
}

/// Outcome of one update, wait and invoke cycle.
#[derive(Debug)]
pub struct Measurement {
    pub memory: MemorySize,
    pub duration: Result<f64>,
}

#[cfg(test)]
impl Measurement {
    fn duration_ms(&self) -> Option<f64> {
        self.duration.as_ref().ok().copied()
    }
}

/// Sets the function's memory to `memory`, waits for the change to propagate
/// and times a single invocation.
///
/// Failures are logged and returned in the measurement instead of propagated,
/// so one bad size never aborts the rest of a run.
pub async fn measure<A>(api: &A, function: &str, memory: MemorySize, settings: &Settings) -> Measurement
where
    A: FunctionApi + ?Sized,
{
    let duration = timed_invocation(api, function, memory, settings).await;

    match &duration {
        Ok(duration_ms) => info!("Memory: {}MB | Duration: {:.2}ms", memory, duration_ms),
        Err(err) => error!("Error invoking Lambda with {}MB: {:#}", memory, err),
    }

    Measurement { memory, duration }
}

async fn timed_invocation<A>(
    api: &A,
    function: &str,
    memory: MemorySize,
    settings: &Settings,
) -> Result<f64>
where
    A: FunctionApi + ?Sized,
{
    api.update_memory(function, memory).await?;

    tokio::time::sleep(settings.propagation_delay).await;

    let start = Instant::now();
    api.invoke(function).await?;

    Ok(start.elapsed().as_secs_f64() * 1000.0)
}
