use crate::error::TunerError;
use crate::form::{Form, Request};
use crate::lambda::FunctionApi;
use crate::measure::{measure, Measurement, Sample};
use crate::memory::MemorySize;
use crate::report::DEFAULT_UNIT_PRICE;
use anyhow::anyhow;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// How the tasks of one run share the target function.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum Isolation {
    /// Tasks take the function in turn, so each invocation runs under the
    /// memory size its own task set.
    Serialized,
    /// All tasks update and invoke at once. A task may be timed under another
    /// task's memory size.
    Parallel,
}

impl Isolation {
    pub fn variants() -> &'static [Isolation] {
        &[Isolation::Serialized, Isolation::Parallel]
    }
}

impl Display for Isolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Isolation::Serialized => write!(f, "Serialized"),
            Isolation::Parallel => write!(f, "Parallel"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pause between the configuration update and the timed invocation.
    pub propagation_delay: Duration,
    pub isolation: Isolation,
    /// USD per GB-second.
    pub unit_price: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            propagation_delay: Duration::from_secs(5),
            isolation: Isolation::Serialized,
            unit_price: DEFAULT_UNIT_PRICE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub memory: MemorySize,
    pub message: String,
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error invoking Lambda with {}MB: {}", self.memory, self.message)
    }
}

/// Everything one run produced: the successful samples in submission order
/// and the sizes that failed.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub results: Vec<Sample>,
    pub failures: Vec<Failure>,
}

impl Analysis {
    fn collect(measurements: Vec<Measurement>) -> Self {
        let mut analysis = Self::default();

        for measurement in measurements {
            match measurement.duration {
                Ok(duration_ms) => analysis.results.push(Sample {
                    memory: measurement.memory,
                    duration_ms,
                }),
                Err(err) => analysis.failures.push(Failure {
                    memory: measurement.memory,
                    message: format!("{:#}", err),
                }),
            }
        }

        analysis
    }
}

/// Measures `function` once per memory size, one task per size, and waits for
/// all of them.
pub async fn run<A>(api: Arc<A>, function: &str, memories: &[MemorySize], settings: &Settings) -> Analysis
where
    A: FunctionApi,
{
    let target = Arc::new(Mutex::new(()));

    let handles = memories
        .iter()
        .map(|&memory| {
            let api = Arc::clone(&api);
            let target = Arc::clone(&target);
            let function = function.to_string();
            let settings = settings.clone();

            tokio::spawn(async move {
                let _guard = match settings.isolation {
                    Isolation::Serialized => Some(target.lock().await),
                    Isolation::Parallel => None,
                };

                measure(api.as_ref(), &function, memory, &settings).await
            })
        })
        .collect::<Vec<_>>();

    let measurements = join_all(handles)
        .await
        .into_iter()
        .zip(memories)
        .map(|(joined, &memory)| {
            joined.unwrap_or_else(|err| Measurement {
                memory,
                duration: Err(anyhow!("measurement task failed: {}", err)),
            })
        })
        .collect::<Vec<Measurement>>();

    let analysis = Analysis::collect(measurements);
    info!(
        "Measured {} of {} memory sizes",
        analysis.results.len(),
        memories.len()
    );

    analysis
}

/// Connects with the request's credentials and region, then runs the analysis.
///
/// `connect` is called exactly once per request.
pub async fn analyze<A, F, Fut>(request: Request, settings: Settings, connect: F) -> Analysis
where
    A: FunctionApi,
    F: FnOnce(Request) -> Fut,
    Fut: Future<Output = A>,
{
    let function = request.function().to_string();
    let memories = request.memories().to_vec();

    info!(
        "Analyzing {} with {} memory sizes ({} isolation)",
        function,
        memories.len(),
        settings.isolation
    );

    let api = Arc::new(connect(request).await);

    run(api, &function, &memories, &settings).await
}

/// Validates `form` and, only if it is complete, returns the analysis to run.
///
/// Nothing is connected or invoked until the returned future is polled.
pub fn submit<A, F, Fut>(
    form: &Form,
    settings: &Settings,
    connect: F,
) -> Result<impl Future<Output = Analysis>, TunerError>
where
    A: FunctionApi,
    F: FnOnce(Request) -> Fut,
    Fut: Future<Output = A>,
{
    let request = form.validate()?;

    Ok(analyze(request, settings.clone(), connect))
}
