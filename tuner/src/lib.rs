//! Measure an AWS Lambda function under several memory sizes and find the
//! size that minimizes duration or estimated cost.

pub mod analysis;
pub mod error;
pub mod form;
pub mod lambda;
pub mod log;
pub mod measure;
pub mod memory;
pub mod report;

pub use analysis::{analyze, run, submit, Analysis, Failure, Isolation, Settings};
pub use error::TunerError;
pub use form::{Credentials, Form, Request};
pub use lambda::FunctionApi;
pub use measure::{measure, Measurement, Sample};
pub use memory::MemorySize;
pub use report::{derived_cost, summarize, Point, Summary, DEFAULT_UNIT_PRICE};
