//! Errors the tool reports to the user.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TunerError {
    /// A required form field was blank or no memory size was selected.
    #[error("Please fill in all fields and select at least one memory configuration.")]
    Incomplete { missing: Vec<&'static str> },

    /// Every measurement of a run failed.
    #[error("No valid results obtained. Please check your inputs and try again.")]
    NoValidResults,

    #[error("Unsupported memory size: {0}MB")]
    UnsupportedMemory(u16),
}
