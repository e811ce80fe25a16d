//! Installer invocation and failure classification.
//!
//! The pipeline for one request is: [`build_install_command`] resolves the
//! script and quotes the arguments, a [`ProcessRunner`] runs it within the
//! configured bounds, and [`FailureClassifier`] turns the
//! [`ProcessOutcome`] into events and an [`AcquisitionError`].
//! [`AcquisitionInvoker`] wires these together.

mod classify;
mod command;
mod errors;
mod invoker;
mod locator;
mod outcome;
mod runner;

pub use classify::{classify_outcome, FailureClassifier};
pub use command::{build_install_command, quote_install_dir, ResolvedCommand};
pub use errors::{AcquisitionError, FailureKind};
pub use invoker::AcquisitionInvoker;
pub use locator::{LocatorError, PathScriptLocator, ScriptLocator};
pub use outcome::{InvocationError, ProcessError, ProcessOutcome};
pub use runner::{ProcessRunner, ShellRunner};
