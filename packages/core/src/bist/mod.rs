//! Built-In Self-Test engine
//!
//! ```text
//! VectorGenerator ──corpus──▶ VectorExecutor ─┐
//!                             PerformanceProbe ┼──results──▶ BistSuite ──▶ ExitPolicy ──▶ verdict
//!                             cross-validation ┘
//! ```
//!
//! [`runner::BistRunner`] проводит фазы по порядку; остальные модули
//! можно использовать и по отдельности (например, для ad hoc проверки
//! вектора через [`executor::validate_test_vector`]).

pub mod executor;
pub mod exit_criteria;
pub mod generator;
pub mod perf;
pub mod report;
pub mod result;
pub mod runner;
pub mod suite;
pub mod vector;

pub use executor::{validate_test_vector, BatchOutcome, VectorExecutor};
pub use exit_criteria::{ExitCriteriaReport, ExitPolicy};
pub use perf::{OpKind, PerformanceProbe, ThresholdTable};
pub use result::{BistResult, FailureKind, VectorFailure};
pub use runner::{BistRun, BistRunner};
pub use suite::{BistSuite, ResultCategory};
pub use vector::TestVector;
