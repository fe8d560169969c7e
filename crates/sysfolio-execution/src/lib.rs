//! Async execution for sysfolio simulations.
//!
//! The core crate's sessions are advanced by plain method calls; this crate
//! puts them on a tokio interval, wires up cooperative cancellation and
//! performs the best-effort API probe that precedes a load test.

pub mod event;
pub mod probe;
pub mod runner;

pub use event::SimulationEvent;
pub use probe::{HealthProbe, HttpProfileProbe, ProbeOutcome};
pub use runner::{LoadTestRunner, LogStreamRunner};
