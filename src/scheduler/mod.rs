//! Greedy start, optimizer orchestration and KPI evaluation.
//!
//! # Algorithm
//!
//! `GreedyScheduler` is a deterministic first-fit heuristic over doctors,
//! days, locations, patients and hours. It is not optimal, but yields a
//! feasible start for the solver in linear time over the index sets.
//!
//! `Optimizer` builds the assignment model, seeds it with the greedy start,
//! solves it and extracts the schedule.
//!
//! # KPI
//!
//! `ScheduleKpi` summarizes a schedule: appointments per location, day and
//! doctor, coverage, remote share and capacity utilization.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Wolsey (2020), "Integer Programming", 2nd ed.

mod greedy;
mod kpi;
mod optimizer;

pub use greedy::GreedyScheduler;
pub use kpi::ScheduleKpi;
pub use optimizer::{ModelStats, OptimizationReport, Optimizer};
