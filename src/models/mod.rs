//! Appointment scheduling domain models.
//!
//! Provides the instance (index sets plus availability and competence
//! matrices), the weekly time grid, and the schedule produced by the
//! optimizer.
//!
//! # Index Sets
//!
//! | Symbol | Meaning | Size |
//! |--------|---------|------|
//! | `m` | Doctor | `Instance::doctors` |
//! | `p` | Patient | `Instance::patients` |
//! | `l` | Location (0 = remote) | `Instance::locations` |
//! | `d` | Day, Monday..Saturday | [`DAYS`] |
//! | `h` | Hour slot, 08:00..20:00 | [`HOURS`] |

mod instance;
mod schedule;
mod week;

pub use instance::Instance;
pub use schedule::{Appointment, Schedule, Violation, ViolationType};
pub use week::{clock_hour, day_name, hour_index, DAYS, FIRST_HOUR, HOURS, REMOTE_LOCATION};
