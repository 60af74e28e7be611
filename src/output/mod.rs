//! Output module: checkpointed CSV persistence and run statistics

mod csv_output;
mod stats;

pub use csv_output::{CheckpointedWriter, HEADER};
pub use stats::{print_summary, RunStats};
