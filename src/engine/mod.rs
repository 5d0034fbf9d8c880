pub mod metrics;
pub mod pipeline;
pub mod poller;
pub mod processing_set;
pub mod ptb;
pub mod solver;

pub use metrics::{Metrics, MetricsSnapshot};
pub use pipeline::{profit_bps, Pipeline};
pub use poller::Poller;
pub use processing_set::{ProcessingGuard, ProcessingSet};
pub use ptb::{required_output_with_buffer, select_coins, InventoryClient, PtbAssembler};
pub use solver::SolverEngine;
