pub mod orchestrator;
pub mod results;
pub mod stats;
pub mod task_queue;
pub mod worker;

pub use orchestrator::{CompressionOutcome, Orchestrator};
pub use results::ResultsTable;
pub use stats::{StatsAggregator, StatsCounters};
pub use task_queue::TaskQueue;
pub use worker::WorkerScratch;
