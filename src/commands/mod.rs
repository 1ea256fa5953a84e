mod analyze;
mod evaluate;
mod ingest;

pub use analyze::run_analyze;
pub use evaluate::run_evaluate;
pub use ingest::run_ingest;
