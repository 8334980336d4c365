//! Background collectors for the async runtime and the current process.
//!
//! Both are sampled at scrape time and carry no middleware.

mod process;
mod runtime;

pub use process::{process_collector, ProcessCollector, PROCESS};
pub use runtime::{runtime_collector, RuntimeCollector, RUNTIME};
