//! Service layer: the poll-diff-notify cycle and the loop that drives it.

pub mod poller;
pub mod scanner;

pub use poller::Poller;
pub use scanner::{ActivityScanner, CycleReport};
