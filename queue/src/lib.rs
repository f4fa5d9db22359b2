pub mod priority_queue;
pub mod rate_limiter;
pub mod shed;

pub use priority_queue::PriorityQueue;
pub use rate_limiter::TokenBucket;
pub use shed::{ShedBand, ShedPolicy};
