// Cache module for short-lived response memoization.
// Keeps decoded API responses in memory, keyed by request identity, until their TTL elapses.

pub mod clock;
pub mod key;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::CacheKey;
pub use store::ResponseCache;
