/// Middleware module
///
/// Custom middleware for metrics. Request logging lives in `crate::logger`.

mod hit_counter;

pub use hit_counter::{FileserverHits, HitCounter};
