//! Counter HTTP endpoints.
//!
//! - `/visitor_count` (any method): count a visit, `{"count": n}`
//! - `GET /likes?id=..`: read likes, `{"likes": n}`
//! - `POST /likes?id=..`: add a like, `{"likes": n}`

pub mod counters;
pub mod error;

pub use counters::{likes_get, likes_post, visitor_count};
pub use error::{ApiError, MISSING_ID_MESSAGE};
