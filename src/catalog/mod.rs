//! Movie catalog access: request construction, HTTP calls, and the worker
//! task that bridges them to the UI thread.

pub mod client;
pub mod types;
pub mod worker;
