//! End-to-end tests over the public API.

mod pipeline;
mod settlement;
