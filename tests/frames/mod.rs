//! Frame-layer integration tests: wire layouts, flag legality, and
//! malformed-input handling across the public API.

mod error_handling;
mod frame_building;
mod frame_parsing;
