//! Unit tests for the conversation module.
//!
//! Tests are organised by layer: membership and ordering rules on the
//! aggregate, then store orchestration over in-memory adapters.
