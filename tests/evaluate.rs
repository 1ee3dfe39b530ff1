//! Evaluation Integration Tests
//!
//! Tests for the public API through `methadone_tdm::prelude`

#[path = "evaluate/test_json.rs"]
mod test_json;

#[path = "evaluate/test_properties.rs"]
mod test_properties;

#[path = "evaluate/test_batch.rs"]
mod test_batch;
