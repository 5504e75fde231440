//! Integration tests for token-detector

mod detection_tests;
mod handler_tests;
mod store_tests;
