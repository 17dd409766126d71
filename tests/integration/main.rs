//! Integration tests for the outpost CLI
//!
//! These tests run the real binary against isolated home directories and
//! exercise the argument surface plus the failure paths that abort before
//! any provider call.

mod cli_tests;
