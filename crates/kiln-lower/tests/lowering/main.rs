//! End-to-end tests for the throwable lowering
//!
//! These tests build IR for small programs, lower it, and run the result in
//! the reference evaluator with native runtime intrinsics.

mod harness;

mod properties;
