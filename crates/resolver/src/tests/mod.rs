//! Cross-module tests for the resolution flow.

mod default_stack;
pub(crate) mod support;
