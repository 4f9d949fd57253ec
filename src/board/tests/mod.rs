//! Unit and service tests for the board module.

mod support;
