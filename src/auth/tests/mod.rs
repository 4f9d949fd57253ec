//! Unit and service tests for one-time-code authentication.
