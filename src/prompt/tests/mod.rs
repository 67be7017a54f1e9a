//! Prompt subsystem tests
//!
//! These live next to the prompt module because they exercise `pub(crate)` render
//! helpers alongside the public editor and session types. Public-API behavior of the
//! binary (CLI parsing, config files) is covered by the top-level `tests/` directory.
