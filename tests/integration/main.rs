//! End-to-end integration tests
//!
//! Drives the whole stack the way an embedding game server would: a load
//! phase registering game types, converters, and syntaxes, then a frozen
//! engine parsing script lines from many threads.
