//! Tests for engine service implementations
//!
//! These exercise the concrete adapters against local stand-ins: a temp
//! directory, an HTTP mock server and the loopback broker itself.
