//! Durable key-value backend abstractions and implementations.
//!
//! # Responsibility
//! - Define the narrow persistence contract the store writes through.
//! - Isolate SQLite details from store/business orchestration.
//!
//! # Invariants
//! - Backends treat values as opaque strings; JSON encoding is owned by the
//!   store layer.
//! - Backend errors are transport errors; deciding whether to surface or
//!   swallow them is the caller's concern.

pub mod kv_backend;
