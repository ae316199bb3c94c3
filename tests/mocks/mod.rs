//! Test infrastructure
//!
//! - `redis` - Real Redis connection helpers with namespacing and cleanup
