//! # Courier Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-crate flows over localhost TCP
//!     ├── support.rs    # Spawns each role on an ephemeral port
//!     ├── readiness.rs  # Registration gate and lookups
//!     ├── direct.rs     # Publishers straight to subscribers
//!     └── broker.rs     # Publishers through the broker
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p courier-tests
//! cargo test -p courier-tests integration::broker
//!
//! # Benchmarks
//! cargo bench -p courier-tests
//! ```

pub mod integration;
