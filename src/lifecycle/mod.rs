//! Lifecycle management.
//!
//! Startup order lives in `main` (config → metrics → listener → server);
//! shutdown is coordinated through a broadcast channel all long-running
//! tasks subscribe to.

pub mod shutdown;

pub use shutdown::Shutdown;
