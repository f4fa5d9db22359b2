//! Logging initialization for the composition root.
//!
//! `main` calls this once, before constructing anything else, mirroring
//! the corpus convention of a single logging-init call at process start.

pub fn init() {
    shared::logging::init_logger();
}
