//! The orrery viewer: window, event routing and startup.

pub mod error;
pub mod window;
