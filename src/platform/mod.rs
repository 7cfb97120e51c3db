//! Host platform detection and the closed set of supported platforms.
//!
//! `detection` reports what the host says it is; `key` narrows that down to
//! one of the four `PlatformKey`s a formula can carry an artifact for.

mod detection;
mod key;

pub use detection::{HostPlatformDetector, Platform, PlatformDetector};
#[cfg(test)]
pub use detection::MockPlatformDetector;
pub use key::{Arch, Os, PlatformKey};
