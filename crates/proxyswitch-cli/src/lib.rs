//! Command-line entry points for proxyswitch.
//!
//! Three binaries share this library:
//! - `generate-env` writes a `.env` file with fresh proxy keys
//! - `proxy-enable <master_key>` routes the tool through the local proxy
//! - `proxy-disable` removes the proxy routing again

pub mod commands;
pub mod display;
pub mod logging;
