//! glazewm-autotile daemon library
//!
//! Shared by the `autotiled` binary and the `autotile` CLI, which reuses the
//! event decoding to explain decisions offline.

pub mod glazewm_ipc;
pub mod logging;
