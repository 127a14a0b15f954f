// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP daemon process: wires every component crate together behind an
//! axum router.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod http;
pub mod lifecycle;
pub mod logging;
pub mod state;

pub use lifecycle::{LifecycleError, LockGuard};
pub use state::ConcreteState;
