// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shade command gateway and retry engine: the part of the system that
//! turns an accepted command into a live wire conversation with the
//! firmware, with latest-command-wins semantics per shade.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod frame_sender;
mod gateway;
mod retry;

pub use error::GatewayError;
pub use frame_sender::{FrameSender, SerialFrameSender};
pub use gateway::ShadeCommandGateway;
pub use retry::{CommandTarget, RetryEngine};
