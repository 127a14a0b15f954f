// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The serial transport: owns the single USB-serial device, serializes
//! byte-level commands, and exposes a framed request/response channel.
//! Shade-specific wire encoding lives in [`frame`]; the transport itself
//! treats frames as opaque bytes.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error;
pub mod frame;
pub mod link;
pub mod transport;

pub use error::SerialError;
pub use link::{PortFactory, SerialLink, TokioSerialPortFactory};
pub use transport::{SerialTransport, TransportStatus};
