// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The narrow seam between a retry task and the serial transport: encode one
//! wire frame, send it, wait for the ack. Kept as its own trait so retry
//! tests can inject failures without a real transport.

use async_trait::async_trait;
use duskline_core::{ShadeAction, ShadeId};
use duskline_serial::{frame, SerialError, SerialTransport};
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait FrameSender: Send + Sync + 'static {
    async fn send_single(
        &self,
        shade_id: ShadeId,
        action: ShadeAction,
        timeout: Duration,
    ) -> Result<(), SerialError>;

    async fn send_group(
        &self,
        group: &str,
        action: ShadeAction,
        timeout: Duration,
    ) -> Result<(), SerialError>;
}

pub struct SerialFrameSender {
    transport: Arc<SerialTransport>,
}

impl SerialFrameSender {
    pub fn new(transport: Arc<SerialTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl FrameSender for SerialFrameSender {
    async fn send_single(
        &self,
        shade_id: ShadeId,
        action: ShadeAction,
        timeout: Duration,
    ) -> Result<(), SerialError> {
        let line = frame::single(shade_id, action);
        self.transport.send_frame(&line, timeout).await?;
        Ok(())
    }

    async fn send_group(
        &self,
        group: &str,
        action: ShadeAction,
        timeout: Duration,
    ) -> Result<(), SerialError> {
        let line = frame::group(group, action);
        self.transport.send_frame(&line, timeout).await?;
        Ok(())
    }
}
