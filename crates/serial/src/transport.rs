// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single serial-port resource. Exactly one in-flight frame at a time,
//! enforced by holding `inner` across the write+read.

use crate::error::SerialError;
use crate::link::{PortFactory, SerialLink};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct TransportStatus {
    pub connected: bool,
    pub port: Option<String>,
    pub last_ok_at: Option<DateTime<Utc>>,
}

struct Connection {
    link: Box<dyn SerialLink>,
    port: String,
}

pub struct SerialTransport {
    allow_list: Vec<String>,
    factory: Arc<dyn PortFactory>,
    conn: Mutex<Option<Connection>>,
    last_ok_at: Mutex<Option<DateTime<Utc>>>,
}

impl SerialTransport {
    pub fn new(allow_list: Vec<String>, factory: Arc<dyn PortFactory>) -> Self {
        Self { allow_list, factory, conn: Mutex::new(None), last_ok_at: Mutex::new(None) }
    }

    /// Current connection status (read-only, does not attempt to reconnect).
    pub async fn status(&self) -> TransportStatus {
        let conn = self.conn.lock().await;
        TransportStatus {
            connected: conn.is_some(),
            port: conn.as_ref().map(|c| c.port.clone()),
            last_ok_at: *self.last_ok_at.lock().await,
        }
    }

    /// Scan the allow-list and open the first port that succeeds.
    pub async fn reconnect(&self) -> Result<TransportStatus, SerialError> {
        let mut conn = self.conn.lock().await;
        *conn = None;
        for path in &self.allow_list {
            match self.factory.open(path) {
                Ok(link) => {
                    info!(port = %path, "serial port connected");
                    *conn = Some(Connection { link, port: path.clone() });
                    return Ok(TransportStatus {
                        connected: true,
                        port: Some(path.clone()),
                        last_ok_at: *self.last_ok_at.lock().await,
                    });
                }
                Err(e) => {
                    warn!(port = %path, error = %e, "failed to open candidate serial port");
                }
            }
        }
        Err(SerialError::NoPortAvailable(self.allow_list.join(",")))
    }

    /// Send one opaque frame and wait for an acknowledgement within
    /// `timeout` (the gateway layer uses a 10s attempt timeout).
    ///
    /// On I/O error the connection is dropped; the *next* caller triggers
    /// reconnection — there is no continuous background reconnect loop.
    pub async fn send_frame(&self, frame: &str, timeout: Duration) -> Result<Vec<u8>, SerialError> {
        {
            let conn = self.conn.lock().await;
            if conn.is_none() {
                drop(conn);
                self.reconnect().await?;
            }
        }

        let mut conn_guard = self.conn.lock().await;
        let Some(conn) = conn_guard.as_mut() else {
            return Err(SerialError::NotConnected);
        };

        let result = async {
            conn.link.write_line(frame).await?;
            conn.link.read_ack(timeout).await
        }
        .await;

        match result {
            Ok(ack) => {
                *self.last_ok_at.lock().await = Some(Utc::now());
                Ok(ack)
            }
            Err(e) => {
                warn!(frame = %frame, error = %e, "serial frame failed, marking disconnected");
                *conn_guard = None;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
