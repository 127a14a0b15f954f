// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The byte-level peer abstraction. Real ports talk to the Arduino over
//! `tokio_serial`; tests inject a `FakeLink` via [`PortFactory`] — the only
//! supported substitution point.

use crate::error::SerialError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[async_trait]
pub trait SerialLink: Send {
    async fn write_line(&mut self, line: &str) -> Result<(), SerialError>;
    async fn read_ack(&mut self, timeout: Duration) -> Result<Vec<u8>, SerialError>;
}

pub trait PortFactory: Send + Sync {
    fn open(&self, path: &str) -> Result<Box<dyn SerialLink>, SerialError>;
}

/// Opens a real `tokio_serial` port at 9600 baud, 8N1 — the common default
/// for Arduino-class RF transmitters.
pub struct TokioSerialPortFactory {
    pub baud_rate: u32,
}

impl Default for TokioSerialPortFactory {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

impl PortFactory for TokioSerialPortFactory {
    fn open(&self, path: &str) -> Result<Box<dyn SerialLink>, SerialError> {
        let port = tokio_serial::new(path, self.baud_rate)
            .open_native_async()
            .map_err(|e| SerialError::Io(std::io::Error::other(e)))?;
        Ok(Box::new(RealLink { port }))
    }
}

struct RealLink {
    port: tokio_serial::SerialStream,
}

#[async_trait]
impl SerialLink for RealLink {
    async fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
        let mut buf = line.as_bytes().to_vec();
        buf.push(b'\n');
        self.port.write_all(&buf).await?;
        Ok(())
    }

    async fn read_ack(&mut self, timeout: Duration) -> Result<Vec<u8>, SerialError> {
        let mut buf = [0u8; 64];
        let n = tokio::time::timeout(timeout, self.port.read(&mut buf))
            .await
            .map_err(|_| SerialError::Timeout(timeout))??;
        Ok(buf[..n].to_vec())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// What a [`FakeLink`] does on the next `read_ack`.
    #[derive(Clone)]
    pub enum FakeBehavior {
        Ack(Vec<u8>),
        Error,
        /// Never resolves within the caller's timeout — used to exercise
        /// per-attempt and task-level timeout paths.
        HangForever,
    }

    pub struct FakeLink {
        pub behavior: Arc<Mutex<FakeBehavior>>,
        pub writes: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SerialLink for FakeLink {
        async fn write_line(&mut self, line: &str) -> Result<(), SerialError> {
            self.writes.lock().await.push(line.to_string());
            Ok(())
        }

        async fn read_ack(&mut self, timeout: Duration) -> Result<Vec<u8>, SerialError> {
            let behavior = self.behavior.lock().await.clone();
            match behavior {
                FakeBehavior::Ack(bytes) => Ok(bytes),
                FakeBehavior::Error => Err(SerialError::Io(std::io::Error::other("fake nak"))),
                FakeBehavior::HangForever => {
                    tokio::time::sleep(timeout + Duration::from_secs(3600)).await;
                    Ok(vec![])
                }
            }
        }
    }

    pub struct FakePortFactory {
        pub behavior: Arc<Mutex<FakeBehavior>>,
        pub writes: Arc<Mutex<Vec<String>>>,
        pub fail_open: bool,
    }

    impl FakePortFactory {
        pub fn new(behavior: FakeBehavior) -> Self {
            Self { behavior: Arc::new(Mutex::new(behavior)), writes: Arc::new(Mutex::new(Vec::new())), fail_open: false }
        }

        pub fn set_behavior(&self, behavior: FakeBehavior) {
            // Best-effort synchronous set via try_lock; tests run single-threaded
            // per-task so this never actually contends.
            if let Ok(mut guard) = self.behavior.try_lock() {
                *guard = behavior;
            }
        }
    }

    impl PortFactory for FakePortFactory {
        fn open(&self, _path: &str) -> Result<Box<dyn SerialLink>, SerialError> {
            if self.fail_open {
                return Err(SerialError::Io(std::io::Error::other("fake open failure")));
            }
            Ok(Box::new(FakeLink { behavior: self.behavior.clone(), writes: self.writes.clone() }))
        }
    }
}
