// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance enforcement via an `flock`-style exclusive lock file,
//! layered on top of the OS-level process scan in [`crate::player`].

use crate::error::AudioError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

pub struct PlayerLock {
    file: File,
}

impl PlayerLock {
    pub fn try_acquire(path: &Path) -> Result<Self, AudioError> {
        let file = OpenOptions::new().create(true).write(true).open(path)?;
        file.try_lock_exclusive().map_err(|_| AudioError::LockHeld)?;
        Ok(Self { file })
    }
}

impl Drop for PlayerLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
