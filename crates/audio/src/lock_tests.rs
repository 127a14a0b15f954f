// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn second_acquire_fails_while_first_is_held() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("player.lock");
    let first = PlayerLock::try_acquire(&path).unwrap();
    let second = PlayerLock::try_acquire(&path);
    assert!(second.is_err());
    drop(first);
    assert!(PlayerLock::try_acquire(&path).is_ok());
}
