// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn is_running_false_for_unlikely_process_name() {
    let player = FifoPlayerProcess::new("duskline-test-player-that-does-not-exist", "/dev/null");
    assert!(!player.is_running());
}

#[tokio::test]
async fn launch_writes_start_command_to_fifo_path() {
    let dir = tempfile::tempdir().unwrap();
    let fifo = dir.path().join("control");
    std::fs::write(&fifo, "").unwrap();
    let player = FifoPlayerProcess::new("nonexistent", &fifo);
    player.launch().await.unwrap();
    let contents = std::fs::read_to_string(&fifo).unwrap();
    assert_eq!(contents.trim(), "start");
}

#[tokio::test]
async fn stop_writes_stop_command_and_returns_within_bound() {
    let dir = tempfile::tempdir().unwrap();
    let fifo = dir.path().join("control");
    std::fs::write(&fifo, "").unwrap();
    let player = FifoPlayerProcess::new("nonexistent", &fifo);
    player.stop().await.unwrap();
    let contents = std::fs::read_to_string(&fifo).unwrap();
    assert_eq!(contents.trim(), "stop");
}
