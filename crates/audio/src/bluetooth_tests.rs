// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_connected_sink_ready() {
    let info = "Device AA:BB:CC:DD:EE:FF\n\tConnected: yes\n\tUUID: Audio Sink (...)\n";
    let status = parse_status(info);
    assert!(status.connected);
    assert!(status.sink_ready);
}

#[test]
fn parses_disconnected() {
    let info = "Device AA:BB:CC:DD:EE:FF\n\tConnected: no\n";
    let status = parse_status(info);
    assert!(!status.connected);
    assert!(!status.sink_ready);
}

#[test]
fn connected_without_audio_sink_uuid_is_not_sink_ready() {
    let info = "Device AA:BB:CC:DD:EE:FF\n\tConnected: yes\n";
    let status = parse_status(info);
    assert!(status.connected);
    assert!(!status.sink_ready);
}
