// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn shade(id: u32, group: Option<&str>) -> Shade {
    Shade {
        id: ShadeId(id),
        name: format!("shade-{id}"),
        room: "living".to_string(),
        kind: ShadeType::Privacy,
        group: group.map(str::to_string),
    }
}

#[test]
fn unknown_shade_is_absent() {
    let reg = ShadeRegistry::new(vec![shade(1, None)]);
    assert!(reg.contains(ShadeId(1)));
    assert!(!reg.contains(ShadeId(2)));
    assert!(reg.get(ShadeId(2)).is_none());
}

#[test]
fn group_membership_sorted_by_id() {
    let reg = ShadeRegistry::new(vec![
        shade(3, Some("living")),
        shade(1, Some("living")),
        shade(2, Some("kitchen")),
    ]);
    assert_eq!(reg.in_group("living"), vec![ShadeId(1), ShadeId(3)]);
    assert_eq!(reg.in_group("kitchen"), vec![ShadeId(2)]);
    assert!(reg.in_group("garage").is_empty());
}
