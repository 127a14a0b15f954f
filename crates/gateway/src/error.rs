// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use duskline_core::ShadeId;
use duskline_scenes::SceneError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("unknown shade_id {0}")]
    UnknownShade(ShadeId),

    #[error("unknown group '{0}'")]
    UnknownGroup(String),

    #[error(transparent)]
    Scene(#[from] SceneError),
}
