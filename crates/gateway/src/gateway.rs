// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command-facing surface: validate, resolve scenes and groups against
//! the registries, and hand individual shade moves to the retry engine.

use crate::error::GatewayError;
use crate::frame_sender::FrameSender;
use crate::retry::{CommandTarget, RetryEngine};
use duskline_core::{Clock, RetryMetrics, RetryTaskSnapshot, ShadeAction, ShadeId, ShadeRegistry, TaskId};
use duskline_scenes::SceneRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Default attempt budget for a single ad hoc shade command (no scene-level
/// override in play).
const DEFAULT_ATTEMPTS: u32 = 3;

pub struct ShadeCommandGateway<S: FrameSender, C: Clock> {
    shades: Arc<ShadeRegistry>,
    scenes: Arc<SceneRegistry>,
    retry: Arc<RetryEngine<S, C>>,
}

impl<S: FrameSender, C: Clock> ShadeCommandGateway<S, C> {
    pub fn new(shades: Arc<ShadeRegistry>, scenes: Arc<SceneRegistry>, retry: Arc<RetryEngine<S, C>>) -> Self {
        Self { shades, scenes, retry }
    }

    /// Issue a single shade command. Supersedes any live task for the same
    /// shade.
    pub async fn command(&self, shade_id: ShadeId, action: ShadeAction) -> Result<TaskId, GatewayError> {
        if !self.shades.contains(shade_id) {
            return Err(GatewayError::UnknownShade(shade_id));
        }
        let task_id = self
            .retry
            .submit(shade_id, action, CommandTarget::Single, DEFAULT_ATTEMPTS)
            .await;
        info!(%shade_id, %action, %task_id, "shade command accepted");
        Ok(task_id)
    }

    /// Issue the same action to every shade in `group` as one firmware-side
    /// group move, tracked as one retry task per member shade.
    pub async fn command_group(&self, group: &str, action: ShadeAction) -> Result<Vec<TaskId>, GatewayError> {
        let members = self.shades.in_group(group);
        if members.is_empty() {
            return Err(GatewayError::UnknownGroup(group.to_string()));
        }
        let mut task_ids = Vec::with_capacity(members.len());
        for shade_id in members {
            let task_id = self
                .retry
                .submit(shade_id, action, CommandTarget::Group(group.to_string()), DEFAULT_ATTEMPTS)
                .await;
            task_ids.push(task_id);
        }
        info!(group, %action, count = task_ids.len(), "group command accepted");
        Ok(task_ids)
    }

    /// Run a scene: each step's shade command is submitted in order, waiting
    /// `delay_ms_before` (measured from the prior step's acceptance) before
    /// submitting the next. The scene's own `retry_count` governs every
    /// step's retry task. A background watchdog cancels any of this scene's
    /// shades still live once `timeout_seconds` has elapsed since the call's
    /// entry; if accepting every step already consumed the whole budget
    /// (large enough `delay_ms_before`s), the watchdog fires immediately
    /// after the last step is submitted rather than waiting a further full
    /// `timeout_seconds`.
    pub async fn execute_scene(&self, name: &str) -> Result<Vec<TaskId>, GatewayError> {
        let scene = self.scenes.get(name)?;
        let attempts = u32::from(scene.retry_count) + 1;
        let deadline = Duration::from_secs(scene.timeout_seconds);
        let started = tokio::time::Instant::now();

        let mut task_ids = Vec::with_capacity(scene.steps.len());
        let mut shade_ids = Vec::with_capacity(scene.steps.len());
        for step in &scene.steps {
            if step.delay_ms_before > 0 {
                tokio::time::sleep(Duration::from_millis(step.delay_ms_before)).await;
            }
            let task_id = self
                .retry
                .submit(step.shade_id, step.action, CommandTarget::Single, attempts)
                .await;
            task_ids.push(task_id);
            shade_ids.push(step.shade_id);
        }

        let remaining = deadline.saturating_sub(started.elapsed());
        let retry = self.retry.clone();
        let scene_name = name.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            let mut cancelled = 0usize;
            for shade_id in shade_ids {
                if retry.cancel(shade_id).await {
                    cancelled += 1;
                }
            }
            if cancelled > 0 {
                tracing::warn!(scene = scene_name, cancelled, "scene timed out, cancelled its remaining tasks");
            }
        });

        info!(scene = name, steps = task_ids.len(), "scene executed");
        Ok(task_ids)
    }

    pub async fn cancel_all(&self) -> usize {
        self.retry.cancel_all().await
    }

    pub async fn cancel(&self, shade_id: ShadeId) -> bool {
        self.retry.cancel(shade_id).await
    }

    pub fn list_active(&self) -> (Vec<RetryTaskSnapshot>, RetryMetrics) {
        self.retry.snapshot()
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
