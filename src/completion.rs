// src/completion.rs

use crate::constants;
use chrono::{DateTime, Duration, Utc};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    Complete,
    Incomplete,
}

/// 根据最后一次活动时间推断课程是否已经完结。
///
/// 超过 30 天没有任何文件更新的课程视为已完结；从未观察到活动
/// (`None`) 或时间戳早于纪元时，一律视为未完结。
pub fn estimate(now: DateTime<Utc>, last_activity: Option<DateTime<Utc>>) -> CompletionState {
    match last_activity {
        Some(ts) if ts.timestamp() >= 0
            && now - ts > Duration::days(constants::COMPLETION_IDLE_DAYS) =>
        {
            CompletionState::Complete
        }
        _ => CompletionState::Incomplete,
    }
}

/// 记录一次运行中观察到的最晚活动时间 (取最大值，与观察顺序无关)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityTracker {
    latest: Option<DateTime<Utc>>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, ts: DateTime<Utc>) {
        self.latest = Some(self.latest.map_or(ts, |cur| cur.max(ts)));
    }

    pub fn observe_system_time(&mut self, ts: SystemTime) {
        self.observe(DateTime::<Utc>::from(ts));
    }

    pub fn merge(&mut self, other: ActivityTracker) {
        if let Some(ts) = other.latest {
            self.observe(ts);
        }
    }

    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.latest
    }
}
