// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Periodic diagnostic reports.
//!
//! Each [`DebugModule`] owns one [`DebugTask`]. Tasks start disabled and are switched on over the
//! serial line; an enabled task fires once per interval and the caller writes the matching
//! [`Report`].

use core::fmt;

use crate::error::Error;

/// Default interval between two reports of the same module.
pub const DEFAULT_INTERVAL_MS: u32 = 1000;

/// Human-readable state dump for the debug console.
///
/// Implementations write CRLF-terminated lines and never modify the reported value.
pub trait Report {
    fn report<W: fmt::Write>(&self, w: &mut W) -> fmt::Result;
}

/// Something that can be reported on periodically.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DebugModule {
    AzPosition,
    AlPosition,
    AzSpeed,
    AlSpeed,
}

impl DebugModule {
    /// All modules, in wire index order.
    pub const ALL: [DebugModule; 4] = [
        DebugModule::AzPosition,
        DebugModule::AlPosition,
        DebugModule::AzSpeed,
        DebugModule::AlSpeed,
    ];

    pub fn from_index(index: u8) -> Result<Self, Error> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(Error::UnknownDebugModule(index))
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Interval timer for a single module.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DebugTask {
    pub enabled: bool,
    pub interval_ms: u32,
    pub elapsed_ms: u32,
}

impl DebugTask {
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            enabled: false,
            interval_ms,
            elapsed_ms: 0,
        }
    }

    /// Advance by `elapsed_ms`. Returns true when the task is due.
    fn advance(&mut self, elapsed_ms: u32) -> bool {
        if !self.enabled {
            return false;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < self.interval_ms {
            return false;
        }

        // Fire at most once per call, however far behind we are
        self.elapsed_ms = 0;
        true
    }
}

pub struct DebugTasks {
    tasks: [DebugTask; 4],
}

impl Default for DebugTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugTasks {
    pub const fn new() -> Self {
        Self {
            tasks: [DebugTask::new(DEFAULT_INTERVAL_MS); 4],
        }
    }

    /// Use `interval_ms` for every module.
    pub fn with_interval(mut self, interval_ms: u32) -> Self {
        for task in self.tasks.iter_mut() {
            task.interval_ms = interval_ms;
        }
        self
    }

    /// Enable or disable a module. Re-enabling restarts its interval.
    pub fn set(&mut self, module: DebugModule, on: bool) {
        let task = &mut self.tasks[module.index()];
        task.enabled = on;
        task.elapsed_ms = 0;
    }

    pub fn is_enabled(&self, module: DebugModule) -> bool {
        self.tasks[module.index()].enabled
    }

    pub fn task(&self, module: DebugModule) -> &DebugTask {
        &self.tasks[module.index()]
    }

    /// Advance every task by `elapsed_ms` and call `f` for each one that is due, in module order.
    pub fn tick<F: FnMut(DebugModule)>(&mut self, elapsed_ms: u32, mut f: F) {
        for (task, &module) in self.tasks.iter_mut().zip(DebugModule::ALL.iter()) {
            if task.advance(elapsed_ms) {
                f(module);
            }
        }
    }
}
