// Copyright 2026 The PMO Lifecycle Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Snapshot-based undo/redo with a debounced commit.
//!
//! A mutation doesn't become an undo step immediately. It is parked as the
//! pending snapshot and committed once `debounce` has passed without
//! another mutation; a newer mutation replaces the pending snapshot and
//! restarts the wait. Bursts of edits (dragging, typing) therefore collapse
//! into a single step.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub struct History<T> {
    past: VecDeque<T>,
    future: Vec<T>,
    committed: T,
    pending: Option<(T, Instant)>,
    limit: usize,
    debounce: Duration,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T, limit: usize, debounce: Duration) -> Self {
        History {
            past: VecDeque::new(),
            future: Vec::new(),
            committed: initial,
            pending: None,
            limit: limit.max(1),
            debounce,
        }
    }

    /// Schedules `state` to be committed once the debounce window passes.
    pub fn record(&mut self, state: T, now: Instant) {
        self.pending = Some((state, now));
    }

    /// Commits the pending snapshot if its window has elapsed. Returns
    /// whether a commit happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some((_, at)) if now.saturating_duration_since(*at) >= self.debounce => {
                self.flush();
                true
            }
            _ => false,
        }
    }

    /// Commits the pending snapshot regardless of the window.
    pub fn flush(&mut self) {
        if let Some((state, _)) = self.pending.take() {
            let previous = std::mem::replace(&mut self.committed, state);
            self.past.push_back(previous);
            if self.past.len() > self.limit {
                self.past.pop_front();
            }
            self.future.clear();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.pending.is_some() || !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.pending.is_none() && !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len() + usize::from(self.pending.is_some())
    }

    /// Steps back one snapshot and returns the state to restore.
    pub fn undo(&mut self) -> Option<T> {
        self.flush();
        let previous = self.past.pop_back()?;
        let current = std::mem::replace(&mut self.committed, previous);
        self.future.push(current);
        Some(self.committed.clone())
    }

    pub fn redo(&mut self) -> Option<T> {
        self.flush();
        let next = self.future.pop()?;
        let current = std::mem::replace(&mut self.committed, next);
        self.past.push_back(current);
        Some(self.committed.clone())
    }

    /// Drops all history and starts over from `state`.
    pub fn reset(&mut self, state: T) {
        self.past.clear();
        self.future.clear();
        self.pending = None;
        self.committed = state;
    }
}
