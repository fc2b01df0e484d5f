//! Cancellable timers over host-supplied virtual time.
//!
//! Replaces interval/timeout callbacks with plain data: the engine schedules a
//! [`Task`] and later drains due entries with [`TimerQueue::pop_due`]. Each
//! timer remembers the run epoch it was created in so stale firings can be
//! rejected after a restart.

pub type TimerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    ClockTick,
    SpawnTick,
    /// Auto-expiry of the target shown in `slot`.
    Expire { slot: usize },
    /// Removal of a struck target after the hit feedback delay.
    ClearHit { slot: usize },
    FreezeEnd,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Timer {
    id: TimerId,
    seq: u64,
    due_ms: f64,
    period_ms: Option<f64>,
    epoch: u64,
    task: Task,
}

/// A timer that came due.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fired {
    pub id: TimerId,
    pub due_ms: f64,
    pub epoch: u64,
    pub task: Task,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: Vec<Timer>,
    // (timer, remaining delay) while paused
    suspended: Vec<(Timer, f64)>,
    next_id: TimerId,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot timer firing `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, epoch: u64, task: Task) -> TimerId {
        self.insert(now_ms + delay_ms, None, epoch, task)
    }

    /// Periodic timer; first fires one full period after `now_ms`.
    pub fn schedule_every(
        &mut self,
        now_ms: f64,
        period_ms: f64,
        epoch: u64,
        task: Task,
    ) -> TimerId {
        self.insert(now_ms + period_ms, Some(period_ms), epoch, task)
    }

    fn insert(&mut self, due_ms: f64, period_ms: Option<f64>, epoch: u64, task: Task) -> TimerId {
        self.next_id += 1;
        let id = self.next_id;
        let seq = self.bump_seq();
        self.pending.push(Timer {
            id,
            seq,
            due_ms,
            period_ms,
            epoch,
            task,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Cancel a pending or suspended timer. Returns false if it already fired.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len() + self.suspended.len();
        self.pending.retain(|t| t.id != id);
        self.suspended.retain(|(t, _)| t.id != id);
        before != self.pending.len() + self.suspended.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.suspended.clear();
    }

    /// Park every pending timer, remembering how long it still had to run.
    pub fn suspend(&mut self, now_ms: f64) {
        for timer in self.pending.drain(..) {
            let remaining = (timer.due_ms - now_ms).max(0.0);
            self.suspended.push((timer, remaining));
        }
    }

    /// Re-arm suspended timers relative to `now_ms`, preserving their order.
    pub fn resume(&mut self, now_ms: f64) {
        let mut parked = std::mem::take(&mut self.suspended);
        parked.sort_by(|(a, ra), (b, rb)| ra.total_cmp(rb).then(a.seq.cmp(&b.seq)));
        for (mut timer, remaining) in parked {
            timer.due_ms = now_ms + remaining;
            timer.seq = self.bump_seq();
            self.pending.push(timer);
        }
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    /// Periodic timers are re-armed one period later under the same id.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<Fired> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        let timer = self.pending.swap_remove(idx);
        if let Some(period) = timer.period_ms {
            let seq = self.bump_seq();
            self.pending.push(Timer {
                seq,
                due_ms: timer.due_ms + period,
                ..timer
            });
        }
        Some(Fired {
            id: timer.id,
            due_ms: timer.due_ms,
            epoch: timer.epoch,
            task: timer.task,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.suspended.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
