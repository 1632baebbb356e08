//! Cancellable delayed tasks.
//!
//! The engine never touches a platform timer directly. It asks a [`Scheduler`]
//! for a [`ScheduledTask`] and cancels it when newer input supersedes it.

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a task that has not run yet.
pub struct ScheduledTask {
    id: u64,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduledTask {
    pub fn new(id: u64, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Prevent the task from running if it has not started yet.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledTask").field("id", &self.id).finish()
    }
}

/// Runs a task once after a delay.
///
/// Implementations must not run the task inline from `schedule`; callers may
/// hold locks the task needs.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask;
}

// ---------------------------------------------------------------------------
// Tokio
// ---------------------------------------------------------------------------

/// Spawns a sleeping tokio task per schedule; cancel aborts it.
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
    next_id: AtomicU64,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            next_id: AtomicU64::new(1),
        }
    }

    /// Bind to the runtime of the calling context.
    pub fn current() -> Result<Self> {
        Ok(Self::new(tokio::runtime::Handle::try_current()?))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        ScheduledTask::new(id, move || join.abort())
    }
}

// ---------------------------------------------------------------------------
// Manual
// ---------------------------------------------------------------------------

struct QueuedTask {
    id: u64,
    due: Duration,
    task: Task,
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    next_id: u64,
    tasks: Vec<QueuedTask>,
}

/// A virtual clock. Tasks run only when the owner calls [`ManualScheduler::advance`]
/// or [`ManualScheduler::fire_all`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.lock().tasks.len()
    }

    /// Move the clock forward and run every task that came due, earliest first.
    /// Returns how many ran.
    pub fn advance(&self, by: Duration) -> usize {
        let due = {
            let mut queue = self.lock();
            queue.now += by;
            let now = queue.now;
            let (mut due, waiting): (Vec<_>, Vec<_>) =
                queue.tasks.drain(..).partition(|t| t.due <= now);
            queue.tasks = waiting;
            due.sort_by_key(|t| (t.due, t.id));
            due
        };
        let fired = due.len();
        for queued in due {
            (queued.task)();
        }
        fired
    }

    /// Run everything queued regardless of due time.
    pub fn fire_all(&self) -> usize {
        let latest = {
            let queue = self.lock();
            queue
                .tasks
                .iter()
                .map(|t| t.due.saturating_sub(queue.now))
                .max()
                .unwrap_or_default()
        };
        self.advance(latest)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualQueue> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        let id = {
            let mut queue = self.lock();
            queue.next_id += 1;
            let id = queue.next_id;
            let due = queue.now + delay;
            queue.tasks.push(QueuedTask { id, due, task });
            id
        };
        let queue = Arc::downgrade(&self.queue);
        ScheduledTask::new(id, move || {
            if let Some(queue) = queue.upgrade() {
                let mut queue = queue.lock().unwrap_or_else(|e| e.into_inner());
                queue.tasks.retain(|t| t.id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_task(counter: &Arc<AtomicUsize>) -> Task {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_manual_runs_only_when_due() {
        let s = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let _t = s.schedule(Duration::from_millis(100), counter_task(&hits));
        assert_eq!(s.advance(Duration::from_millis(99)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(s.advance(Duration::from_millis(1)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_manual_cancel_removes_task() {
        let s = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let t = s.schedule(Duration::from_millis(10), counter_task(&hits));
        t.cancel();
        assert_eq!(s.pending(), 0);
        assert_eq!(s.fire_all(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_manual_fire_all_runs_in_due_order() {
        let s = ManualScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for (delay, tag) in [(30, "c"), (10, "a"), (20, "b")] {
            let order = Arc::clone(&order);
            let _ = s.schedule(
                Duration::from_millis(delay),
                Box::new(move || order.lock().unwrap().push(tag)),
            );
        }
        assert_eq!(s.fire_all(), 3);
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_manual_task_may_reschedule() {
        let s = ManualScheduler::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = s.clone();
        let inner_hits = Arc::clone(&hits);
        let _ = s.schedule(
            Duration::from_millis(5),
            Box::new(move || {
                let _ = inner.schedule(Duration::from_millis(5), counter_task(&inner_hits));
            }),
        );
        assert_eq!(s.advance(Duration::from_millis(5)), 1);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.advance(Duration::from_millis(5)), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_fires_after_delay() {
        let s = TokioScheduler::current().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let _t = s.schedule(Duration::from_millis(100), counter_task(&hits));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_cancel() {
        let s = TokioScheduler::current().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let t = s.schedule(Duration::from_millis(100), counter_task(&hits));
        t.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_tokio_scheduler_outside_runtime() {
        assert!(TokioScheduler::current().is_err());
    }
}
