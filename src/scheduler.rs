//! Cooperative idle-time task scheduler.
//!
//! Everything runs on the caller's thread. The host calls
//! [`Scheduler::run_idle_tick`] whenever it is idle; each tick runs at most
//! [`SchedulerOptions::tasks_per_tick`] due tasks in the order they were
//! scheduled. A task that reports [`TaskStatus::Pending`] goes to the back of
//! the queue and is due again on the next tick.
//!
//! There is no cancellation API. A task whose [`Task::is_valid`] turns false
//! is dropped when it next comes up.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

/// Outcome of one [`Task::run`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// More work remains; run again on the next tick.
    Pending,
    Done,
}

/// A unit of deferred work.
pub trait Task {
    fn run(&mut self) -> TaskStatus;

    /// Checked before every run. Invalid tasks are dropped unrun.
    fn is_valid(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "task"
    }
}

/// Handle returned by [`Scheduler::schedule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Upper bound on tasks run per idle tick.
    pub tasks_per_tick: usize,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self { tasks_per_tick: 1 }
    }
}

impl SchedulerOptions {
    /// Set the per-tick budget. Zero is treated as one.
    #[must_use]
    pub fn with_tasks_per_tick(mut self, tasks_per_tick: usize) -> Self {
        self.tasks_per_tick = tasks_per_tick.max(1);
        self
    }
}

struct Entry {
    id: TaskId,
    due_tick: u64,
    task: Box<dyn Task>,
}

/// Single-threaded FIFO queue of deferred tasks.
pub struct Scheduler {
    options: SchedulerOptions,
    queue: VecDeque<Entry>,
    tick: u64,
    next_id: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("options", &self.options)
            .field("pending", &self.queue.len())
            .field("tick", &self.tick)
            .finish()
    }
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(SchedulerOptions::default())
    }

    #[must_use]
    pub fn with_options(options: SchedulerOptions) -> Self {
        Self {
            options,
            queue: VecDeque::new(),
            tick: 0,
            next_id: 0,
        }
    }

    #[must_use]
    pub fn options(&self) -> SchedulerOptions {
        self.options
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Queue `task` to run once `delay_ticks` idle ticks have passed. A delay
    /// of 0 means the next tick.
    pub fn schedule(&mut self, task: Box<dyn Task>, delay_ticks: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        trace!(task = task.name(), %id, delay_ticks, "schedule");
        self.queue.push_back(Entry {
            id,
            due_tick: self.tick + delay_ticks,
            task,
        });
        id
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Run one idle tick. Returns how many tasks ran.
    pub fn run_idle_tick(&mut self) -> usize {
        let now = self.tick;
        let budget = self.options.tasks_per_tick.max(1);

        let mut due = Vec::new();
        let mut index = 0;
        while index < self.queue.len() && due.len() < budget {
            if self.queue[index].due_tick <= now {
                if let Some(entry) = self.queue.remove(index) {
                    if entry.task.is_valid() {
                        due.push(entry);
                    } else {
                        debug!(task = entry.task.name(), id = %entry.id, "dropping stale task");
                    }
                }
            } else {
                index += 1;
            }
        }

        let ran = due.len();
        for mut entry in due {
            match entry.task.run() {
                TaskStatus::Pending => {
                    trace!(task = entry.task.name(), id = %entry.id, "re-arm");
                    entry.due_tick = now;
                    self.queue.push_back(entry);
                }
                TaskStatus::Done => {
                    trace!(task = entry.task.name(), id = %entry.id, "done");
                }
            }
        }
        self.tick += 1;
        ran
    }

    /// Tick until nothing is pending or `max_ticks` ticks have run. Returns
    /// the number of ticks run.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while self.has_pending() && ticks < max_ticks {
            self.run_idle_tick();
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    /// Logs its name each run and finishes after `runs` runs.
    struct Counter {
        name: &'static str,
        runs: usize,
        log: Rc<RefCell<Vec<&'static str>>>,
        valid: Rc<Cell<bool>>,
    }

    impl Task for Counter {
        fn run(&mut self) -> TaskStatus {
            self.log.borrow_mut().push(self.name);
            self.runs -= 1;
            if self.runs == 0 {
                TaskStatus::Done
            } else {
                TaskStatus::Pending
            }
        }

        fn is_valid(&self) -> bool {
            self.valid.get()
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn counter(
        name: &'static str,
        runs: usize,
        log: &Rc<RefCell<Vec<&'static str>>>,
    ) -> Box<Counter> {
        Box::new(Counter {
            name,
            runs,
            log: Rc::clone(log),
            valid: Rc::new(Cell::new(true)),
        })
    }

    #[test]
    fn one_task_per_tick_in_fifo_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.schedule(counter("a", 2, &log), 0);
        scheduler.schedule(counter("b", 1, &log), 0);

        assert_eq!(scheduler.run_idle_tick(), 1);
        assert_eq!(*log.borrow(), ["a"]);
        assert_eq!(scheduler.pending(), 2);

        assert_eq!(scheduler.run_until_idle(10), 2);
        assert_eq!(*log.borrow(), ["a", "b", "a"]);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn delayed_tasks_wait() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.schedule(counter("late", 1, &log), 2);
        assert_eq!(scheduler.run_idle_tick(), 0);
        assert_eq!(scheduler.run_idle_tick(), 0);
        assert_eq!(scheduler.run_idle_tick(), 1);
        assert_eq!(*log.borrow(), ["late"]);
    }

    #[test]
    fn budget_bounds_work_per_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler =
            Scheduler::with_options(SchedulerOptions::default().with_tasks_per_tick(2));
        for name in ["a", "b", "c"] {
            scheduler.schedule(counter(name, 1, &log), 0);
        }
        assert_eq!(scheduler.run_idle_tick(), 2);
        assert_eq!(scheduler.run_idle_tick(), 1);
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
    }

    #[test]
    fn pending_task_runs_once_per_tick() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler =
            Scheduler::with_options(SchedulerOptions::default().with_tasks_per_tick(4));
        scheduler.schedule(counter("loop", 3, &log), 0);
        assert_eq!(scheduler.run_idle_tick(), 1);
        assert_eq!(scheduler.run_until_idle(10), 2);
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn stale_tasks_are_dropped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        let task = counter("stale", 5, &log);
        let valid = Rc::clone(&task.valid);
        scheduler.schedule(task, 0);
        scheduler.run_idle_tick();
        valid.set(false);
        assert_eq!(scheduler.run_idle_tick(), 0);
        assert!(!scheduler.has_pending());
        assert_eq!(*log.borrow(), ["stale"]);
    }

    #[test]
    fn task_ids_are_distinct() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(counter("a", 1, &log), 0);
        let b = scheduler.schedule(counter("b", 1, &log), 0);
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "#0");
    }
}
