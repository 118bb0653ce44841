//! Session-scoped task arena
//!
//! Every timer, frame loop, and listener started on behalf of a modal
//! session is registered here with its owning [`SessionId`]. Tearing a
//! session down is a single [`TaskArena::release`] call; nothing can outlive
//! it by accident.
//!
//! The arena does not run anything itself. The owner drains due timers and
//! frame-loop actions each frame and must still check that the returned
//! session is the live one before acting.
//!
//! Timer delays are measured from the first frame that sees the timer, so a
//! timer scheduled between frames never fires early because the last frame
//! timestamp is stale.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a registered task
    pub struct TaskId;
}

/// Identity of one modal session
///
/// Ids are never reused, so a callback carrying a stale id can always be
/// told apart from the live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(u64);

impl SessionId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// The id following this one
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Notification sources a session can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    Scroll,
    ImageLoad,
    Mutation,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 4] = [
        ListenerKind::Resize,
        ListenerKind::Scroll,
        ListenerKind::ImageLoad,
        ListenerKind::Mutation,
    ];
}

enum TaskKind<A> {
    /// One-shot; armed at the next drain, fires once `due_ms` is reached
    Timer {
        delay_ms: u64,
        due_ms: Option<u64>,
        action: A,
    },
    /// Recurring, fires every frame until released
    FrameLoop { action: A },
    Listener(ListenerKind),
}

struct Task<A> {
    owner: SessionId,
    kind: TaskKind<A>,
}

/// Arena of session-owned timers, frame loops, and listeners
pub struct TaskArena<A> {
    tasks: SlotMap<TaskId, Task<A>>,
}

impl<A: Clone> TaskArena<A> {
    pub fn new() -> Self {
        Self {
            tasks: SlotMap::with_key(),
        }
    }

    /// Schedule a one-shot timer firing `delay_ms` after the next drain
    pub fn schedule_timer(&mut self, owner: SessionId, delay_ms: u64, action: A) -> TaskId {
        self.tasks.insert(Task {
            owner,
            kind: TaskKind::Timer {
                delay_ms,
                due_ms: None,
                action,
            },
        })
    }

    /// Start a recurring per-frame task
    pub fn start_frame_loop(&mut self, owner: SessionId, action: A) -> TaskId {
        self.tasks.insert(Task {
            owner,
            kind: TaskKind::FrameLoop { action },
        })
    }

    /// Register a listener or observer
    pub fn attach_listener(&mut self, owner: SessionId, kind: ListenerKind) -> TaskId {
        self.tasks.insert(Task {
            owner,
            kind: TaskKind::Listener(kind),
        })
    }

    /// Release every task owned by `owner`, returning how many were dropped
    pub fn release(&mut self, owner: SessionId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| task.owner != owner);
        let released = before - self.tasks.len();
        if released > 0 {
            tracing::debug!("released {} task(s) owned by {}", released, owner);
        }
        released
    }

    /// Arm new timers at `now_ms`, then remove and return every timer due,
    /// earliest first
    pub fn take_due_timers(&mut self, now_ms: u64) -> SmallVec<[(SessionId, A); 2]> {
        for task in self.tasks.values_mut() {
            if let TaskKind::Timer {
                delay_ms,
                due_ms: due_ms @ None,
                ..
            } = &mut task.kind
            {
                *due_ms = Some(now_ms.saturating_add(*delay_ms));
            }
        }

        let mut due: SmallVec<[(u64, TaskId); 2]> = self
            .tasks
            .iter()
            .filter_map(|(id, task)| match task.kind {
                TaskKind::Timer {
                    due_ms: Some(due_ms), ..
                } if due_ms <= now_ms => Some((due_ms, id)),
                _ => None,
            })
            .collect();
        due.sort_by_key(|(due_ms, _)| *due_ms);

        due.into_iter()
            .filter_map(|(_, id)| self.tasks.remove(id))
            .filter_map(|task| match task.kind {
                TaskKind::Timer { action, .. } => Some((task.owner, action)),
                _ => None,
            })
            .collect()
    }

    /// Actions of every running frame loop
    pub fn frame_actions(&self) -> SmallVec<[(SessionId, A); 2]> {
        self.tasks
            .values()
            .filter_map(|task| match &task.kind {
                TaskKind::FrameLoop { action } => Some((task.owner, action.clone())),
                _ => None,
            })
            .collect()
    }

    /// Owner of an attached listener of this kind, if any
    pub fn listener_owner(&self, kind: ListenerKind) -> Option<SessionId> {
        self.tasks.values().find_map(|task| match task.kind {
            TaskKind::Listener(k) if k == kind => Some(task.owner),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<A: Clone> Default for TaskArena<A> {
    fn default() -> Self {
        Self::new()
    }
}
