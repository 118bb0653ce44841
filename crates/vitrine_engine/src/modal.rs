//! Modal lifecycle
//!
//! ```text
//!            OPEN_REQUEST            ENTRANCE_COMPLETE
//!   Closed ───────────────▶ Opening ──────────────────▶ Open
//!     ▲                        │                          │
//!     │ EXIT_COMPLETE          │ CLOSE_REQUEST            │ CLOSE_REQUEST
//!     │                        ▼                          │
//!     └──────────────────── Closing ◀─────────────────────┘
//! ```
//!
//! The controller owns the single [`ModalSession`] and the
//! [`ScrollStatePreserver`]. Side effects on other components (tracker,
//! gateway, timers) are returned as [`LifecycleEffect`]s for the caller to
//! apply in order.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use vitrine_core::event_types::{CLOSE_REQUEST, ENTRANCE_COMPLETE, EXIT_COMPLETE, OPEN_REQUEST};
use vitrine_core::scheduler::SessionId;
use vitrine_core::state::StateTransitions;
use vitrine_core::EventType;

use crate::catalog::ProjectId;
use crate::error::OpenRejected;
use crate::preserver::ScrollStatePreserver;
use crate::sampler::AnchorPolicy;

/// Modal presentation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl StateTransitions for ModalState {
    fn on_event(&self, event: u32) -> Option<Self> {
        match (self, event) {
            (ModalState::Closed, OPEN_REQUEST) => Some(ModalState::Opening),
            (ModalState::Opening, ENTRANCE_COMPLETE) => Some(ModalState::Open),
            (ModalState::Opening, CLOSE_REQUEST) => Some(ModalState::Closing),
            (ModalState::Open, CLOSE_REQUEST) => Some(ModalState::Closing),
            (ModalState::Closing, EXIT_COMPLETE) => Some(ModalState::Closed),
            _ => None,
        }
    }
}

impl ModalState {
    /// Anything but Closed
    pub fn is_active(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModalState::Closed => "closed",
            ModalState::Opening => "opening",
            ModalState::Open => "open",
            ModalState::Closing => "closing",
        }
    }
}

/// What dismissed the modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Backdrop,
    CloseControl,
    /// Escape key or programmatic cancel
    Cancel,
}

/// One open/close cycle of the detail overlay
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSession {
    pub id: SessionId,
    pub project: ProjectId,
    pub anchor: AnchorPolicy,
    pub saved_panel_offset: f32,
    pub state: ModalState,
    pub close_reason: Option<CloseReason>,
}

/// Work the caller must perform after a transition, in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleEffect {
    DetachWheelListener,
    StartTracking { session: SessionId, anchor: AnchorPolicy },
    StopTracking { session: SessionId },
    /// Release every timer, listener, and frame loop owned by the session
    ReleaseSession { session: SessionId },
    AttachWheelListener,
    ScheduleRestore { session: SessionId, delay_ms: u64 },
}

pub type Effects = SmallVec<[LifecycleEffect; 4]>;

/// State machine governing the modal session
pub struct ModalLifecycleController {
    session: Option<ModalSession>,
    last_id: SessionId,
    preserver: ScrollStatePreserver,
    restore_delay_ms: u64,
    /// Transitions of the current or most recent session
    history: Vec<(ModalState, EventType, ModalState)>,
}

impl ModalLifecycleController {
    pub fn new(restore_delay_ms: u64) -> Self {
        Self {
            session: None,
            last_id: SessionId::default(),
            preserver: ScrollStatePreserver::new(),
            restore_delay_ms,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> ModalState {
        self.session.as_ref().map_or(ModalState::Closed, |s| s.state)
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    /// Id of the live session
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn history(&self) -> &[(ModalState, EventType, ModalState)] {
        &self.history
    }

    /// Session whose panel offset still waits for its deferred restore
    pub fn pending_restore(&self) -> Option<SessionId> {
        if self.session.is_some() {
            return None;
        }
        self.preserver.pending_session()
    }

    /// Panel offset saved for the live session, or still awaiting restore
    pub fn saved_offset(&self) -> Option<f32> {
        match &self.session {
            Some(session) => Some(session.saved_panel_offset),
            None => self
                .preserver
                .pending_session()
                .and_then(|id| self.preserver.saved_offset(id)),
        }
    }

    /// Closed → Opening
    ///
    /// `panel_offset` must be read before anything touches the panel.
    pub fn request_open(
        &mut self,
        project: ProjectId,
        anchor: AnchorPolicy,
        panel_offset: f32,
    ) -> Result<(SessionId, Effects), OpenRejected> {
        if let Some(session) = &self.session {
            return Err(if session.project == project && !matches!(session.state, ModalState::Closing) {
                OpenRejected::AlreadyOpen(project)
            } else {
                OpenRejected::SessionActive {
                    project: session.project.clone(),
                    state: session.state,
                }
            });
        }

        let id = self.last_id.next();
        self.last_id = id;
        self.preserver.capture(id, panel_offset);

        let mut state = ModalState::Closed;
        state.apply(OPEN_REQUEST);
        self.history.clear();
        self.history.push((ModalState::Closed, OPEN_REQUEST, state));

        tracing::debug!(
            "modal: {} opening {} (panel offset {:.1} saved)",
            id,
            project,
            panel_offset
        );
        self.session = Some(ModalSession {
            id,
            project,
            anchor,
            saved_panel_offset: panel_offset,
            state,
            close_reason: None,
        });

        Ok((
            id,
            smallvec![
                LifecycleEffect::DetachWheelListener,
                LifecycleEffect::StartTracking {
                    session: id,
                    anchor
                },
            ],
        ))
    }

    /// Opening → Open, from the entrance-animation-complete signal
    pub fn entrance_complete(&mut self, session: SessionId) -> bool {
        self.send(session, ENTRANCE_COMPLETE)
    }

    /// Open (or Opening) → Closing
    pub fn request_close(&mut self, reason: CloseReason) -> bool {
        let Some(id) = self.session_id() else {
            return false;
        };
        let moved = self.send(id, CLOSE_REQUEST);
        if moved {
            if let Some(session) = self.session.as_mut() {
                session.close_reason = Some(reason);
            }
        }
        moved
    }

    /// Closing → Closed, from the exit-animation-complete signal
    ///
    /// Destroys the session. The returned effects stop tracking before the
    /// restore is scheduled.
    pub fn exit_complete(&mut self, session: SessionId) -> Effects {
        if !self.send(session, EXIT_COMPLETE) {
            return Effects::new();
        }
        let ended = self.session.take();
        tracing::debug!(
            "modal: {} closed ({:?})",
            session,
            ended.and_then(|s| s.close_reason)
        );

        smallvec![
            LifecycleEffect::StopTracking { session },
            LifecycleEffect::ReleaseSession { session },
            LifecycleEffect::AttachWheelListener,
            LifecycleEffect::ScheduleRestore {
                session,
                delay_ms: self.restore_delay_ms,
            },
        ]
    }

    /// Offset to write back once the deferred restore fires
    ///
    /// None for stale sessions, a session that is live again, repeated
    /// calls, and zero offsets.
    pub fn take_restore(&mut self, session: SessionId) -> Option<f32> {
        if self.session_id() == Some(session) {
            return None;
        }
        self.preserver.restore(session)
    }

    fn send(&mut self, session: SessionId, event: EventType) -> bool {
        let Some(current) = self.session.as_mut() else {
            return false;
        };
        if current.id != session {
            tracing::trace!("modal: stale event {} for {} ignored", event, session);
            return false;
        }
        let from = current.state;
        if !current.state.apply(event) {
            tracing::trace!("modal: event {} ignored in {:?}", event, from);
            return false;
        }
        let to = current.state;
        tracing::debug!("modal: {} {:?} -> {:?}", session, from, to);
        self.history.push((from, event, to));
        true
    }
}

impl Default for ModalLifecycleController {
    fn default() -> Self {
        Self::new(100)
    }
}
