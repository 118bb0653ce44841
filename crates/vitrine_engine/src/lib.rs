//! Vitrine Engine
//!
//! Coordinates scrolling and floating overlays for a single-page showcase:
//! an outer page with a hero section, an inner project panel, and a detail
//! modal opened from the gallery.
//!
//! # Components
//!
//! - **Scroll Gateway**: routes every wheel/touch event to exactly one
//!   scroll domain
//! - **Modal Lifecycle**: `Closed → Opening → Open → Closing → Closed`,
//!   one session at a time
//! - **Overlay Tracker**: keeps the close control and progress indicator
//!   glued to a moving anchor
//! - **Scroll Preserver**: saves the panel offset on open and restores it
//!   after the modal unmounts
//! - **Progress**: reading progress of the modal content
//!
//! # Example
//!
//! ```rust
//! use vitrine_engine::{EngineConfig, ModalState, ShowcaseEngine};
//!
//! let engine = ShowcaseEngine::new(EngineConfig::default()).unwrap();
//! assert_eq!(engine.modal_state(), ModalState::Closed);
//! assert!(engine.wheel_listener_attached());
//! assert_eq!(engine.catalog().len(), 3);
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod host;
pub mod modal;
pub mod overlay;
pub mod preserver;
pub mod progress;
pub mod sampler;
pub mod scroll;
pub mod tracker;

pub use catalog::{Project, ProjectCatalog, ProjectId};
pub use config::{EngineConfig, MAX_RESTORE_DELAY_MS};
pub use engine::ShowcaseEngine;
pub use error::{ConfigError, OpenRejected, Result};
pub use gateway::{GatewayConfig, RouteDecision, ScrollGateway};
pub use host::{ElementHandle, Host};
pub use modal::{CloseReason, LifecycleEffect, ModalLifecycleController, ModalSession, ModalState};
pub use overlay::{DependentOverlayRect, DependentOverlaySpec, OverlayExtent, OverlayId, OverlayLayout, OverlayPlacement};
pub use preserver::ScrollStatePreserver;
pub use progress::ProgressComputation;
pub use sampler::{AnchorPolicy, AnchorSample, AnchorSource, PositionSampler};
pub use scroll::{ScrollDomain, ScrollPosition};
pub use tracker::{Invalidation, OverlayPositionTracker};
