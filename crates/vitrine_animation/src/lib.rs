//! Vitrine Animation System
//!
//! Spring physics driving the modal entrance/exit transition and smooth
//! page scrolling in the headless stage.
//!
//! # Features
//!
//! - **Spring Physics**: damped springs with stiffness, damping, mass
//! - **Substepped integration**: stable under long frames
//! - **Interruptible**: retargeting keeps the current velocity

pub mod spring;

pub use spring::{Spring, SpringConfig};
