//! Tunnel Platform - Service Boundary
//!
//! This crate handles:
//! - The outbound call surface the game uses to reach host services
//! - The request messages queued for that surface
//! - Atomic report cells written by asynchronous host callbacks
//!
//! # Architecture
//!
//! Outbound calls go through a [`PlatformBridge`] implementation supplied by
//! the host integration. Fire-and-forget operations are expressed as
//! [`ServiceRequest`] values so they can be queued and executed off the
//! caller's thread.
//!
//! Inbound reports (sign-in state, cloud load result, joystick presence)
//! land in a [`ReportBoard`]. Every reported fact lives in its own
//! single-word atomic cell, so readers never block and never see a torn value.
//!
//! # Thread Safety
//!
//! [`ReportBoard`] is lock-free. The process-wide instance in [`globals`]
//! exists only because host callbacks carry no context pointer.

pub mod bridge;
pub mod error;
pub mod globals;
pub mod reports;

pub use bridge::{MotionRange, PlatformBridge, ServiceRequest};
pub use error::BridgeError;
pub use globals::reports;
pub use reports::{CloudData, ReportBoard, SignInStatus};
