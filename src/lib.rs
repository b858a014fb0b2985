//! Camcorder - camera recording session orchestrator
//!
//! This crate negotiates capture profiles for a recording request, drives
//! the camera session through its lifecycle, and exposes pinch zoom and a
//! recording timer on top of a running session.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the session state machine, profile negotiation and errors
//! - **Application**: Session lifecycle, zoom, timer and the facade, plus port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (simulated camera, files, config, notifications)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
