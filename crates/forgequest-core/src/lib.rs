//! Action resolution, effects, and the concurrent heat engine for Forgequest.
//!
//! This crate owns everything that reads or writes [`GameState`] at runtime:
//! the command resolver, the named effects, the background heat scheduler,
//! and the [`GameSession`] that ties them together behind a single lock.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `forgequest-config.yaml` into
//!   strongly-typed structs.
//! - [`effects`] -- The named effects that mutate state and produce narrative.
//! - [`observer`] -- [`Observer`] trait, default implementations, and the
//!   lock-free [`Gauges`].
//! - [`resolver`] -- Command normalization, meta-commands, and action
//!   dispatch.
//! - [`scheduler`] -- The forge heat tick and its background task.
//! - [`session`] -- [`GameSession`] lifecycle, command processing, shutdown.
//!
//! [`GameState`]: forgequest_types::GameState
//! [`GameSession`]: session::GameSession
//! [`Observer`]: observer::Observer
//! [`Gauges`]: observer::Gauges

pub mod config;
pub mod effects;
pub mod observer;
pub mod resolver;
pub mod scheduler;
pub mod session;
