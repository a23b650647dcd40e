//! Tenaya display server core.
//!
//! Server-side shared state of a window system: clients and their
//! windows, window-management clients, seats, display devices and the
//! composition pipeline. The aggregate is protected by a single lock
//! ([`core::SharedDisplay`]); protocol frontends and input backends sit
//! on top of this crate and drive it through the [`core::Display`]
//! operations.
//!
//! The graphics side is capability based: anything implementing
//! [`gfx::GfxContext`] can serve as an output device, and the core
//! composes through a fan-out context mirroring all devices, optionally
//! behind a damage-tracked memory backbuffer.

pub mod core;
pub mod gfx;
