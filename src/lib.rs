//! kdesk: a keyboard-first kanban task board for the terminal.
//!
//! Three fixed columns (todo, in progress, done) of tasks, mirrored
//! write-through into a single local JSON slot. The [`board`] module is the
//! core: data model, storage codec, persistence slot, state store, and the
//! drag-drop adapter. [`app`], [`input`], and [`ui`] are the TUI around it.

pub mod app;
pub mod board;
pub mod input;
pub mod ui;
