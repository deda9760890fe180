//! Background Tasks Module
//!
//! Detached maintenance tasks that run alongside request traffic.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
