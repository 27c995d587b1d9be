//! IPC listener that accepts commands over a Unix socket.
//!
//! The front end that owns the pointer connects to the socket and streams
//! its drag lifecycle as newline-delimited JSON commands.

pub mod listener;
