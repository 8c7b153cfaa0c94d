//! Presence Relay - real-time presence and event relay for chat clients
//!
//! Tracks which users hold a live connection, announces the online set to
//! every connected client, relays typing indicators and read receipts between
//! users, and pushes freshly stored messages to recipients who are online.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
