//! MagicCode Client - core logic for the MagicCode blog client.
//!
//! This crate provides the non-UI logic of the MagicCode blog/CMS client:
//! recognizing video-provider links in post content, warning the user before
//! their session token expires, flattening the page tree for navigation and
//! admin pickers, and talking to the backend API with bearer authentication.
//!
//! # Overview
//!
//! Post bodies are stored as free text that may contain video links. The
//! [`video`] module segments a body into alternating text and video spans so
//! the rendering layer can emit player frames for recognized providers and
//! plain links for everything else.
//!
//! Sessions are carried by a JWT issued at login. The [`watchdog`] module
//! decodes the token's expiry claim and emits a one-shot "expiring soon"
//! notice five minutes before the deadline, so the user can save their work.
//!
//! # Modules
//!
//! - [`video`]: Video provider recognition and text segmentation
//! - [`token`]: Bearer token claim decoding
//! - [`watchdog`]: Session expiry warning timer
//! - [`tree`]: Page tree flattening for indented lists
//! - [`client`]: Authenticated HTTP client for the backend API

pub mod client;
pub mod token;
pub mod tree;
pub mod video;
pub mod watchdog;

pub use client::{ApiClient, ApiError, ClientConfig};
pub use token::TokenClaims;
pub use tree::{IndentedPage, PageNode};
pub use video::{recognize, segment, TextSpan, VideoProvider, VideoReference};
pub use watchdog::{SessionExpiryWatchdog, SessionNotice, WatchdogConfig, WARNING_WINDOW_MS};
