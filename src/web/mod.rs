//! Web layer for the browser-facing landing page.
//!
//! Uses Askama templates for server-side rendering.

pub mod handlers;
