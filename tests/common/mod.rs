#![allow(dead_code)]

pub mod gemini_stub;
pub mod harness;

/// Smallest PNG header the stub collaborators accept.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";
