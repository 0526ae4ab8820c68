//! Cross-cutting, shared constants.
//!
//! Defaults here are what [`Config`](crate::config::Config) falls back to when the
//! corresponding environment variable is unset.

/// CLIP ViT-B/32 output size.
pub const DEFAULT_EMBEDDING_DIM: usize = 512;

pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

pub const DEFAULT_TEMPERATURE: f32 = 0.0;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Backoff before retry `n` (0-indexed) is `DEFAULT_BACKOFF_BASE^n` seconds.
pub const DEFAULT_BACKOFF_BASE: f64 = 1.2;

/// Idle connections kept per host by the generative-text client.
pub const GATEWAY_POOL_MAX_IDLE_PER_HOST: usize = 16;

pub const DEFAULT_W_II: f32 = 0.4;
pub const DEFAULT_W_IT: f32 = 0.1;
pub const DEFAULT_W_TI: f32 = 0.1;
pub const DEFAULT_W_TT: f32 = 0.4;

/// Tolerance used when checking that similarity weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-3;

/// Breed label returned when classification finds no dog or fails.
pub const DEFAULT_MIX_LABEL: &str = "믹스";

/// Upper bound on accepted image uploads.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
