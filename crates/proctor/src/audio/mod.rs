// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Voice-activity detection over a raw audio chunk.

pub mod vad;

pub use vad::{analyze, analyze_bytes};
