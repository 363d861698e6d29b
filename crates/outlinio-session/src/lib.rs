// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// outlinio-session — Debounced processing session sitting between the UI and
// the sketch pipeline.

pub mod debounce;
pub mod guard;
pub mod orchestrator;

pub use debounce::Debouncer;
pub use guard::RunGuard;
pub use orchestrator::{ProcessingOrchestrator, SessionSnapshot};
