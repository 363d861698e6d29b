// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Processing orchestrator — owns the debounced re-run trigger, caps source
// sizes and publishes each finished preview to the UI layer.
//
// A single Tokio task consumes source and settings updates from an unbounded
// channel. Updates land in a `Debouncer`; when its deadline passes the task
// runs the pipeline on the blocking pool and awaits it before looking at the
// next update, so a run in flight always completes and never overlaps another.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use outlinio_core::error::{OutlinioError, Result};
use outlinio_core::human_errors::{HumanError, humanize_error};
use outlinio_core::{ExportFormat, PageLayout, PixelBuffer, Settings, SketchConfig};
use outlinio_sketch::{SourceImage, apply_export_with, run_pipeline};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::debounce::Debouncer;
use crate::guard::RunGuard;

/// What the UI sees after each run.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Number of completed runs, successful or not.
    pub generation: u64,
    /// Latest successfully rendered sketch.
    pub preview: Option<Arc<PixelBuffer>>,
    /// Settings that produced `preview`.
    pub settings: Settings,
    pub is_processing: bool,
    /// Failure of the most recent run, cleared by the next success.
    pub last_error: Option<HumanError>,
}

enum Command {
    Source(PixelBuffer),
    Settings(Settings),
    Shutdown,
}

/// Handle to a running processing session.
pub struct ProcessingOrchestrator {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    processing: Arc<AtomicBool>,
    layout: PageLayout,
    max_dimension: u32,
    task: Option<JoinHandle<()>>,
}

impl ProcessingOrchestrator {
    /// Start the session task. Must be called from within a Tokio runtime.
    pub fn spawn(config: &SketchConfig) -> Self {
        let (commands, inbox) = mpsc::unbounded_channel();
        let initial = SessionSnapshot {
            settings: config.default_settings.clamped(),
            ..SessionSnapshot::default()
        };
        let (publisher, snapshots) = watch::channel(initial);
        let processing = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            inbox,
            publisher,
            processing: Arc::clone(&processing),
            debouncer: Debouncer::new(config.debounce()),
            source: None,
            settings: config.default_settings.clamped(),
        };
        let task = tokio::spawn(worker.run());
        info!(debounce_ms = config.debounce_ms, "processing session started");

        Self {
            commands,
            snapshots,
            processing,
            layout: config.page_layout(),
            max_dimension: config.max_dimension,
            task: Some(task),
        }
    }

    /// Replace the source image. It is capped to the configured maximum
    /// dimension on the blocking pool and a run is scheduled with the current
    /// settings.
    #[instrument(skip_all, fields(w = source.width(), h = source.height()))]
    pub async fn load_source(&self, source: SourceImage) -> Result<()> {
        let max = self.max_dimension;
        let capped = tokio::task::spawn_blocking(move || {
            source.fit_within(max).to_pixel_buffer()
        });
        let buffer = capped
            .await
            .map_err(|e| OutlinioError::ProcessingFailure(format!("source task: {e}")))??;
        self.send(Command::Source(buffer))
    }

    /// Schedule a run with `settings`, superseding any run not yet started.
    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        self.send(Command::Settings(settings))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Wait until at least `generation` runs have completed.
    pub async fn wait_for_generation(&self, generation: u64) -> Result<SessionSnapshot> {
        let mut rx = self.subscribe();
        let snapshot = rx
            .wait_for(|s| s.generation >= generation)
            .await
            .map_err(|_| OutlinioError::SessionClosed)?;
        Ok(snapshot.clone())
    }

    /// Derive `format` from the latest preview. The preview itself is left as
    /// it is.
    pub async fn export(&self, format: ExportFormat) -> Result<PixelBuffer> {
        let preview = self
            .snapshots
            .borrow()
            .preview
            .clone()
            .ok_or(OutlinioError::NothingToExport)?;
        let layout = self.layout;
        tokio::task::spawn_blocking(move || apply_export_with(&preview, format, layout))
            .await
            .map_err(|e| OutlinioError::ProcessingFailure(format!("export task: {e}")))?
    }

    /// Stop the session task. Pending runs are dropped; a run in flight
    /// finishes first.
    pub async fn shutdown(&mut self) -> Result<()> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        // The task may already be gone; joining below is what matters.
        let _ = self.commands.send(Command::Shutdown);
        task.await
            .map_err(|e| OutlinioError::ProcessingFailure(format!("session task join: {e}")))?;
        info!("processing session stopped");
        Ok(())
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| OutlinioError::SessionClosed)
    }
}

/// State owned by the session task.
struct Worker {
    inbox: mpsc::UnboundedReceiver<Command>,
    publisher: watch::Sender<SessionSnapshot>,
    processing: Arc<AtomicBool>,
    debouncer: Debouncer<Settings>,
    source: Option<Arc<PixelBuffer>>,
    settings: Settings,
}

impl Worker {
    async fn run(mut self) {
        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                command = self.inbox.recv() => match command {
                    Some(Command::Source(buffer)) => {
                        debug!(w = buffer.width(), h = buffer.height(), "new source");
                        self.source = Some(Arc::new(buffer));
                        self.debouncer.push(self.settings, Instant::now());
                    }
                    Some(Command::Settings(settings)) => {
                        self.settings = settings.clamped();
                        self.debouncer.push(self.settings, Instant::now());
                    }
                    Some(Command::Shutdown) | None => {
                        if self.debouncer.cancel().is_some() {
                            debug!("dropping pending run on shutdown");
                        }
                        break;
                    }
                },
                _ = sleep_until(deadline), if deadline.is_some() => {
                    if let Some(settings) = self.debouncer.take_due(Instant::now()) {
                        self.process(settings).await;
                    }
                }
            }
        }
    }

    async fn process(&mut self, settings: Settings) {
        let Some(source) = self.source.clone() else {
            debug!("settings changed before any source was loaded");
            return;
        };

        let run = match RunGuard::acquire(&self.processing) {
            Ok(run) => run,
            Err(e) => {
                // Keep the settings so the latest request still runs once the
                // slot frees up, unless something newer arrives first.
                warn!(error = %e, "run rejected, rescheduling");
                self.debouncer.push(settings, Instant::now());
                return;
            }
        };
        self.publisher.send_modify(|s| s.is_processing = true);

        let outcome = tokio::task::spawn_blocking(move || {
            let _run = run;
            run_pipeline(&source, &settings)
        })
        .await
        .map_err(|e| OutlinioError::ProcessingFailure(format!("pipeline task: {e}")))
        .and_then(|result| result);

        self.publisher.send_modify(|s| {
            s.generation += 1;
            s.is_processing = false;
            match outcome {
                Ok(preview) => {
                    info!(generation = s.generation, mode = %settings.mode, "preview updated");
                    s.preview = Some(Arc::new(preview));
                    s.settings = settings;
                    s.last_error = None;
                }
                Err(e) => {
                    warn!(generation = s.generation, error = %e, "sketch run failed");
                    s.last_error = Some(humanize_error(&e));
                }
            }
        });
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}
