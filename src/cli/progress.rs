//! Terminal progress for orbit file retrieval
//!
//! [`ProgressObserver`] wraps the tracing observer: every run event is still
//! logged, and retrieval events additionally drive an indicatif bar while a
//! batch is in flight. The bar is only drawn when stderr is a terminal.

use std::sync::{Arc, Mutex};

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::{RunEvent, RunObserver, TracingObserver};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} orbit files {msg}";

/// Observer that logs events and shows retrieval progress
#[derive(Debug)]
pub struct ProgressObserver {
    inner: TracingObserver,
    enabled: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressObserver {
    /// Draw bars only when stderr is attached to a terminal and not quiet
    pub fn new(quiet: bool) -> Self {
        Self::with_enabled(!quiet && atty::is(atty::Stream::Stderr))
    }

    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            inner: TracingObserver,
            enabled,
            bar: Mutex::new(None),
        }
    }

    pub fn shared(quiet: bool) -> Arc<dyn RunObserver> {
        Arc::new(Self::new(quiet))
    }

    fn start_bar(&self, jobs: usize) {
        let bar = ProgressBar::new(jobs as u64);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .map(|style| style.progress_chars("##-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.finish_and_clear();
            }
        }
    }

    fn advance(&self, failed: bool) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        let Some(bar) = slot.as_ref() else {
            return;
        };

        bar.inc(1);
        if failed {
            bar.set_message("(with failures)");
        }
        if Some(bar.position()) == bar.length() {
            bar.finish();
            *slot = None;
        }
    }

    /// Log without tearing an active bar
    fn log(&self, event: RunEvent) {
        let bar = self.bar.lock().ok().and_then(|slot| slot.clone());
        match bar {
            Some(bar) => bar.suspend(|| self.inner.notify(event)),
            None => self.inner.notify(event),
        }
    }
}

impl RunObserver for ProgressObserver {
    fn notify(&self, event: RunEvent) {
        if !self.enabled {
            self.inner.notify(event);
            return;
        }

        match &event {
            RunEvent::DispatchStarted { jobs, .. } => {
                let jobs = *jobs;
                self.log(event);
                self.start_bar(jobs);
            }
            RunEvent::RetrievalSucceeded { .. } => {
                self.log(event);
                self.advance(false);
            }
            RunEvent::RetrievalFailed { .. } => {
                self.log(event);
                self.advance(true);
            }
            _ => self.log(event),
        }
    }
}
