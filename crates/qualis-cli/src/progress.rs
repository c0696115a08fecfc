use std::sync::OnceLock;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use qualis_collector::{ProgressSink, ServerReport};
use qualis_core::enums::CollectorKind;

use crate::ui;

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

/// One bar per collector kind, advanced once per server.
///
/// Both kinds share a [`MultiProgress`] so concurrent cycles draw on
/// separate lines.
pub struct CycleProgress {
    kind: CollectorKind,
    bar: OnceLock<ProgressBar>,
    enabled: bool,
}

impl CycleProgress {
    #[must_use]
    pub fn new(kind: CollectorKind) -> Self {
        Self {
            kind,
            bar: OnceLock::new(),
            enabled: ui::prefs().progress,
        }
    }

    fn bar(&self, total: usize) -> Option<&ProgressBar> {
        if !self.enabled {
            return None;
        }
        Some(self.bar.get_or_init(|| {
            let bar = multi_progress().add(ProgressBar::new(total as u64));
            bar.set_style(
                ProgressStyle::with_template("{prefix:>8} {bar:30.cyan/blue} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.set_prefix(self.kind.as_str());
            bar
        }))
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = self.bar.get() {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = self.bar.get() {
            bar.abandon_with_message(message.to_string());
        }
    }
}

impl ProgressSink for CycleProgress {
    fn server_started(&self, _index: usize, total: usize, instance_url: &str) {
        if let Some(bar) = self.bar(total) {
            bar.set_message(instance_url.to_string());
        }
    }

    fn server_finished(&self, _index: usize, total: usize, report: &ServerReport) {
        if let Some(bar) = self.bar(total) {
            bar.set_message(format!(
                "{} (+{} ~{} snapshots {})",
                report.instance_url, report.created, report.updated, report.refreshed
            ));
            bar.inc(1);
        }
    }
}
