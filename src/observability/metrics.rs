//! Metrics collection.
//!
//! # Metrics
//! - `oam_uploads_total` (counter): uploads by outcome
//! - `oam_posts_published_total` (counter): confirmed posts by batch mode
//! - `oam_broadcasts_total` (counter): broadcasts by batch mode and outcome
//! - `oam_dictionary_fetches_total` (counter): dictionary fetches by resource and outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - No exporter is started here; an embedding application may install one

use metrics::counter;

fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "failure"
    }
}

pub fn record_upload(ok: bool) {
    counter!("oam_uploads_total", "outcome" => outcome(ok)).increment(1);
}

pub fn record_broadcast(mode: &'static str, ok: bool) {
    counter!("oam_broadcasts_total", "mode" => mode, "outcome" => outcome(ok)).increment(1);
}

pub fn record_posts_published(mode: &'static str, count: usize) {
    counter!("oam_posts_published_total", "mode" => mode).increment(count as u64);
}

pub fn record_dictionary_fetch(resource: &'static str, ok: bool) {
    counter!("oam_dictionary_fetches_total", "resource" => resource, "outcome" => outcome(ok))
        .increment(1);
}
