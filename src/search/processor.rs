use std::time::Instant;

use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::host::{Host, ObjectList};
use crate::types::{ListEntry, SliceReport};

use super::linker::link_target;
use super::session::SearchSession;

/// How far one top-level entry got during a slice.
enum ItemProgress {
    /// Every occurrence was linked or ignored.
    Done,
    /// Some occurrences must be retried in a later slice.
    Pending,
    /// The slice budget ran out while handling this entry.
    OutOfTime,
}

/// Consumes one time-boxed slice of the session's result list.
///
/// A session without a result list has nothing left to do and reports
/// complete. Otherwise the report is complete only if no entry or occurrence
/// was left pending.
pub fn process_slice(session: &mut SearchSession, host: &Host, config: &SearchConfig) -> SliceReport {
    let Some(results) = session.results.take() else {
        return SliceReport {
            is_complete: true,
            ..SliceReport::default()
        };
    };
    let report = run_slice(session, results.as_ref(), host, config);
    session.results = Some(results);
    report
}

fn run_slice(
    session: &mut SearchSession,
    results: &dyn ObjectList,
    host: &Host,
    config: &SearchConfig,
) -> SliceReport {
    let started = host.clock.now();
    let mut report = SliceReport::default();

    let count = match results.item_count() {
        Ok(count) => count,
        Err(e) if e.is_interface_mismatch() => {
            debug!(error = %e, "result list not readable yet");
            return report;
        }
        Err(e) => {
            debug!(error = %e, "result count unavailable, search still processing");
            return report;
        }
    };

    let entries: Vec<Option<ListEntry>> = (0..count).map(|i| results.item(i).ok()).collect();

    // Once any entry names the qualified symbol, entries that don't are
    // same-named symbols from other scopes.
    let long_name = session.source.long_name.clone();
    let long_name_matched = !long_name.is_empty()
        && entries
            .iter()
            .flatten()
            .any(|entry| entry.text.contains(&long_name));

    let mut pending = false;
    for (index, entry) in entries.into_iter().enumerate() {
        let index = index as u32;
        let Some(entry) = entry else {
            pending = true;
            continue;
        };
        debug!(index, text = %entry.text, "result item");

        if long_name_matched && !entry.text.contains(&long_name) {
            continue;
        }
        if entry.is_pending(&config.processing_markers) {
            pending = true;
            continue;
        }
        if session.item_records.contains(&entry.text) {
            continue;
        }

        let references = match results.expand(index) {
            Ok(list) => list,
            Err(e) => {
                debug!(text = %entry.text, error = %e, "reference list unavailable");
                if record_expand_failure(session, &entry.text, config) {
                    pending = true;
                }
                continue;
            }
        };

        match process_item(session, references.as_ref(), host, config, started, &mut report) {
            ItemProgress::Done => {
                session.item_records.insert(entry.text);
            }
            ItemProgress::Pending => pending = true,
            ItemProgress::OutOfTime => {
                debug!(
                    elapsed_ms = host.clock.now().duration_since(started).as_millis() as u64,
                    "slice budget exhausted"
                );
                report.timed_out = true;
                return report;
            }
        }
    }

    report.is_complete = !pending;
    report
}

/// Walks the occurrences under one top-level entry.
fn process_item(
    session: &mut SearchSession,
    references: &dyn ObjectList,
    host: &Host,
    config: &SearchConfig,
    started: Instant,
    report: &mut SliceReport,
) -> ItemProgress {
    let count = match references.item_count() {
        Ok(count) => count,
        Err(e) => {
            debug!(error = %e, "reference count unavailable");
            return ItemProgress::Pending;
        }
    };

    let mut pending = false;
    for index in 0..count {
        let entry = match references.item(index) {
            Ok(entry) => entry,
            Err(_) => {
                pending = true;
                continue;
            }
        };
        if entry.is_pending(&config.processing_markers) {
            pending = true;
            continue;
        }
        if session.reference_records.contains(&entry.text) {
            continue;
        }

        let ignored = config.is_ignored_category(entry.category);
        debug!(category = entry.category, linkable = !ignored, text = %entry.text, "reference");
        if ignored {
            session.reference_records.insert(entry.text);
            report.ignored += 1;
            continue;
        }

        match references.can_navigate(index) {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                pending = true;
                continue;
            }
        }
        if let Err(e) = references.navigate(index) {
            debug!(text = %entry.text, error = %e, "go to source failed");
            pending = true;
            continue;
        }

        let outcome = link_target(&session.source, host);
        debug!(text = %entry.text, ?outcome, "linked reference");
        session.reference_records.insert(entry.text);
        report.linked += 1;

        if host.clock.now().duration_since(started) > config.slice_budget() {
            return ItemProgress::OutOfTime;
        }
    }

    if pending {
        ItemProgress::Pending
    } else {
        ItemProgress::Done
    }
}

/// Counts a failed expansion. Returns `true` while the entry should be
/// retried; after `max_expand_attempts` failures it is abandoned and recorded
/// as handled.
fn record_expand_failure(session: &mut SearchSession, text: &str, config: &SearchConfig) -> bool {
    let failures = session.expand_failures.entry(text.to_string()).or_insert(0);
    *failures += 1;
    if *failures < config.max_expand_attempts {
        return true;
    }
    warn!(
        text,
        attempts = *failures,
        "abandoning result item whose references cannot be listed"
    );
    session.item_records.insert(text.to_string());
    false
}
