//! Host context and history absorption.
//!
//! The evaluator keeps no session of its own. Everything it needs between
//! commands comes from the host through [`Context`]: the record it produced
//! last, and for `extend`, the units of output that came before.

use tracing::trace;

use crate::record::{Record, RecordBuilder};
use crate::settings::Settings;
use crate::state::{CalcState, Compose, compose};

/// Records produced together by one host action, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputUnit {
    pub records: Vec<Record>,
}

impl OutputUnit {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

/// What a host provides to every command.
pub trait Context {
    /// The record emitted by the previous action, calculator or not.
    fn last_record(&self) -> Option<&Record>;

    /// Past output units, oldest first.
    fn past_units(&self) -> &[OutputUnit];

    /// Plain words the host considers "just typed", oldest first.
    fn recent_plain_words(&self) -> Vec<String>;

    fn new_record(&self) -> RecordBuilder {
        RecordBuilder::new()
    }

    fn settings(&self) -> Settings {
        Settings::default()
    }
}

/// Result of walking back through history for `extend`.
#[derive(Debug, PartialEq)]
pub enum Scan<'a> {
    /// A live calculator record, and the whole units after it that hold
    /// only plain text.
    Found {
        record: &'a Record,
        absorbed: &'a [OutputUnit],
    },
    NotFound,
}

/// Walk units newest first, summing the length of every non-calculator
/// record passed. The walk stops at the first live calculator record, or
/// once the sum exceeds `limit` at the end of a unit.
pub fn scan(units: &[OutputUnit], limit: usize) -> Scan<'_> {
    let mut accumulated = 0usize;

    for (index, unit) in units.iter().enumerate().rev() {
        let live = unit.records.iter().rev().find(|record| {
            if record.is_live_calculator() {
                return true;
            }
            accumulated += record.text.chars().count();
            false
        });

        if let Some(record) = live {
            trace!(unit = index, accumulated, "found live calculator record");
            return Scan::Found {
                record,
                absorbed: &units[index + 1..],
            };
        }

        trace!(unit = index, accumulated, "absorbing plain unit");
        if accumulated > limit {
            trace!(limit, "history budget exhausted");
            break;
        }
    }

    Scan::NotFound
}

/// Text of `units` as the host rendered it: records joined by a single
/// space unless attached to their predecessor.
pub fn joined_text(units: &[OutputUnit]) -> String {
    let mut text = String::new();
    for record in units.iter().flat_map(|unit| &unit.records) {
        if !text.is_empty() && !record.attach_to_prior && !record.text.is_empty() {
            text.push(' ');
        }
        text.push_str(&record.text);
    }
    text
}

/// Pull recent plain text into the pending buffer.
///
/// With a live calculator record in reach, the text typed after it is
/// appended to its buffer and both displays are replaced by the new one.
/// Otherwise the host's recent plain words start a fresh chain.
pub fn extend(ctx: &impl Context) -> Record {
    let settings = ctx.settings();

    match scan(ctx.past_units(), settings.extend_limit) {
        Scan::Found { record, absorbed } => {
            let mut state = CalcState::recover(Some(record));
            let text = joined_text(absorbed);
            state.buffer.push_str(&text);

            let spacer = absorbed
                .first()
                .and_then(|unit| unit.records.first())
                .filter(|head| !head.attach_to_prior)
                .map_or("", |_| " ");
            let force_delete = format!("{}{}{}", record.text, spacer, text);

            compose(
                ctx.new_record(),
                Some(record),
                state,
                Compose {
                    force_delete: Some(force_delete),
                    ..Compose::default()
                },
            )
        }
        Scan::NotFound => {
            let words = ctx.recent_plain_words().concat();
            let state = CalcState {
                buffer: words.clone(),
                ..CalcState::default()
            };
            compose(
                ctx.new_record(),
                None,
                state,
                Compose {
                    force_delete: Some(words),
                    ..Compose::default()
                },
            )
        }
    }
}
