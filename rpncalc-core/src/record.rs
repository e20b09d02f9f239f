//! Output records: what every command hands back to the host.
//!
//! A record is immutable once built. Calculator records carry a full
//! [`Snapshot`] of the evaluator so the next command can resume from the
//! record alone; plain records are ordinary text the host produced itself.

use crate::codec::Base;
use crate::value::Number;

/// Evaluator state frozen into a calculator record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub stack: Vec<Number>,
    pub buffer: String,
    pub is_float: bool,
    pub base: Base,
    /// False once the chain has been finished with `end`.
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordKind {
    Plain,
    Calculator(Snapshot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub text: String,
    /// Trailing text the host should delete before inserting `text`.
    pub replaces_prior: Option<String>,
    /// Join `text` to what precedes it without a separator.
    pub attach_to_prior: bool,
    pub kind: RecordKind,
}

impl Record {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            replaces_prior: None,
            attach_to_prior: false,
            kind: RecordKind::Plain,
        }
    }

    /// Snapshot of any calculator record, live or finished.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match &self.kind {
            RecordKind::Calculator(snapshot) => Some(snapshot),
            RecordKind::Plain => None,
        }
    }

    /// Snapshot only if this record can still be resumed.
    pub fn live_snapshot(&self) -> Option<&Snapshot> {
        self.snapshot().filter(|snapshot| snapshot.live)
    }

    pub fn is_live_calculator(&self) -> bool {
        self.live_snapshot().is_some()
    }
}

/// Mutable builder handed out by the host; [`Record`] itself never changes
/// after [`RecordBuilder::build`].
#[derive(Debug, Default)]
pub struct RecordBuilder {
    text: String,
    replaces_prior: Option<String>,
    attach_to_prior: bool,
    snapshot: Option<Snapshot>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Replace `prior` in place: deletes it and attaches to what is left.
    pub fn replacing(mut self, prior: impl Into<String>) -> Self {
        self.replaces_prior = Some(prior.into());
        self.attach_to_prior = true;
        self
    }

    pub fn attached(mut self, attach: bool) -> Self {
        self.attach_to_prior = attach;
        self
    }

    pub fn calculator(mut self, snapshot: Snapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn build(self) -> Record {
        Record {
            text: self.text,
            replaces_prior: self.replaces_prior,
            attach_to_prior: self.attach_to_prior,
            kind: match self.snapshot {
                Some(snapshot) => RecordKind::Calculator(snapshot),
                None => RecordKind::Plain,
            },
        }
    }
}
