//! In-memory host: keeps every emitted record and the text they compose to.

use crate::history::{Context, OutputUnit};
use crate::record::Record;
use crate::settings::Settings;

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    units: Vec<OutputUnit>,
    text: String,
    settings: Settings,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Emit `record` as its own output unit.
    pub fn apply(&mut self, record: Record) {
        self.apply_unit(vec![record]);
    }

    /// Emit several records as one output unit, oldest first.
    pub fn apply_unit(&mut self, records: Vec<Record>) {
        for record in &records {
            self.render(record);
        }
        self.units.push(OutputUnit::new(records));
    }

    /// Type plain words, each as its own unit.
    pub fn type_text(&mut self, text: &str) {
        for word in text.split_whitespace() {
            self.apply(Record::plain(word));
        }
    }

    pub fn rendered(&self) -> &str {
        &self.text
    }

    fn render(&mut self, record: &Record) {
        // deletion is by character count, like a run of backspaces
        let count = record.replaces_prior.as_ref().map_or(0, |prior| prior.chars().count());
        if count > 0 {
            let keep = self
                .text
                .char_indices()
                .rev()
                .nth(count - 1)
                .map_or(0, |(index, _)| index);
            self.text.truncate(keep);
        }
        if record.text.is_empty() {
            return;
        }
        if !self.text.is_empty() && !record.attach_to_prior {
            self.text.push(' ');
        }
        self.text.push_str(&record.text);
    }
}

impl Context for Transcript {
    fn last_record(&self) -> Option<&Record> {
        self.units.last().and_then(|unit| unit.records.last())
    }

    fn past_units(&self) -> &[OutputUnit] {
        &self.units
    }

    fn recent_plain_words(&self) -> Vec<String> {
        self.last_record()
            .filter(|record| record.snapshot().is_none())
            .map(|record| vec![record.text.clone()])
            .unwrap_or_default()
    }

    fn settings(&self) -> Settings {
        self.settings
    }
}
