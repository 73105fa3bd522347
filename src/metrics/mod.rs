use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters describing how a menu has been built and drawn.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    placements: u64,
    conflicts: u64,
    invalid_positions: u64,
    seals: u64,
    stash_overwrites: u64,
    draw_passes: u64,
    elements_drawn: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_placement(&mut self) {
        self.placements = self.placements.saturating_add(1);
    }

    pub fn record_conflict(&mut self) {
        self.conflicts = self.conflicts.saturating_add(1);
    }

    pub fn record_invalid_position(&mut self) {
        self.invalid_positions = self.invalid_positions.saturating_add(1);
    }

    pub fn record_seal(&mut self) {
        self.seals = self.seals.saturating_add(1);
    }

    pub fn record_stash_overwrite(&mut self) {
        self.stash_overwrites = self.stash_overwrites.saturating_add(1);
    }

    pub fn record_draw(&mut self, elements: usize) {
        self.draw_passes = self.draw_passes.saturating_add(1);
        self.elements_drawn = self.elements_drawn.saturating_add(elements as u64);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            placements: self.placements,
            conflicts: self.conflicts,
            invalid_positions: self.invalid_positions,
            seals: self.seals,
            stash_overwrites: self.stash_overwrites,
            draw_passes: self.draw_passes,
            elements_drawn: self.elements_drawn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub placements: u64,
    pub conflicts: u64,
    pub invalid_positions: u64,
    pub seals: u64,
    pub stash_overwrites: u64,
    pub draw_passes: u64,
    pub elements_drawn: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("placements".to_string(), json!(self.placements));
        map.insert("conflicts".to_string(), json!(self.conflicts));
        map.insert("invalid_positions".to_string(), json!(self.invalid_positions));
        map.insert("seals".to_string(), json!(self.seals));
        map.insert("stash_overwrites".to_string(), json!(self.stash_overwrites));
        map.insert("draw_passes".to_string(), json!(self.draw_passes));
        map.insert("elements_drawn".to_string(), json!(self.elements_drawn));
        map
    }
}
