use std::collections::HashMap;

use serde_json::Value;

use crate::models::{EventType, HistoryEvent};

/// A click counts as much as this many views
pub const CLICK_WEIGHT: usize = 3;

/// Product weights derived from the interaction history
///
/// Remembers the order in which ids first appeared so that ties resolve to the
/// earliest one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedCounts {
    order: Vec<String>,
    weights: HashMap<String, u32>,
}

impl WeightedCounts {
    fn record(&mut self, id: &str) {
        match self.weights.get_mut(id) {
            Some(weight) => *weight += 1,
            None => {
                self.order.push(id.to_string());
                self.weights.insert(id.to_string(), 1);
            }
        }
    }

    pub fn weight(&self, id: &str) -> u32 {
        self.weights.get(id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Highest-weight id, earliest first among equals
    pub fn most_frequent(&self) -> Option<&str> {
        let mut best: Option<(&str, u32)> = None;
        for id in &self.order {
            let weight = self.weight(id);
            if best.map_or(true, |(_, top)| weight > top) {
                best = Some((id.as_str(), weight));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Result of reducing the raw history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryAnalysis {
    pub viewed: Vec<String>,
    pub clicked: Vec<String>,
    pub counts: WeightedCounts,
}

impl HistoryAnalysis {
    pub fn was_clicked(&self, id: &str) -> bool {
        self.clicked.iter().any(|clicked| clicked == id)
    }
}

/// Analyzes raw history entries, skipping the malformed ones
pub fn analyze_history(entries: &[Value]) -> HistoryAnalysis {
    let events: Vec<HistoryEvent> = entries
        .iter()
        .filter_map(|entry| {
            let event = HistoryEvent::from_value(entry);
            if event.is_none() {
                tracing::debug!(entry = %entry, "Skipping malformed history entry");
            }
            event
        })
        .collect();

    analyze_events(&events)
}

/// Weighs clicks ahead of views: `clicked x 3 ++ viewed`, then counts
pub fn analyze_events(events: &[HistoryEvent]) -> HistoryAnalysis {
    let mut viewed = Vec::new();
    let mut clicked = Vec::new();

    for event in events {
        match event.event_type {
            EventType::View => viewed.push(event.product_id.clone()),
            EventType::Click => clicked.push(event.product_id.clone()),
        }
    }

    let mut counts = WeightedCounts::default();
    for _ in 0..CLICK_WEIGHT {
        clicked.iter().for_each(|id| counts.record(id));
    }
    viewed.iter().for_each(|id| counts.record(id));

    HistoryAnalysis {
        viewed,
        clicked,
        counts,
    }
}
