//! Aggregate risk statistics, recomputed on demand from current events

use collision_avoidance::{ConjunctionEvent, RiskLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    Nominal,
    Elevated,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskStatistics {
    pub total_events: usize,
    pub critical_count: usize,
    pub warning_count: usize,
    pub low_count: usize,
    pub safe_count: usize,
    /// Rounded mean score; 0 with no events
    pub average_risk_score: u8,
    /// Highest score; the earliest in catalog order on ties
    pub highest_risk: Option<ConjunctionEvent>,
    /// Earliest TCA; the earliest in catalog order on ties
    pub next_tca: Option<ConjunctionEvent>,
    pub system_status: SystemStatus,
}

impl RiskStatistics {
    pub fn from_events(events: &[ConjunctionEvent]) -> Self {
        let count = |level: RiskLevel| events.iter().filter(|e| e.risk_level() == level).count();
        let (critical_count, warning_count, low_count, safe_count) = (
            count(RiskLevel::Critical),
            count(RiskLevel::Warning),
            count(RiskLevel::Low),
            count(RiskLevel::Safe),
        );

        let average_risk_score = if events.is_empty() {
            0
        } else {
            let total: u32 = events.iter().map(|e| e.risk_score() as u32).sum();
            (total as f64 / events.len() as f64).round() as u8
        };

        let mut highest_risk: Option<&ConjunctionEvent> = None;
        let mut next_tca: Option<&ConjunctionEvent> = None;
        for event in events {
            if highest_risk.map_or(true, |best| event.risk_score() > best.risk_score()) {
                highest_risk = Some(event);
            }
            if next_tca.map_or(true, |soonest| event.tca < soonest.tca) {
                next_tca = Some(event);
            }
        }

        let system_status = if critical_count > 0 {
            SystemStatus::Critical
        } else if warning_count > 0 {
            SystemStatus::Elevated
        } else {
            SystemStatus::Nominal
        };

        Self {
            total_events: events.len(),
            critical_count,
            warning_count,
            low_count,
            safe_count,
            average_risk_score,
            highest_risk: highest_risk.cloned(),
            next_tca: next_tca.cloned(),
            system_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::ConjunctionCatalog;
    use chrono::Duration;

    fn banded_events() -> Vec<ConjunctionEvent> {
        ConjunctionCatalog::new(banded_catalog(), epoch())
            .unwrap()
            .events()
            .to_vec()
    }

    #[test]
    fn test_counts_and_average() {
        let stats = RiskStatistics::from_events(&banded_events());
        assert_eq!(stats.total_events, 4);
        assert_eq!(
            (stats.critical_count, stats.warning_count, stats.low_count, stats.safe_count),
            (1, 1, 1, 1)
        );
        // (59 + 33 + 0 + 76) / 4
        assert_eq!(stats.average_risk_score, 42);
        assert_eq!(stats.highest_risk.unwrap().id, "sat-a:deb-c");
        assert_eq!(stats.system_status, SystemStatus::Critical);
    }

    #[test]
    fn test_next_tca_is_earliest() {
        let mut events = banded_events();
        for (i, event) in events.iter_mut().enumerate() {
            event.tca = epoch() + Duration::minutes(40 - 10 * i as i64);
        }
        let stats = RiskStatistics::from_events(&events);
        assert_eq!(stats.next_tca.unwrap().id, "sat-a:deb-c");

        events[1].tca = events[3].tca;
        let stats = RiskStatistics::from_events(&events);
        assert_eq!(stats.next_tca.unwrap().id, "sat-a:deb-a");
    }

    #[test]
    fn test_highest_risk_tie_keeps_first() {
        let mut events = banded_events();
        events[1].assessment.risk_score = 76;
        let stats = RiskStatistics::from_events(&events);
        assert_eq!(stats.highest_risk.unwrap().id, "sat-a:deb-a");
    }

    #[test]
    fn test_system_status() {
        let events = banded_events();
        let without_critical: Vec<_> = events.iter().take(3).cloned().collect();
        assert_eq!(RiskStatistics::from_events(&without_critical).system_status, SystemStatus::Elevated);

        let quiet: Vec<_> = events.iter().skip(1).take(2).cloned().collect();
        assert_eq!(RiskStatistics::from_events(&quiet).system_status, SystemStatus::Nominal);
    }

    #[test]
    fn test_empty() {
        let stats = RiskStatistics::from_events(&[]);
        assert_eq!(stats.total_events, 0);
        assert_eq!(stats.average_risk_score, 0);
        assert!(stats.highest_risk.is_none());
        assert!(stats.next_tca.is_none());
        assert_eq!(stats.system_status, SystemStatus::Nominal);
    }
}
