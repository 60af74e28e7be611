//! Crawl phase tracking
//!
//! The orchestrator moves through these phases as each enumerator level is
//! exhausted. Per-complex and per-building errors return control to the next
//! sibling at the same level and never change the outer phase.

use std::fmt;

/// The orchestrator's position in the crawl lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Configuration loaded, no network activity yet
    Init,

    /// Fetching the region dictionary
    EnumeratingRegions,

    /// Listing the complexes of the current region
    EnumeratingComplexes,

    /// Listing and fetching the buildings of the current region's complexes
    EnumeratingBuildings,

    /// Draining the accumulation buffer to durable storage
    Flushing,

    /// Run finished; statistics are final
    Done,
}

impl CrawlPhase {
    /// Returns true if the transition to `next` is a legal phase change
    pub fn can_transition(self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;
        matches!(
            (self, next),
            (Init, EnumeratingRegions)
                | (EnumeratingRegions, EnumeratingComplexes)
                | (EnumeratingRegions, Done)
                | (EnumeratingComplexes, EnumeratingBuildings)
                | (EnumeratingBuildings, Flushing)
                | (Flushing, EnumeratingComplexes)
                | (Flushing, Done)
        )
    }

    /// Returns true once the run can make no further progress
    pub fn is_terminal(self) -> bool {
        matches!(self, CrawlPhase::Done)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrawlPhase::Init => "init",
            CrawlPhase::EnumeratingRegions => "enumerating-regions",
            CrawlPhase::EnumeratingComplexes => "enumerating-complexes",
            CrawlPhase::EnumeratingBuildings => "enumerating-buildings",
            CrawlPhase::Flushing => "flushing",
            CrawlPhase::Done => "done",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::CrawlPhase::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(Init.can_transition(EnumeratingRegions));
        assert!(EnumeratingRegions.can_transition(EnumeratingComplexes));
        assert!(EnumeratingComplexes.can_transition(EnumeratingBuildings));
        assert!(EnumeratingBuildings.can_transition(Flushing));
        assert!(Flushing.can_transition(EnumeratingComplexes));
        assert!(Flushing.can_transition(Done));
    }

    #[test]
    fn test_empty_catalog_finishes_from_region_enumeration() {
        assert!(EnumeratingRegions.can_transition(Done));
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        assert!(!Init.can_transition(Done));
        assert!(!Done.can_transition(EnumeratingRegions));
        assert!(!EnumeratingBuildings.can_transition(EnumeratingRegions));
        assert!(!EnumeratingComplexes.can_transition(Flushing));
    }

    #[test]
    fn test_terminal_phase() {
        assert!(Done.is_terminal());
        assert!(!Flushing.is_terminal());
    }
}
