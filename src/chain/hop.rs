//! Hop counting and chain termination.
//!
//! Pure per-request logic: parse the incoming count, increment exactly
//! once, compare against the hop limit. No state is retained between
//! requests.

/// Parse an incoming hop count, defaulting to 0 when absent or invalid.
pub fn parse_count(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Outcome of advancing the hop index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopDecision {
    /// The chain ends at this node; carries the final hop count.
    Terminal(u32),
    /// Forward to the next hop with this count.
    Forward(u32),
}

/// Hop limit policy for one node.
#[derive(Debug, Clone, Copy)]
pub struct HopCounter {
    max_hops: u32,
}

impl HopCounter {
    pub fn new(max_hops: u32) -> Self {
        Self { max_hops }
    }

    /// Increment the incoming count and decide termination.
    pub fn advance(&self, incoming: u32) -> HopDecision {
        let next = incoming.saturating_add(1);
        if next >= self.max_hops {
            HopDecision::Terminal(next)
        } else {
            HopDecision::Forward(next)
        }
    }
}
