//! Node State Components
//!
//! Per-node distress/app record and the end-of-step counter transition.

use distress_events::NodeColor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a network participant as it appears in ego files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId(id)
    }
}

/// State carried by every node that has a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeState {
    /// Currently in distress
    pub distress: bool,
    /// Currently using the app
    pub app: bool,
    /// Steps spent distressed without contact or app engagement
    pub distress_count: u32,
    /// Steps ended with the app in use; never reset
    pub app_count: u32,
    /// Append-only log of peers talked to (duplicates kept)
    pub talking: Vec<NodeId>,
    /// Append-only log of trusted peers, sampled from `talking`
    pub trust: Vec<NodeId>,
}

impl NodeState {
    pub fn new(distress: bool, app: bool) -> Self {
        Self {
            distress,
            app,
            ..Self::default()
        }
    }

    /// Leave distress and clear the stagnation counter.
    pub fn recover(&mut self) {
        self.distress = false;
        self.distress_count = 0;
    }

    /// True when the node uses the app or has any social contact on record.
    pub fn is_engaged(&self) -> bool {
        self.app || !self.talking.is_empty() || !self.trust.is_empty()
    }

    pub fn color(&self) -> NodeColor {
        NodeColor::classify(self.distress, self.app)
    }
}

/// End-of-step transition of `distress_count`
///
/// A step applies, in order: +1 if distressed, reset to 0 if engaged, then +1
/// again if still distressed. Since distress cannot change between those
/// checks the sequence collapses to one of four outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistressTick {
    /// Not distressed, not engaged: counter untouched.
    Idle,
    /// Not distressed, engaged: counter cleared.
    Cleared,
    /// Distressed but engaged: cleared, then the trailing increment.
    Restarted,
    /// Distressed and isolated: both increments land.
    Stagnating,
}

impl DistressTick {
    pub fn classify(distressed: bool, engaged: bool) -> Self {
        match (distressed, engaged) {
            (false, false) => DistressTick::Idle,
            (false, true) => DistressTick::Cleared,
            (true, true) => DistressTick::Restarted,
            (true, false) => DistressTick::Stagnating,
        }
    }

    /// New counter value after this transition.
    pub fn apply(self, count: u32) -> u32 {
        match self {
            DistressTick::Idle => count,
            DistressTick::Cleared => 0,
            DistressTick::Restarted => 1,
            DistressTick::Stagnating => count.saturating_add(2),
        }
    }

    /// Whether the node counts toward the step's distress tally.
    pub fn is_distressed(self) -> bool {
        matches!(self, DistressTick::Restarted | DistressTick::Stagnating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The literal sequence the transition table replaces.
    fn sequential(count: u32, distressed: bool, engaged: bool) -> u32 {
        let mut count = count;
        if distressed {
            count += 1;
        }
        if engaged {
            count = 0;
        }
        if distressed {
            count += 1;
        }
        count
    }

    #[test]
    fn test_tick_matches_sequential_updates() {
        for count in [0, 1, 5, 40] {
            for distressed in [false, true] {
                for engaged in [false, true] {
                    let tick = DistressTick::classify(distressed, engaged);
                    assert_eq!(
                        tick.apply(count),
                        sequential(count, distressed, engaged),
                        "count={count} distressed={distressed} engaged={engaged}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_isolated_distress_increments_twice() {
        // Two increments per isolated distressed step is the modeled behavior.
        let tick = DistressTick::classify(true, false);
        assert_eq!(tick, DistressTick::Stagnating);
        assert_eq!(tick.apply(0), 2);
        assert_eq!(tick.apply(3), 5);
        assert!(tick.is_distressed());
    }

    #[test]
    fn test_engaged_distress_restarts_at_one() {
        assert_eq!(DistressTick::classify(true, true).apply(17), 1);
        assert_eq!(DistressTick::classify(false, true).apply(17), 0);
        assert!(!DistressTick::Cleared.is_distressed());
    }

    #[test]
    fn test_counter_saturates() {
        assert_eq!(DistressTick::Stagnating.apply(u32::MAX - 1), u32::MAX);
    }

    #[test]
    fn test_engagement() {
        let mut state = NodeState::new(true, false);
        assert!(!state.is_engaged());

        state.talking.push(NodeId(4));
        assert!(state.is_engaged());

        let lonely_user = NodeState::new(false, true);
        assert!(lonely_user.is_engaged());
    }

    #[test]
    fn test_recover() {
        let mut state = NodeState::new(true, true);
        state.distress_count = 9;
        state.recover();

        assert!(!state.distress);
        assert_eq!(state.distress_count, 0);
        assert!(state.app, "recovery alone leaves the app flag alone");
    }

    #[test]
    fn test_color() {
        assert_eq!(NodeState::new(true, false).color(), NodeColor::Red);
        assert_eq!(NodeState::new(false, false).color(), NodeColor::Blue);
    }
}
