//! Diffusion Engine
//!
//! Advances every node with a state record by one step. Nodes are visited in
//! graph insertion order; a node sees its own updates immediately but the
//! app-user list is frozen at the start of the step.

use bevy_ecs::prelude::*;
use rand::Rng;

use crate::components::{DistressTick, Network, NodeId, NodeState};
use crate::config::RateConfig;
use crate::output::metrics::MetricsCollector;
use crate::SimRng;

use super::probability::{chance, consistency};

/// Aggregate counts produced by one step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Nodes still distressed at the end of their update
    pub distressed: usize,
    /// App users frozen at the start of the step
    pub app_users_at_start: usize,
}

/// Resource: app users frozen at the start of the current step
#[derive(Resource, Debug, Default)]
pub struct AppUserSnapshot {
    pub ids: Vec<NodeId>,
}

/// Resource: outcome of the most recent step
#[derive(Resource, Debug, Default)]
pub struct StepTally {
    pub steps: usize,
    pub last: Option<StepOutcome>,
}

/// Recovery shared by both recovery branches.
fn recover<R: Rng + ?Sized>(state: &mut NodeState, rates: &RateConfig, rng: &mut R) {
    state.recover();
    if chance(rng, rates.app_recovery_stop_rate) {
        state.app = false;
    }
}

/// Applies the full update rule to one node. Returns whether it ends the
/// step distressed.
fn update_node<R: Rng + ?Sized>(
    state: &mut NodeState,
    neighbors: impl Iterator<Item = NodeId>,
    app_users: &[NodeId],
    social_proof: f64,
    rates: &RateConfig,
    rng: &mut R,
) -> bool {
    // Distress transition: first matching branch only.
    if state.distress
        && chance(rng, rates.base_recovery_rate * rates.willingness(state.distress_count))
    {
        recover(state, rates, rng);
    } else if rates.app_communication
        && state.distress
        && state.app
        && chance(
            rng,
            rates.app_distress_recovery_rate * rates.willingness(state.distress_count),
        )
    {
        recover(state, rates, rng);
    } else if !state.distress && chance(rng, rates.base_distress_rate) {
        state.distress = true;
    }

    // Abandonment
    if chance(rng, consistency(state.app_count)) {
        state.app = false;
    }

    // Adoption under local and global persuasion
    if state.distress {
        let pull = rates.local_liking(state.trust.len()) + social_proof;
        if chance(rng, pull * rates.willingness(state.distress_count)) {
            state.app = true;
        }
    }

    // distress_count is fixed from here until the tick below.
    let willingness = rates.willingness(state.distress_count);

    // Only contacts logged before this step can turn into trust.
    let known = state.talking.len();
    for position in 0..known {
        if chance(rng, rates.trust_rate * willingness) {
            let peer = state.talking[position];
            state.trust.push(peer);
        }
    }

    for neighbor in neighbors {
        if chance(rng, rates.base_talking_rate * willingness) {
            state.talking.push(neighbor);
        }
    }

    if rates.app_communication {
        for &user in app_users {
            if chance(rng, rates.app_talking_rate * willingness) {
                state.talking.push(user);
            }
        }
    }

    let tick = DistressTick::classify(state.distress, state.is_engaged());
    state.distress_count = tick.apply(state.distress_count);

    if state.app {
        state.app_count = state.app_count.saturating_add(1);
    }
    tick.is_distressed()
}

/// Advances the network one step against a frozen app-user list.
pub fn advance<R: Rng + ?Sized>(
    network: &mut Network,
    rates: &RateConfig,
    app_users: &[NodeId],
    rng: &mut R,
) -> StepOutcome {
    let population = network.node_count();
    let mut outcome = StepOutcome {
        distressed: 0,
        app_users_at_start: app_users.len(),
    };
    if population == 0 {
        return outcome;
    }
    let social_proof = rates.global_proof(app_users.len() as f64 / population as f64);

    let Network { graph, states } = network;
    for (slot, entry) in states.iter_mut().enumerate() {
        let Some(state) = entry.as_mut() else {
            continue;
        };
        let neighbors = graph
            .neighbor_slots(slot)
            .iter()
            .filter_map(|&n| graph.id_at(n));
        if update_node(state, neighbors, app_users, social_proof, rates, rng) {
            outcome.distressed += 1;
        }
    }
    outcome
}

/// Freezes the app users and advances one step.
pub fn step<R: Rng + ?Sized>(network: &mut Network, rates: &RateConfig, rng: &mut R) -> StepOutcome {
    let app_users = network.app_user_ids();
    advance(network, rates, &app_users, rng)
}

/// System: Freeze the app-user list for this step
pub fn freeze_app_users(network: Res<Network>, mut snapshot: ResMut<AppUserSnapshot>) {
    snapshot.ids = network.app_user_ids();
}

/// System: Advance every node by one step
pub fn diffuse(
    mut network: ResMut<Network>,
    rates: Res<RateConfig>,
    snapshot: Res<AppUserSnapshot>,
    mut rng: ResMut<SimRng>,
    mut tally: ResMut<StepTally>,
) {
    let outcome = advance(&mut network, &rates, &snapshot.ids, &mut rng.0);
    tracing::debug!(
        step = tally.steps,
        distressed = outcome.distressed,
        app_users = outcome.app_users_at_start,
        "Advanced diffusion"
    );
    tally.steps += 1;
    tally.last = Some(outcome);
}

/// System: Append the step's counts to the series
pub fn record_metrics(tally: Res<StepTally>, mut metrics: ResMut<MetricsCollector>) {
    if let Some(outcome) = &tally.last {
        metrics.record_step(outcome);
    }
}
