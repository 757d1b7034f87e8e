//! Holder and availability accounting over the checkout ledger
//!
//! Everything here is a pure function of the event history. Nothing is logged
//! and nothing touches storage. An actor's net count is checkouts minus
//! check-ins, so the result does not depend on event order.

use std::collections::BTreeMap;

use crate::models::{tool::HolderEntry, CheckoutAction, CheckoutEvent, ToolId};

/// Net checkout counts per actor for one tool.
///
/// Actors whose net count is zero or negative hold nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolderSet {
    net: BTreeMap<String, i64>,
}

fn units(net: i64) -> u32 {
    u32::try_from(net.max(0)).unwrap_or(u32::MAX)
}

impl HolderSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total units outstanding across all holders
    pub fn len(&self) -> u32 {
        self.iter().map(|(_, units)| units).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn units_held_by(&self, actor: &str) -> u32 {
        self.net.get(actor).copied().map(units).unwrap_or(0)
    }

    pub fn holds(&self, actor: &str) -> bool {
        self.units_held_by(actor) > 0
    }

    /// Holders in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.net
            .iter()
            .filter(|(_, net)| **net > 0)
            .map(|(name, net)| (name.as_str(), units(*net)))
    }

    /// Each holder repeated once per unit held
    pub fn to_multiset(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(name, units)| std::iter::repeat(name.to_string()).take(units as usize))
            .collect()
    }

    pub fn entries(&self) -> Vec<HolderEntry> {
        self.iter()
            .map(|(name, units)| HolderEntry {
                name: name.to_string(),
                units,
            })
            .collect()
    }

    /// Apply one more event of the same tool
    pub fn apply(&mut self, actor: &str, action: CheckoutAction) {
        let net = self.net.entry(actor.to_string()).or_insert(0);
        match action {
            CheckoutAction::CheckOut => *net += 1,
            CheckoutAction::CheckIn => *net -= 1,
        }
        if *net == 0 {
            self.net.remove(actor);
        }
    }
}

/// Current holders of one tool
pub fn holders<'a, I>(events: I) -> HolderSet
where
    I: IntoIterator<Item = &'a CheckoutEvent>,
{
    let mut set = HolderSet::empty();
    for event in events {
        set.apply(&event.actor_name, event.action);
    }
    set
}

/// Units free to check out, never negative
pub fn available(total_quantity: i32, holders: &HolderSet) -> u32 {
    let free = i64::from(total_quantity) - i64::from(holders.len());
    u32::try_from(free.max(0)).unwrap_or(u32::MAX)
}

/// Units one actor holds per tool, given that actor's events
pub fn outstanding_by_tool<'a, I>(events: I) -> BTreeMap<ToolId, u32>
where
    I: IntoIterator<Item = &'a CheckoutEvent>,
{
    let mut net: BTreeMap<ToolId, i64> = BTreeMap::new();
    for event in events {
        let count = net.entry(event.tool_id).or_insert(0);
        match event.action {
            CheckoutAction::CheckOut => *count += 1,
            CheckoutAction::CheckIn => *count -= 1,
        }
    }
    net.into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(tool_id, count)| (tool_id, units(count)))
        .collect()
}
