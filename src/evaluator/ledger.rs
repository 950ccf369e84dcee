//! Per-server remaining capacity.

use super::EPSILON;
use crate::topology::{Component, Topology};

/// Remaining resource capacity of every server.
///
/// Placing a component subtracts its demand vector from its server;
/// removing it adds the vector back.
#[derive(Debug, Clone)]
pub struct ResourceLedger {
    remaining: Vec<Vec<f64>>,
    hosted: Vec<usize>,
}

impl ResourceLedger {
    /// Starts with every server empty.
    pub fn new(topology: &Topology) -> Self {
        let servers = topology.network().servers();
        Self {
            remaining: servers.iter().map(|s| s.resources.clone()).collect(),
            hosted: vec![0; servers.len()],
        }
    }

    /// Whether `server` can still host `component` on every resource.
    pub fn fits(&self, server: usize, component: &Component) -> bool {
        self.remaining[server]
            .iter()
            .zip(&component.demands)
            .all(|(&left, &need)| left + EPSILON >= need)
    }

    pub fn place(&mut self, server: usize, component: &Component) {
        for (left, need) in self.remaining[server].iter_mut().zip(&component.demands) {
            *left -= need;
        }
        self.hosted[server] += 1;
    }

    pub fn remove(&mut self, server: usize, component: &Component) {
        for (left, need) in self.remaining[server].iter_mut().zip(&component.demands) {
            *left += need;
        }
        self.hosted[server] -= 1;
    }

    pub fn remaining(&self, server: usize) -> &[f64] {
        &self.remaining[server]
    }

    /// Whether `server` hosts no component.
    pub fn is_idle(&self, server: usize) -> bool {
        self.hosted[server] == 0
    }

    /// First `(resource, remaining)` of `server` that went below zero.
    pub fn overdrawn(&self, server: usize) -> Option<(usize, f64)> {
        self.remaining[server]
            .iter()
            .enumerate()
            .find(|(_, &left)| left < -EPSILON)
            .map(|(r, &left)| (r, left))
    }
}
