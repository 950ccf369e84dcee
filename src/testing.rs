//! Fixtures shared by unit tests.

use crate::solution::{Placement, Route, Routing, Solution};
use crate::topology::{Topology, TopologyBuilder};

/// `n` nodes in a line with one server each and a chain `0 -> 1 -> 2`.
pub fn line_topology(n: usize, bandwidth: f64, latency: f64) -> Topology {
    let mut b = TopologyBuilder::new(2);
    for _ in 0..n {
        b = b.node(5.0);
    }
    for i in 1..n {
        b = b.link(i - 1, i, bandwidth, 2.0, 1.0);
    }
    for i in 0..n {
        b = b.server(i, 10.0, 30.0, vec![10.0, 10.0]);
    }
    b.component(vec![2.0, 2.0])
        .component(vec![2.0, 2.0])
        .component(vec![2.0, 2.0])
        .chain(vec![0, 1, 2], latency)
        .demand(0, 1, 4.0)
        .demand(1, 2, 4.0)
        .build()
        .unwrap()
}

/// Two nodes, one link, one server per node, two weightless components.
///
/// Node powers 3 and 4, link power 7, server `pmin` 10 and 11.
pub fn two_node_topology(latency: f64) -> Topology {
    TopologyBuilder::new(1)
        .node(3.0)
        .node(4.0)
        .link(0, 1, 100.0, 7.0, 1.0)
        .server(0, 10.0, 20.0, vec![10.0])
        .server(1, 11.0, 20.0, vec![10.0])
        .component(vec![0.0])
        .component(vec![0.0])
        .chain(vec![0, 1], latency)
        .demand(0, 1, 1.0)
        .build()
        .unwrap()
}

/// Four nodes in a line; chains `[0, 1, 2]` (latency 8) and `[0, 1, 3]`
/// (latency 5) share the pair `(0, 1)`, whose demand equals the capacity
/// of every link.
pub fn shared_pair_topology() -> Topology {
    let mut b = TopologyBuilder::new(2);
    for _ in 0..4 {
        b = b.node(1.0);
    }
    for i in 1..4 {
        b = b.link(i - 1, i, 3.0, 1.0, 1.0);
    }
    for i in 0..4 {
        b = b.server(i, 2.0, 6.0, vec![10.0, 10.0]);
    }
    for _ in 0..4 {
        b = b.component(vec![2.0, 2.0]);
    }
    b.chain(vec![0, 1, 2], 8.0)
        .chain(vec![0, 1, 3], 5.0)
        .demand(0, 1, 3.0)
        .demand(1, 2, 2.0)
        .demand(1, 3, 2.0)
        .build()
        .unwrap()
}

/// Six-node ring with two chords, one server per node plus a large server
/// on node 0, six components and two chains.
///
/// Bandwidth and latency are loose enough that every simple path
/// satisfies them.
pub fn mesh_topology() -> Topology {
    mesh_topology_relabelled(&[0, 1, 2, 3, 4, 5])
}

/// [`mesh_topology`] with node `i` renamed to `perm[i]`.
pub fn mesh_topology_relabelled(perm: &[usize]) -> Topology {
    let node_power = [4.0, 4.0, 4.0, 4.0, 4.0, 4.0];
    let mut nodes = vec![0.0; 6];
    for (i, &p) in node_power.iter().enumerate() {
        nodes[perm[i]] = p;
    }

    let mut b = TopologyBuilder::new(2);
    for p in nodes {
        b = b.node(p);
    }
    let links = [
        (0, 1, 3.0, 1.0),
        (1, 2, 3.0, 1.0),
        (2, 3, 3.0, 1.0),
        (3, 4, 3.0, 1.0),
        (4, 5, 3.0, 1.0),
        (5, 0, 3.0, 1.0),
        (0, 3, 6.0, 1.0),
        (1, 4, 6.0, 2.0),
    ];
    for (a, c, power, delay) in links {
        b = b.link(perm[a], perm[c], 30.0, power, delay);
    }
    for i in 0..6 {
        b = b.server(perm[i], 8.0, 20.0, vec![10.0, 16.0]);
    }
    b = b.server(perm[0], 12.0, 30.0, vec![20.0, 32.0]);

    for cpu in [3.0, 2.0, 4.0, 3.0, 2.0, 3.0] {
        b = b.component(vec![cpu, 4.0]);
    }
    b.chain(vec![0, 1, 2, 3], 20.0)
        .chain(vec![4, 1, 5], 15.0)
        .demand(0, 1, 5.0)
        .demand(1, 2, 4.0)
        .demand(2, 3, 5.0)
        .demand(4, 1, 3.0)
        .demand(1, 5, 4.0)
        .build()
        .unwrap()
}

/// A hand-routed valid solution for [`mesh_topology_relabelled`].
///
/// Component `i` sits on server `i`. Its power is 110.4.
pub fn mesh_solution_relabelled(perm: &[usize]) -> Solution {
    let paths: [(usize, usize, &[usize]); 5] = [
        (0, 1, &[0, 1]),
        (1, 2, &[1, 2]),
        (2, 3, &[2, 3]),
        (4, 1, &[4, 1]),
        (1, 5, &[1, 0, 5]),
    ];
    let mut routing = Routing::new();
    for (from, to, nodes) in paths {
        routing.insert(Route::new(from, to, nodes.iter().map(|&n| perm[n]).collect()));
    }
    Solution::new(Placement::new(vec![0, 1, 2, 3, 4, 5]), routing)
}

pub fn mesh_solution() -> Solution {
    mesh_solution_relabelled(&[0, 1, 2, 3, 4, 5])
}

/// Components that cannot fit on any server.
pub fn overloaded_topology() -> Topology {
    TopologyBuilder::new(1)
        .node(1.0)
        .node(1.0)
        .link(0, 1, 10.0, 1.0, 1.0)
        .server(0, 1.0, 2.0, vec![1.0])
        .server(1, 1.0, 2.0, vec![1.0])
        .component(vec![2.0])
        .component(vec![0.5])
        .chain(vec![0, 1], 10.0)
        .build()
        .unwrap()
}
