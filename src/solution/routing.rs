//! Network paths carrying traffic between component pairs.

use std::collections::BTreeMap;
use std::fmt;

/// Path carrying the traffic from one component to the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub from: usize,
    pub to: usize,
    nodes: Vec<usize>,
}

impl Route {
    /// Builds a route over `nodes`.
    ///
    /// A path that starts and ends on the same node collapses to that
    /// single node: both components are reachable without crossing a link.
    ///
    /// # Panics
    /// Panics if `nodes` is empty.
    pub fn new(from: usize, to: usize, nodes: Vec<usize>) -> Self {
        assert!(!nodes.is_empty(), "route must contain at least one node");
        let nodes = if nodes.first() == nodes.last() {
            vec![nodes[0]]
        } else {
            nodes
        };
        Self { from, to, nodes }
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub fn start(&self) -> usize {
        self.nodes[0]
    }

    pub fn end(&self) -> usize {
        self.nodes[self.nodes.len() - 1]
    }

    /// Consecutive node pairs, one per traversed link.
    pub fn hops(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }

    /// Whether both components sit on the same node.
    pub fn is_local(&self) -> bool {
        self.nodes.len() == 1
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{},[", self.from + 1, self.to + 1)?;
        for (i, n) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", n + 1)?;
        }
        f.write_str("]>")
    }
}

/// Routes keyed by ordered `(from, to)` component pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Routing {
    routes: BTreeMap<(usize, usize), Route>,
}

impl Routing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, route: Route) {
        self.routes.insert((route.from, route.to), route);
    }

    pub fn get(&self, from: usize, to: usize) -> Option<&Route> {
        self.routes.get(&(from, to))
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_collapses_same_endpoints() {
        let r = Route::new(0, 1, vec![3, 4, 3]);
        assert_eq!(r.nodes(), &[3]);
        assert!(r.is_local());
        assert_eq!(r.hops().count(), 0);
    }

    #[test]
    fn test_route_hops() {
        let r = Route::new(0, 1, vec![0, 2, 5]);
        let hops: Vec<_> = r.hops().collect();
        assert_eq!(hops, vec![(0, 2), (2, 5)]);
        assert_eq!(r.start(), 0);
        assert_eq!(r.end(), 5);
    }

    #[test]
    fn test_route_display_one_based() {
        let r = Route::new(0, 2, vec![0, 1]);
        assert_eq!(r.to_string(), "<1,3,[1,2]>");
    }

    #[test]
    #[should_panic]
    fn test_empty_route_panics() {
        Route::new(0, 1, Vec::new());
    }

    #[test]
    fn test_routing_replaces_same_pair() {
        let mut routing = Routing::new();
        routing.insert(Route::new(0, 1, vec![0, 1]));
        routing.insert(Route::new(0, 1, vec![0, 2, 1]));
        assert_eq!(routing.len(), 1);
        assert_eq!(routing.get(0, 1).unwrap().nodes(), &[0, 2, 1]);
        assert!(routing.get(1, 0).is_none());
    }
}
