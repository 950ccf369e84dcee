//! Virtual network functions and the service chains that link them.

/// A software component that must be hosted on a server.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub index: usize,
    /// Demand per resource, aligned with [`Server::resources`](super::Server::resources).
    pub demands: Vec<f64>,
}

/// An ordered sequence of components with an end-to-end latency budget.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceChain {
    pub index: usize,
    pub components: Vec<usize>,
    pub latency: f64,
}

impl ServiceChain {
    /// Consecutive `(from, to)` component pairs, in chain order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.components.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_pairs() {
        let chain = ServiceChain {
            index: 0,
            components: vec![2, 0, 3],
            latency: 10.0,
        };
        let pairs: Vec<_> = chain.pairs().collect();
        assert_eq!(pairs, vec![(2, 0), (0, 3)]);
    }

    #[test]
    fn test_single_component_chain_has_no_pairs() {
        let chain = ServiceChain {
            index: 0,
            components: vec![4],
            latency: 1.0,
        };
        assert_eq!(chain.pairs().count(), 0);
        assert!(!chain.is_empty());
    }
}
