//! Assignment of components to servers.

/// `servers()[c]` is the server hosting component `c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    servers: Vec<usize>,
}

impl Placement {
    pub fn new(servers: Vec<usize>) -> Self {
        Self { servers }
    }

    /// Server hosting `component`.
    pub fn server_of(&self, component: usize) -> usize {
        self.servers[component]
    }

    /// Moves `component` to `server`.
    pub fn assign(&mut self, component: usize, server: usize) {
        self.servers[component] = server;
    }

    /// Exchanges the servers of two components.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.servers.swap(a, b);
    }

    pub fn servers(&self) -> &[usize] {
        &self.servers
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_and_swap() {
        let mut p = Placement::new(vec![0, 1, 2]);
        p.assign(0, 2);
        assert_eq!(p.servers(), &[2, 1, 2]);
        p.swap(0, 1);
        assert_eq!(p.server_of(0), 1);
        assert_eq!(p.server_of(1), 2);
    }
}
