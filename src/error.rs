//! Error types.
//!
//! Search-local infeasibility (no placement found, no route for a demand
//! pair) is never an error; it is reported as `None` by the placers and
//! routers. The enums here cover the remaining failure classes:
//!
//! - [`ConfigError`]: malformed or inconsistent instance data, raised while
//!   building a [`Topology`](crate::topology::Topology).
//! - [`SolutionError`]: an invariant violated by a solution that was
//!   supposed to be valid. Indicates a bug in placement or routing.
//! - [`SearchError`]: the orchestrator could not be started.

use thiserror::Error;

/// Invalid problem-instance data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{what} {index} has invalid value {value}")]
    InvalidValue {
        what: &'static str,
        index: usize,
        value: f64,
    },

    #[error("{what}: expected {expected} entries, found {found}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("server {server}: pmax {pmax} is below pmin {pmin}")]
    PowerRange { server: usize, pmin: f64, pmax: f64 },

    #[error("duplicate link between nodes {0} and {1}")]
    DuplicateLink(usize, usize),

    #[error("link {0} connects node {1} to itself")]
    SelfLoop(usize, usize),

    #[error("service chain {chain} repeats component {component} consecutively")]
    RepeatedComponent { chain: usize, component: usize },

    #[error("server {0} is not attached to any node")]
    UnattachedServer(usize),

    #[error("topology has no {0}")]
    Empty(&'static str),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Invariant violated by a supposedly valid solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolutionError {
    #[error("placement covers {found} components, topology has {expected}")]
    PlacementSize { expected: usize, found: usize },

    #[error("component {component} placed on unknown server {server}")]
    UnknownServer { component: usize, server: usize },

    #[error("server {server} over capacity on resource {resource} ({remaining} left)")]
    Capacity {
        server: usize,
        resource: usize,
        remaining: f64,
    },

    #[error("no route for demand pair ({from}, {to})")]
    MissingRoute { from: usize, to: usize },

    #[error("route ({from}, {to}) does not match any demand pair")]
    UnexpectedRoute { from: usize, to: usize },

    #[error("route ({from}, {to}) should run from node {expected_start} to {expected_end}, runs {start} -> {end}")]
    Endpoints {
        from: usize,
        to: usize,
        expected_start: usize,
        expected_end: usize,
        start: usize,
        end: usize,
    },

    #[error("route ({from}, {to}) hops between unlinked nodes {a} and {b}")]
    MissingLink {
        from: usize,
        to: usize,
        a: usize,
        b: usize,
    },

    #[error("service chain {chain} accumulates delay {delay}, budget {budget}")]
    Latency { chain: usize, delay: f64, budget: f64 },

    #[error("link {link} over bandwidth ({remaining} left)")]
    Bandwidth { link: usize, remaining: f64 },
}

/// The orchestrator could not run.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
