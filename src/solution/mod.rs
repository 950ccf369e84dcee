//! Candidate answers: placements, routings and their pairing.
//!
//! A [`Solution`] is internally consistent by construction (the routing
//! was computed for that placement) but not necessarily valid; use the
//! [`Evaluator`](crate::evaluator::Evaluator) to check it.
//!
//! The `Display` output is the textual form written by checkpoints: the
//! placement as one-hot server rows and the routing as
//! `<from,to,[node,...]>` tuples, all indices 1-based.

mod placement;
mod routing;

use std::fmt;

pub use placement::Placement;
pub use routing::{Route, Routing};

/// A placement together with the routing computed for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub placement: Placement,
    pub routing: Routing,
}

impl Solution {
    pub fn new(placement: Placement, routing: Routing) -> Self {
        Self { placement, routing }
    }

    /// Writes the checkpoint form, given the number of servers needed for
    /// the one-hot rows.
    pub fn display(&self, num_servers: usize) -> SolutionDisplay<'_> {
        SolutionDisplay {
            solution: self,
            num_servers,
        }
    }
}

/// Checkpoint formatting of a [`Solution`].
pub struct SolutionDisplay<'a> {
    solution: &'a Solution,
    num_servers: usize,
}

impl fmt::Display for SolutionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "x=[")?;
        let placement = &self.solution.placement;
        for (c, &server) in placement.servers().iter().enumerate() {
            f.write_str("[")?;
            for s in 0..self.num_servers {
                if s > 0 {
                    f.write_str(",")?;
                }
                f.write_str(if s == server { "1" } else { "0" })?;
            }
            f.write_str("]")?;
            if c + 1 < placement.len() {
                f.write_str(",")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "];")?;
        writeln!(f)?;

        writeln!(f, "routes={{")?;
        let n = self.solution.routing.len();
        for (i, route) in self.solution.routing.routes().enumerate() {
            write!(f, "{route}")?;
            if i + 1 < n {
                f.write_str(",")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "}};")
    }
}
