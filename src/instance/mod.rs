//! Textual instance format.
//!
//! An instance file lists, in this order and skipping blank lines:
//!
//! | field | shape |
//! |---|---|
//! | servers, components, resources, nodes, chains | `name=count;` |
//! | `PMax`, `PMin` | `[server]` |
//! | requirements | `[resource][component]` |
//! | availability | `[resource][server]` |
//! | server placement (one-hot) | `[server][node]` |
//! | chain membership | `[chain][component]` |
//! | `PNode` | `[node]` |
//! | edges `(n1, n2, bandwidth, power, delay)` | one row per link |
//! | demands `(c1, c2, bandwidth)` | one row per pair |
//! | latency | `[chain]` |
//!
//! Arrays sit on one line (`name=[v,v,...];`); matrices open with a
//! `name=[` line, hold one row per line and close on a line containing
//! `];`. Node and component indices in edge and demand rows are 1-based.
//! A chain takes the components with a positive membership value, ordered
//! by value and then by index.

mod reader;

pub use reader::{parse_values, InstanceReader, Row};

use crate::error::ConfigError;
use crate::topology::{Topology, TopologyBuilder};

/// Parses an instance and validates it into a [`Topology`].
///
/// # Examples
///
/// ```
/// use vnf_placer::instance::parse_instance;
///
/// let text = "\
/// servers=1;
/// components=2;
/// resources=1;
/// nodes=1;
/// chains=1;
/// PMax=[50];
/// PMin=[10];
/// requirements=[
/// [2,3]
/// ];
/// availability=[
/// [8]
/// ];
/// placement=[
/// [1]
/// ];
/// chain=[
/// [1,1]
/// ];
/// PNode=[5];
/// edges=[
/// ];
/// demands=[
/// [1,2,4]
/// ];
/// latency=[10];
/// ";
/// let topology = parse_instance(text).unwrap();
/// assert_eq!(topology.demand_pairs(), &[(0, 1)]);
/// assert_eq!(topology.demand(0, 1), 4.0);
/// ```
pub fn parse_instance(text: &str) -> Result<Topology, ConfigError> {
    let mut r = InstanceReader::new(text);

    let num_servers = r.count()?;
    let num_components = r.count()?;
    let num_resources = r.count()?;
    let num_nodes = r.count()?;
    let num_chains = r.count()?;

    let pmax = r.array()?;
    expect_len(&pmax, num_servers, "PMax")?;
    let pmin = r.array()?;
    expect_len(&pmin, num_servers, "PMin")?;

    let requirements = r.matrix()?;
    expect_shape(&r, &requirements, num_resources, num_components, "requirements")?;
    let availability = r.matrix()?;
    expect_shape(&r, &availability, num_resources, num_servers, "availability")?;
    let placement = r.matrix()?;
    expect_shape(&r, &placement, num_servers, num_nodes, "server placement")?;
    let membership = r.matrix()?;
    expect_shape(&r, &membership, num_chains, num_components, "chain membership")?;

    let node_power = r.array()?;
    expect_len(&node_power, num_nodes, "PNode")?;

    let edges = r.matrix()?;
    for row in &edges {
        expect_len(row, 5, "edge")?;
    }
    let demands = r.matrix()?;
    for row in &demands {
        expect_len(row, 3, "demand")?;
    }

    let latency = r.array()?;
    expect_len(&latency, num_chains, "latency")?;
    r.finish()?;

    let mut b = TopologyBuilder::new(num_resources);
    for &power in &node_power.values {
        b = b.node(power);
    }
    for row in &edges {
        let v = &row.values;
        b = b.link(
            one_based(row, v[0], "edge node")?,
            one_based(row, v[1], "edge node")?,
            v[2],
            v[3],
            v[4],
        );
    }
    for (s, row) in placement.iter().enumerate() {
        let node = row
            .values
            .iter()
            .position(|&x| x == 1.0)
            .ok_or(ConfigError::UnattachedServer(s))?;
        let resources = availability.iter().map(|r| r.values[s]).collect();
        b = b.server(node, pmin.values[s], pmax.values[s], resources);
    }
    for c in 0..num_components {
        b = b.component(requirements.iter().map(|r| r.values[c]).collect());
    }
    for (row, &budget) in membership.iter().zip(&latency.values) {
        b = b.chain(chain_order(&row.values), budget);
    }
    for row in &demands {
        let v = &row.values;
        b = b.demand(
            one_based(row, v[0], "demand component")?,
            one_based(row, v[1], "demand component")?,
            v[2],
        );
    }
    b.build()
}

/// Components with a positive membership value, by (value, index).
fn chain_order(membership: &[f64]) -> Vec<usize> {
    let mut members: Vec<(f64, usize)> = membership
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > 0.0)
        .map(|(c, &v)| (v, c))
        .collect();
    members.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    members.into_iter().map(|(_, c)| c).collect()
}

fn expect_len(row: &Row, expected: usize, what: &str) -> Result<(), ConfigError> {
    if row.values.len() == expected {
        return Ok(());
    }
    Err(ConfigError::Parse {
        line: row.line,
        message: format!("{what}: expected {expected} values, found {}", row.values.len()),
    })
}

fn expect_shape(
    r: &InstanceReader<'_>,
    rows: &[Row],
    num_rows: usize,
    num_cols: usize,
    what: &str,
) -> Result<(), ConfigError> {
    if rows.len() != num_rows {
        return Err(r.error(format!("{what}: expected {num_rows} rows, found {}", rows.len())));
    }
    rows.iter().try_for_each(|row| expect_len(row, num_cols, what))
}

fn one_based(row: &Row, value: f64, what: &str) -> Result<usize, ConfigError> {
    if value >= 1.0 && value.fract() == 0.0 {
        return Ok(value as usize - 1);
    }
    Err(ConfigError::Parse {
        line: row.line,
        message: format!("{what}: expected a 1-based index, found {value}"),
    })
}
