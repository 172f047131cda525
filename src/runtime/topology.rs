use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::graph::{Graph, Link};

/// Display metadata carried by topology files; the search never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterInfo {
    pub name: String,
    pub number: u32,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    pub vertex_count: usize,
    pub links: Vec<Link>,
    #[serde(default)]
    pub routers: Vec<RouterInfo>,
}

impl Topology {
    pub fn build_graph<R: Rng>(&self, rng: &mut R) -> Result<Graph> {
        Graph::from_links(self.vertex_count, &self.links, rng)
            .context("topology does not describe a valid graph")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyFormat {
    Text,
    Json,
}

impl TopologyFormat {
    /// `.json` files are JSON, anything else is the plain text layout.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TopologyFormat::Json,
            _ => TopologyFormat::Text,
        }
    }
}

impl FromStr for TopologyFormat {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(TopologyFormat::Text),
            "json" => Ok(TopologyFormat::Json),
            other => Err(anyhow!("unknown topology format '{other}' (expected text or json)")),
        }
    }
}

pub fn load_topology(path: &Path, format: Option<TopologyFormat>) -> Result<Topology> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read topology file {}", path.display()))?;
    let format = format.unwrap_or_else(|| TopologyFormat::from_path(path));
    let parsed = match format {
        TopologyFormat::Text => parse_text_topology(&raw),
        TopologyFormat::Json => parse_json_topology(&raw),
    };
    parsed.with_context(|| format!("invalid topology file {}", path.display()))
}

pub fn parse_json_topology(raw: &str) -> Result<Topology> {
    serde_json::from_str(raw).context("failed to parse topology json")
}

fn parse_field<T>(token: Option<&str>, what: &str, line_no: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let token = token.ok_or_else(|| anyhow!("line {line_no}: missing {what}"))?;
    token
        .parse()
        .with_context(|| format!("line {line_no}: invalid {what} '{token}'"))
}

/// Parses `n m`, then `m` link lines `a b cost`, then optional router lines
/// `name number x y`. Blank lines and `#` comments are skipped.
pub fn parse_text_topology(raw: &str) -> Result<Topology> {
    let mut lines = raw
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let (header_no, header) = lines.next().ok_or_else(|| anyhow!("empty topology"))?;
    let mut fields = header.split_whitespace();
    let vertex_count: usize = parse_field(fields.next(), "vertex count", header_no)?;
    let link_count: usize = parse_field(fields.next(), "link count", header_no)?;

    let mut links = Vec::with_capacity(link_count);
    for _ in 0..link_count {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| anyhow!("expected {link_count} links, found {}", links.len()))?;
        let mut fields = line.split_whitespace();
        links.push(Link {
            from: parse_field(fields.next(), "link source", line_no)?,
            to: parse_field(fields.next(), "link target", line_no)?,
            cost: parse_field(fields.next(), "link cost", line_no)?,
        });
    }

    let mut routers = Vec::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            bail!("line {line_no}: router line needs 'name number x y'");
        }
        routers.push(RouterInfo {
            name: fields[0].to_string(),
            number: parse_field(Some(fields[1]), "router number", line_no)?,
            x: parse_field(Some(fields[2]), "router x", line_no)?,
            y: parse_field(Some(fields[3]), "router y", line_no)?,
        });
    }

    Ok(Topology {
        vertex_count,
        links,
        routers,
    })
}

pub fn write_text_topology(topology: &Topology) -> String {
    let mut out = format!("{} {}\n", topology.vertex_count, topology.links.len());
    for link in &topology.links {
        out.push_str(&format!("{} {} {}\n", link.from, link.to, link.cost));
    }
    for router in &topology.routers {
        out.push_str(&format!(
            "{} {} {} {}\n",
            router.name, router.number, router.x, router.y
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const TRIANGLE: &str = "3 3\n1 2 5\n2 3 5\n1 3 20\nr1 1 100 200\nr2 2 300 250\nr3 3 500 80\n";

    #[test]
    fn parses_links_and_router_lines() {
        let topo = parse_text_topology(TRIANGLE).expect("valid topology");
        assert_eq!(topo.vertex_count, 3);
        assert_eq!(topo.links.len(), 3);
        assert_eq!(
            topo.links[2],
            Link {
                from: 1,
                to: 3,
                cost: 20
            }
        );
        assert_eq!(topo.routers.len(), 3);
        assert_eq!(topo.routers[1].name, "r2");
        assert_eq!(topo.routers[1].number, 2);
        assert_eq!(topo.routers[1].y, 250.0);
    }

    #[test]
    fn router_lines_are_optional_and_comments_skipped() {
        let topo = parse_text_topology("# two nodes\n2 1\n\n1 2 7\n").expect("valid topology");
        assert_eq!(topo.vertex_count, 2);
        assert!(topo.routers.is_empty());
    }

    #[test]
    fn text_layout_survives_write_and_parse() {
        let topo = parse_text_topology(TRIANGLE).expect("valid topology");
        let again = parse_text_topology(&write_text_topology(&topo)).expect("written topology");
        assert_eq!(topo, again);
    }

    #[test]
    fn writer_emits_header_links_then_routers() {
        let topo = parse_text_topology(TRIANGLE).expect("valid topology");
        assert_eq!(write_text_topology(&topo), TRIANGLE);
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(parse_text_topology("").is_err());
        assert!(parse_text_topology("3 2\n1 2 5\n").is_err());
        assert!(parse_text_topology("3 1\n1 two 5\n").is_err());
        assert!(parse_text_topology("3 1\n1 2 5\nr1 1 100\n").is_err());
    }

    #[test]
    fn json_topology_defaults_routers() {
        let raw = r#"{"vertex_count":2,"links":[{"from":1,"to":2,"cost":4}]}"#;
        let topo = parse_json_topology(raw).expect("valid json");
        assert_eq!(topo.links.len(), 1);
        assert!(topo.routers.is_empty());
    }

    #[test]
    fn format_is_detected_from_extension() {
        assert_eq!(
            TopologyFormat::from_path(Path::new("net/topo.JSON")),
            TopologyFormat::Json
        );
        assert_eq!(
            TopologyFormat::from_path(Path::new("graph.txt")),
            TopologyFormat::Text
        );
        assert_eq!("json".parse::<TopologyFormat>().ok(), Some(TopologyFormat::Json));
        assert!("xml".parse::<TopologyFormat>().is_err());
    }

    #[test]
    fn build_graph_reports_invalid_links() {
        let mut rng = StdRng::seed_from_u64(3);
        let ok = parse_text_topology(TRIANGLE).expect("valid topology");
        assert_eq!(ok.build_graph(&mut rng).expect("graph").edges().len(), 6);

        let bad = parse_text_topology("2 1\n1 3 5\n").expect("parses");
        assert!(bad.build_graph(&mut rng).is_err());
    }
}
