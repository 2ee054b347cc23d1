use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::filter::FilterCounts;
use crate::graph::ScoredVenue;

/// Rendering group for an explanation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeGroup {
    Root,
    Step,
    Best,
    Shortlist,
    Explain,
    Amenity,
    AmenityMissing,
    Final,
}

/// One node in the reasoning tree. `size` maps to the renderer's `val`
/// attribute; `meta` carries stage- or venue-specific detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<NodeGroup>,
    #[serde(default, rename = "val", skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningEdge {
    pub source: String,
    pub target: String,
}

/// The full explanation payload: the node/link tree, the root-to-final
/// spine, and a templated text summary of the filter stages.
///
/// The tree is acyclic apart from one designed back-edge from `final` to
/// `root`, kept solely so a renderer can highlight the reasoning loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningPath {
    pub nodes: Vec<ReasoningNode>,
    pub links: Vec<ReasoningEdge>,
    pub path: Vec<ReasoningEdge>,
    #[serde(rename = "textInformation")]
    pub text_information: String,
}

impl ReasoningPath {
    pub fn node(&self, id: &str) -> Option<&ReasoningNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Source of the first tree edge pointing at `id`. The `final -> root`
    /// back-edge is appended after all tree edges, so the first hit is
    /// always the structural parent.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|edge| edge.target == id)
            .map(|edge| edge.source.as_str())
    }

    pub fn children_of(&self, id: &str) -> Vec<&str> {
        self.links
            .iter()
            .filter(|edge| edge.source == id)
            .map(|edge| edge.target.as_str())
            .collect()
    }
}

const ROOT_ID: &str = "root";
const STEP_CAPACITY_ID: &str = "step_capacity";
const STEP_COVERAGE_ID: &str = "step_coverage";
const STEP_SCORING_ID: &str = "step_scoring";
const FINAL_ID: &str = "final";

struct TreeBuilder {
    nodes: Vec<ReasoningNode>,
    links: Vec<ReasoningEdge>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    fn add(
        &mut self,
        id: impl Into<String>,
        label: impl Into<String>,
        group: NodeGroup,
        size: Option<u32>,
        meta: Option<Value>,
        parent: Option<&str>,
    ) {
        let id = id.into();
        if let Some(parent) = parent {
            self.links.push(ReasoningEdge {
                source: parent.to_string(),
                target: id.clone(),
            });
        }
        self.nodes.push(ReasoningNode {
            id,
            label: label.into(),
            group: Some(group),
            size,
            meta,
        });
    }
}

fn venue_node_id(row: &ScoredVenue) -> String {
    format!("venue_{}", row.id.as_str())
}

/// Assemble the reasoning tree for one ranking run.
pub(crate) fn build_reasoning_path(
    attendees: u32,
    min_coverage: f64,
    requirements: &[String],
    counts: &FilterCounts,
    shortlist: &[ScoredVenue],
    scoring_formula: &str,
) -> ReasoningPath {
    let mut tree = TreeBuilder::new();

    tree.add(
        ROOT_ID,
        "Query",
        NodeGroup::Root,
        Some(8),
        Some(json!({
            "attendees": attendees,
            "min_coverage": min_coverage,
            "required": requirements,
        })),
        None,
    );

    tree.add(
        STEP_CAPACITY_ID,
        format!(
            "Capacity ≥ {}  (kept {}/{})",
            attendees, counts.pass_capacity, counts.total
        ),
        NodeGroup::Step,
        Some(6),
        None,
        Some(ROOT_ID),
    );

    tree.add(
        STEP_COVERAGE_ID,
        format!(
            "Coverage ≥ {}  (kept {}/{})",
            min_coverage, counts.pass_coverage, counts.pass_capacity
        ),
        NodeGroup::Step,
        Some(6),
        None,
        Some(STEP_CAPACITY_ID),
    );

    tree.add(
        STEP_SCORING_ID,
        scoring_formula,
        NodeGroup::Step,
        Some(6),
        None,
        Some(STEP_COVERAGE_ID),
    );

    if let Some(best) = shortlist.first() {
        for (rank, row) in shortlist.iter().enumerate() {
            let venue_id = venue_node_id(row);
            let (group, size) = if rank == 0 {
                (NodeGroup::Best, 7)
            } else {
                (NodeGroup::Shortlist, 4)
            };

            tree.add(
                venue_id.clone(),
                format!("{} · cap {} · score {}", row.venue, row.capacity, row.score),
                group,
                Some(size),
                Some(json!({
                    "coverage": row.coverage,
                    "slack": row.slack,
                    "matched": row.matched,
                    "score": row.score,
                    "capacity": row.capacity,
                })),
                Some(STEP_SCORING_ID),
            );

            let matched_group = format!("{venue_id}_matched");
            tree.add(
                matched_group.clone(),
                "Matched amenities",
                NodeGroup::Explain,
                None,
                None,
                Some(venue_id.as_str()),
            );
            for amenity in &row.matched_list {
                tree.add(
                    format!("{venue_id}_m_{amenity}"),
                    amenity,
                    NodeGroup::Amenity,
                    None,
                    None,
                    Some(matched_group.as_str()),
                );
            }

            // Missing amenities are expanded for the best candidate only to
            // bound the payload size.
            if rank == 0 {
                let missing_group = format!("{venue_id}_missing");
                tree.add(
                    missing_group.clone(),
                    "Missing amenities",
                    NodeGroup::Explain,
                    None,
                    None,
                    Some(venue_id.as_str()),
                );
                for amenity in &row.missing_list {
                    tree.add(
                        format!("{venue_id}_x_{amenity}"),
                        amenity,
                        NodeGroup::AmenityMissing,
                        None,
                        None,
                        Some(missing_group.as_str()),
                    );
                }
            }
        }

        let best_id = venue_node_id(best);
        tree.add(
            FINAL_ID,
            format!("Selected → {} · score {}", best.venue, best.score),
            NodeGroup::Final,
            Some(8),
            None,
            Some(best_id.as_str()),
        );
        // Back-edge closing the reasoning loop for the renderer.
        tree.links.push(ReasoningEdge {
            source: FINAL_ID.to_string(),
            target: ROOT_ID.to_string(),
        });
    } else {
        tree.add(
            FINAL_ID,
            "Selected → none (no candidate over threshold)",
            NodeGroup::Final,
            Some(8),
            None,
            Some(STEP_SCORING_ID),
        );
    }

    let mut path = vec![
        ReasoningEdge {
            source: ROOT_ID.to_string(),
            target: STEP_CAPACITY_ID.to_string(),
        },
        ReasoningEdge {
            source: STEP_CAPACITY_ID.to_string(),
            target: STEP_COVERAGE_ID.to_string(),
        },
        ReasoningEdge {
            source: STEP_COVERAGE_ID.to_string(),
            target: STEP_SCORING_ID.to_string(),
        },
    ];
    if let Some(best) = shortlist.first() {
        let best_id = venue_node_id(best);
        path.push(ReasoningEdge {
            source: STEP_SCORING_ID.to_string(),
            target: best_id.clone(),
        });
        path.push(ReasoningEdge {
            source: best_id,
            target: FINAL_ID.to_string(),
        });
    }

    let requirement_summary = if requirements.is_empty() {
        "(none)".to_string()
    } else {
        requirements.join(", ")
    };
    let text_information = format!(
        "Reasoning: start → capacity filter (kept {}/{}) → coverage ≥ {} (kept {}/{}) → score (coverage vs slack) → select best.\nReq amenities: {}.",
        counts.pass_capacity,
        counts.total,
        min_coverage,
        counts.pass_coverage,
        counts.pass_capacity,
        requirement_summary
    );

    ReasoningPath {
        nodes: tree.nodes,
        links: tree.links,
        path,
        text_information,
    }
}
