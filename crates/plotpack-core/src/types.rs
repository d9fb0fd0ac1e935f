use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unit type - a rectangular block footprint that can be placed on the plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitType {
    pub id: String,
    /// Value attached to one block of this type, carried into the summary
    #[serde(default)]
    pub cost: f64,
    pub width: f64,
    pub length: f64,
}

impl UnitType {
    pub fn area(&self) -> f64 {
        self.width * self.length
    }
}

/// How the conflict filter picks the in-row neighbour of the first slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyPolicy {
    /// Slot 0 is compared with the last slot of its row
    #[default]
    WrapAround,
    /// Slot 0 has no in-row predecessor
    Sequential,
}

/// How unit types are distributed over the surviving slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStrategy {
    /// Independent weighted draw per slot
    #[default]
    Weighted,
    /// Exact largest-remainder quota per type, shuffled over the slots
    Quota,
}

fn default_search_increment() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

/// Input: What user provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutRequest {
    /// Site boundary ring, closing vertex optional
    pub boundary: Vec<[f64; 2]>,
    pub unit_types: Vec<UnitType>,
    /// Target weight per unit type id
    pub proportions: HashMap<String, f64>,
    /// Step of the padding search
    #[serde(default = "default_search_increment")]
    pub search_increment: f64,
    /// Re-place conflicting typed blocks with the smallest unit instead of dropping them
    #[serde(default = "default_true")]
    pub replace_on_conflict: bool,
    #[serde(default)]
    pub adjacency: AdjacencyPolicy,
    #[serde(default)]
    pub assignment: AssignmentStrategy,
    /// Fixed seed for the type assignment; drawn from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Shift the boundary so its bounding box starts at the origin
    #[serde(default)]
    pub move_to_origin: bool,
}

/// Input for the spacing query: a boundary and a catalogue, no mix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaddingRequest {
    pub boundary: Vec<[f64; 2]>,
    pub unit_types: Vec<UnitType>,
    #[serde(default = "default_search_increment")]
    pub search_increment: f64,
    #[serde(default)]
    pub move_to_origin: bool,
}

impl From<PaddingRequest> for LayoutRequest {
    /// Every unit type weighs the same; the mix does not affect paddings.
    fn from(request: PaddingRequest) -> Self {
        LayoutRequest {
            proportions: request
                .unit_types
                .iter()
                .map(|unit| (unit.id.clone(), 1.0))
                .collect(),
            boundary: request.boundary,
            unit_types: request.unit_types,
            search_increment: request.search_increment,
            replace_on_conflict: true,
            adjacency: AdjacencyPolicy::default(),
            assignment: AssignmentStrategy::default(),
            seed: None,
            move_to_origin: request.move_to_origin,
        }
    }
}

/// A unit type instance placed on the plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedBlock {
    pub type_id: String,
    /// Candidate point the block is centered on
    pub point: [f64; 2],
    /// Corner coordinates, open ring
    pub corners: Vec<[f64; 2]>,
}

/// Lattice spacing used for the run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Paddings {
    /// Spacing along the dominant edge
    pub block: f64,
    /// Spacing along the normal of the dominant edge
    pub row: f64,
}

/// Orientation of the plot derived from its longest edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrientationInfo {
    pub longest_edge: [[f64; 2]; 2],
    pub horizontal_has_longest: bool,
    /// Angle of the longest edge in degrees
    pub angle: f64,
}

/// Summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_blocks: u32,
    pub blocks_per_type: HashMap<String, u32>,
    pub covered_area: f64,
    pub boundary_area: f64,
    pub coverage_percentage: f64,
    /// Sum of the cost of every placed block
    pub total_cost: f64,
}

/// Output: What the packer returns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Placed blocks, one row per parallel lattice line
    pub rows: Vec<Vec<PlacedBlock>>,
    pub paddings: Paddings,
    pub orientation: OrientationInfo,
    pub summary: Summary,
}

impl LayoutResult {
    /// All placed blocks in row order.
    pub fn blocks(&self) -> impl Iterator<Item = &PlacedBlock> {
        self.rows.iter().flatten()
    }
}

/// Error type for layout
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate boundary: {0}")]
    DegenerateBoundary(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
