use serde::{Deserialize, Serialize};

/// Statistics of the lattice at the start of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)] // Derive traits so collaborators can store rows
pub struct HistoryRecord {
    /// Number of Cancerous sites.
    pub cancer_count: usize,
    /// Number of Edge sites.
    pub edge_count: usize,
    /// Number of Dead sites.
    pub dead_count: usize,
    /// Summed Cancerous distance from the origin divided by the affected total.
    /// Zero when nothing is affected.
    pub mean_radius: f64,
    /// Whether the affected-cell density exceeded the configured threshold.
    pub is_dense: bool,
}

impl HistoryRecord {
    /// Cancerous + Edge + Dead.
    pub fn affected(&self) -> usize {
        self.cancer_count + self.edge_count + self.dead_count
    }
}
