use tracing::debug;
use upkdiff_common::{DiffOutcome, DiffRecord, DiffStatus, Package};

/// Comparison engine for reconstructed packages.
///
/// Equality per path is size + GUID only: byte content is deliberately
/// not inspected, trading precision for never touching payload bytes.
#[derive(Debug, Default)]
pub struct DiffEngine {
    statuses: Vec<DiffStatus>,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the report to the given statuses; empty means no filter
    pub fn with_status_filter(mut self, statuses: Vec<DiffStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Compare two package slots that may not both be loaded yet. A
    /// missing side is a caller-visible pending state, never an error.
    pub fn compare_loaded<'a>(
        &self,
        left: Option<&'a Package>,
        right: Option<&'a Package>,
    ) -> DiffOutcome<'a> {
        match (left, right) {
            (Some(left), Some(right)) => DiffOutcome::Report(self.compare(left, right)),
            _ => DiffOutcome::Pending,
        }
    }

    /// Produce the per-path difference report, sorted ascending by path
    pub fn compare<'a>(&self, left: &'a Package, right: &'a Package) -> Vec<DiffRecord<'a>> {
        let mut records = Vec::new();

        for (path, asset_left) in &left.assets {
            match right.assets.get(path) {
                None => records.push(DiffRecord {
                    path: path.clone(),
                    status: DiffStatus::Removed,
                    size_left: asset_left.size,
                    size_right: 0,
                    left: Some(asset_left),
                    right: None,
                }),
                Some(asset_right) => {
                    if asset_left.size != asset_right.size || asset_left.guid != asset_right.guid {
                        records.push(DiffRecord {
                            path: path.clone(),
                            status: DiffStatus::Modified,
                            size_left: asset_left.size,
                            size_right: asset_right.size,
                            left: Some(asset_left),
                            right: Some(asset_right),
                        });
                    }
                }
            }
        }

        for (path, asset_right) in &right.assets {
            if !left.assets.contains_key(path) {
                records.push(DiffRecord {
                    path: path.clone(),
                    status: DiffStatus::Added,
                    size_left: 0,
                    size_right: asset_right.size,
                    left: None,
                    right: Some(asset_right),
                });
            }
        }

        if !self.statuses.is_empty() {
            records.retain(|record| self.statuses.contains(&record.status));
        }

        records.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("generated {} diff records", records.len());
        records
    }
}
