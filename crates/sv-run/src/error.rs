use sv_tree::TreeError;

/// Fatal run errors. Per-surface anomalies are never errors; they are
/// recorded in the run report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("no dataset loaded")]
    NoDataset,
    #[error("no skeleton found")]
    NoSkeleton,
    #[error("unknown surface '{0}'")]
    UnknownSurface(String),
    #[error("invalid dataset: {0}")]
    Dataset(#[from] sv_core::Error),
    #[error("invalid skeleton: {0}")]
    Skeleton(#[from] TreeError),
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("parsing scene json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("surface '{name}': {source}")]
    Mask {
        name: String,
        #[source]
        source: sv_core::Error,
    },
}
