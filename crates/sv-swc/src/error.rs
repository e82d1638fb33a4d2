use sv_tree::TreeError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SwcError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("sample {sample_id} refers to unknown parent {parent_id}")]
    UnknownParent { sample_id: i64, parent_id: i64 },
    #[error("sample id {0} appears more than once")]
    DuplicateSample(i64),
    #[error(transparent)]
    Tree(#[from] TreeError),
}
