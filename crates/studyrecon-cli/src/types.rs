use std::path::PathBuf;

use studyrecon_compare::Reconciliation;
use studyrecon_report::SummaryContext;

#[derive(Debug)]
pub struct CompareResult {
    pub reconciliation: Reconciliation,
    pub context: SummaryContext,
    /// Directory the outputs were written to; `None` on a dry run.
    pub output_dir: Option<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

impl CompareResult {
    pub fn exit_code(&self) -> i32 {
        if self.reconciliation.is_consistent() {
            0
        } else {
            2
        }
    }
}
