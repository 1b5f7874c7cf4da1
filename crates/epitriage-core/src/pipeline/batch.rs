//! Batch classification over already-structured rows.
//!
//! The encoder → classifier → label chain runs per row. Clinical rule
//! overrides apply only to the single-submission path; batch callers get
//! the model's answer as-is.

use crate::models::{Disease, RawInput, RowDecision};

use super::{DecisionPipeline, PipelineResult};

impl DecisionPipeline {
    /// Classify many rows at once.
    ///
    /// Returns exactly one outcome per input row, in input order. A row
    /// that fails is reported in place and does not affect its neighbors.
    pub fn classify_batch(
        &self,
        disease: Disease,
        rows: &[RawInput],
    ) -> Vec<PipelineResult<RowDecision>> {
        rows.iter()
            .map(|row| self.classify_row(disease, row))
            .collect()
    }

    fn classify_row(&self, disease: Disease, row: &RawInput) -> PipelineResult<RowDecision> {
        let (vector, _derived) = self.encode_for(disease, row)?;
        let class_id = self.predict(disease, &vector)?;
        let label = self.label_for(disease, class_id)?;
        Ok(RowDecision { label, class_id })
    }
}
