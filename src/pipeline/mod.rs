// src/pipeline/mod.rs

use crate::clean::{self, CleanReport};
use crate::error::EtlError;
use crate::export::{self, ExportArtifacts};
use crate::load;
use crate::summary::{self, Summaries};
use std::path::PathBuf;
use tracing::info;

/// Single-shot batch run: load -> clean -> summarize -> export. Stages run
/// strictly in sequence; the first error aborts everything after it.
pub struct Pipeline {
    input: PathBuf,
    output_dir: PathBuf,
    sheet: String,
}

/// Everything a run produced besides the files on disk, so callers (and
/// tests) can assert on structured values instead of log text.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub rows: usize,
    pub report: CleanReport,
    pub summaries: Summaries,
    pub artifacts: ExportArtifacts,
}

impl Pipeline {
    pub fn new(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        sheet: impl Into<String>,
    ) -> Self {
        Pipeline {
            input: input.into(),
            output_dir: output_dir.into(),
            sheet: sheet.into(),
        }
    }

    pub fn run(&self) -> Result<PipelineOutcome, EtlError> {
        info!("input: {}", self.input.display());
        info!("output directory: {}", self.output_dir.display());

        info!("stage 1/4: load");
        let raw = load::load_workbook(&self.input, &self.sheet)?;

        info!("stage 2/4: clean");
        let (cleaned, report) = clean::clean(raw)?;

        info!("stage 3/4: summarize");
        let summaries = summary::summarize(&cleaned)?;

        info!("stage 4/4: export");
        let artifacts = export::export(&cleaned, &self.output_dir)?;

        info!("pipeline completed");
        Ok(PipelineOutcome {
            rows: cleaned.n_rows(),
            report,
            summaries,
            artifacts,
        })
    }
}
