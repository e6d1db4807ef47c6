use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::block::{self, Block};
use crate::error::Result;
use crate::io::{excel_read, xml_read};
use crate::merge::{self, MergeConfig};
use crate::model::{Resource, Task};
use crate::render;

/// Header values for the generated project declaration. `end` is either a
/// date or a duration offset such as `+2m`.
#[derive(Debug, Clone)]
pub struct ProjectHeader {
    pub id: String,
    pub name: String,
    pub start: String,
    pub end: String,
}

/// One project's pair of export files.
#[derive(Debug, Clone)]
pub struct SourcePair {
    pub xlsx: PathBuf,
    pub xml: PathBuf,
}

/// Builds the complete output document from already-merged entities:
/// project declaration, resources, tasks, and the optional report block.
pub fn build_document(
    header: &ProjectHeader,
    resources: &[Resource],
    tasks: &[Task],
    with_report: bool,
) -> String {
    let project = block::project_block(&header.id, &header.name, &header.start, &header.end);
    let resource_blocks: Vec<Block> = resources.iter().map(block::resource_block).collect();
    let task_blocks: Vec<Block> = tasks.iter().map(block::task_block).collect();
    let report = with_report.then(block::report_block);
    render::render_document(&project, &resource_blocks, &task_blocks, report.as_ref())
}

/// Converts one or more export pairs into a single project document.
/// Multiple pairs merge independently and combine into one mega-project.
#[instrument(
    level = "info",
    skip_all,
    fields(project = %header.id, pair_count = pairs.len())
)]
pub fn convert(
    pairs: &[SourcePair],
    header: &ProjectHeader,
    config: &MergeConfig,
    with_report: bool,
) -> Result<String> {
    let mut projects = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let rows = excel_read::read_rows(&pair.xlsx)?;
        let records = xml_read::read_records(&pair.xml)?;
        debug!(
            xlsx = %pair.xlsx.display(),
            row_count = rows.len(),
            record_count = records.len(),
            "loaded export pair"
        );
        projects.push((rows, records));
    }

    let (resources, tasks) = merge::merge_many(&projects, config)?;
    info!(
        resource_count = resources.len(),
        task_count = tasks.len(),
        "merged sources"
    );

    Ok(build_document(header, &resources, &tasks, with_report))
}

/// Converts export pairs and writes the finished document to `output`.
/// The document is built fully in memory first, so a failure never leaves
/// a partial file behind.
#[instrument(level = "info", skip_all, fields(output = %output.display()))]
pub fn export(
    pairs: &[SourcePair],
    header: &ProjectHeader,
    config: &MergeConfig,
    with_report: bool,
    output: &Path,
) -> Result<()> {
    let document = convert(pairs, header, config, with_report)?;
    fs::write(output, document)?;
    Ok(())
}
