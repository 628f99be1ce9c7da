//! Reading and writing flow files.
//!
//! A file holds either a whole story (`{"id", "name", "flowData", ...}`) or a
//! bare flow (`{"startNodeId", "nodes"}`). Both are accepted everywhere a
//! flow is read.

use anyhow::{Context, Result};
use cardpath_core::{FlowData, Story};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum FlowFile {
    Story(Story),
    Bare(FlowData),
}

impl FlowFile {
    pub fn flow(&self) -> &FlowData {
        match self {
            FlowFile::Story(story) => &story.flow_data,
            FlowFile::Bare(flow) => flow,
        }
    }

    pub fn into_flow(self) -> FlowData {
        match self {
            FlowFile::Story(story) => story.flow_data,
            FlowFile::Bare(flow) => flow,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FlowFile::Story(story) => Some(&story.name),
            FlowFile::Bare(_) => None,
        }
    }
}

pub fn parse_flow_file(raw: &str) -> Result<FlowFile> {
    let value: serde_json::Value = serde_json::from_str(raw).context("File is not valid JSON")?;
    if value.get("flowData").is_some() {
        let story = serde_json::from_value(value).context("Failed to parse story")?;
        Ok(FlowFile::Story(story))
    } else {
        let flow = FlowData::from_json_value(value).context("Failed to parse flow")?;
        Ok(FlowFile::Bare(flow))
    }
}

pub fn read_flow_file(path: &Path) -> Result<FlowFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read flow file: {}", path.display()))?;
    parse_flow_file(&raw).with_context(|| format!("Invalid flow file: {}", path.display()))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
