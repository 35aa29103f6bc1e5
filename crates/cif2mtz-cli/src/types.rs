use std::path::PathBuf;

use cif2mtz_core::{CellWarning, Conversion, ConversionError};
use serde::Serialize;

/// Why a block was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Failure {
    Conversion,
    Spec,
    Write,
}

impl Failure {
    pub fn of(error: &ConversionError) -> Self {
        if error.is_write_error() {
            Self::Write
        } else {
            Self::Conversion
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Conversion => 1,
            Self::Spec => 2,
            Self::Write => 3,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlockReport {
    pub block: String,
    pub output: PathBuf,
    pub unmerged: bool,
    pub reflections: usize,
    pub columns: Vec<String>,
    pub warnings: Vec<CellWarning>,
    pub failure: Option<Failure>,
    pub error: Option<String>,
}

impl BlockReport {
    pub fn converted(output: PathBuf, conversion: Conversion) -> Self {
        Self {
            block: conversion.block,
            output,
            unmerged: conversion.unmerged,
            reflections: conversion.mtz.nreflections,
            columns: conversion.mtz.columns.into_iter().map(|c| c.label).collect(),
            warnings: conversion.warnings,
            failure: None,
            error: None,
        }
    }

    pub fn failed(block: &str, output: PathBuf, error: &ConversionError) -> Self {
        Self {
            block: block.to_string(),
            output,
            unmerged: false,
            reflections: 0,
            columns: Vec::new(),
            warnings: Vec::new(),
            failure: Some(Failure::of(error)),
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub spec: Option<PathBuf>,
    pub blocks: Vec<BlockReport>,
}

impl RunReport {
    /// 0 when every block was written, 3 when only writes failed, else 1.
    pub fn exit_code(&self) -> i32 {
        let mut failures = self.blocks.iter().filter_map(|b| b.failure).peekable();
        if failures.peek().is_none() {
            return 0;
        }
        if failures.all(|f| f == Failure::Write) {
            Failure::Write.exit_code()
        } else {
            Failure::Conversion.exit_code()
        }
    }
}
