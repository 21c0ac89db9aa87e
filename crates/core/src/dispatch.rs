//! Per-extension routing around the processing pipeline.
//!
//! Each route is the place for file-type specific handling (e.g. tagging the
//! `<template>`/`<script>`/`<style>` regions of component files). None of them
//! needs any yet, so every route hands the file straight to the pipeline.

use crate::dialect::{normalize_extension, DialectRegistry};
use crate::error::Result;
use crate::pipeline::process_with;
use crate::source::SourceFile;
use crate::types::ProcessedFile;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Component,
    Script,
    Php,
    Passthrough,
}

impl Route {
    pub fn for_extension(extension: Option<&str>) -> Route {
        match extension.map(normalize_extension).as_deref() {
            Some("vue" | "svelte") => Route::Component,
            Some("js" | "mjs" | "cjs" | "jsx" | "ts" | "tsx") => Route::Script,
            Some("php") => Route::Php,
            _ => Route::Passthrough,
        }
    }
}

/// Route `file` by extension and run it through the pipeline.
pub fn dispatch(registry: &DialectRegistry, file: &SourceFile) -> Result<ProcessedFile> {
    let extension = file.extension.as_deref();
    let route = Route::for_extension(extension);

    match (route, extension) {
        (_, None) => info!(file = file.display_name.as_str(), "No extension, using default dialect"),
        (Route::Passthrough, Some(ext)) => {
            info!(file = file.display_name.as_str(), ext, "No processor for extension")
        }
        (route, Some(ext)) => {
            info!(file = file.display_name.as_str(), ext, ?route, "Processing file")
        }
    }

    process_with(registry, &file.raw_text, extension)
}
