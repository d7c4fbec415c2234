//! # Parameter Summary
//!
//! Reports the parameters that differ from their schema defaults, grouped as
//! the schema groups them and preceded by the run's core options.
//!
//! A parameter is reported when it is declared by the schema, was supplied,
//! and either
//!
//! - its default is set and the supplied value renders differently, after
//!   `$projectDir`/`${projectDir}` and `$params.outdir`/`${params.outdir}`
//!   in the default are replaced by the actual directories; or
//! - it has no default and the supplied value is truthy and not the
//!   string `"false"`.

use std::path::Path;

use indexmap::IndexMap;
use nfp_core::{ParamValue, ParameterSet, RunContext, ValidatorConfig};
use nfp_schema::{PropertySpec, SchemaModel};

use crate::colors::LogColors;

/// Title of the leading group built from the run context.
pub const CORE_OPTIONS_TITLE: &str = "Core Nextflow options";

/// Group title -> parameter name -> rendered value, in display order.
pub type SummaryMap = IndexMap<String, IndexMap<String, String>>;

/// Build the summary for the schema at `schema_path`. An unreadable schema
/// leaves only the core options.
pub fn params_summary_map(params: &ParameterSet, schema_path: &Path, ctx: &RunContext) -> SummaryMap {
    summarize(&SchemaModel::load(schema_path), params, ctx)
}

/// Build the summary for an already loaded schema model.
pub fn summarize(model: &SchemaModel, params: &ParameterSet, ctx: &RunContext) -> SummaryMap {
    let mut summary = SummaryMap::new();
    summary.insert(CORE_OPTIONS_TITLE.to_string(), core_options(ctx));

    let outdir = params.get("outdir").map(ToString::to_string);
    for (title, properties) in model.display_groups() {
        let group = summary.entry(title.to_string()).or_default();
        for (name, spec) in properties {
            let Some(value) = params.get(name) else {
                continue;
            };
            if differs_from_default(spec, value, ctx, outdir.as_deref()) {
                group.insert(name.clone(), value.to_string());
            }
        }
    }
    summary
}

/// Render the summary for the schema at `schema_path` as a log block.
pub fn params_summary_log(
    params: &ParameterSet,
    schema_path: &Path,
    ctx: &RunContext,
    config: &ValidatorConfig,
) -> String {
    let config = config.clone().with_control_params(params);
    render_summary_log(&params_summary_map(params, schema_path, ctx), config.monochrome_logs)
}

/// Render a summary map: one bold heading per non-empty group, one aligned
/// `name: value` line per parameter.
pub fn render_summary_log(summary: &SummaryMap, monochrome: bool) -> String {
    let colors = LogColors::new(monochrome);
    let width = summary
        .values()
        .flat_map(IndexMap::keys)
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (title, entries) in summary {
        if entries.is_empty() {
            continue;
        }
        output.push_str(&format!("{}{title}{}\n", colors.bold, colors.reset));
        for (name, value) in entries {
            output.push_str(&format!(
                "  {}{name:<width$}: {}{value}{}\n",
                colors.blue, colors.green, colors.reset
            ));
        }
        output.push('\n');
    }
    output.push_str("!! Only displaying parameters that differ from the pipeline defaults !!\n");
    output.push_str(&colors.dashed_line());
    output
}

fn core_options(ctx: &RunContext) -> IndexMap<String, String> {
    let mut core = IndexMap::new();
    if let Some(revision) = &ctx.revision {
        core.insert("revision".to_string(), revision.clone());
    }
    core.insert("runName".to_string(), ctx.run_name.clone());
    if let Some(engine) = &ctx.container_engine {
        core.insert("containerEngine".to_string(), engine.clone());
    }
    if let Some(container) = &ctx.container {
        core.insert("container".to_string(), container.clone());
    }
    core.insert("launchDir".to_string(), ctx.launch_dir.display().to_string());
    core.insert("workDir".to_string(), ctx.work_dir.display().to_string());
    core.insert("projectDir".to_string(), ctx.project_dir.display().to_string());
    core.insert("userName".to_string(), ctx.user_name.clone());
    core.insert("profile".to_string(), ctx.profile.clone());
    let config_files: Vec<String> = ctx.config_files.iter().map(|p| p.display().to_string()).collect();
    core.insert("configFiles".to_string(), config_files.join(", "));
    core
}

fn differs_from_default(spec: &PropertySpec, value: &ParamValue, ctx: &RunContext, outdir: Option<&str>) -> bool {
    match &spec.default {
        Some(default) => value.to_string() != resolve_placeholders(default, ctx, outdir),
        None => !is_unset(value),
    }
}

fn is_unset(value: &ParamValue) -> bool {
    !value.is_truthy() || value.as_str() == Some("false")
}

fn resolve_placeholders(default: &str, ctx: &RunContext, outdir: Option<&str>) -> String {
    let project_dir = ctx.project_dir.display().to_string();
    let resolved = default
        .replace("${projectDir}", &project_dir)
        .replace("$projectDir", &project_dir);
    match outdir {
        Some(outdir) => resolved
            .replace("${params.outdir}", outdir)
            .replace("$params.outdir", outdir),
        None => resolved,
    }
}
