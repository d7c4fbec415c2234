//! # Help Text
//!
//! Grouped, column-aligned parameter help:
//!
//! ```text
//! Typical pipeline command:
//!
//!   nextflow run demo --input samplesheet.csv -profile docker
//!
//! Input/output options
//!   --input     [string]  Path to comma-separated file containing information about the samples.
//!   --outdir    [string]  The output directory where the results will be saved. [default: ./results]
//!
//! !! Hiding 2 params, use --validationShowHiddenParams to show them !!
//! ------------------------------------------------------
//! ```
//!
//! The name column is as wide as the longest *visible* name plus one, the
//! type column is ten wide, and descriptions wrap by words at the configured
//! line width minus the description indent.

use std::path::Path;

use indexmap::IndexMap;
use nfp_core::{ParameterSet, ValidatorConfig};
use nfp_schema::{PropertySpec, SchemaModel};

use crate::colors::{visible_len, LogColors};

const TYPE_COLUMN_WIDTH: usize = 10;
/// `"  --"` prefix plus the type column.
const FIXED_COLUMNS_WIDTH: usize = 4 + TYPE_COLUMN_WIDTH;

/// Render help for the schema at `schema_path`.
///
/// Control parameters in `params` (show hidden, monochrome) override the
/// configuration. An unreadable schema renders as an empty parameter list.
pub fn params_help(schema_path: &Path, params: &ParameterSet, command: &str, config: &ValidatorConfig) -> String {
    let config = config.clone().with_control_params(params);
    let model = SchemaModel::load(schema_path);
    render_help(&model, command, &config)
}

/// Render help for an already loaded schema model.
pub fn render_help(model: &SchemaModel, command: &str, config: &ValidatorConfig) -> String {
    let colors = LogColors::new(config.monochrome_logs);
    let show_hidden = config.show_hidden_params;
    let groups = model.display_groups();

    let name_width = max_visible_name_len(&groups, show_hidden) + 1;
    let desc_indent = name_width + FIXED_COLUMNS_WIDTH;
    let desc_width = config.help_line_width.saturating_sub(desc_indent);

    let mut output = format!(
        "{bold}Typical pipeline command:{reset}\n\n  {cyan}{command}{reset}\n\n",
        bold = colors.bold,
        cyan = colors.cyan,
        reset = colors.reset,
    );

    let mut hidden = 0;
    for (title, properties) in groups {
        let mut group_output = String::new();
        for (name, spec) in properties {
            if spec.hidden && !show_hidden {
                hidden += 1;
                continue;
            }
            let type_label = format!("[{}]", spec.param_type);
            let mut description = describe(spec, &colors);
            if visible_len(&description) > desc_width {
                description = wrap_text(&description, desc_width, desc_indent);
            }
            group_output.push_str(&format!(
                "  --{name:<name_width$}{dim}{type_label:<TYPE_COLUMN_WIDTH$}{reset}{description}\n",
                dim = colors.dim,
                reset = colors.reset,
            ));
        }
        if !group_output.is_empty() {
            output.push_str(&format!(
                "{}{}{title}{}\n{group_output}\n",
                colors.underlined, colors.bold, colors.reset
            ));
        }
    }

    if hidden > 0 {
        tracing::debug!(hidden, "hiding parameters from help output");
        output.push_str(&format!(
            "{}!! Hiding {hidden} params, use --validationShowHiddenParams to show them !!{}\n",
            colors.dim, colors.reset
        ));
    }
    output.push_str(&colors.dashed_line());
    output
}

fn max_visible_name_len(groups: &[(&str, &IndexMap<String, PropertySpec>)], show_hidden: bool) -> usize {
    groups
        .iter()
        .flat_map(|(_, properties)| properties.iter())
        .filter(|(_, spec)| show_hidden || !spec.hidden)
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
}

fn describe(spec: &PropertySpec, colors: &LogColors) -> String {
    match &spec.default {
        Some(default) => format!("{}{} [default: {default}]{}", spec.description, colors.dim, colors.reset),
        None => spec.description.clone(),
    }
}

/// Greedy word wrap. Continuation lines are indented by `indent` spaces; a
/// word longer than `width` gets a line of its own.
fn wrap_text(text: &str, width: usize, indent: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && visible_len(&line) + 1 + visible_len(word) > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join(&format!("\n{}", " ".repeat(indent)))
}
