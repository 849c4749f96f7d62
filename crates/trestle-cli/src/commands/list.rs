//! Implementation of the `trestle list` command.

use serde::Serialize;

use trestle_core::{
    application::{TemplateInfo, TemplateService},
    domain::{Step, StepBody, catalog::pipeline_named},
};

use crate::{
    cli::{ListArgs, ListFormat, ListTarget, global::GlobalArgs},
    commands::template_store,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // `--output-format json` implies JSON here too.
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match args.what {
        ListTarget::Steps => list_steps(args.pipeline.as_str(), format, &output),
        ListTarget::Templates => list_templates(&config, format, &output),
    }
}

/// One pipeline step, flattened for display.
#[derive(Debug, Serialize)]
struct StepRow {
    name: &'static str,
    depth: usize,
    kind: &'static str,
    condition: &'static str,
    announce: Option<&'static str>,
}

impl StepRow {
    fn from_step(depth: usize, step: &Step) -> Self {
        Self {
            name: step.name(),
            depth,
            kind: match step.body() {
                StepBody::Actions(_) => "actions",
                StepBody::Group(_) => "group",
                StepBody::Branch(_) => "branch",
            },
            condition: step.condition().describe(),
            announce: step.announcement(),
        }
    }
}

fn list_steps(name: &str, format: ListFormat, output: &OutputManager) -> CliResult<()> {
    let pipeline = pipeline_named(name)
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("no pipeline named '{name}'"),
            source: None,
        })?
        .map_err(|e| CliError::Core(e.into()))?;

    let rows: Vec<StepRow> = pipeline
        .flatten()
        .into_iter()
        .map(|(depth, step)| StepRow::from_step(depth, step))
        .collect();

    match format {
        ListFormat::Table => {
            output.header(&format!("Steps in the '{}' pipeline:", pipeline.name()))?;
            for row in &rows {
                let indent = "  ".repeat(row.depth + 1);
                let line = format!("{indent}{:<32} {}", row.name, row.condition);
                output.print(line.trim_end())?;
                if let Some(message) = row.announce {
                    output.detail(&format!("{indent}  \"{message}\""))?;
                }
            }
        }
        ListFormat::List => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
        ListFormat::Json => output.json(&rows)?,
        ListFormat::Csv => {
            println!("name,depth,kind,condition");
            for row in &rows {
                println!(
                    "{},{},{},{}",
                    row.name,
                    row.depth,
                    row.kind,
                    csv_field(row.condition)
                );
            }
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct TemplateRow<'a> {
    id: &'a str,
    lines: usize,
    parameterized: bool,
}

impl<'a> From<&'a TemplateInfo> for TemplateRow<'a> {
    fn from(info: &'a TemplateInfo) -> Self {
        Self {
            id: &info.id,
            lines: info.lines,
            parameterized: info.parameterized,
        }
    }
}

fn list_templates(config: &AppConfig, format: ListFormat, output: &OutputManager) -> CliResult<()> {
    let service = TemplateService::new(template_store(config)?);
    let templates = service.list().map_err(CliError::Core)?;

    match format {
        ListFormat::Table => {
            output.header("Available templates:")?;
            for t in &templates {
                let marker = if t.parameterized { "  {{..}}" } else { "" };
                output.print(&format!("  {:<40} {:>4} lines{marker}", t.id, t.lines))?;
            }
        }
        ListFormat::List => {
            for t in &templates {
                println!("{}", t.id);
            }
        }
        ListFormat::Json => {
            let rows: Vec<TemplateRow<'_>> = templates.iter().map(TemplateRow::from).collect();
            output.json(&rows)?;
        }
        ListFormat::Csv => {
            println!("id,lines,parameterized");
            for t in &templates {
                println!("{},{},{}", t.id, t.lines, t.parameterized);
            }
        }
    }

    Ok(())
}

/// Quote a CSV field when it contains a separator or quote.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trestle_core::domain::scaffold_pipeline;

    #[test]
    fn csv_field_quotes_commas() {
        assert_eq!(csv_field("always"), "always");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\", ok"), "\"say \"\"hi\"\", ok\"");
    }

    #[test]
    fn step_rows_keep_pipeline_order() {
        let pipeline = scaffold_pipeline().unwrap();
        let rows: Vec<StepRow> = pipeline
            .flatten()
            .into_iter()
            .map(|(depth, step)| StepRow::from_step(depth, step))
            .collect();

        assert_eq!(rows.len(), pipeline.flatten().len());
        assert_eq!(rows[0].depth, 0);
        let git = rows.iter().find(|r| r.name == "init_git").unwrap();
        assert_ne!(git.condition, "always");
    }
}
