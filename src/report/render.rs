use std::fs;
use std::path::Path;

use askama::Template;

use crate::report::error::ReportError;
use crate::report::format::report_rows;
use crate::search::{Pass, SearchWindow};

pub const DEFAULT_PLACEHOLDER: &str = "{{ AOI_PASS_DATA }}";

/// Parameters of the run shown alongside the passes.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub window: SearchWindow,
    pub max_off_nadir_deg: f64,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    rows: &'a str,
    count: usize,
    window_start: String,
    window_end: String,
    max_off_nadir: String,
}

/// Substitute the rows into a user supplied template.
pub fn fill_template(template: &str, placeholder: &str, passes: &[Pass]) -> String {
    template.replace(placeholder, &report_rows(passes))
}

/// Render the built-in report page.
pub fn render_builtin(passes: &[Pass], context: &ReportContext) -> Result<String, ReportError> {
    let rows = report_rows(passes);
    let page = ReportTemplate {
        rows: &rows,
        count: passes.len(),
        window_start: context.window.start.format("%Y-%m-%d %H:%M:%S").to_string(),
        window_end: context.window.end.format("%Y-%m-%d %H:%M:%S").to_string(),
        max_off_nadir: format!("{:.1}", context.max_off_nadir_deg),
    };
    Ok(page.render()?)
}

/// Write the HTML report, using `template_path` if it exists.
pub fn write_html_report(
    template_path: &Path,
    placeholder: &str,
    output: &Path,
    passes: &[Pass],
    context: &ReportContext,
) -> Result<(), ReportError> {
    let html = if template_path.exists() {
        let template = fs::read_to_string(template_path)?;
        if !template.contains(placeholder) {
            log::warn!(
                "Template {} has no {} placeholder",
                template_path.display(),
                placeholder
            );
        }
        fill_template(&template, placeholder, passes)
    } else {
        log::info!(
            "Template {} not found, using built-in report page",
            template_path.display()
        );
        render_builtin(passes, context)?
    };

    write_output(output, &html)?;
    log::info!("Wrote {} passes to {}", passes.len(), output.display());
    Ok(())
}

pub fn write_json_report(output: &Path, passes: &[Pass]) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(passes)?;
    write_output(output, &json)?;
    log::info!("Wrote JSON report to {}", output.display());
    Ok(())
}

fn write_output(output: &Path, content: &str) -> Result<(), ReportError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, content)?;
    Ok(())
}
