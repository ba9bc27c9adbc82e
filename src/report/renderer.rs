use crate::analysis::{StatisticalSummary, DATE_FORMAT};
use crate::error::{AppError, Result};
use crate::models::AnnotatedIncident;
use chrono::{DateTime, Duration, Local, NaiveDate};
use handlebars::Handlebars;
use serde_json::{json, Value};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Built-in markdown review template
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/review.md.hbs");

const TEMPLATE_NAME: &str = "review";

/// Placeholder for values a record does not carry
const ABSENT: &str = "n/a";

/// Everything a review document is rendered from
pub struct ReviewContext<'a> {
    /// Client display name shown in the document header
    pub client_name: &'a str,

    /// Reporting period start
    pub period_start: NaiveDate,

    /// Reporting period end; `None` means "now"
    pub period_end: Option<NaiveDate>,

    /// The annotated incident batch
    pub incidents: &'a [AnnotatedIncident],

    /// Aggregate statistics over the batch
    pub summary: &'a StatisticalSummary,
}

/// Renders review documents through a handlebars template
pub struct ReviewRenderer {
    handlebars: Handlebars<'static>,
}

impl ReviewRenderer {
    /// Create a renderer using the built-in template
    pub fn new() -> Result<Self> {
        Self::from_template(DEFAULT_TEMPLATE)
    }

    /// Create a renderer from template source
    pub fn from_template(template: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);

        handlebars
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| AppError::Template(format!("Failed to register review template: {}", e)))?;

        Ok(Self { handlebars })
    }

    /// Create a renderer from a template file
    pub async fn from_template_file(path: &Path) -> Result<Self> {
        let template = fs::read_to_string(path).await.map_err(|e| {
            AppError::Template(format!(
                "Failed to read template {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_template(&template)
    }

    /// Render the review document
    pub fn render(&self, context: &ReviewContext<'_>) -> Result<String> {
        let data = context_data(context)?;

        self.handlebars
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| AppError::Template(format!("Failed to render review: {}", e)))
    }

    /// Render the review document and write it to a file
    pub async fn write_report(&self, context: &ReviewContext<'_>, output: &Path) -> Result<()> {
        let document = self.render(context)?;

        fs::write(output, document.as_bytes()).await?;

        info!(
            path = %output.display(),
            incidents = context.incidents.len(),
            "Review document written"
        );

        Ok(())
    }
}

fn context_data(context: &ReviewContext<'_>) -> Result<Value> {
    let incidents = context
        .incidents
        .iter()
        .map(incident_row)
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "client_name": context.client_name,
        "period_start": context.period_start.format(DATE_FORMAT).to_string(),
        "period_end": context
            .period_end
            .map(|date| date.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "now".to_string()),
        "generated_at": Local::now().format("%Y-%m-%d %H:%M").to_string(),
        "incidents": incidents,
        "summary": summary_data(context.summary)?,
    }))
}

fn incident_row(incident: &AnnotatedIncident) -> Result<Value> {
    let mut row = serde_json::to_value(incident)?;

    if let Some(fields) = row.as_object_mut() {
        fields.insert(
            "triggered_local".to_string(),
            json!(format_opt_instant(&incident.record.triggered_at)),
        );
        fields.insert(
            "acknowledged_local".to_string(),
            json!(format_opt_instant(&incident.record.acknowledged_at)),
        );
        fields.insert(
            "resolved_local".to_string(),
            json!(format_opt_instant(&incident.record.resolved_at)),
        );
        fields.insert(
            "tta_human".to_string(),
            json!(format_opt_duration(&incident.tta)),
        );
        fields.insert(
            "ttr_human".to_string(),
            json!(format_opt_duration(&incident.ttr)),
        );
        fields.insert(
            "in_work_hours_label".to_string(),
            json!(match incident.in_work_hours {
                Some(true) => "yes",
                Some(false) => "no",
                None => ABSENT,
            }),
        );
    }

    Ok(row)
}

fn summary_data(summary: &StatisticalSummary) -> Result<Value> {
    let mut data = serde_json::to_value(summary)?;

    if let Some(fields) = data.as_object_mut() {
        fields.insert(
            "mtta_human".to_string(),
            json!(format_opt_duration(&summary.mtta)),
        );
        fields.insert(
            "mttr_human".to_string(),
            json!(format_opt_duration(&summary.mttr)),
        );
        fields.insert(
            "in_work_hours_pct".to_string(),
            json!(format!("{:.1}", summary.in_work_hours_ratio() * 100.0)),
        );
    }

    Ok(data)
}

fn format_opt_instant(value: &Option<DateTime<Local>>) -> String {
    match value {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => ABSENT.to_string(),
    }
}

fn format_opt_duration(value: &Option<Duration>) -> String {
    match value {
        Some(duration) => format_duration(*duration),
        None => ABSENT.to_string(),
    }
}

/// Humanize a duration, e.g. `5m 30s`, `2h 4m`, `3d 1h`
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds();
    if total_secs < 0 {
        return format!("-{}", format_duration(-duration));
    }

    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 && seconds > 0 {
        format!("{}m {}s", minutes, seconds)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}
