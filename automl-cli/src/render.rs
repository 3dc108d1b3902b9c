//! Terminal output: colored tables and detail views, or JSON with `--json`.

use anyhow::Result;
use automl::models::{Dataset, EntityStatus, Model, Page, Source, Task, TaskStatus};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use serde_json::json;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn entity_status(status: EntityStatus) -> ColoredString {
    match status {
        EntityStatus::Built => status.as_str().green(),
        EntityStatus::Building => status.as_str().cyan(),
        EntityStatus::Outdated => status.as_str().yellow(),
        EntityStatus::Failed => status.as_str().red(),
    }
}

pub fn task_status(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Done => status.as_str().green(),
        TaskStatus::Error => status.as_str().red(),
        TaskStatus::Interrupted => status.as_str().yellow(),
        TaskStatus::Pending | TaskStatus::Scheduled | TaskStatus::Running => {
            status.as_str().cyan()
        },
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}

/// An entity that can be shown as a table row and as a detail view.
pub trait Render: Serialize {
    fn header();
    fn row(&self);
    fn detail(&self);
}

fn field(name: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", format!("{name}:").bright_white().bold(), value);
}

impl Render for Source {
    fn header() {
        println!(
            "  {:<38} {:<30} {:<10} {}",
            "ID".bright_white().bold(),
            "NAME".bright_white().bold(),
            "STATUS".bright_white().bold(),
            "FILES".bright_white().bold()
        );
        println!("  {}", "─".repeat(90));
    }

    fn row(&self) {
        println!(
            "  {:<38} {:<30} {:<10} {}",
            truncate_string(&self.id, 38),
            truncate_string(&self.name, 30),
            entity_status(self.status),
            self.files.len()
        );
    }

    fn detail(&self) {
        println!("\n{}", format!("Source {}", self.id).bright_cyan().bold());
        field("Name", &self.name);
        field("Status", entity_status(self.status));
        field("Files", self.files.join(", "));
        field("Created", or_dash(self.created_at));
    }
}

impl Render for Dataset {
    fn header() {
        println!(
            "  {:<38} {:<30} {:<10} {}",
            "ID".bright_white().bold(),
            "NAME".bright_white().bold(),
            "STATUS".bright_white().bold(),
            "SOURCE".bright_white().bold()
        );
        println!("  {}", "─".repeat(90));
    }

    fn row(&self) {
        println!(
            "  {:<38} {:<30} {:<10} {}",
            truncate_string(&self.id, 38),
            truncate_string(&self.name, 30),
            entity_status(self.status),
            self.source_id
        );
    }

    fn detail(&self) {
        println!("\n{}", format!("Dataset {}", self.id).bright_cyan().bold());
        field("Name", &self.name);
        field("Status", entity_status(self.status));
        field("Source", &self.source_id);
        field("Label", self.label.as_deref().unwrap_or("-"));
        field("Folds", or_dash(self.folds));
        if let Some(configurations) = self.configurations() {
            field("Configurations", configurations.len());
        }
        field("Created", or_dash(self.created_at));
    }
}

impl Render for Model {
    fn header() {
        println!(
            "  {:<38} {:<30} {:<10} {}",
            "ID".bright_white().bold(),
            "NAME".bright_white().bold(),
            "STATUS".bright_white().bold(),
            "DATASET".bright_white().bold()
        );
        println!("  {}", "─".repeat(90));
    }

    fn row(&self) {
        println!(
            "  {:<38} {:<30} {:<10} {}",
            truncate_string(&self.id, 38),
            truncate_string(&self.name, 30),
            entity_status(self.status),
            self.dataset_id
        );
    }

    fn detail(&self) {
        println!("\n{}", format!("Model {}", self.id).bright_cyan().bold());
        field("Name", &self.name);
        field("Status", entity_status(self.status));
        field("Dataset", &self.dataset_id);
        if let Some(metrics) = self.metrics.as_object() {
            for (name, value) in metrics {
                field(name, value);
            }
        }
        field("Created", or_dash(self.created_at));
    }
}

impl Render for Task {
    fn header() {
        println!(
            "  {:<38} {:<16} {:<12} {:<8} {}",
            "ID".bright_white().bold(),
            "KIND".bright_white().bold(),
            "STATUS".bright_white().bold(),
            "STEP".bright_white().bold(),
            "DESCRIPTION".bright_white().bold()
        );
        println!("  {}", "─".repeat(100));
    }

    fn row(&self) {
        println!(
            "  {:<38} {:<16} {:<12} {:<8} {}",
            truncate_string(&self.id, 38),
            self.kind,
            task_status(self.status),
            format!("{}/{}", self.current_step, self.total_step),
            truncate_string(self.step_description.as_deref().unwrap_or(""), 40)
        );
    }

    fn detail(&self) {
        println!("\n{}", format!("Task {}", self.id).bright_cyan().bold());
        field("Kind", &self.kind);
        field("Status", task_status(self.status));
        field("Step", format!("{}/{}", self.current_step, self.total_step));
        if let Some(step) = &self.step_description {
            field("Description", step);
        }
        for (key, value) in &self.execution_info {
            field(key, value);
        }
        field("Updated", or_dash(self.updated_at));
    }
}

/// One entity, as JSON or a detail view.
pub fn show<T: Render>(entity: &T, as_json: bool) -> Result<()> {
    if as_json {
        return print_json(entity);
    }
    entity.detail();
    println!();
    Ok(())
}

/// One listing page, as JSON or a table.
pub fn show_page<T: Render>(page: &Page<T>, as_json: bool) -> Result<()> {
    if as_json {
        return print_json(&json!({
            "metadata": page.metadata,
            "content": page.content,
        }));
    }

    let meta = &page.metadata;
    println!(
        "\n{} page {}/{} ({} of {} {}s)\n",
        "→".blue(),
        meta.page,
        meta.total_pages,
        meta.element_count,
        meta.total_elements,
        meta.element_type
    );
    if page.is_empty() {
        println!("{}", "Nothing to show".yellow());
        return Ok(());
    }
    T::header();
    for entity in &page.content {
        entity.row();
    }
    println!();
    Ok(())
}
