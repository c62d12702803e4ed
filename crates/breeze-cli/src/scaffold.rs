//! Project scaffolding for the install command.
//!
//! Writes the default config file and preflight stylesheet when absent, and
//! wires tailwind tasks into the project task file. Existing files and
//! user-edited task entries are never overwritten.

use std::path::Path;
use toml_edit::{value, DocumentMut, Item, Table};
use tracing::{debug, info};

use crate::error::{CliError, Result};

pub const TASKS_FILE: &str = "tasks.toml";
pub const CONFIG_FILE: &str = "tailwind.config.toml";
pub const STYLESHEET_PATH: &str = "src/styles.css";

const DEFAULT_CONFIG: &str = r#"content = [
    "./routes/**/*.{rs,html}",
    "./islands/**/*.{rs,html}",
    "./components/**/*.{rs,html}",
]
"#;

const BUILD_TASK: &str = "./bin/tailwindcss -i ./src/styles.css -o ./static/styles.css --config ./tailwind.config.toml --minify";
const WATCH_TASK: &str = "./bin/tailwindcss -i ./src/styles.css -o ./static/styles.css --config ./tailwind.config.toml --watch";

/// Scaffold project defaults: task entries, config file, and preflight
/// stylesheet, concurrently.
pub async fn scaffold(root: &Path) -> Result<()> {
    tokio::try_join!(add_tasks(root), write_defaults(root))?;
    Ok(())
}

/// The configured `tasks.tailwind` entry, when the task file has one.
pub async fn existing_tailwind_task(root: &Path) -> Result<Option<String>> {
    let path = root.join(TASKS_FILE);
    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let doc = parse_tasks(&path, &text)?;
    Ok(doc
        .get("tasks")
        .and_then(|tasks| tasks.get("tailwind"))
        .and_then(|item| item.as_str())
        .map(str::to_string))
}

/// Upsert the tailwind task entries. `tasks.tailwind` always points at the
/// installed binary; the build and watch tasks are only added when missing
/// so user customizations survive reinstalls.
pub async fn add_tasks(root: &Path) -> Result<()> {
    let path = root.join(TASKS_FILE);
    let mut doc = match tokio::fs::read_to_string(&path).await {
        Ok(text) => parse_tasks(&path, &text)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => DocumentMut::new(),
        Err(err) => return Err(err.into()),
    };

    if !doc.contains_key("tasks") {
        doc["tasks"] = Item::Table(Table::new());
    }
    let tasks = doc["tasks"]
        .as_table_mut()
        .ok_or_else(|| CliError::TaskFile {
            path: path.clone(),
            message: "'tasks' is not a table".to_string(),
        })?;

    tasks["tailwind"] = value("./bin/tailwindcss");
    if !tasks.contains_key("tailwind:build") {
        tasks["tailwind:build"] = value(BUILD_TASK);
    }
    if !tasks.contains_key("tailwind:watch") {
        tasks["tailwind:watch"] = value(WATCH_TASK);
    }

    tokio::fs::write(&path, doc.to_string()).await?;
    info!(path = %path.display(), "tailwind tasks configured");
    Ok(())
}

/// Write the default config file and preflight stylesheet when they do not
/// exist yet.
pub async fn write_defaults(root: &Path) -> Result<()> {
    let config = root.join(CONFIG_FILE);
    if write_if_absent(&config, DEFAULT_CONFIG).await? {
        info!(path = %config.display(), "wrote default tailwind config");
    } else {
        debug!(path = %config.display(), "config already present");
    }

    let stylesheet = root.join(STYLESHEET_PATH);
    if write_if_absent(&stylesheet, breeze_tailwind::TAILWIND_PREFLIGHT).await? {
        info!(path = %stylesheet.display(), "wrote preflight stylesheet");
    } else {
        debug!(path = %stylesheet.display(), "stylesheet already present");
    }
    Ok(())
}

async fn write_if_absent(path: &Path, contents: &str) -> Result<bool> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => return Ok(false),
        Ok(false) => {}
        Err(err) => return Err(err.into()),
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(true)
}

fn parse_tasks(path: &Path, text: &str) -> Result<DocumentMut> {
    text.parse::<DocumentMut>().map_err(|err| CliError::TaskFile {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
