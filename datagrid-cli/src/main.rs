mod paths;
mod print;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use datagrid_lib::column::ColumnSpec;
use datagrid_lib::error::{GridError, SourceError, StoreError};
use datagrid_lib::options::GridOptions;
use datagrid_lib::result::Row;
use datagrid_lib::source::{DataSource, HttpSource, MemorySource};
use datagrid_lib::store::{ColumnStore, SqliteBackend, widget_key};
use datagrid_lib::DataGrid;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::paths::{AppPaths, KEEP_LOGS};

#[derive(Parser)]
#[command(name = "datagrid")]
#[command(about = "Fetch a page of a remote data grid and print it", long_about = None)]
#[command(version)]
struct Cli {
    /// Data source URL. Overrides the options file.
    #[arg(long)]
    url: Option<String>,

    /// JSON file with grid options (camelCase keys).
    #[arg(long)]
    options: Option<PathBuf>,

    /// Serve generated rows from memory instead of a URL.
    #[arg(long)]
    demo: bool,

    #[arg(long)]
    per_page: Option<usize>,

    #[arg(long)]
    page: Option<usize>,

    /// Column index to click for sorting. Repeatable.
    #[arg(long = "sort")]
    sorts: Vec<usize>,

    /// `field=value` filter. Repeatable.
    #[arg(long = "filter")]
    filters: Vec<String>,

    /// Column index whose visibility to flip. Repeatable.
    #[arg(long = "toggle")]
    toggles: Vec<usize>,

    /// Grid command to run after loading, e.g. `next_page`. Repeatable.
    #[arg(short, long = "command")]
    commands: Vec<String>,

    /// Do not load or save column preferences.
    #[arg(long)]
    no_store: bool,

    /// Drop this grid's saved column preferences before loading.
    #[arg(long)]
    forget_columns: bool,

    /// List grids with saved column preferences and exit.
    #[arg(long)]
    saved: bool,

    /// Keep the column database and logs under this directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no data directory: pass --data-dir")]
    NoDataDir,

    #[error("reading options: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("invalid filter {0:?}, expected field=value")]
    Filter(String),

    #[error("no data source: pass --url, --options with a url, or --demo")]
    NoSource,
}

fn init_logging(paths: Option<&AppPaths>, level: LevelFilter) {
    let Some(paths) = paths else { return };
    if let Err(e) = paths.rotate_logs(chrono::Local::now(), KEEP_LOGS) {
        eprintln!("Warning: log rotation failed: {e}");
    }
    if let Ok(file) = File::create(paths.log_file()) {
        let _ = WriteLogger::init(level, Config::default(), file);
    }
}

fn demo_rows() -> Vec<Row> {
    let names = ["Ada", "Brian", "Chen", "Dana", "Emil", "Fatima", "Gus"];
    let teams = ["core", "infra", "web"];
    (1..=57)
        .filter_map(|i| {
            serde_json::json!({
                "id": i,
                "name": format!("{} {}", names[i % names.len()], i),
                "team": teams[i % teams.len()],
                "age": 21 + (i * 7) % 40,
            })
            .as_object()
            .cloned()
        })
        .collect()
}

fn demo_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::field("id").title("#").css("text-align", "right"),
        ColumnSpec::field("name").title("Name").filterable(),
        ColumnSpec::field("team").title("Team").filterable(),
        ColumnSpec::field("age").title("Age"),
    ]
}

fn load_options(cli: &Cli) -> Result<GridOptions, CliError> {
    let mut options = match &cli.options {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => GridOptions::default(),
    };
    if let Some(url) = &cli.url {
        options.url = url.clone();
    }
    if cli.demo {
        if options.url.is_empty() {
            options.url = "demo".to_string();
        }
        if options.columns.is_empty() {
            options.columns = demo_columns();
        }
        options.allow_tableinfo = true;
    }
    if let Some(per_page) = cli.per_page {
        options.per_page = per_page;
    }
    if let Some(page) = cli.page {
        options.current_page = page;
    }
    Ok(options)
}

async fn open_backend(paths: &AppPaths) -> Result<SqliteBackend, StoreError> {
    let path = paths.columns_db();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    SqliteBackend::open(&path).await
}

async fn open_store(paths: Option<&AppPaths>, disabled: bool) -> Option<SqliteBackend> {
    if disabled {
        return None;
    }
    match open_backend(paths?).await {
        Ok(backend) => Some(backend),
        Err(e) => {
            log::warn!("[cli] column store unavailable: {e}");
            None
        }
    }
}

async fn list_saved(paths: Option<&AppPaths>) -> Result<(), CliError> {
    let backend = open_backend(paths.ok_or(CliError::NoDataDir)?).await?;
    for saved in backend.saved().await? {
        let when = chrono::DateTime::from_timestamp(saved.saved_at, 0)
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{}\t{} columns\t{}", saved.key, saved.column_count, when);
    }
    Ok(())
}

async fn run(cli: Cli, paths: Option<AppPaths>) -> Result<(), CliError> {
    if cli.saved {
        return list_saved(paths.as_ref()).await;
    }

    let options = load_options(&cli)?;

    let source: Arc<dyn DataSource> = if cli.demo {
        Arc::new(MemorySource::new(demo_rows()))
    } else if options.url.is_empty() {
        return Err(CliError::NoSource);
    } else {
        Arc::new(
            HttpSource::builder()
                .url(options.url.clone())
                .timeout(Duration::from_secs(30))
                .build()?,
        )
    };

    let store = match open_store(paths.as_ref(), cli.no_store).await {
        Some(backend) => ColumnStore::new(backend),
        None => ColumnStore::unavailable(),
    };
    if cli.forget_columns {
        let key = widget_key(options.id.as_deref(), &options.url);
        log::info!("[cli] forgetting saved columns for {key}");
        store.forget(&key).await?;
    }

    let mut grid = DataGrid::builder()
        .source(source)
        .options(options)
        .store(store)
        .build()
        .await?;

    for filter in &cli.filters {
        let (field, value) = filter
            .split_once('=')
            .ok_or_else(|| CliError::Filter(filter.clone()))?;
        grid.set_filter(field, value).await?;
    }
    for index in &cli.sorts {
        grid.toggle_sort(*index).await?;
    }
    for index in &cli.toggles {
        grid.toggle_column(*index)?;
    }
    for command in &cli.commands {
        grid.command(command).await?;
    }

    match grid.tree() {
        Some(tree) => println!("{}", print::render_text(tree)),
        None => println!("(removed)"),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let paths = AppPaths::resolve(cli.data_dir.clone());
    init_logging(paths.as_ref(), cli.log_level);

    if let Err(e) = run(cli, paths).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
