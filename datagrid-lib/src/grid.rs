//! The grid: owned state plus the fetch/rebuild cycle.

use std::str::FromStr;
use std::sync::Arc;

use tabledom::find_element_mut;

use crate::actions::ActionRegistry;
use crate::column::{self, Column, ColumnSpec};
use crate::error::{GridError, SourceError};
use crate::filter::FilterState;
use crate::options::{GridHooks, GridOptions};
use crate::pagination::Pagination;
use crate::render::{self, Overflow, RenderInput, RenderTree, TreeKind, WRAPPER_ID};
use crate::result::ResultSet;
use crate::sort::{SortDirection, SortOrder};
use crate::source::{DataSource, Missing, PageRequest, RequestToken, SaveColumnsRequest, Set};
use crate::store::{ColumnStore, widget_key};

/// How a completed fetch was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Non-empty result; the full grid was rebuilt.
    Rendered,
    /// Well-formed response with no rows; placeholder shown.
    Empty,
    /// Transport or decode failure; placeholder shown.
    Failed,
    /// A newer request was issued since; nothing was touched.
    Stale,
}

/// One entry of the column visibility dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnToggle {
    pub index: usize,
    pub title: String,
    pub hidden: bool,
}

/// Operations reachable by name through [`DataGrid::command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCommand {
    Render,
    Remove,
    ToggleOverflow,
    ShowAllColumns,
    HideAllColumns,
    SaveColumns,
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    ClearFilters,
}

impl FromStr for GridCommand {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "render" => Self::Render,
            "remove" => Self::Remove,
            "toggle_overflow" => Self::ToggleOverflow,
            "show_all_columns" => Self::ShowAllColumns,
            "hide_all_columns" => Self::HideAllColumns,
            "save_columns" => Self::SaveColumns,
            "first_page" => Self::FirstPage,
            "previous_page" => Self::PreviousPage,
            "next_page" => Self::NextPage,
            "last_page" => Self::LastPage,
            "clear_filters" => Self::ClearFilters,
            other => return Err(GridError::UnknownCommand(other.to_string())),
        })
    }
}

/// A data grid bound to one data source.
///
/// All state is owned here and mutated only through `&mut self`, either by
/// a discrete user operation or by a fetch completion. Every completed fetch
/// replaces [`DataGrid::tree`] wholesale.
///
/// # Example
///
/// ```ignore
/// let grid = DataGrid::builder()
///     .source(Arc::new(source))
///     .options(GridOptions::new("https://example.com/people").column(ColumnSpec::field("name")))
///     .build()
///     .await?;
/// ```
pub struct DataGrid {
    source: Arc<dyn DataSource>,
    store: ColumnStore,
    key: String,
    options: GridOptions,
    hooks: GridHooks,
    caller_columns: Vec<ColumnSpec>,
    columns: Vec<Column>,
    sort: SortOrder,
    filter: FilterState,
    pagination: Pagination,
    overflow: Overflow,
    result: Option<ResultSet>,
    tree: Option<RenderTree>,
    version: u64,
    issued: u64,
    latest: Option<RequestToken>,
    loading: bool,
    column_dialog_open: bool,
    actions: ActionRegistry,
    removed: bool,
}

impl DataGrid {
    pub fn builder() -> DataGridBuilder<Missing> {
        DataGridBuilder::new()
    }

    // =========================================================================
    // Fetch cycle
    // =========================================================================

    /// Re-fetch the current page and rebuild the tree.
    pub async fn render(&mut self) -> Result<FetchOutcome, GridError> {
        let request = self.begin_fetch()?;
        let response = self.source.fetch(&request).await;
        Ok(self.complete_fetch(request.token, response))
    }

    /// Enter `loading` and issue the next request.
    ///
    /// Any earlier outstanding request becomes stale.
    pub fn begin_fetch(&mut self) -> Result<PageRequest, GridError> {
        if self.removed {
            return Err(GridError::Removed);
        }

        self.issued += 1;
        let token = RequestToken(self.issued);
        self.latest = Some(token);
        self.loading = true;
        if let Some(tree) = &mut self.tree {
            tree.root.dimmed = true;
        }

        log::debug!(
            "[grid] fetch {} limit={} offset={}",
            token,
            self.pagination.per_page(),
            self.pagination.offset()
        );

        Ok(PageRequest {
            token,
            limit: self.pagination.per_page(),
            offset: self.pagination.offset(),
            sort: self.sort.clone(),
            filter: self.filter.clone(),
        })
    }

    /// Apply the response for `token`. Responses for anything but the latest
    /// issued token are dropped.
    pub fn complete_fetch(
        &mut self,
        token: RequestToken,
        response: Result<ResultSet, SourceError>,
    ) -> FetchOutcome {
        if self.removed || self.latest != Some(token) {
            log::warn!("[grid] discarding stale response {token}");
            return FetchOutcome::Stale;
        }

        let outcome = match response {
            Ok(result) if !result.is_empty() => {
                self.sort = result.sort.clone();
                self.filter = result.filter.clone();
                if let Some(total_rows) = result.total_rows {
                    self.pagination.set_total_rows(total_rows);
                }
                if let Some(page) = result.current_page {
                    self.pagination.go_to(page);
                }
                column::apply_server(&mut self.columns, &result.columns, &self.caller_columns);
                self.result = Some(result);
                self.rebuild(TreeKind::Grid);
                FetchOutcome::Rendered
            }
            Ok(result) => {
                log::debug!("[grid] empty result for {token}");
                self.result = Some(result);
                self.rebuild(TreeKind::Placeholder);
                FetchOutcome::Empty
            }
            Err(e) => {
                let hint = if e.is_retryable() { " (retryable)" } else { "" };
                if self.options.debug {
                    log::error!("[grid] fetch {token} failed{hint}: {e}");
                } else {
                    log::debug!("[grid] fetch {token} failed{hint}: {e}");
                }
                self.result = None;
                self.rebuild(TreeKind::Placeholder);
                FetchOutcome::Failed
            }
        };

        self.loading = false;
        outcome
    }

    fn rebuild(&mut self, kind: TreeKind) {
        self.version += 1;
        let input = RenderInput {
            options: &self.options,
            hooks: &self.hooks,
            pagination: &self.pagination,
            sort: &self.sort,
            filter: &self.filter,
            overflow: self.overflow,
            result: self.result.as_ref(),
        };
        let tree = match kind {
            TreeKind::Grid => render::build_grid(&input, &mut self.columns, self.version),
            TreeKind::Placeholder => render::build_placeholder(&input, &self.columns, self.version),
            TreeKind::Shell => render::build_shell(&input, &self.columns, self.version),
        };
        self.tree = Some(tree);
    }

    // =========================================================================
    // Sort and filter
    // =========================================================================

    /// Header click on column `index`: advance its sort cycle and re-fetch.
    pub async fn toggle_sort(&mut self, index: usize) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        let column = self.columns.get(index).ok_or(GridError::NoSuchColumn(index))?;
        let field = match (&column.field, column.is_sortable()) {
            (Some(field), true) => field.clone(),
            _ => return Err(GridError::NotSortable(index)),
        };

        let direction = self.sort.toggle(&field, self.options.allow_multiple_sort);
        log::debug!(
            "[grid] sort {field} -> {}",
            direction.map(SortDirection::as_str).unwrap_or("none")
        );
        self.render().await
    }

    /// Filter input change for `field`. Every change is a round trip.
    pub async fn set_filter(
        &mut self,
        field: &str,
        value: impl Into<String>,
    ) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        let value = value.into();
        log::debug!("[grid] filter {field} = {value:?}");
        self.filter.set(field, value);
        self.render().await
    }

    /// Clearing an input keeps the key with an empty value.
    pub async fn clear_filter(&mut self, field: &str) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        self.filter.clear_field(field);
        self.render().await
    }

    pub async fn clear_filters(&mut self) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        self.filter.clear();
        self.render().await
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Page link click. The page is clamped into range before fetching.
    pub async fn go_to_page(&mut self, page: usize) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        self.pagination.go_to(page);
        self.render().await
    }

    pub async fn first_page(&mut self) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        self.pagination.first();
        self.render().await
    }

    pub async fn previous_page(&mut self) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        self.pagination.previous();
        self.render().await
    }

    pub async fn next_page(&mut self) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        self.pagination.next();
        self.render().await
    }

    pub async fn last_page(&mut self) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        self.pagination.last();
        self.render().await
    }

    /// Per-page selector. The current page is clamped into the new range.
    pub async fn set_per_page(&mut self, per_page: usize) -> Result<FetchOutcome, GridError> {
        self.ensure_live()?;
        self.pagination.set_per_page(per_page);
        log::debug!("[grid] per page -> {}", self.pagination.per_page());
        self.render().await
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Flip a column's visibility and apply it to the current tree. No fetch.
    ///
    /// Returns the new `hidden` value.
    pub fn toggle_column(&mut self, index: usize) -> Result<bool, GridError> {
        self.ensure_live()?;
        let column = self
            .columns
            .get_mut(index)
            .ok_or(GridError::NoSuchColumn(index))?;
        column.hidden = !column.hidden;

        if let (Some(tree), Some(classname)) = (&mut self.tree, &column.classname) {
            tabledom::set_hidden_by_class(&mut tree.root, classname, column.hidden);
        }
        Ok(column.hidden)
    }

    /// Entries of the column visibility dialog. Untitled columns are left out.
    pub fn column_toggles(&self) -> Vec<ColumnToggle> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.title.is_empty())
            .map(|(index, c)| ColumnToggle {
                index,
                title: c.title.clone(),
                hidden: c.hidden,
            })
            .collect()
    }

    pub fn show_all_columns(&mut self) -> Result<(), GridError> {
        self.set_all_hidden(false)
    }

    pub fn hide_all_columns(&mut self) -> Result<(), GridError> {
        self.set_all_hidden(true)
    }

    fn set_all_hidden(&mut self, hidden: bool) -> Result<(), GridError> {
        for toggle in self.column_toggles() {
            if toggle.hidden != hidden {
                self.toggle_column(toggle.index)?;
            }
        }
        Ok(())
    }

    pub fn open_column_dialog(&mut self) {
        self.column_dialog_open = true;
    }

    pub fn column_dialog_open(&self) -> bool {
        self.column_dialog_open
    }

    /// Persist the whole column list, then send the companion request.
    ///
    /// A failed companion request is logged, not returned.
    pub async fn save_columns(&mut self) -> Result<(), GridError> {
        self.ensure_live()?;
        self.column_dialog_open = false;
        if !self.options.allow_save_columns {
            return Ok(());
        }

        self.store.save(&self.key, &self.columns).await?;

        let request = SaveColumnsRequest {
            columns: self.columns.clone(),
            sort: self.sort.clone(),
            filter: self.filter.clone(),
            extra: self.options.post.clone(),
        };
        if let Err(e) = self.source.save_columns(&request).await {
            log::warn!("[grid] save-columns request failed: {e}");
        }
        Ok(())
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Switch the wrapper between fit and scroll. Does nothing without rows.
    pub fn toggle_overflow(&mut self) -> Result<Overflow, GridError> {
        self.ensure_live()?;
        if !self.result.as_ref().is_some_and(|r| !r.is_empty()) {
            return Ok(self.overflow);
        }

        self.overflow = self.overflow.toggled();
        if let Some(wrapper) = self
            .tree
            .as_mut()
            .and_then(|tree| find_element_mut(&mut tree.root, WRAPPER_ID))
        {
            wrapper.style.insert("overflow".to_string(), self.overflow.css_value().to_string());
        }
        Ok(self.overflow)
    }

    /// Action cell click. Returns whether a handler ran.
    pub fn dispatch_action(&self, action_class: &str, value: &str) -> bool {
        !self.removed && self.actions.dispatch(action_class, value)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Route a command name to the same-named operation.
    pub async fn command(&mut self, name: &str) -> Result<(), GridError> {
        match name.parse::<GridCommand>()? {
            GridCommand::Render => self.render().await.map(drop),
            GridCommand::Remove => {
                self.remove();
                Ok(())
            }
            GridCommand::ToggleOverflow => self.toggle_overflow().map(drop),
            GridCommand::ShowAllColumns => self.show_all_columns(),
            GridCommand::HideAllColumns => self.hide_all_columns(),
            GridCommand::SaveColumns => self.save_columns().await,
            GridCommand::FirstPage => self.first_page().await.map(drop),
            GridCommand::PreviousPage => self.previous_page().await.map(drop),
            GridCommand::NextPage => self.next_page().await.map(drop),
            GridCommand::LastPage => self.last_page().await.map(drop),
            GridCommand::ClearFilters => self.clear_filters().await.map(drop),
        }
    }

    /// Tear down. Outstanding responses are dropped and every later
    /// operation fails with [`GridError::Removed`].
    pub fn remove(&mut self) {
        log::debug!("[grid] removed {}", self.key);
        self.removed = true;
        self.latest = None;
        self.loading = false;
        self.tree = None;
        self.result = None;
        self.column_dialog_open = false;
        self.actions.clear();
    }

    fn ensure_live(&self) -> Result<(), GridError> {
        if self.removed {
            Err(GridError::Removed)
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current tree. `None` only after [`DataGrid::remove`].
    pub fn tree(&self) -> Option<&RenderTree> {
        self.tree.as_ref()
    }

    pub fn sort(&self) -> &SortOrder {
        &self.sort
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The latest applied result set, empty ones included.
    pub fn result(&self) -> Option<&ResultSet> {
        self.result.as_ref()
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn overflow(&self) -> Overflow {
        self.overflow
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Persistence key for this grid.
    pub fn widget_key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for DataGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("key", &self.key)
            .field("columns", &self.columns)
            .field("sort", &self.sort)
            .field("filter", &self.filter)
            .field("pagination", &self.pagination)
            .field("loading", &self.loading)
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Builder for [`DataGrid`]. The data source is required at compile time.
pub struct DataGridBuilder<Source> {
    source: Source,
    options: GridOptions,
    hooks: GridHooks,
    store: ColumnStore,
}

impl DataGridBuilder<Missing> {
    pub fn new() -> Self {
        Self {
            source: Missing,
            options: GridOptions::default(),
            hooks: GridHooks::default(),
            store: ColumnStore::unavailable(),
        }
    }

    pub fn source(self, source: Arc<dyn DataSource>) -> DataGridBuilder<Set<Arc<dyn DataSource>>> {
        DataGridBuilder {
            source: Set(source),
            options: self.options,
            hooks: self.hooks,
            store: self.store,
        }
    }
}

impl Default for DataGridBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DataGridBuilder<S> {
    pub fn options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    pub fn hooks(mut self, hooks: GridHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Column preference store. Defaults to one that persists nothing.
    pub fn store(mut self, store: ColumnStore) -> Self {
        self.store = store;
        self
    }
}

impl DataGridBuilder<Set<Arc<dyn DataSource>>> {
    /// Construct the grid and, with `auto_load`, run the first fetch.
    ///
    /// Fails only on invalid column configuration. An unreadable preference
    /// store is logged and treated as empty.
    pub async fn build(self) -> Result<DataGrid, GridError> {
        let Self {
            source,
            mut options,
            hooks,
            store,
        } = self;

        if let Some(pre_render) = &hooks.pre_render {
            pre_render(&mut options);
        }
        column::validate(&options.columns)?;

        let key = widget_key(options.id.as_deref(), &options.url);
        let persisted = match store.load(&key).await {
            Ok(saved) => saved.unwrap_or_default(),
            Err(e) => {
                log::warn!("[grid] could not load saved columns for {key}: {e}");
                Vec::new()
            }
        };

        let caller_columns = options.columns.clone();
        let columns = column::merge_initial(&caller_columns, &persisted);
        let actions = ActionRegistry::from_columns(&columns);
        let pagination = Pagination::new(
            options.current_page,
            options.per_page,
            options.total_rows,
            options.page_padding,
        );

        let mut grid = DataGrid {
            source: source.0,
            store,
            key,
            sort: options.sort.clone(),
            filter: options.filter.clone(),
            options,
            hooks,
            caller_columns,
            columns,
            pagination,
            overflow: Overflow::default(),
            result: None,
            tree: None,
            version: 0,
            issued: 0,
            latest: None,
            loading: false,
            column_dialog_open: false,
            actions,
            removed: false,
        };
        grid.rebuild(TreeKind::Shell);

        if grid.options.auto_load {
            grid.render().await?;
        }
        Ok(grid)
    }
}
