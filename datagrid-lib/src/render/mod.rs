//! Render tree construction.
//!
//! Every cycle builds a fresh [`RenderTree`] from the grid state and the
//! latest result set. Nothing from a previous tree is reused; the only
//! in-place edits are the display toggles (column visibility, overflow)
//! applied to the current tree.

mod pagination;
mod table;
mod toolbar;

pub use pagination::build_pagination;
pub use table::{build_body, build_footer, build_header, column_classname};
pub use toolbar::build_toolbar;

use rand::Rng;
use tabledom::{Element, Tag};

use crate::column::Column;
use crate::filter::FilterState;
use crate::options::{GridHooks, GridOptions};
use crate::pagination::Pagination;
use crate::result::ResultSet;
use crate::sort::SortOrder;

pub const ROOT_ID: &str = "dt-root";
pub const TOOLBAR_ID: &str = "dt-toolbar";
pub const WRAPPER_ID: &str = "dt-wrapper";
pub const TABLE_ID: &str = "dt-table";
pub const HEADER_ID: &str = "dt-header";
pub const BODY_ID: &str = "dt-body";
pub const FOOTER_ID: &str = "dt-footer";
pub const TOP_DETAILS_ID: &str = "dt-top-details";
pub const BOTTOM_DETAILS_ID: &str = "dt-bottom-details";
pub const PLACEHOLDER_ID: &str = "dt-placeholder";
pub const OVERFLOW_TOGGLE_ID: &str = "dt-overflow-toggle";

/// How the table wrapper sizes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Grow to fit the data.
    #[default]
    Fit,
    /// Fixed width with scrolling.
    Scroll,
}

impl Overflow {
    pub fn toggled(self) -> Self {
        match self {
            Self::Fit => Self::Scroll,
            Self::Scroll => Self::Fit,
        }
    }

    pub fn css_value(self) -> &'static str {
        match self {
            Self::Fit => "visible",
            Self::Scroll => "scroll",
        }
    }
}

/// What a tree shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    /// Toolbar only; no fetch has completed yet.
    Shell,
    /// Full grid built from a non-empty result set.
    Grid,
    /// Empty or failed fetch.
    Placeholder,
}

/// One cycle's complete output.
#[derive(Debug, Clone)]
pub struct RenderTree {
    /// Increases by one for every tree built over the grid's lifetime.
    pub version: u64,
    pub kind: TreeKind,
    pub root: Element,
}

/// Borrowed grid state a build reads from.
#[derive(Clone, Copy)]
pub struct RenderInput<'a> {
    pub options: &'a GridOptions,
    pub hooks: &'a GridHooks,
    pub pagination: &'a Pagination,
    pub sort: &'a SortOrder,
    pub filter: &'a FilterState,
    pub overflow: Overflow,
    pub result: Option<&'a ResultSet>,
}

impl RenderInput<'_> {
    fn has_rows(&self) -> bool {
        self.result.is_some_and(|r| !r.is_empty())
    }
}

fn root() -> Element {
    Element::div().id(ROOT_ID).class("dt-grid clearfix")
}

/// Toolbar-only tree shown before the first fetch completes.
pub fn build_shell(input: &RenderInput<'_>, columns: &[Column], version: u64) -> RenderTree {
    RenderTree {
        version,
        kind: TreeKind::Shell,
        root: root().child(build_toolbar(input, columns)),
    }
}

/// Placeholder tree for empty and failed fetches. The toolbar stays usable.
pub fn build_placeholder(input: &RenderInput<'_>, columns: &[Column], version: u64) -> RenderTree {
    let mut root = root()
        .child(build_toolbar(input, columns))
        .child(
            Element::text(Tag::Div, input.options.empty_message.clone())
                .id(PLACEHOLDER_ID)
                .class("alert alert-error"),
        );

    if let Some(hook) = &input.hooks.table {
        hook(&mut root);
    }

    RenderTree {
        version,
        kind: TreeKind::Placeholder,
        root,
    }
}

/// Full grid tree.
///
/// Assigns every column a fresh classname for this pass before anything
/// else is built, so header, filter row, body and footer all agree.
pub fn build_grid(input: &RenderInput<'_>, columns: &mut [Column], version: u64) -> RenderTree {
    let suffix: u32 = rand::rng().random_range(1..=1000);
    for (index, column) in columns.iter_mut().enumerate() {
        column.classname = Some(column_classname(index, suffix));
    }
    let columns: &[Column] = columns;

    let options = input.options;
    let mut table = Element::new(Tag::Table).id(TABLE_ID).class(options.class.clone());

    if options.show_header {
        table.push_child(build_header(input, columns));
    }
    table.push_child(build_body(input, columns));
    if options.show_footer {
        table.push_child(build_footer(input, columns));
    }

    let wrapper = Element::div()
        .id(WRAPPER_ID)
        .class("dt-table-wrapper")
        .style("overflow", input.overflow.css_value())
        .child(table);

    let mut top_details = Element::div().id(TOP_DETAILS_ID);
    if options.show_top_pagination {
        if let Some(pager) = build_pagination(input.pagination, "top") {
            top_details.push_child(pager);
        }
    }

    let mut bottom_details = Element::div().id(BOTTOM_DETAILS_ID).child(
        Element::div()
            .class("pull-left")
            .child(Element::text(Tag::Paragraph, input.pagination.summary()).class("dt-summary")),
    );
    if options.show_pagination {
        if let Some(pager) = build_pagination(input.pagination, "bottom") {
            bottom_details.push_child(pager);
        }
    }

    let mut root = root()
        .child(build_toolbar(input, columns))
        .child(top_details)
        .child(wrapper)
        .child(bottom_details);

    if let Some(hook) = &input.hooks.table {
        hook(&mut root);
    }

    RenderTree {
        version,
        kind: TreeKind::Grid,
        root,
    }
}
