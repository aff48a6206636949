//! Header, body, filter row and footer.

use tabledom::{Element, Tag};

use super::{BODY_ID, FOOTER_ID, HEADER_ID, RenderInput};
use crate::column::Column;
use crate::result::{Row, display_value};
use crate::sort::SortDirection;

/// Classname for column `index` in a pass with the given random suffix.
pub fn column_classname(index: usize, suffix: u32) -> String {
    format!("dt-column_{index}_{suffix}")
}

fn column_cell(tag: Tag, column: &Column) -> Element {
    let mut cell = Element::new(tag)
        .hidden(column.hidden)
        .styles(column.css.iter().map(|(k, v)| (k.clone(), v.clone())));
    if let Some(classname) = &column.classname {
        cell = cell.class(classname.clone());
    }
    cell
}

pub fn build_header(input: &RenderInput<'_>, columns: &[Column]) -> Element {
    let mut row = Element::new(Tag::Tr);

    for (index, column) in columns.iter().enumerate() {
        let mut cell = column_cell(Tag::Th, column)
            .data("column", index.to_string())
            .child(Element::text(Tag::Span, column.title.clone()).class("dt-title"));

        if column.is_sortable() {
            cell = cell.class("dt-sortable").style("cursor", "pointer");
            let direction = column
                .field
                .as_deref()
                .and_then(|field| input.sort.direction_of(field));
            if let Some(direction) = direction {
                cell = cell
                    .data("sort", direction.as_str())
                    .child(Element::new(Tag::Span).class(match direction {
                        SortDirection::Asc => "dt-sort-asc glyphicon glyphicon-chevron-up",
                        SortDirection::Desc => "dt-sort-desc glyphicon glyphicon-chevron-down",
                    }));
            }
        }

        row.push_child(cell);
    }

    let mut header = Element::new(Tag::THead).id(HEADER_ID).child(row);
    if let Some(hook) = &input.hooks.header {
        hook(&mut header);
    }
    header
}

fn build_filter_row(input: &RenderInput<'_>, columns: &[Column]) -> Element {
    let mut row = Element::new(Tag::Tr).class("dt-filter-row");

    for column in columns {
        let mut cell = column_cell(Tag::Td, column);
        if let (true, Some(field)) = (column.has_filter_input(), column.field.as_deref()) {
            cell = cell.child(
                Element::input(format!("filter_{field}"), input.filter.input_value(field))
                    .data("filter", field),
            );
        }
        row.push_child(cell);
    }

    row
}

/// Text for one cell before any action button is added.
fn cell_text(row: &Row, column: &Column) -> String {
    if let Some(callback) = &column.callback {
        return callback(row, column);
    }

    let value = column
        .field
        .as_deref()
        .and_then(|field| row.get(field))
        .map(display_value)
        .filter(|v| !v.is_empty());

    value.or_else(|| column.custom.clone()).unwrap_or_default()
}

fn build_cell(row: &Row, column: &Column) -> Element {
    let text = cell_text(row, column);
    let mut cell = column_cell(Tag::Td, column);

    if let Some(label) = &column.action {
        let action_value = column
            .action_data_field
            .as_deref()
            .and_then(|field| row.get(field))
            .map(display_value)
            .unwrap_or_default();

        let mut button = Element::text(Tag::Link, label.clone())
            .class("btn btn-default")
            .data("action-value", action_value);
        if let Some(class) = &column.action_class {
            button = button.class(class.clone()).data("action-class", class.clone());
        }

        cell = cell.style("text-align", "center").child(button);
        if !text.is_empty() {
            cell.push_child(Element::text(Tag::Span, text));
        }
        return cell;
    }

    cell.content = tabledom::Content::Text(text);
    cell
}

fn build_row(input: &RenderInput<'_>, row: &Row, columns: &[Column]) -> Element {
    let element = Element::new(Tag::Tr)
        .class("dt-row")
        .children(columns.iter().map(|column| build_cell(row, column)));

    match &input.hooks.row {
        Some(hook) => hook(element, row),
        None => element,
    }
}

pub fn build_body(input: &RenderInput<'_>, columns: &[Column]) -> Element {
    let rows = input.result.map(|r| r.data.as_slice()).unwrap_or_default();

    let mut body = Element::new(Tag::TBody)
        .id(BODY_ID)
        .children(rows.iter().map(|row| build_row(input, row, columns)));

    if input.options.show_filter_row {
        body = body.prepend(build_filter_row(input, columns));
    }
    body
}

pub fn build_footer(input: &RenderInput<'_>, columns: &[Column]) -> Element {
    let row = Element::new(Tag::Tr).children(columns.iter().map(|column| column_cell(Tag::Td, column)));
    let mut footer = Element::new(Tag::TFoot).id(FOOTER_ID).child(row);

    if let Some(hook) = &input.hooks.footer {
        hook(&mut footer, input.result.and_then(|r| r.footer.as_ref()));
    }
    footer
}
