//! Plain-text rendering of a grid tree.

use datagrid_lib::render::{
    BODY_ID, HEADER_ID, PLACEHOLDER_ID, RenderTree, TOOLBAR_ID, TreeKind,
};
use tabledom::text::{TextAlign, display_width, pad_to_width};
use tabledom::{Element, Tag, find_by_class, find_element, walk};

const MAX_CELL_WIDTH: usize = 32;

fn visible_cells(row: &Element) -> Vec<&Element> {
    row.child_elements()
        .iter()
        .filter(|cell| !cell.hidden && matches!(cell.tag, Tag::Th | Tag::Td))
        .collect()
}

fn header_text(cell: &Element) -> String {
    let title = cell.text_content();
    match cell.get_data("sort").map(String::as_str) {
        Some("asc") => format!("{title} ▲"),
        Some("desc") => format!("{title} ▼"),
        _ => title,
    }
}

fn cell_align(cell: &Element) -> TextAlign {
    match cell.style.get("text-align").map(String::as_str) {
        Some("center") => TextAlign::Center,
        Some("right") => TextAlign::Right,
        _ => TextAlign::Left,
    }
}

fn toolbar_lines(root: &Element, out: &mut Vec<String>) {
    let mut headings = Vec::new();
    walk(root, &mut |el| {
        if el.tag == Tag::Heading {
            headings.push(el.text_content());
        }
    });
    out.extend(headings);

    let Some(toolbar) = find_element(root, TOOLBAR_ID) else { return };
    for info in find_by_class(toolbar, "dt-table-info") {
        for line in info.child_elements() {
            out.push(line.text_content());
        }
    }
    if let Some(choices) = find_element(toolbar, "dt-per-page-choices") {
        let choices: Vec<String> = choices
            .child_elements()
            .iter()
            .map(|li| {
                let value = li.text_content();
                if li.active { format!("[{value}]") } else { value }
            })
            .collect();
        out.push(format!("per page: {}", choices.join(" ")));
    }
}

fn table_lines(root: &Element, out: &mut Vec<String>) {
    let mut grid: Vec<Vec<(String, TextAlign)>> = Vec::new();

    if let Some(header) = find_element(root, HEADER_ID) {
        for row in header.child_elements() {
            grid.push(
                visible_cells(row)
                    .into_iter()
                    .map(|cell| (header_text(cell), TextAlign::Left))
                    .collect(),
            );
        }
    }
    let header_rows = grid.len();

    if let Some(body) = find_element(root, BODY_ID) {
        for row in find_by_class(body, "dt-row") {
            grid.push(
                visible_cells(row)
                    .into_iter()
                    .map(|cell| (cell.text_content(), cell_align(cell)))
                    .collect(),
            );
        }
    }

    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            grid.iter()
                .filter_map(|row| row.get(i))
                .map(|(text, _)| display_width(text))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    for (n, row) in grid.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((text, align), width)| pad_to_width(text, *width, *align))
            .collect();
        out.push(line.join(" | ").trim_end().to_string());

        if n + 1 == header_rows {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push(rule.join("-+-"));
        }
    }
}

fn pager_line(root: &Element) -> Option<String> {
    let pager = find_by_class(root, "pagination").into_iter().last()?;
    let items: Vec<String> = pager
        .child_elements()
        .iter()
        .map(|item| {
            let label = item.text_content();
            if item.active {
                format!("[{label}]")
            } else if item.disabled {
                format!("({label})")
            } else {
                label
            }
        })
        .collect();
    Some(items.join(" "))
}

/// Render the tree as lines of text.
pub fn render_text(tree: &RenderTree) -> String {
    let root = &tree.root;
    let mut out = Vec::new();

    toolbar_lines(root, &mut out);

    match tree.kind {
        TreeKind::Shell => out.push("(not loaded)".to_string()),
        TreeKind::Placeholder => {
            if let Some(placeholder) = find_element(root, PLACEHOLDER_ID) {
                out.push(placeholder.text_content());
            }
        }
        TreeKind::Grid => {
            out.push(String::new());
            table_lines(root, &mut out);
            out.push(String::new());
            for summary in find_by_class(root, "dt-summary") {
                out.push(summary.text_content());
            }
            if let Some(pager) = pager_line(root) {
                out.push(pager);
            }
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use datagrid_lib::DataGrid;
    use datagrid_lib::column::ColumnSpec;
    use datagrid_lib::options::GridOptions;
    use datagrid_lib::source::MemorySource;

    use super::*;

    async fn grid(rows: usize) -> DataGrid {
        let rows = (1..=rows)
            .filter_map(|i| serde_json::json!({ "id": i, "name": format!("n{i}") }).as_object().cloned())
            .collect();
        let options = GridOptions::new("mem").columns([
            ColumnSpec::field("id").title("Id"),
            ColumnSpec::field("name").title("Name"),
        ]);
        DataGrid::builder()
            .source(Arc::new(MemorySource::new(rows)))
            .options(options)
            .build()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_grid_text() {
        let mut grid = grid(25).await;
        grid.toggle_sort(1).await.unwrap();
        let text = render_text(grid.tree().unwrap());

        assert!(text.contains("per page: [10] 20 50 100 200"));
        assert!(text.contains("Id | Name ▲"));
        assert!(text.contains("Showing 1 to 10 of 25 rows"));
        assert!(text.contains("(«) (<) [1] 2 3 > »"));
    }

    #[tokio::test]
    async fn test_hidden_column_is_not_printed() {
        let mut grid = grid(3).await;
        grid.toggle_column(0).unwrap();
        let text = render_text(grid.tree().unwrap());
        assert!(text.contains("Name\n"));
        assert!(!text.contains("Id"));
    }

    #[tokio::test]
    async fn test_placeholder_text() {
        let grid = grid(0).await;
        let text = render_text(grid.tree().unwrap());
        assert!(text.ends_with("No Results Found"));
    }
}
