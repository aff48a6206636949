//! Pagination bar.

use tabledom::{Element, Tag};

use crate::pagination::Pagination;

fn page_item(kind: &str, page: usize, label: impl Into<String>) -> Element {
    Element::new(Tag::ListItem)
        .class(format!("dt-page-{kind}"))
        .data("kind", kind)
        .data("page", page.to_string())
        .child(Element::text(Tag::Link, label).data("page", page.to_string()))
}

/// Builds the pager, or `None` when every row fits on one page.
///
/// Every link carries its clamped target page in `data["page"]`.
/// `placement` distinguishes the top and bottom copies.
pub fn build_pagination(pagination: &Pagination, placement: &str) -> Option<Element> {
    if !pagination.is_paginated() {
        return None;
    }

    let current = pagination.current_page();
    let page_count = pagination.page_count();

    let first = page_item("first", 1, "«").disabled(pagination.is_first());
    let previous = page_item("previous", current.saturating_sub(1).max(1), "<")
        .disabled(pagination.is_first());
    let next = page_item("next", (current + 1).min(page_count), ">").disabled(pagination.is_last());
    let last = page_item("last", page_count, "»").disabled(pagination.is_last());

    let pages = pagination
        .window()
        .map(|page| page_item("link", page, page.to_string()).active(page == current));

    let pager = Element::new(Tag::List)
        .class("pagination")
        .child(first)
        .child(previous)
        .children(pages)
        .child(next)
        .child(last);

    Some(
        Element::div()
            .id(format!("dt-pagination-{placement}"))
            .class("dt-pagination pull-right")
            .child(pager),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(el: &Element) -> Vec<&Element> {
        el.child_elements()[0].child_elements().iter().collect()
    }

    #[test]
    fn test_absent_when_rows_fit() {
        assert!(build_pagination(&Pagination::new(1, 10, 7, 2), "bottom").is_none());
    }

    #[test]
    fn test_first_page_disables_back_controls() {
        let pager = build_pagination(&Pagination::new(1, 10, 95, 2), "bottom").unwrap();
        let items = items(&pager);
        // first, previous, 5 links, next, last
        assert_eq!(items.len(), 9);
        assert!(items[0].disabled && items[1].disabled);
        assert!(!items[7].disabled && !items[8].disabled);
        assert!(items[2].active);
        assert_eq!(items[2].get_data("page").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_last_page_disables_forward_controls() {
        let pager = build_pagination(&Pagination::new(10, 10, 95, 2), "top").unwrap();
        let items = items(&pager);
        assert!(items[7].disabled && items[8].disabled);
        assert_eq!(items[7].get_data("page").map(String::as_str), Some("10"));
        assert_eq!(pager.id, "dt-pagination-top");
    }
}
