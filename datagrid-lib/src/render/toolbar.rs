//! Toolbar region: per-page selector, column and filter dialog toggles,
//! overflow toggle and the sort/filter summary.

use tabledom::{Element, Tag};

use super::{OVERFLOW_TOGGLE_ID, Overflow, RenderInput, TOOLBAR_ID};
use crate::column::Column;

fn title_for<'a>(columns: &'a [Column], field: &'a str) -> &'a str {
    columns
        .iter()
        .find(|c| c.field.as_deref() == Some(field))
        .map(|c| c.title.as_str())
        .unwrap_or(field)
}

/// "Name ASC" entries for the current sort, in sort order.
pub(crate) fn sort_summary(input: &RenderInput<'_>, columns: &[Column]) -> Vec<String> {
    input
        .sort
        .iter()
        .map(|(field, direction)| {
            format!("{} {}", title_for(columns, field), direction.as_str().to_uppercase())
        })
        .collect()
}

/// "Name = 'x'" entries for every non-empty filter.
pub(crate) fn filter_summary(input: &RenderInput<'_>, columns: &[Column]) -> Vec<String> {
    input
        .filter
        .active()
        .map(|(field, value)| format!("{} = '{}'", title_for(columns, field), value))
        .collect()
}

fn table_info(input: &RenderInput<'_>, columns: &[Column]) -> Element {
    let mut list = Element::new(Tag::List).class("dt-table-info");
    let sort = sort_summary(input, columns);
    if !sort.is_empty() {
        list.push_child(Element::text(Tag::ListItem, format!("Sort: {}", sort.join(", "))));
    }
    let filter = filter_summary(input, columns);
    if !filter.is_empty() {
        list.push_child(Element::text(Tag::ListItem, format!("Filter: {}", filter.join(", "))));
    }

    Element::new(Tag::Link)
        .id("dt-table-info")
        .class("btn")
        .child(Element::new(Tag::Span).class("glyphicon glyphicon-info-sign"))
        .child(list)
}

fn per_page_selector(input: &RenderInput<'_>) -> [Element; 2] {
    let per_page = input.pagination.per_page();

    let toggle = Element::text(Tag::Link, per_page.to_string())
        .id("dt-per-page")
        .class("btn dropdown-toggle")
        .data("content", "Change the number of rows per page.");

    let choices = Element::new(Tag::List)
        .id("dt-per-page-choices")
        .class("dropdown-menu")
        .children(input.options.per_page_choices.iter().map(|choice| {
            Element::new(Tag::ListItem)
                .data("value", choice.to_string())
                .active(*choice == per_page)
                .child(Element::text(Tag::Link, choice.to_string()))
        }));

    [toggle, choices]
}

fn overflow_toggle(input: &RenderInput<'_>) -> Element {
    let icon = match input.overflow {
        Overflow::Fit => "glyphicon glyphicon-resize-full",
        Overflow::Scroll => "glyphicon glyphicon-resize-small",
    };
    Element::new(Tag::Link)
        .id(OVERFLOW_TOGGLE_ID)
        .class("btn")
        .data(
            "content",
            "Toggle the size of the table to fit the data or to fit the screen.",
        )
        .disabled(!input.has_rows())
        .child(Element::new(Tag::Span).class(icon))
}

pub fn build_toolbar(input: &RenderInput<'_>, columns: &[Column]) -> Element {
    let options = input.options;
    let mut buttons = Vec::new();

    if options.allow_tableinfo {
        buttons.push(table_info(input, columns));
    }
    if options.toggle_columns {
        buttons.push(
            Element::new(Tag::Link)
                .id("dt-column-toggle")
                .class("btn")
                .data("content", "Choose which columns you would like to display.")
                .child(Element::new(Tag::Span).class("glyphicon glyphicon-cog")),
        );
    }
    if let Some(target) = &options.filter_modal {
        buttons.push(
            Element::new(Tag::Link)
                .id("dt-filter-toggle")
                .class("btn")
                .data("content", "Open the filter dialog.")
                .data("target", target.clone())
                .child(Element::new(Tag::Span).class("glyphicon glyphicon-filter")),
        );
    }
    buttons.extend(per_page_selector(input));
    if options.allow_overflow {
        buttons.push(overflow_toggle(input));
    }

    let toolbar = Element::div()
        .id(TOOLBAR_ID)
        .class("dt-toolbar btn-toolbar pull-right")
        .child(Element::div().class("btn-group").children(buttons));

    let mut container = Element::div().class("dt-toolbar-container clearfix");
    if !options.title.is_empty() {
        container.push_child(Element::text(Tag::Heading, options.title.clone()).class("dt-title"));
    }
    container.child(toolbar)
}

#[cfg(test)]
mod tests {
    use tabledom::{find_by_class, find_element};

    use super::*;
    use crate::pagination::Pagination;
    use crate::render::fixture::Fixture;
    use crate::sort::{SortDirection, SortOrder};

    fn toolbar(fixture: &Fixture) -> Element {
        build_toolbar(&fixture.input(), &fixture.columns)
    }

    fn button_ids(toolbar: &Element) -> Vec<String> {
        let group = find_by_class(toolbar, "btn-group")[0];
        group.child_elements().iter().map(|el| el.id.clone()).collect()
    }

    #[test]
    fn test_default_buttons() {
        let fixture = Fixture::new();
        let toolbar = toolbar(&fixture);
        assert_eq!(
            button_ids(&toolbar),
            ["dt-column-toggle", "dt-per-page", "dt-per-page-choices", OVERFLOW_TOGGLE_ID]
        );
        assert!(find_by_class(&toolbar, "dt-title").is_empty());
    }

    #[test]
    fn test_all_buttons_in_order() {
        let mut fixture = Fixture::new();
        fixture.options.title = "People".to_string();
        fixture.options.allow_tableinfo = true;
        fixture.options.filter_modal = Some("#people-filters".to_string());
        let toolbar = toolbar(&fixture);

        assert_eq!(
            button_ids(&toolbar),
            [
                "dt-table-info",
                "dt-column-toggle",
                "dt-filter-toggle",
                "dt-per-page",
                "dt-per-page-choices",
                OVERFLOW_TOGGLE_ID,
            ]
        );
        assert_eq!(find_by_class(&toolbar, "dt-title")[0].text_content(), "People");
        let filter_toggle = find_element(&toolbar, "dt-filter-toggle").unwrap();
        assert_eq!(
            filter_toggle.get_data("target").map(String::as_str),
            Some("#people-filters")
        );
    }

    #[test]
    fn test_table_info_lists_sort_and_active_filters() {
        let mut fixture = Fixture::new();
        fixture.options.allow_tableinfo = true;
        fixture.sort = SortOrder::from_pairs([("name", SortDirection::Asc)]);
        fixture.filter = [("name", "x"), ("age", "")].into_iter().collect();
        let toolbar = toolbar(&fixture);

        let info = find_by_class(&toolbar, "dt-table-info")[0];
        let lines: Vec<String> = info.child_elements().iter().map(|li| li.text_content()).collect();
        assert_eq!(lines, ["Sort: Name ASC", "Filter: Name = 'x'"]);
    }

    #[test]
    fn test_current_per_page_choice_is_active() {
        let mut fixture = Fixture::new();
        fixture.pagination = Pagination::new(1, 50, 25, 2);
        let toolbar = toolbar(&fixture);

        assert_eq!(find_element(&toolbar, "dt-per-page").unwrap().text_content(), "50");
        let choices = find_element(&toolbar, "dt-per-page-choices").unwrap();
        let active: Vec<&str> = choices
            .child_elements()
            .iter()
            .filter(|li| li.active)
            .filter_map(|li| li.get_data("value").map(String::as_str))
            .collect();
        assert_eq!(active, ["50"]);
    }

    #[test]
    fn test_overflow_toggle_needs_rows() {
        let mut fixture = Fixture::new();
        assert!(!find_element(&toolbar(&fixture), OVERFLOW_TOGGLE_ID).unwrap().disabled);

        fixture.result = None;
        assert!(find_element(&toolbar(&fixture), OVERFLOW_TOGGLE_ID).unwrap().disabled);

        fixture.options.allow_overflow = false;
        assert!(find_element(&toolbar(&fixture), OVERFLOW_TOGGLE_ID).is_none());
    }
}
