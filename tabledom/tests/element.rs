use tabledom::{
    find_by_class, find_element, find_element_mut, set_hidden_by_class, walk, Element, Tag,
};

fn sample_table() -> Element {
    Element::new(Tag::Table).id("grid").child(
        Element::new(Tag::TBody)
            .id("body")
            .child(
                Element::new(Tag::Tr)
                    .child(Element::text(Tag::Td, "a").class("col-0"))
                    .child(Element::text(Tag::Td, "b").class("col-1")),
            )
            .child(
                Element::new(Tag::Tr)
                    .child(Element::text(Tag::Td, "c").class("col-0"))
                    .child(Element::text(Tag::Td, "d").class("col-1")),
            ),
    )
}

#[test]
fn test_find_element_by_id() {
    let root = sample_table();
    let body = find_element(&root, "body").unwrap();
    assert_eq!(body.tag, Tag::TBody);
    assert!(find_element(&root, "missing").is_none());
}

#[test]
fn test_find_element_mut_allows_edits() {
    let mut root = sample_table();
    find_element_mut(&mut root, "body").unwrap().dimmed = true;
    assert!(find_element(&root, "body").unwrap().dimmed);
}

#[test]
fn test_find_by_class_in_tree_order() {
    let root = sample_table();
    let cells: Vec<_> = find_by_class(&root, "col-1")
        .into_iter()
        .map(Element::text_content)
        .collect();
    assert_eq!(cells, vec!["b", "d"]);
}

#[test]
fn test_set_hidden_by_class_touches_only_matching() {
    let mut root = sample_table();
    assert_eq!(set_hidden_by_class(&mut root, "col-0", true), 2);
    assert!(find_by_class(&root, "col-0").iter().all(|el| el.hidden));
    assert!(find_by_class(&root, "col-1").iter().all(|el| !el.hidden));

    assert_eq!(set_hidden_by_class(&mut root, "col-0", false), 2);
    assert!(find_by_class(&root, "col-0").iter().all(|el| !el.hidden));
}

#[test]
fn test_class_splits_whitespace_and_dedupes() {
    let el = Element::div().class("btn btn-info").class("btn");
    assert_eq!(el.classes, vec!["btn", "btn-info"]);
}

#[test]
fn test_prepend_puts_child_first() {
    let el = Element::div()
        .child(Element::text(Tag::Span, "second"))
        .prepend(Element::text(Tag::Span, "first"));
    assert_eq!(el.text_content(), "firstsecond");
}

#[test]
fn test_walk_visits_every_node() {
    let root = sample_table();
    let mut count = 0;
    walk(&root, &mut |_| count += 1);
    // table, tbody, 2 rows, 4 cells
    assert_eq!(count, 8);
}

#[test]
fn test_input_carries_name_and_value() {
    let input = Element::input("filter_name", "x");
    assert_eq!(input.tag, Tag::Input);
    assert_eq!(input.value.as_deref(), Some("x"));
    assert_eq!(input.get_data("name").map(String::as_str), Some("filter_name"));
}

#[test]
fn test_generated_ids_are_unique() {
    let a = Element::div();
    let b = Element::div();
    assert_ne!(a.id, b.id);
}
