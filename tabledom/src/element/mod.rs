mod content;
mod node;

pub use content::Content;
pub use node::{Element, Tag};

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &root.content {
        for child in children {
            if let Some(found) = find_element(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Find an element by ID in the tree, mutably.
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &mut root.content {
        for child in children {
            if let Some(found) = find_element_mut(child, id) {
                return Some(found);
            }
        }
    }

    None
}

/// Visit every element depth-first, parents before children.
pub fn walk<'a>(root: &'a Element, visit: &mut impl FnMut(&'a Element)) {
    visit(root);
    for child in root.content.children() {
        walk(child, visit);
    }
}

/// Collect every element carrying `class`, in tree order.
pub fn find_by_class<'a>(root: &'a Element, class: &str) -> Vec<&'a Element> {
    let mut found = Vec::new();
    walk(root, &mut |el| {
        if el.has_class(class) {
            found.push(el);
        }
    });
    found
}

/// Set `hidden` on every element carrying `class`. Returns how many were touched.
pub fn set_hidden_by_class(root: &mut Element, class: &str, hidden: bool) -> usize {
    let mut touched = 0;
    if root.has_class(class) {
        root.hidden = hidden;
        touched += 1;
    }
    if let Content::Children(children) = &mut root.content {
        for child in children {
            touched += set_hidden_by_class(child, class, hidden);
        }
    }
    touched
}
