use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use super::Content;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Structural role of a node in the grid tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    Heading,
    Paragraph,
    Span,
    Table,
    THead,
    TBody,
    TFoot,
    Tr,
    Th,
    Td,
    Input,
    Button,
    Link,
    List,
    ListItem,
}

impl Tag {
    fn id_prefix(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Heading => "h",
            Self::Paragraph => "p",
            Self::Span => "span",
            Self::Table => "table",
            Self::THead => "thead",
            Self::TBody => "tbody",
            Self::TFoot => "tfoot",
            Self::Tr => "tr",
            Self::Th => "th",
            Self::Td => "td",
            Self::Input => "input",
            Self::Button => "button",
            Self::Link => "a",
            Self::List => "ul",
            Self::ListItem => "li",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    // Identity
    pub id: String,
    pub tag: Tag,

    // Content
    pub content: Content,

    // Addressing
    pub classes: Vec<String>,

    // State
    pub hidden: bool,
    pub disabled: bool,
    pub active: bool,
    /// Set while a newer tree is being fetched.
    pub dimmed: bool,

    /// Current value of an input element.
    pub value: Option<String>,

    /// Opaque style overrides, passed through untouched.
    pub style: BTreeMap<String, String>,

    // Custom data storage (page numbers, action values, etc.)
    pub data: HashMap<String, String>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            id: generate_id(tag.id_prefix()),
            tag,
            content: Content::None,
            classes: Vec::new(),
            hidden: false,
            disabled: false,
            active: false,
            dimmed: false,
            value: None,
            style: BTreeMap::new(),
            data: HashMap::new(),
        }
    }

    pub fn div() -> Self {
        Self::new(Tag::Div)
    }

    /// Create a leaf element holding text.
    pub fn text(tag: Tag, content: impl Into<String>) -> Self {
        Self {
            content: Content::Text(content.into()),
            ..Self::new(tag)
        }
    }

    /// Create an input element with an initial value.
    pub fn input(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(Tag::Input)
        }
        .data("name", name)
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // Classes
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        for part in class.split_whitespace() {
            if !self.has_class(part) {
                self.classes.push(part.to_string());
            }
        }
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    // State
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    // Style
    pub fn style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    pub fn styles<K, V>(mut self, styles: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.style
            .extend(styles.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    // Custom data
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&String> {
        self.data.get(key)
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        match &mut self.content {
            Content::Children(children) => children.extend(new_children),
            _ => self.content = Content::Children(new_children.into_iter().collect()),
        }
        self
    }

    /// Insert a child before all existing children.
    pub fn prepend(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.insert(0, child),
            _ => self.content = Content::Children(vec![child]),
        }
        self
    }

    pub fn push_child(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            _ => self.content = Content::Children(vec![child]),
        }
    }

    pub fn child_elements(&self) -> &[Element] {
        self.content.children()
    }

    /// Concatenated text of this element and all descendants, in tree order.
    pub fn text_content(&self) -> String {
        match &self.content {
            Content::None => String::new(),
            Content::Text(text) => text.clone(),
            Content::Children(children) => children.iter().map(Element::text_content).collect(),
        }
    }
}
