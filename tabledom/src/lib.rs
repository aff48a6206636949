pub mod element;
pub mod text;

pub use element::{
    find_by_class, find_element, find_element_mut, set_hidden_by_class, walk, Content, Element,
    Tag,
};
