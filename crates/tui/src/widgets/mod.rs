mod popup;
mod stateful_list;
pub mod text_input;

pub use popup::render_popup;
pub use stateful_list::StatefulList;
pub use text_input::TextInput;
