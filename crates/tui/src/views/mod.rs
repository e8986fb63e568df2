use catalog_client::{search, search::Searchable, Session};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    prelude::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Text},
    widgets::Paragraph,
    Frame,
};

use crate::{
    event::Event,
    route::Route,
    store::{Mutation, MutationKind, Store},
    styles::error_text,
    widgets::{text_input, TextInput},
};

mod admin;
mod colleges;
mod courses;
mod home;
mod login;
mod materials;

pub use admin::AdminPanel;
pub use colleges::CollegeList;
pub use courses::CourseList;
pub use home::HomeView;
pub use login::LoginView;
pub use materials::MaterialList;

/// An action that a [`View`] can request to be taken
#[derive(Debug)]
pub enum Action {
    /// Do nothing
    None,

    /// Quit the application
    Exit,

    /// Go somewhere else, remembering where we came from
    Navigate(Route),

    /// Go back to wherever we came from
    Back,

    /// Show a message the user has to dismiss
    Notify(String),

    /// Display the given text at the bottom of the screen
    Flash(Text<'static>),

    /// Ask the user before sending a destructive request
    Confirm { prompt: String, mutation: Mutation },

    /// A login went through
    LoggedIn(Session),

    /// Throw away the session
    Logout,

    /// A request to change the catalog finished
    MutationFinished(MutationKind, Result<(), String>),
}

/// A page of the application
pub trait View {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect);
    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action;

    /// Told when a change made from this page has finished
    fn mutation_finished(&mut self, _kind: MutationKind, _ok: bool) {}
}

/// What a list page shows after searching
#[derive(Debug, PartialEq, Eq)]
pub enum Listing {
    /// The backend has none of these at all
    NothingYet,
    /// There are some, but the search doesn't match any
    NoMatches,
    /// Indices of the items to show
    Rows(Vec<usize>),
}

impl Listing {
    pub fn new<T: Searchable>(items: &[T], term: &str) -> Self {
        if items.is_empty() {
            return Listing::NothingYet;
        }

        match search::filter(items, term) {
            rows if rows.is_empty() => Listing::NoMatches,
            rows => Listing::Rows(rows),
        }
    }

    pub fn rows(&self) -> &[usize] {
        match self {
            Listing::Rows(r) => r,
            _ => &[],
        }
    }
}

/// The search box on list pages
#[derive(Debug, Default)]
pub struct SearchBox {
    term: String,
    editing: bool,
}

impl SearchBox {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    /// Handle a key, returning true if it was used.
    /// `/` starts editing, and `Esc` or `Enter` stops.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.editing {
            if key.code == KeyCode::Char('/') {
                self.editing = true;
                return true;
            }
            return false;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.editing = false;
                true
            }
            _ => text_input::edit(&mut self.term, key),
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, placeholder: &str) {
        let label = match self.editing {
            true => "Search (Esc to finish)",
            false => "Search (/)",
        };
        if self.term.is_empty() && !self.editing {
            frame.render_widget(
                TextInput::new(label, placeholder).focused(false),
                area,
            );
        } else {
            frame.render_widget(TextInput::new(label, &self.term).focused(self.editing), area);
        }
    }
}

/// What to show in place of a page that isn't loaded
pub fn not_loaded(store: &Store) -> Paragraph<'static> {
    if store.load_failed() {
        Paragraph::new(error_text(vec![
            Line::raw("Couldn't load this page."),
            Line::raw("Press r to try again."),
        ]))
    } else {
        Paragraph::new("Loading...".gray())
    }
}

/// A muted line, for empty states
pub fn empty_state(headline: &str, detail: &str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::styled(headline.to_string(), Style::new().fg(Color::Gray).bold()),
        Line::styled(detail.to_string(), Style::new().fg(Color::DarkGray)),
    ])
}
