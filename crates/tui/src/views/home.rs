use crossterm::event::KeyCode;
use ratatui::{
    prelude::Rect,
    style::Stylize,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::{Action, View};
use crate::{event::Event, route::Route, store::Store};

#[derive(Debug, Default)]
pub struct HomeView {}

impl View for HomeView {
    fn draw(&mut self, _: &Store, frame: &mut Frame, area: Rect) {
        frame.render_widget(welcome_message(), area);
    }

    fn handle_event(&mut self, _: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        match key.code {
            KeyCode::Enter | KeyCode::Char('b') => Action::Navigate(Route::Dashboard),
            KeyCode::Char('a') => Action::Navigate(Route::Admin),
            KeyCode::Char('q') | KeyCode::Esc => Action::Exit,
            _ => Action::None,
        }
    }
}

fn welcome_message() -> Paragraph<'static> {
    Paragraph::new(vec![
        vec!["Welcome to LunarKoudo!".blue().bold()].into(),
        Line::from("Study materials from colleges and courses, all in one place."),
        Line::from(""),
        vec![
            "Press ".into(),
            "Enter".blue(),
            " to browse colleges, or ".into(),
            "a".blue(),
            " for the admin portal.".into(),
        ]
        .into(),
        vec![
            "In lists, use ".into(),
            "j/k or ↓/↑".blue(),
            " to move, ".into(),
            "Enter".blue(),
            " to open, ".into(),
            "/".blue(),
            " to search and ".into(),
            "Esc".blue(),
            " to go back.".into(),
        ]
        .into(),
        vec![
            "On a course, press ".into(),
            "d".blue(),
            " to download the selected material and ".into(),
            "o".blue(),
            " to open it once it's done.".into(),
        ]
        .into(),
        vec!["Use ".into(), "Ctrl-C".blue(), " to quit.".into()].into(),
    ])
    .wrap(Wrap { trim: false })
}
