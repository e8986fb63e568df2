use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{
    admin::{Form, FormInput, LoginDraft},
    Action, View,
};
use crate::{event::Event, route::Route, store::Store};

/// Asks for the admin's username and password
#[derive(Debug, Default)]
pub struct LoginView {
    form: Form<LoginDraft>,
}

impl View for LoginView {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let width = area.width.min(50);
        let area = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        };
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(2), Constraint::Min(0)],
        )
        .split(area);

        frame.render_widget(Paragraph::new("Admin Login".blue().bold()), layout[0]);
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);
        self.form
            .draw(frame, inner, true, "Login", store.in_flight(), &[]);
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        match self.form.handle_key(&key, &[]) {
            FormInput::Submit => {
                store.login(self.form.draft.credentials());
                Action::None
            }
            FormInput::Leave => Action::Navigate(Route::Home),
            FormInput::Handled | FormInput::Ignored => Action::None,
        }
    }
}
