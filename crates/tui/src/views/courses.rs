use catalog_client::course::Course;
use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{empty_state, not_loaded, Action, Listing, SearchBox, View};
use crate::{event::Event, route::Route, store::Store, widgets::StatefulList};

/// The courses of one college, searchable by name, code and department
/// The college itself is fetched by the store when the route is entered.
#[derive(Debug, Default)]
pub struct CourseList {
    search: SearchBox,
    list: StatefulList,
}

impl CourseList {
    pub fn listing(&self, store: &Store) -> Option<Listing> {
        store
            .college_page()
            .map(|(_, courses)| Listing::new(courses, self.search.term()))
    }

    fn selected<'a>(&self, store: &'a Store) -> Option<&'a Course> {
        let (_, courses) = store.college_page()?;
        let listing = self.listing(store)?;
        let idx = *listing.rows().get(self.list.selected()?)?;
        courses.get(idx)
    }
}

impl View for CourseList {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let Some((college, courses)) = store.college_page() else {
            frame.render_widget(not_loaded(store), area);
            return;
        };

        let header = Paragraph::new(vec![
            Line::from(Span::styled(college.name.clone(), Style::new().blue().bold())),
            Line::raw(college.description.clone()),
        ])
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::BOTTOM));
        // line_count leaves out the bottom border
        let header_height = header.line_count(area.width) as u16 + 1;

        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(header_height),
                Constraint::Length(3),
                Constraint::Min(0),
            ],
        )
        .split(area);

        frame.render_widget(header, layout[0]);
        self.search.draw(
            frame,
            layout[1],
            "Search courses by name, code, or department...",
        );

        match Listing::new(courses, self.search.term()) {
            Listing::NothingYet => frame.render_widget(
                empty_state("No courses available yet", "Check back later for updates"),
                layout[2],
            ),
            Listing::NoMatches => frame.render_widget(
                empty_state(
                    "No courses found matching your search",
                    "Try a different search term",
                ),
                layout[2],
            ),
            Listing::Rows(rows) => {
                let items = rows
                    .iter()
                    .map(|i| ListItem::new(course_item(&courses[*i])))
                    .collect::<Vec<_>>();
                self.list.render_to(
                    frame,
                    layout[2],
                    List::new(items)
                        .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
                        .highlight_symbol(">> "),
                );
            }
        }
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        if self.search.handle_key(&key) {
            let rows = self.listing(store).map(|l| l.rows().len()).unwrap_or(0);
            self.list.set_item_count(rows);
            return Action::None;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Enter | KeyCode::Char('l') => {
                if let Some(course) = self.selected(store) {
                    return Action::Navigate(Route::Materials(course.id.clone()));
                }
            }
            KeyCode::Char('r') if store.load_failed() => store.refresh(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                return Action::Navigate(Route::Dashboard)
            }
            _ => (),
        };

        Action::None
    }
}

fn course_item(course: &Course) -> Text<'static> {
    let mut title = vec![Span::styled(course.name.clone(), Style::new().blue().bold())];
    if !course.code.is_empty() {
        title.push(Span::styled(format!("  {}", course.code), Style::new().cyan()));
    }

    let mut lines = vec![Line::from(title)];
    if !course.description.is_empty() {
        lines.push(Line::raw(course.description.clone()));
    }

    let facts = [course.department.as_deref(), course.duration.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    if !facts.is_empty() {
        lines.push(Line::styled(facts.join(" · "), Style::new().fg(Color::Gray)));
    }

    Text::from(lines)
}
