use catalog_client::college::College;
use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{empty_state, not_loaded, Action, Listing, SearchBox, View};
use crate::{event::Event, route::Route, store::Store, widgets::StatefulList};

/// Every college, searchable by name and location
#[derive(Debug, Default)]
pub struct CollegeList {
    search: SearchBox,
    list: StatefulList,
}

impl CollegeList {
    /// What we're showing, or `None` if the colleges haven't loaded
    pub fn listing(&self, store: &Store) -> Option<Listing> {
        store
            .colleges()
            .map(|cs| Listing::new(cs, self.search.term()))
    }

    fn selected<'a>(&self, store: &'a Store) -> Option<&'a College> {
        let colleges = store.colleges()?;
        let listing = self.listing(store)?;
        let idx = *listing.rows().get(self.list.selected()?)?;
        colleges.get(idx)
    }
}

impl View for CollegeList {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
            ],
        )
        .split(area);

        frame.render_widget(
            Paragraph::new("Explore Colleges".blue().bold()),
            layout[0],
        );
        self.search
            .draw(frame, layout[1], "Search colleges by name or location...");

        let (Some(colleges), Some(listing)) = (store.colleges(), self.listing(store)) else {
            frame.render_widget(not_loaded(store), layout[2]);
            return;
        };

        match listing {
            Listing::NothingYet => frame.render_widget(
                empty_state("No colleges available yet", "Check back later for updates"),
                layout[2],
            ),
            Listing::NoMatches => frame.render_widget(
                empty_state(
                    "No colleges found matching your search",
                    "Try a different search term",
                ),
                layout[2],
            ),
            Listing::Rows(rows) => {
                let items = rows
                    .iter()
                    .map(|i| ListItem::new(college_item(&colleges[*i])))
                    .collect::<Vec<_>>();
                self.list.render_to(
                    frame,
                    layout[2],
                    List::new(items)
                        .block(Block::default().borders(Borders::TOP))
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
                if let Some(college) = self.selected(store) {
                    return Action::Navigate(Route::Courses(college.id.clone()));
                }
            }
            KeyCode::Char('r') if store.load_failed() => store.refresh(),
            KeyCode::Char('a') => return Action::Navigate(Route::Admin),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => {
                return Action::Navigate(Route::Home)
            }
            _ => (),
        };

        Action::None
    }
}

fn college_item(college: &College) -> Text<'static> {
    let mut lines = vec![Line::from(Span::styled(
        college.name.clone(),
        Style::new().blue().bold(),
    ))];
    if !college.description.is_empty() {
        lines.push(Line::raw(college.description.clone()));
    }

    let mut facts = vec![];
    if let Some(location) = &college.location {
        facts.push(location.clone());
    }
    if let Some(year) = college.established {
        facts.push(format!("Established {}", year));
    }
    if !facts.is_empty() {
        lines.push(Line::styled(facts.join(" · "), Style::new().fg(Color::Gray)));
    }

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        store::{testing::detached, Event as StoreEvent, PageData},
        views::testing::render,
    };
    use crossterm::event::KeyEvent;

    fn key(c: KeyCode) -> Event {
        Event::Key(KeyEvent::from(c))
    }

    fn search(view: &mut CollegeList, store: &mut Store, term: &str) {
        view.handle_event(store, key(KeyCode::Char('/')));
        for c in term.chars() {
            view.handle_event(store, key(KeyCode::Char(c)));
        }
        view.handle_event(store, key(KeyCode::Enter));
    }

    fn loaded_store(json: &str) -> Store {
        let (mut store, _reqs, _) = detached();
        store.enter(&Route::Dashboard, None);
        store.event(StoreEvent::Loaded {
            epoch: store.epoch(),
            result: Ok(PageData::Colleges(serde_json::from_str(json).unwrap())),
        });
        store
    }

    #[test]
    fn search_narrows_and_misses() {
        let mut store = loaded_store(r#"[{"_id":"c1","name":"Tech U","location":"Metropolis"}]"#);
        let mut view = CollegeList::default();

        search(&mut view, &mut store, "metro");
        assert_eq!(view.listing(&store), Some(Listing::Rows(vec![0])));

        let mut view = CollegeList::default();
        search(&mut view, &mut store, "zzz");
        assert_eq!(view.listing(&store), Some(Listing::NoMatches));
    }

    #[test]
    fn empty_catalog() {
        let mut store = loaded_store("[]");
        let mut view = CollegeList::default();
        search(&mut view, &mut store, "zzz");
        assert_eq!(view.listing(&store), Some(Listing::NothingYet));
    }

    #[test]
    fn empty_states_are_drawn() {
        let mut store = loaded_store("[]");
        let screen = render(&mut CollegeList::default(), &store, 60, 12);
        assert!(screen.contains("No colleges available yet"), "{screen}");

        let mut populated =
            loaded_store(r#"[{"_id":"c1","name":"Tech U","location":"Metropolis"}]"#);
        let mut view = CollegeList::default();
        search(&mut view, &mut populated, "zzz");
        let screen = render(&mut view, &populated, 60, 12);
        assert!(screen.contains("No colleges found matching your search"), "{screen}");
        assert!(!screen.contains("Tech U"));

        // a search term doesn't change the message for an empty catalog
        let mut view = CollegeList::default();
        search(&mut view, &mut store, "zzz");
        let screen = render(&mut view, &store, 60, 12);
        assert!(screen.contains("No colleges available yet"));
    }

    #[test]
    fn enter_opens_the_selected_college() {
        let mut store = loaded_store(
            r#"[{"_id":"c1","name":"Tech U","location":"Metropolis"},
                {"_id":"c2","name":"Arts College","location":"Gotham"}]"#,
        );
        let mut view = CollegeList::default();
        search(&mut view, &mut store, "goth");

        match view.handle_event(&mut store, key(KeyCode::Enter)) {
            Action::Navigate(r) => assert_eq!(r, Route::Courses("c2".into())),
            a => panic!("unexpected action {:?}", a),
        }
    }

    #[test]
    fn filtering_never_fetches() {
        let (mut store, reqs, _) = detached();
        store.enter(&Route::Dashboard, None);
        let _ = reqs.try_recv();
        store.event(StoreEvent::Loaded {
            epoch: store.epoch(),
            result: Ok(PageData::Colleges(vec![])),
        });

        let mut view = CollegeList::default();
        search(&mut view, &mut store, "anything");
        assert!(reqs.try_recv().is_err());
    }
}
