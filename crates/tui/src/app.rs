use catalog_client::Session;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error, info};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::Paragraph,
    Frame,
};

use crate::{
    event::Event,
    route::Route,
    session_cache::SessionCache,
    store::{Mutation, MutationKind, Store},
    styles::error_text,
    views::{
        Action, AdminPanel, CollegeList, CourseList, HomeView, LoginView, MaterialList, View,
    },
    widgets::render_popup,
};

/// Something the user has to deal with before doing anything else
#[derive(Debug)]
enum Popup {
    Notice(String),
    Confirm { prompt: String, mutation: Mutation },
}

/// Holds application-related state
pub struct App {
    pub running: bool,
    store: Store,
    session: Option<Session>,
    route: Route,
    history: Vec<Route>,
    view: Box<dyn View>,
    popup: Option<Popup>,
    flash: Option<Text<'static>>,
}

impl App {
    /// Create the app, starting on the given route
    pub fn new(store: Store, session: Option<Session>, start: Route) -> Self {
        let mut app = Self {
            running: true,
            store,
            session,
            route: Route::Home,
            history: vec![],
            view: Box::<HomeView>::default(),
            popup: None,
            flash: None,
        };
        app.show(start);

        app
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Switch to the given route, without touching history
    fn show(&mut self, route: Route) {
        let route = route.guard(self.session.as_ref());
        info!("showing {}", route);

        self.view = match (&route, &self.session) {
            (Route::Home, _) => Box::<HomeView>::default(),
            (Route::Dashboard, _) => Box::<CollegeList>::default(),
            (Route::Courses(_), _) => Box::<CourseList>::default(),
            (Route::Materials(_), _) => Box::<MaterialList>::default(),
            (Route::Admin, Some(s)) => Box::new(AdminPanel::new(s.clone())),
            (Route::Admin | Route::AdminLogin, _) => Box::<LoginView>::default(),
        };
        self.store.enter(&route, self.session.as_ref());
        self.route = route;
    }

    fn navigate(&mut self, route: Route) {
        if route == Route::Home {
            self.history.clear();
        } else if let Some(i) = self.history.iter().position(|r| *r == route) {
            // going somewhere we've already been is going back to it
            self.history.truncate(i);
        } else {
            self.history.push(self.route.clone());
        }
        self.show(route);
    }

    fn back(&mut self) {
        let route = self.history.pop().unwrap_or_default();
        self.show(route);
    }

    /// Draw to the given frame
    pub fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Min(0), Constraint::Length(1)],
        )
        .split(size);

        // margin for breathing room
        let content = Rect {
            x: layout[0].x + 1,
            y: layout[0].y + 1,
            width: layout[0].width.saturating_sub(2),
            height: layout[0].height.saturating_sub(1),
        };
        self.view.draw(&self.store, frame, content);

        let status = match &self.flash {
            Some(t) => Paragraph::new(t.clone()),
            None => Paragraph::new(Line::styled(
                format!("{}   Ctrl-C to quit", self.route),
                Style::new().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(status, layout[1]);

        match &self.popup {
            Some(Popup::Notice(msg)) => render_popup(
                frame,
                "Notice",
                Text::raw(msg.clone()),
                "Enter to dismiss",
            ),
            Some(Popup::Confirm { prompt, .. }) => render_popup(
                frame,
                "Confirm",
                Text::raw(prompt.clone()),
                "y to confirm, n to cancel",
            ),
            None => (),
        }
    }

    /// Handle the given event
    pub fn handle_event(&mut self, event: Event) {
        // C-C always exits
        if matches!(
            event,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c') | KeyCode::Char('C'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        ) {
            return self.quit();
        }

        let action = match event {
            Event::Store(e) => self.store.event(e),
            Event::Resize(..) => Action::None,
            Event::Key(key) if self.popup.is_some() => {
                self.popup_key(key);
                Action::None
            }
            event => {
                self.flash = None;
                self.view.handle_event(&mut self.store, event)
            }
        };

        self.perform(action);
    }

    /// Handle a key while a popup is shown. Anything it doesn't use is swallowed.
    fn popup_key(&mut self, key: KeyEvent) {
        let Some(popup) = self.popup.take() else {
            return;
        };

        self.popup = match (popup, key.code) {
            (Popup::Notice(_), KeyCode::Enter | KeyCode::Esc) => None,
            (Popup::Confirm { mutation, .. }, KeyCode::Char('y') | KeyCode::Char('Y')) => {
                match &self.session {
                    Some(s) => {
                        if !self.store.submit(s, mutation) {
                            self.flash = Some(error_text(
                                "Another change is still saving, try again once it's done",
                            ));
                        }
                    }
                    None => error!("confirmed {:?} without a session", mutation.kind()),
                };
                None
            }
            (Popup::Confirm { .. }, KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc) => {
                None
            }
            (popup, _) => Some(popup),
        };
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::None => (),
            Action::Exit => self.quit(),
            Action::Navigate(route) => self.navigate(route),
            Action::Back => self.back(),
            Action::Notify(msg) => self.popup = Some(Popup::Notice(msg)),
            Action::Flash(text) => self.flash = Some(text),
            Action::Confirm { prompt, mutation } => {
                self.popup = Some(Popup::Confirm { prompt, mutation })
            }
            Action::LoggedIn(session) => {
                if let Err(e) = SessionCache::new(session.clone()).save() {
                    error!("error saving session: {:#}", e);
                }
                self.session = Some(session);
                // replaces the login page, rather than going back to it
                self.show(Route::Admin);
            }
            Action::Logout => {
                if let Err(e) = SessionCache::clear() {
                    error!("error clearing session: {:#}", e);
                }
                self.session = None;
                self.navigate(Route::Home);
            }
            Action::MutationFinished(kind, result) => self.mutation_finished(kind, result),
        }
    }

    fn mutation_finished(&mut self, kind: MutationKind, result: Result<(), String>) {
        self.view.mutation_finished(kind, result.is_ok());
        match result {
            Ok(()) => {
                debug!("{:?} succeeded", kind);
                if let Some(msg) = kind.success_message() {
                    self.popup = Some(Popup::Notice(msg.to_string()));
                }
                if kind.changes_listing() {
                    self.store.refresh();
                }
            }
            Err(e) => {
                error!("{:?} failed: {}", kind, e);
                self.popup = Some(Popup::Notice(format!("{}: {}", kind.failure_prefix(), e)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{testing::detached, Event as StoreEvent, PageReq, Request};
    use std::sync::mpsc::Receiver;

    fn key(c: KeyCode) -> Event {
        Event::Key(KeyEvent::from(c))
    }

    fn app(session: Option<Session>, start: Route) -> (App, Receiver<Request>) {
        let (store, reqs, _) = detached();
        (App::new(store, session, start), reqs)
    }

    #[test]
    fn admin_without_session_goes_to_login() {
        let (app, reqs) = app(None, Route::Admin);
        assert_eq!(app.route, Route::AdminLogin);
        assert!(reqs.try_recv().is_err());
    }

    #[test]
    fn admin_with_session_loads() {
        let (app, reqs) = app(Some(Session::new("tok")), Route::Admin);
        assert_eq!(app.route, Route::Admin);
        assert!(matches!(
            reqs.try_recv(),
            Ok(Request::Load {
                page: PageReq::Admin(_),
                ..
            })
        ));
    }

    #[test]
    fn declined_confirmation_sends_nothing() {
        let (mut app, reqs) = app(Some(Session::new("tok")), Route::Home);
        app.perform(Action::Confirm {
            prompt: "Delete?".into(),
            mutation: Mutation::DeleteCollege("c1".into()),
        });

        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.popup.is_some());
        assert!(app.running);

        app.handle_event(key(KeyCode::Char('n')));
        assert!(app.popup.is_none());
        assert!(reqs.try_recv().is_err());
    }

    #[test]
    fn accepted_confirmation_deletes() {
        let (mut app, reqs) = app(Some(Session::new("tok")), Route::Home);
        app.perform(Action::Confirm {
            prompt: "Delete?".into(),
            mutation: Mutation::DeleteCollege("c1".into()),
        });
        app.handle_event(key(KeyCode::Char('y')));

        assert!(matches!(
            reqs.try_recv(),
            Ok(Request::Mutate {
                mutation: Mutation::DeleteCollege(_),
                ..
            })
        ));
    }

    #[test]
    fn failed_mutation_is_reported() {
        let (mut app, _reqs) = app(Some(Session::new("tok")), Route::Home);
        app.handle_event(Event::Store(StoreEvent::Mutated {
            kind: MutationKind::CreateCollege,
            result: Err(catalog_client::Error::Status {
                status: catalog_client::StatusCode::BAD_REQUEST,
                message: "name taken".into(),
            }),
        }));

        match &app.popup {
            Some(Popup::Notice(msg)) => assert!(msg.starts_with("Error adding college: ")),
            p => panic!("unexpected popup {:?}", p),
        }
    }

    #[test]
    fn successful_create_refetches() {
        let (mut app, reqs) = app(Some(Session::new("tok")), Route::Admin);
        let _ = reqs.try_recv();
        app.handle_event(Event::Store(StoreEvent::Mutated {
            kind: MutationKind::CreateCourse,
            result: Ok(()),
        }));

        match &app.popup {
            Some(Popup::Notice(msg)) => assert_eq!(msg, "Course added successfully!"),
            p => panic!("unexpected popup {:?}", p),
        }
        assert!(matches!(
            reqs.try_recv(),
            Ok(Request::Load {
                page: PageReq::Admin(_),
                ..
            })
        ));

        // and the notice has to be dismissed
        app.handle_event(key(KeyCode::Esc));
        assert!(app.popup.is_none());
    }

    #[test]
    fn confirming_while_busy_says_so() {
        let session = Session::new("tok");
        let (mut app, reqs) = app(Some(session.clone()), Route::Home);
        assert!(app.store.submit(&session, Mutation::DeleteCourse("k1".into())));
        let _ = reqs.try_recv();

        app.perform(Action::Confirm {
            prompt: "Delete?".into(),
            mutation: Mutation::DeleteCollege("c1".into()),
        });
        app.handle_event(key(KeyCode::Char('y')));

        assert!(app.popup.is_none());
        assert!(app.flash.is_some());
        assert!(reqs.try_recv().is_err());
    }

    #[test]
    fn revisiting_a_page_doesnt_grow_history() {
        let (mut app, _reqs) = app(None, Route::Dashboard);
        for _ in 0..5 {
            app.perform(Action::Navigate(Route::Courses("c1".into())));
            app.perform(Action::Navigate(Route::Dashboard));
        }
        assert!(app.history.is_empty());

        app.perform(Action::Navigate(Route::Courses("c1".into())));
        app.perform(Action::Navigate(Route::Materials("k1".into())));
        assert_eq!(
            app.history,
            vec![Route::Dashboard, Route::Courses("c1".into())]
        );
    }

    #[test]
    fn back_returns_to_previous_page() {
        let (mut app, _reqs) = app(None, Route::Dashboard);
        app.perform(Action::Navigate(Route::Courses("c1".into())));
        app.perform(Action::Navigate(Route::Materials("k1".into())));
        app.perform(Action::Back);
        assert_eq!(app.route, Route::Courses("c1".into()));
    }
}
