use std::fmt;

use catalog_client::Session;

/// Every place the user can be, addressed the same way as the web catalog's paths.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    /// All colleges
    Dashboard,
    /// Courses of a college
    Courses(String),
    /// Materials of a course
    Materials(String),
    Admin,
    AdminLogin,
}

impl Route {
    /// Parse a path like `/courses/abc123`. Returns `None` if nothing lives there.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        let mut parts = path.strip_prefix('/').unwrap_or(path).split('/');
        let route = match (parts.next(), parts.next()) {
            (Some(""), None) => Route::Home,
            (Some("dashboard"), None) => Route::Dashboard,
            (Some("courses"), Some(id)) if !id.is_empty() => Route::Courses(id.to_string()),
            (Some("materials"), Some(id)) if !id.is_empty() => Route::Materials(id.to_string()),
            (Some("admin"), None) => Route::Admin,
            (Some("admin-login"), None) => Route::AdminLogin,
            _ => return None,
        };

        match parts.next() {
            None => Some(route),
            Some(_) => None,
        }
    }

    /// Send the user to the login page instead of the admin panel if they have no session.
    /// The session isn't checked with the backend, a bad one only shows up when requests fail.
    pub fn guard(self, session: Option<&Session>) -> Route {
        match (self, session) {
            (Route::Admin, None) => Route::AdminLogin,
            (r, _) => r,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Dashboard => write!(f, "/dashboard"),
            Route::Courses(id) => write!(f, "/courses/{}", id),
            Route::Materials(id) => write!(f, "/materials/{}", id),
            Route::Admin => write!(f, "/admin"),
            Route::AdminLogin => write!(f, "/admin-login"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_path() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("/dashboard"), Some(Route::Dashboard));
        assert_eq!(
            Route::parse("/courses/c1"),
            Some(Route::Courses("c1".into()))
        );
        assert_eq!(
            Route::parse("/materials/k1/"),
            Some(Route::Materials("k1".into()))
        );
        assert_eq!(Route::parse("/admin"), Some(Route::Admin));
        assert_eq!(Route::parse("/admin-login"), Some(Route::AdminLogin));
    }

    #[test]
    fn rejects_unknown_paths() {
        assert_eq!(Route::parse("/courses"), None);
        assert_eq!(Route::parse("/courses/"), None);
        assert_eq!(Route::parse("/courses/c1/extra"), None);
        assert_eq!(Route::parse("/nowhere"), None);
    }

    #[test]
    fn display_matches_parse() {
        for r in [
            Route::Home,
            Route::Dashboard,
            Route::Courses("c1".into()),
            Route::Materials("k1".into()),
            Route::Admin,
            Route::AdminLogin,
        ] {
            assert_eq!(Route::parse(&r.to_string()), Some(r));
        }
    }

    #[test]
    fn admin_needs_a_session() {
        assert_eq!(Route::Admin.guard(None), Route::AdminLogin);
        assert_eq!(
            Route::Admin.guard(Some(&Session::new("anything"))),
            Route::Admin
        );
        assert_eq!(Route::Dashboard.guard(None), Route::Dashboard);
    }
}
