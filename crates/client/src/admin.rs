use std::path::Path;

use log::debug;
use reqwest::{
    blocking::{multipart::Form, RequestBuilder},
    header::AUTHORIZATION,
    Method,
};

use crate::{
    college::{College, NewCollege},
    course::{Course, NewCourse},
    material::{Material, NewMaterial},
    Client, Result, Session,
};

/// A [`Client`] acting for a logged in admin.
/// Every request made through this carries the session token as the raw `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AdminClient<'a> {
    client: &'a Client,
    session: &'a Session,
}

impl<'a> AdminClient<'a> {
    pub(crate) fn new(client: &'a Client, session: &'a Session) -> Self {
        Self { client, session }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, path)
            .header(AUTHORIZATION, self.session.token())
    }

    pub fn colleges(&self) -> Result<Vec<College>> {
        self.client.fetch(self.request(Method::GET, "colleges"))
    }

    pub fn courses(&self) -> Result<Vec<Course>> {
        self.client.fetch(self.request(Method::GET, "courses"))
    }

    pub fn create_college(&self, college: &NewCollege) -> Result<College> {
        debug!("creating college {:?}", college.name);
        self.client
            .fetch(self.request(Method::POST, "colleges").json(college))
    }

    pub fn delete_college(&self, id: &str) -> Result<()> {
        debug!("deleting college {}", id);
        self.client
            .execute(self.request(Method::DELETE, &format!("colleges/{}", id)))
    }

    pub fn create_course(&self, course: &NewCourse) -> Result<Course> {
        debug!("creating course {:?}", course.code);
        self.client
            .fetch(self.request(Method::POST, "courses").json(course))
    }

    pub fn delete_course(&self, id: &str) -> Result<()> {
        debug!("deleting course {}", id);
        self.client
            .execute(self.request(Method::DELETE, &format!("courses/{}", id)))
    }

    /// Upload a new material as a multipart form, reading the file from disk.
    pub fn upload_material(&self, material: &NewMaterial) -> Result<Material> {
        debug!("uploading {:?} for course {}", material.file, material.course_id);
        let form = upload_form(material, &material.file)?;
        self.client
            .fetch(self.request(Method::POST, "materials").multipart(form))
    }
}

fn upload_form(material: &NewMaterial, file: &Path) -> Result<Form> {
    Ok(Form::new()
        .text("courseId", material.course_id.clone())
        .text("title", material.title.clone())
        .text("description", material.description.clone())
        .file("file", file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(req: RequestBuilder) -> reqwest::blocking::Request {
        req.build().unwrap()
    }

    #[test]
    fn every_admin_request_carries_the_raw_token() {
        let client = Client::new("http://localhost:5000/api");
        let session = Session::new("abc123");
        let admin = client.admin(&session);

        for req in [
            admin.request(Method::GET, "colleges"),
            admin.request(Method::POST, "courses"),
            admin.request(Method::DELETE, "colleges/c1"),
            admin.request(Method::POST, "materials"),
        ] {
            let req = built(req);
            assert_eq!(req.headers()[AUTHORIZATION], "abc123");
        }
    }

    #[test]
    fn public_requests_are_anonymous() {
        let client = Client::new("http://localhost:5000/api");
        let req = built(client.request(Method::GET, "colleges"));
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn delete_targets_the_entity() {
        let client = Client::new("http://localhost:5000/api");
        let session = Session::new("abc123");
        let req = built(client.admin(&session).request(Method::DELETE, "courses/k9"));
        assert_eq!(req.method(), Method::DELETE);
        assert_eq!(req.url().as_str(), "http://localhost:5000/api/courses/k9");
    }

    #[test]
    fn upload_of_missing_file_fails_before_sending() {
        let material = NewMaterial {
            course_id: "k1".into(),
            title: "Notes".into(),
            description: "Week 1".into(),
            file: "/definitely/not/here.pdf".into(),
        };
        assert!(matches!(
            upload_form(&material, &material.file),
            Err(crate::Error::IOError(_))
        ));
    }
}
