use serde::{Deserialize, Serialize};

use crate::{reference::Reference, search::Searchable, Client, Result};

/// A course belonging to one college
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "collegeId")]
    pub college: Option<Reference>,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub department: Option<String>,
    pub duration: Option<String>,
}

impl Course {
    /// Name of the owning college, if the backend expanded it.
    pub fn college_name(&self) -> Option<&str> {
        self.college.as_ref().and_then(Reference::name)
    }
}

/// The fields sent to create a course
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewCourse {
    #[serde(rename = "collegeId")]
    pub college_id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl Searchable for Course {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.code.as_str()];
        fields.extend(self.department.as_deref());
        fields
    }
}

impl Client {
    pub fn courses(&self) -> Result<Vec<Course>> {
        self.get("courses")
    }

    pub fn courses_for_college(&self, college_id: &str) -> Result<Vec<Course>> {
        self.fetch(
            self.request(reqwest::Method::GET, "courses")
                .query(&[("collegeId", college_id)]),
        )
    }

    pub fn course(&self, id: &str) -> Result<Course> {
        self.get(&format!("courses/{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::Summary;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_expanded_college() {
        let c: Course = serde_json::from_str(
            r#"{"_id":"k1","collegeId":{"_id":"c1","name":"Tech U","location":"Metropolis"},
                "name":"Data Structures","code":"CS201","description":"Trees","duration":"1 semester"}"#,
        )
        .unwrap();
        assert_eq!(
            c.college,
            Some(Reference::Expanded(Summary {
                id: "c1".into(),
                name: Some("Tech U".into())
            }))
        );
        assert_eq!(c.college_name(), Some("Tech U"));
        assert_eq!(c.department, None);
    }

    #[test]
    fn bare_or_missing_college_has_no_name() {
        let bare: Course =
            serde_json::from_str(r#"{"_id":"k1","collegeId":"c1","name":"X","code":"X1"}"#)
                .unwrap();
        let missing: Course =
            serde_json::from_str(r#"{"_id":"k2","collegeId":null,"name":"Y","code":"Y1"}"#)
                .unwrap();
        assert_eq!(bare.college.as_ref().map(Reference::id), Some("c1"));
        assert_eq!(bare.college_name(), None);
        assert_eq!(missing.college_name(), None);
    }

    #[test]
    fn college_listing_filter_is_a_query_param() {
        let client = Client::new("http://localhost:5000/api");
        let req = client
            .request(reqwest::Method::GET, "courses")
            .query(&[("collegeId", "c 1")])
            .build()
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "http://localhost:5000/api/courses?collegeId=c+1"
        );
    }

    #[test]
    fn new_course_uses_backend_field_names() {
        let c = NewCourse {
            college_id: "c1".into(),
            name: "Data Structures".into(),
            code: "CS201".into(),
            description: "Trees".into(),
            department: Some("Computer Science".into()),
            duration: None,
        };
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            serde_json::json!({
                "collegeId": "c1",
                "name": "Data Structures",
                "code": "CS201",
                "description": "Trees",
                "department": "Computer Science",
            })
        );
    }
}
