use serde::{Deserialize, Deserializer, Serialize};

use crate::{search::Searchable, Client, Result};

/// A college, the top level of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct College {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    /// Year the college was established
    #[serde(default, deserialize_with = "year")]
    pub established: Option<i32>,
}

/// The fields sent to create a college
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewCollege {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub established: Option<i32>,
}

impl Searchable for College {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.location.as_deref());
        fields
    }
}

impl Client {
    pub fn colleges(&self) -> Result<Vec<College>> {
        self.get("colleges")
    }

    pub fn college(&self, id: &str) -> Result<College> {
        self.get(&format!("colleges/{}", id))
    }
}

/// The backend stores whatever the form sent, so years turn up as numbers or strings.
fn year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Num(i32),
        Str(String),
    }

    Ok(match Option::<Year>::deserialize(d)? {
        Some(Year::Num(n)) => Some(n),
        Some(Year::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}
