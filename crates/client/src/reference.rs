use serde::Deserialize;

/// A reference to another entity.
/// Listing endpoints expand these to (part of) the entity, but other endpoints only send the id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Expanded(Summary),
    Id(String),
}

/// The part of an expanded reference we care about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Summary {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: Option<String>,
}

impl Reference {
    pub fn id(&self) -> &str {
        match self {
            Reference::Expanded(s) => &s.id,
            Reference::Id(id) => id,
        }
    }

    /// The referenced entity's name, only known if the backend expanded it
    pub fn name(&self) -> Option<&str> {
        match self {
            Reference::Expanded(s) => s.name.as_deref(),
            Reference::Id(_) => None,
        }
    }
}
