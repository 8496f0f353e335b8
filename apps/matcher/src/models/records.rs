use serde::{Deserialize, Serialize};

/// A stored job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub job_type: String,
    pub description: String,
    pub location: String,
}

/// A stored job seeker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub name: String,
    pub age: u32,
    pub resume: String,
    pub location: String,
}

/// Raw company input as collected by a front end, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

/// Raw worker input. `age` stays textual until validation so that both the
/// prompt loop and JSON clients (number or string) go through one check.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerForm {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "age_as_text")]
    pub age: String,
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub location: String,
}

fn age_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AgeInput {
        Number(i64),
        Text(String),
    }

    Ok(match AgeInput::deserialize(deserializer)? {
        AgeInput::Number(n) => n.to_string(),
        AgeInput::Text(s) => s,
    })
}
