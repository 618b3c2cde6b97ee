use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Message,
    Call,
}

impl ContactKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ContactKind::Message => "Message",
            ContactKind::Call => "Call",
        }
    }
}

impl FromStr for ContactKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "message" | "msg" => Ok(ContactKind::Message),
            "call" => Ok(ContactKind::Call),
            _ => Err(anyhow!("Unknown contact kind: {} (use message or call)", s)),
        }
    }
}

/// People to reach out to, split by how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contacts {
    pub message: Vec<Contact>,
    pub call: Vec<Contact>,
}

impl Contacts {
    pub fn list(&self, kind: ContactKind) -> &Vec<Contact> {
        match kind {
            ContactKind::Message => &self.message,
            ContactKind::Call => &self.call,
        }
    }

    pub fn list_mut(&mut self, kind: ContactKind) -> &mut Vec<Contact> {
        match kind {
            ContactKind::Message => &mut self.message,
            ContactKind::Call => &mut self.call,
        }
    }

    pub fn len(&self) -> usize {
        self.message.len() + self.call.len()
    }
}
