use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

pub const TICKET_STATUSES: [&str; 3] = ["open", "in-progress", "closed"];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub tenant_id: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SupportTicket {
    pub fn new(tenant_id: String, subject: String, message: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id,
            subject,
            message,
            status: "open".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SenderKind {
    User,
    Admin,
}

impl SenderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderKind::User => "user",
            SenderKind::Admin => "admin",
        }
    }
}

impl fmt::Display for SenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SenderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(SenderKind::User),
            "admin" => Ok(SenderKind::Admin),
            other => Err(format!("unknown sender kind '{}'", other)),
        }
    }
}

/// Author of a ticket message, resolved once when the message is written.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Sender {
    pub kind: SenderKind,
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub ticket_id: String,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl SupportMessage {
    pub fn new(ticket_id: String, sender: Sender, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            ticket_id,
            sender,
            content,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SupportMessageRow {
    pub id: String,
    pub ticket_id: String,
    pub sender_kind: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SupportMessageRow> for SupportMessage {
    type Error = String;

    fn try_from(row: SupportMessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            ticket_id: row.ticket_id,
            sender: Sender {
                kind: row.sender_kind.parse()?,
                id: row.sender_id,
                name: row.sender_name,
                email: row.sender_email,
            },
            content: row.content,
            created_at: row.created_at,
        })
    }
}
