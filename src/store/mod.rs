// src/store/mod.rs — Campaign history (SQLite)

pub mod schema;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// A generated campaign as recorded in history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    /// What produced it: "copy" or "script".
    pub kind: String,
    pub title: String,
    /// The brief as JSON, so each kind keeps its own shape.
    pub brief: String,
    pub content: String,
    /// Final quality score, when the refinement loop ran.
    pub score: Option<u8>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(kind: &str, title: &str, brief: String, content: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            title: title.to_string(),
            brief,
            content,
            score: None,
            author: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_score(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }
}

/// Low-level SQLite operations for campaign history.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open the store at `path`, running migrations. Returns None when the
    /// database can't be opened; history is best-effort and generation must
    /// keep working without it.
    pub fn open(path: &std::path::Path) -> Option<Store> {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match Connection::open(path) {
            Ok(conn) => {
                if let Err(e) = schema::run_migrations(&conn) {
                    tracing::warn!("Database migration failed: {}. History disabled.", e);
                    return None;
                }
                Some(Store::new(conn))
            }
            Err(e) => {
                tracing::warn!("Could not open database: {}. History disabled.", e);
                None
            }
        }
    }

    pub fn insert_campaign(&self, campaign: &Campaign) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO campaigns (id, kind, title, brief, content, score, author, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                campaign.id,
                campaign.kind,
                campaign.title,
                campaign.brief,
                campaign.content,
                campaign.score,
                campaign.author,
                campaign.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// List campaigns newest first, optionally filtered by kind.
    pub fn list_campaigns(&self, kind: Option<&str>, limit: usize) -> anyhow::Result<Vec<Campaign>> {
        let limit = limit as i64;
        let mut campaigns = Vec::new();

        match kind {
            Some(k) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, kind, title, brief, content, score, author, created_at
                     FROM campaigns WHERE kind = ?1 ORDER BY created_at DESC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![k, limit], row_to_campaign)?;
                for row in rows {
                    campaigns.push(row?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, kind, title, brief, content, score, author, created_at
                     FROM campaigns ORDER BY created_at DESC LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], row_to_campaign)?;
                for row in rows {
                    campaigns.push(row?);
                }
            }
        }

        Ok(campaigns)
    }

    /// Fetch one campaign by id, or by unambiguous id prefix.
    pub fn get_campaign(&self, id: &str) -> anyhow::Result<Option<Campaign>> {
        let exact = self
            .conn
            .query_row(
                "SELECT id, kind, title, brief, content, score, author, created_at
                 FROM campaigns WHERE id = ?1",
                params![id],
                row_to_campaign,
            )
            .optional()?;

        if exact.is_some() {
            return Ok(exact);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, kind, title, brief, content, score, author, created_at
             FROM campaigns WHERE id LIKE ?1 || '%' LIMIT 2",
        )?;
        let mut matches: Vec<Campaign> = stmt
            .query_map(params![id], row_to_campaign)?
            .collect::<Result<_, _>>()?;

        // An ambiguous prefix matches nothing
        if matches.len() == 1 {
            Ok(Some(matches.remove(0)))
        } else {
            Ok(None)
        }
    }

    pub fn delete_campaign(&self, id: &str) -> anyhow::Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM campaigns WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn count_campaigns(&self) -> anyhow::Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM campaigns", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_campaign(row: &rusqlite::Row<'_>) -> rusqlite::Result<Campaign> {
    let created_at: String = row.get(7)?;
    Ok(Campaign {
        id: row.get(0)?,
        kind: row.get(1)?,
        title: row.get(2)?,
        brief: row.get(3)?,
        content: row.get(4)?,
        score: row.get::<_, Option<i64>>(5)?.map(|s| s as u8),
        author: row.get(6)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> Store {
        let conn = Connection::open_in_memory().unwrap();
        schema::run_migrations(&conn).unwrap();
        Store::new(conn)
    }

    #[test]
    fn test_insert_and_get() {
        let store = memory_store();
        let campaign = Campaign::new("copy", "Spring sale", "{}".into(), "Buy now!".into())
            .with_score(9)
            .with_author(Some("Ada".into()));
        store.insert_campaign(&campaign).unwrap();

        let fetched = store.get_campaign(&campaign.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Spring sale");
        assert_eq!(fetched.score, Some(9));
        assert_eq!(fetched.author.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_get_by_prefix() {
        let store = memory_store();
        let campaign = Campaign::new("copy", "t", "{}".into(), "c".into());
        store.insert_campaign(&campaign).unwrap();

        let prefix = &campaign.id[..8];
        let fetched = store.get_campaign(prefix).unwrap();
        assert!(fetched.is_some());
    }

    #[test]
    fn test_get_missing() {
        let store = memory_store();
        assert!(store.get_campaign("nope").unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first_and_kind_filter() {
        let store = memory_store();
        let mut first = Campaign::new("copy", "older", "{}".into(), "a".into());
        first.created_at = Utc::now() - chrono::Duration::minutes(5);
        let second = Campaign::new("script", "newer", "{}".into(), "b".into());
        store.insert_campaign(&first).unwrap();
        store.insert_campaign(&second).unwrap();

        let all = store.list_campaigns(None, 10).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "newer");

        let scripts = store.list_campaigns(Some("script"), 10).unwrap();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].kind, "script");
    }

    #[test]
    fn test_delete() {
        let store = memory_store();
        let campaign = Campaign::new("copy", "t", "{}".into(), "c".into());
        store.insert_campaign(&campaign).unwrap();

        assert!(store.delete_campaign(&campaign.id).unwrap());
        assert!(!store.delete_campaign(&campaign.id).unwrap());
        assert_eq!(store.count_campaigns().unwrap(), 0);
    }
}
