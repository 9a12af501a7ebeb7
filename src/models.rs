use serde::{Deserialize, Deserializer, Serialize};

/// The backend has drifted across revisions: counts come back as numbers,
/// nulls, or are missing entirely. Every shape here parses all variants we
/// have seen and reads absent data as zero/empty.
fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Envelope used by every list endpoint: `{"items": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Me {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "username")]
    pub name: Option<String>,
    #[serde(default)]
    pub is_editor: bool,
}

impl Me {
    /// `creator` is the canonical editing role; older revisions said
    /// `editor` and some responses only carry the `is_editor` flag.
    pub fn can_edit(&self) -> bool {
        if self.is_editor {
            return true;
        }
        matches!(
            self.role.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("creator") | Some("editor")
        )
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Summary {
    #[serde(default, alias = "total_projects", deserialize_with = "u64_or_zero")]
    pub projects: u64,
    #[serde(default, alias = "total_links", deserialize_with = "u64_or_zero")]
    pub links: u64,
    #[serde(default, alias = "total_clicks", deserialize_with = "u64_or_zero")]
    pub clicks: u64,
}

/// Aggregate over all click events, served by the stats endpoint the
/// dashboard KPIs read (`/api/project-stats/`).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TeamStats {
    #[serde(default, alias = "clicks", deserialize_with = "u64_or_zero")]
    pub total_clicks: u64,
    #[serde(default, alias = "uniques", deserialize_with = "u64_or_zero")]
    pub unique_users: u64,
}

/// One leaderboard row: a member with link/click totals in scope (global or
/// per project).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LeaderRow {
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub links: u64,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub clicks: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectBrief {
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MemberRow {
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_editor: bool,
    #[serde(default, alias = "activeIn", deserialize_with = "u64_or_zero")]
    pub active_projects: u64,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub links: u64,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub clicks: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Per-member click stats. `total_clicks` falls back to the plain `clicks`
/// field some revisions return instead.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MemberStats {
    #[serde(default, alias = "uniques", deserialize_with = "u64_or_zero")]
    pub unique_users: u64,
    #[serde(default, alias = "clicks", deserialize_with = "u64_or_zero")]
    pub total_clicks: u64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LinkRow {
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub clicks: u64,
    #[serde(default)]
    pub target_url: String,
}

/// Response of the create endpoints: `{"id": ..}`; members/create also says
/// whether the row already existed.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Created {
    #[serde(default, deserialize_with = "u64_or_zero")]
    pub id: u64,
    #[serde(default)]
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectRequest<'a> {
    pub name: &'a str,
    pub date_from: Option<&'a str>,
    pub date_to: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CreateMemberRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateLinkRequest<'a> {
    pub owner_id: u64,
    pub name: &'a str,
    pub target_url: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AddMemberRequest {
    pub member_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_row_tolerates_null_counts() {
        let row: LeaderRow =
            serde_json::from_str(r#"{"id":7,"name":"ana","links":2,"clicks":null}"#).unwrap();
        assert_eq!(row.clicks, 0);
        assert_eq!(row.links, 2);
    }

    #[test]
    fn member_stats_accepts_field_variants() {
        let a: MemberStats =
            serde_json::from_str(r#"{"unique_users":4,"total_clicks":9}"#).unwrap();
        assert_eq!((a.unique_users, a.total_clicks), (4, 9));

        let b: MemberStats = serde_json::from_str(r#"{"uniques":4,"clicks":9}"#).unwrap();
        assert_eq!((b.unique_users, b.total_clicks), (4, 9));

        let c: MemberStats = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!((c.unique_users, c.total_clicks), (0, 0));
    }

    #[test]
    fn item_list_defaults_to_empty() {
        let list: ItemList<LeaderRow> = serde_json::from_str(r#"{}"#).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn summary_accepts_stats_style_names() {
        let summary: Summary =
            serde_json::from_str(r#"{"total_projects":1,"total_links":2,"total_clicks":3}"#)
                .unwrap();
        assert_eq!(summary.projects, 1);
        assert_eq!(summary.links, 2);
        assert_eq!(summary.clicks, 3);
    }

    #[test]
    fn me_role_variants() {
        let creator: Me = serde_json::from_str(r#"{"role":"creator"}"#).unwrap();
        assert!(creator.can_edit());
        let editor: Me = serde_json::from_str(r#"{"role":"Editor"}"#).unwrap();
        assert!(editor.can_edit());
        let flag: Me = serde_json::from_str(r#"{"is_editor":true}"#).unwrap();
        assert!(flag.can_edit());
        let anon: Me = serde_json::from_str(r#"{"role":null}"#).unwrap();
        assert!(!anon.can_edit());
        let viewer: Me = serde_json::from_str(r#"{"role":"viewer"}"#).unwrap();
        assert!(!viewer.can_edit());
    }
}
