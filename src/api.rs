use crate::models::{
    AddMemberRequest, Created, CreateLinkRequest, CreateMemberRequest, CreateProjectRequest,
    ItemList, LeaderRow, LinkRow, LoginRequest, Me, MemberRow, MemberStats, ProjectBrief, Summary,
    TeamStats,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Endpoint shapes tried, in order, for per-member stats. The backend has
/// served this resource under several paths over time; the first 2xx with a
/// parseable body wins.
const MEMBER_STATS_PATHS: [&str; 5] = [
    "/api/member-stats/{id}/",
    "/api/member-stats/{id}",
    "/api/members/{id}/stats",
    "/api/stats/member/{id}",
    "/api/member/{id}/stats",
];

/// Single entry point for requests to the backend. One method per endpoint,
/// mirroring the REST surface under `/api/...`.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Backend-side counting redirect for a short link.
    pub fn go_url(&self, link_id: u64) -> String {
        format!("{}/go/{}", self.base, link_id)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, reqwest::Error> {
        self.http
            .get(format!("{}{}", self.base, path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, reqwest::Error> {
        self.http
            .post(format!("{}{}", self.base, path))
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    // --- auth ---

    pub async fn login(&self, username: &str) -> Result<Me, reqwest::Error> {
        self.post_json("/api/login", &LoginRequest { username }).await
    }

    pub async fn logout(&self) -> Result<(), reqwest::Error> {
        self.http
            .post(format!("{}/api/logout", self.base))
            .json(&serde_json::json!({}))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn me(&self) -> Result<Me, reqwest::Error> {
        self.get_json("/api/me").await
    }

    // --- dashboard ---

    pub async fn summary(&self) -> Result<Summary, reqwest::Error> {
        self.get_json("/api/summary").await
    }

    pub async fn global_leaderboard(&self) -> Result<ItemList<LeaderRow>, reqwest::Error> {
        self.get_json("/api/leaderboard/global").await
    }

    /// Click-event aggregate across all projects (unique users KPI).
    pub async fn team_stats(&self) -> Result<TeamStats, reqwest::Error> {
        self.get_json("/api/project-stats/").await
    }

    // --- projects ---

    pub async fn list_projects(&self) -> Result<ItemList<ProjectBrief>, reqwest::Error> {
        self.get_json("/api/projects").await
    }

    pub async fn create_project(
        &self,
        name: &str,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Result<Created, reqwest::Error> {
        self.post_json(
            "/api/projects/create",
            &CreateProjectRequest {
                name,
                date_from,
                date_to,
            },
        )
        .await
    }

    pub async fn project_detail(&self, id: u64) -> Result<ProjectBrief, reqwest::Error> {
        self.get_json(&format!("/api/projects/{id}")).await
    }

    pub async fn project_leaderboard(&self, id: u64) -> Result<ItemList<LeaderRow>, reqwest::Error> {
        self.get_json(&format!("/api/projects/{id}/leaderboard")).await
    }

    pub async fn project_members(&self, id: u64) -> Result<ItemList<LeaderRow>, reqwest::Error> {
        self.get_json(&format!("/api/projects/{id}/members")).await
    }

    pub async fn project_add_member(
        &self,
        id: u64,
        member_id: u64,
    ) -> Result<(), reqwest::Error> {
        self.http
            .post(format!("{}/api/projects/{id}/members/add", self.base))
            .json(&AddMemberRequest { member_id })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    // --- members ---

    pub async fn members_all(&self) -> Result<ItemList<MemberRow>, reqwest::Error> {
        self.get_json("/api/members").await
    }

    pub async fn member_create(&self, name: &str) -> Result<Created, reqwest::Error> {
        self.post_json("/api/members/create", &CreateMemberRequest { name })
            .await
    }

    /// Per-member click stats with multi-tier endpoint fallback. Returns
    /// `None` when every shape fails; the caller degrades to the counts it
    /// already has.
    pub async fn member_stats(&self, id: u64) -> Option<MemberStats> {
        for template in MEMBER_STATS_PATHS {
            let path = template.replace("{id}", &id.to_string());
            match self.get_json::<MemberStats>(&path).await {
                Ok(stats) => return Some(stats),
                Err(err) => debug!("member stats via {path} failed: {err}"),
            }
        }
        None
    }

    // --- links ---

    pub async fn link_create(
        &self,
        project_id: u64,
        owner_id: u64,
        name: &str,
        target_url: &str,
    ) -> Result<Created, reqwest::Error> {
        self.post_json(
            &format!("/api/projects/{project_id}/links/create"),
            &CreateLinkRequest {
                owner_id,
                name,
                target_url,
            },
        )
        .await
    }

    pub async fn links_by_owner(
        &self,
        project_id: u64,
        owner_id: u64,
    ) -> Result<ItemList<LinkRow>, reqwest::Error> {
        self.get_json(&format!(
            "/api/projects/{project_id}/links/by-owner/{owner_id}"
        ))
        .await
    }

    /// Reports a click event with the local device key. Best effort: the
    /// short-link redirect goes through whether or not this lands.
    pub async fn track_click(&self, link_id: u64, device_key: &str) -> Result<(), reqwest::Error> {
        self.http
            .get(format!("{}/api/track-click/", self.base))
            .query(&[("link", link_id.to_string()), ("user", device_key.to_string())])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
