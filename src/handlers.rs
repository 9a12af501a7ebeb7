use crate::errors::AppError;
use crate::leaderboard::{rank_members, RankedMember};
use crate::models::{Me, MemberStats, ProjectBrief};
use crate::profile::persist_profile;
use crate::state::AppState;
use crate::ui;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct FlashParams {
    pub toast: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct MemberForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub owner_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberForm {
    #[serde(default)]
    pub member_id: u64,
}

/// Degrades a failed backend call to the type's default and logs it; pages
/// always render, with placeholders where data is missing.
fn degraded<T: Default>(what: &str, result: Result<T, reqwest::Error>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!("{what} unavailable: {err}");
            T::default()
        }
    }
}

/// Role from the backend, display name from the local profile when the
/// backend does not carry one.
async fn current_me(state: &AppState) -> Me {
    let mut me = degraded("role", state.api.me().await);
    if me.name.is_none() {
        me.name = state.profile.lock().await.display_name.clone();
    }
    me
}

// --- pages ---

pub async fn dashboard(
    State(state): State<AppState>,
    Query(flash): Query<FlashParams>,
) -> Html<String> {
    let (me, summary, team, leaders) = tokio::join!(
        current_me(&state),
        state.api.summary(),
        state.api.team_stats(),
        state.api.global_leaderboard(),
    );
    let summary = degraded("summary", summary);
    let team = degraded("team stats", team);
    let leaders = degraded("global leaderboard", leaders).items;

    Html(ui::render_dashboard(
        &me,
        &summary,
        &team,
        &leaders,
        flash.toast.as_deref(),
    ))
}

pub async fn projects_page(
    State(state): State<AppState>,
    Query(flash): Query<FlashParams>,
) -> Html<String> {
    let (me, projects) = tokio::join!(current_me(&state), state.api.list_projects());
    let projects = degraded("projects", projects).items;

    Html(ui::render_projects(&me, &projects, flash.toast.as_deref()))
}

pub async fn project_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(flash): Query<FlashParams>,
) -> Html<String> {
    let (me, detail, members, leaders) = tokio::join!(
        current_me(&state),
        state.api.project_detail(id),
        state.api.project_members(id),
        state.api.project_leaderboard(id),
    );
    let project = match detail {
        Ok(project) => project,
        Err(err) => {
            warn!("project {id} unavailable: {err}");
            ProjectBrief {
                id,
                ..ProjectBrief::default()
            }
        }
    };
    let members = degraded("project members", members).items;
    let leaders = degraded("project leaderboard", leaders).items;

    // Members already in the project are excluded from the add-member list.
    let addable = if me.can_edit() {
        let catalog = degraded("members catalog", state.api.members_all().await).items;
        catalog
            .into_iter()
            .filter(|m| !members.iter().any(|existing| existing.id == m.id))
            .map(|m| (m.id, m.name))
            .collect()
    } else {
        Vec::new()
    };

    Html(ui::render_project(
        &me,
        &project,
        &members,
        &leaders,
        &addable,
        flash.toast.as_deref(),
    ))
}

pub async fn owner_links_page(
    State(state): State<AppState>,
    Path((id, owner_id)): Path<(u64, u64)>,
) -> Html<String> {
    let (me, detail, members, links) = tokio::join!(
        current_me(&state),
        state.api.project_detail(id),
        state.api.project_members(id),
        state.api.links_by_owner(id, owner_id),
    );
    let project = match detail {
        Ok(project) => project,
        Err(err) => {
            warn!("project {id} unavailable: {err}");
            ProjectBrief {
                id,
                ..ProjectBrief::default()
            }
        }
    };
    let owner_name = degraded("project members", members)
        .items
        .into_iter()
        .find(|m| m.id == owner_id)
        .map(|m| m.name)
        .unwrap_or_else(|| "Member".to_string());
    let links = degraded("links", links).items;

    Html(ui::render_owner_links(&me, &project, &owner_name, &links))
}

pub async fn members_page(
    State(state): State<AppState>,
    Query(flash): Query<FlashParams>,
) -> Html<String> {
    let (me, members, team) = tokio::join!(
        current_me(&state),
        state.api.members_all(),
        state.api.team_stats(),
    );
    let members = degraded("members", members).items;
    let team = degraded("team stats", team);

    // Per-member stats are fetched in one parallel burst; one failing call
    // degrades only its own row.
    let mut stats: Vec<Option<MemberStats>> = vec![None; members.len()];
    let mut set = JoinSet::new();
    for (i, member) in members.iter().enumerate() {
        let api = state.api.clone();
        let id = member.id;
        set.spawn(async move { (i, api.member_stats(id).await) });
    }
    while let Some(joined) = set.join_next().await {
        if let Ok((i, member_stats)) = joined {
            stats[i] = member_stats;
        }
    }

    let mut ranked: Vec<RankedMember> = members
        .into_iter()
        .zip(stats)
        .map(|(member, stats)| RankedMember::new(member, stats))
        .collect();
    rank_members(&mut ranked);

    Html(ui::render_members(&me, &ranked, &team, flash.toast.as_deref()))
}

// --- actions ---

fn action_redirect(back: &str, outcome: &str) -> Redirect {
    Redirect::to(&format!("{back}?toast={outcome}"))
}

pub async fn create_project(
    State(state): State<AppState>,
    Form(form): Form<ProjectForm>,
) -> Redirect {
    if !current_me(&state).await.can_edit() {
        return action_redirect("/projects", "forbidden");
    }
    let name = form.name.trim();
    if name.is_empty() {
        return action_redirect("/projects", "error");
    }

    let date_from = Some(form.from.trim()).filter(|s| !s.is_empty());
    let date_to = Some(form.to.trim()).filter(|s| !s.is_empty());
    match state.api.create_project(name, date_from, date_to).await {
        Ok(_) => action_redirect("/projects", "created"),
        Err(err) => {
            warn!("create project failed: {err}");
            action_redirect("/projects", "error")
        }
    }
}

pub async fn create_member(
    State(state): State<AppState>,
    Form(form): Form<MemberForm>,
) -> Redirect {
    if !current_me(&state).await.can_edit() {
        return action_redirect("/members", "forbidden");
    }
    let name = form.name.trim();
    if name.is_empty() {
        return action_redirect("/members", "error");
    }

    match state.api.member_create(name).await {
        Ok(_) => action_redirect("/members", "created"),
        Err(err) => {
            warn!("create member failed: {err}");
            action_redirect("/members", "error")
        }
    }
}

pub async fn create_link(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<LinkForm>,
) -> Redirect {
    let back = format!("/project/{id}");
    if !current_me(&state).await.can_edit() {
        return action_redirect(&back, "forbidden");
    }
    let name = form.name.trim();
    let target_url = form.target_url.trim();
    if name.is_empty() || target_url.is_empty() || form.owner_id == 0 {
        return action_redirect(&back, "error");
    }

    match state.api.link_create(id, form.owner_id, name, target_url).await {
        Ok(_) => action_redirect(&back, "created"),
        Err(err) => {
            warn!("create link failed: {err}");
            action_redirect(&back, "error")
        }
    }
}

pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<AddMemberForm>,
) -> Redirect {
    let back = format!("/project/{id}");
    if !current_me(&state).await.can_edit() {
        return action_redirect(&back, "forbidden");
    }
    if form.member_id == 0 {
        return action_redirect(&back, "error");
    }

    match state.api.project_add_member(id, form.member_id).await {
        Ok(()) => action_redirect(&back, "created"),
        Err(err) => {
            warn!("add member failed: {err}");
            action_redirect(&back, "error")
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(Redirect::to("/"));
    }

    if let Err(err) = state.api.login(name).await {
        warn!("backend login failed: {err}");
    }

    let mut profile = state.profile.lock().await;
    profile.display_name = Some(name.to_string());
    persist_profile(&state.profile_path, &profile).await?;

    Ok(Redirect::to("/"))
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    if let Err(err) = state.api.logout().await {
        warn!("backend logout failed: {err}");
    }

    let mut profile = state.profile.lock().await;
    profile.display_name = None;
    persist_profile(&state.profile_path, &profile).await?;

    Ok(Redirect::to("/"))
}

/// Short-link hop: report the click with the local device key, then hand
/// off to the backend's counting redirect.
pub async fn go(State(state): State<AppState>, Path(id): Path<u64>) -> Redirect {
    let device_key = state.profile.lock().await.device_key.clone();
    if let Err(err) = state.api.track_click(id, &device_key).await {
        warn!("click report for link {id} failed: {err}");
    }

    Redirect::temporary(&state.api.go_url(id))
}
