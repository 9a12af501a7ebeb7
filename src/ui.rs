use crate::leaderboard::{
    below_podium, format_date_range, format_int, podium, project_totals, RankedMember,
};
use crate::models::{LeaderRow, LinkRow, Me, ProjectBrief, Summary, TeamStats};

/// Minimal HTML escaping for values interpolated into templates.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_page(title: &str, me: &Me, flash: Option<&str>, content: &str) -> String {
    PAGE_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{STATUS}}", &status_badge(me))
        .replace("{{WHO}}", &escape(me.name.as_deref().unwrap_or("")))
        .replace("{{FLASH}}", &flash_banner(flash))
        .replace("{{CONTENT}}", content)
}

pub fn status_badge(me: &Me) -> String {
    if me.can_edit() {
        r#"Status | <b>Editor</b> <span class="muted">(can edit)</span>"#.to_string()
    } else {
        r#"Status | <b>Viewer</b> <span class="muted">(only view)</span>"#.to_string()
    }
}

/// Transient banner driven by the `?toast=` flash parameter set after
/// mutations.
pub fn flash_banner(tag: Option<&str>) -> String {
    let (class, text) = match tag {
        Some("created") => ("ok", "SUCCESSFULLY CREATED"),
        Some("forbidden") => ("err", "YOU CANNOT EDIT"),
        Some("error") => ("err", "Something went wrong"),
        _ => return String::new(),
    };
    format!(r#"<div class="alert {class} slide">{text}</div>"#)
}

fn kpi_card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="stat"><span class="label">{label}</span><span class="value">{value}</span></div>"#
    )
}

fn podium_html(rows: &[LeaderRow], links_base: Option<&str>) -> String {
    let mut out = String::new();
    for (place, row) in podium(rows) {
        let (cls, mid) = match place {
            1 => ("gold", " mid"),
            2 => ("silver", ""),
            _ => ("bronze", ""),
        };
        let chip = match links_base {
            Some(base) => format!(
                r#"<a class="link-chip" title="Show links" href="{base}/{}">&#128279;</a>"#,
                row.id
            ),
            None => String::new(),
        };
        out.push_str(&format!(
            r#"<div class="pod-col{mid}">
  <div class="pod-name">{name}</div>
  <div class="pod-step {cls}">{chip}<div class="pod-place">{place}</div></div>
  <div class="pod-clicks">{clicks} clicks</div>
</div>
"#,
            name = escape(&row.name),
            clicks = format_int(row.clicks),
        ));
    }
    out
}

fn others_html(rows: &[LeaderRow], links_base: Option<&str>, empty_placeholder: bool) -> String {
    let rest = below_podium(rows);
    if rest.is_empty() && rows.is_empty() {
        if !empty_placeholder {
            return String::new();
        }
        return r#"<div class="other last"><div class="col name"><span class="rank">—</span><span class="name">No members yet</span></div><div class="col links">0 links</div><div class="col clicks">0 clicks</div></div>"#
            .to_string();
    }

    let mut out = String::new();
    for (i, row) in rest.iter().enumerate() {
        let last = if i + 1 == rest.len() { " last" } else { "" };
        let chip = match links_base {
            Some(base) => format!(
                r#"<a class="link-chip" title="Show links" href="{base}/{}">&#128279;</a>"#,
                row.id
            ),
            None => String::new(),
        };
        out.push_str(&format!(
            r#"<div class="other{last}">{chip}<div class="col name"><span class="rank">{rank} –</span><span class="name">{name}</span></div><div class="col links">{links} links</div><div class="col clicks">{clicks} clicks</div></div>
"#,
            rank = i + 4,
            name = escape(&row.name),
            links = format_int(row.links),
            clicks = format_int(row.clicks),
        ));
    }
    out
}

pub fn render_dashboard(
    me: &Me,
    summary: &Summary,
    team: &TeamStats,
    leaders: &[LeaderRow],
    flash: Option<&str>,
) -> String {
    let mut content = String::new();
    content.push_str(r#"<section class="panel">"#);
    content.push_str(&kpi_card("Projects", &format_int(summary.projects)));
    content.push_str(&kpi_card("Links", &format_int(summary.links)));
    content.push_str(&kpi_card("Clicks", &format_int(summary.clicks)));
    content.push_str(&kpi_card("Unique users", &format_int(team.unique_users)));
    content.push_str("</section>");

    content.push_str(r#"<section class="board"><h2>Leaderboard</h2><div class="podium">"#);
    // The dashboard podium only shows once there are three contenders.
    if leaders.len() >= 3 {
        content.push_str(&podium_html(leaders, None));
    }
    content.push_str(r#"</div><div class="others">"#);
    content.push_str(&others_html(leaders, None, false));
    content.push_str("</div></section>");

    render_page("Dashboard", me, flash, &content)
}

pub fn render_projects(me: &Me, projects: &[ProjectBrief], flash: Option<&str>) -> String {
    let mut content = String::new();
    content.push_str(r#"<section class="board"><h2>Projects</h2><div class="rows">"#);
    if projects.is_empty() {
        content.push_str(r#"<div class="row empty">No projects yet</div>"#);
    }
    for project in projects {
        let dates = format_date_range(project.date_from.as_deref(), project.date_to.as_deref(), false);
        content.push_str(&format!(
            r#"<div class="project-row"><div class="project-name">{name}</div><div class="project-dates">{dates}</div><a class="go-btn" href="/project/{id}" aria-label="open">→</a></div>
"#,
            name = escape(&project.name),
            id = project.id,
        ));
    }
    content.push_str("</div></section>");

    if me.can_edit() {
        content.push_str(
            r#"<section class="board"><h2>Create project</h2>
<form class="stack" method="post" action="/projects/create">
  <input name="name" placeholder="Project name" required />
  <input name="from" type="date" />
  <input name="to" type="date" />
  <button type="submit">Create</button>
</form></section>"#,
        );
    }

    render_page("Projects", me, flash, &content)
}

pub fn render_project(
    me: &Me,
    project: &ProjectBrief,
    members: &[LeaderRow],
    leaders: &[LeaderRow],
    addable: &[(u64, String)],
    flash: Option<&str>,
) -> String {
    let (member_count, link_count, click_sum) = project_totals(members);
    let links_base = format!("/project/{}/links", project.id);

    let mut content = String::new();
    content.push_str(&format!(
        r#"<section class="project-head"><h2>{name}</h2><div class="project-dates">{dates}</div></section>"#,
        name = escape(&project.name),
        dates = format_date_range(project.date_from.as_deref(), project.date_to.as_deref(), true),
    ));

    content.push_str(r#"<section class="panel">"#);
    content.push_str(&kpi_card("Members", &format_int(member_count)));
    content.push_str(&kpi_card("Links", &format_int(link_count)));
    content.push_str(&kpi_card("Clicks", &format_int(click_sum)));
    content.push_str("</section>");

    content.push_str(r#"<section class="board"><h2>Leaderboard</h2><div class="podium">"#);
    content.push_str(&podium_html(leaders, Some(&links_base)));
    content.push_str(r#"</div><div class="others">"#);
    content.push_str(&others_html(leaders, Some(&links_base), true));
    content.push_str("</div></section>");

    if me.can_edit() {
        let owner_options: String = members
            .iter()
            .map(|m| format!(r#"<option value="{}">{}</option>"#, m.id, escape(&m.name)))
            .collect();
        content.push_str(&format!(
            r#"<section class="board"><h2>Create link</h2>
<form class="stack" method="post" action="/project/{id}/links/create">
  <input name="name" placeholder="Link name" required />
  <input name="target_url" type="url" placeholder="https://…" required />
  <select name="owner_id" required>{owner_options}</select>
  <button type="submit">Create</button>
</form></section>"#,
            id = project.id,
        ));

        let member_options: String = addable
            .iter()
            .map(|(id, name)| format!(r#"<option value="{id}">{}</option>"#, escape(name)))
            .collect();
        content.push_str(&format!(
            r#"<section class="board"><h2>Add member</h2>
<form class="stack" method="post" action="/project/{id}/members/add">
  <select name="member_id" required>{member_options}</select>
  <button type="submit">Add</button>
</form></section>"#,
            id = project.id,
        ));
    }

    render_page(&project.name, me, flash, &content)
}

pub fn render_owner_links(
    me: &Me,
    project: &ProjectBrief,
    owner_name: &str,
    links: &[LinkRow],
) -> String {
    let mut content = String::new();
    content.push_str(&format!(
        r#"<section class="board"><h2>{owner} — links</h2><div class="rows">"#,
        owner = escape(owner_name),
    ));
    if links.is_empty() {
        content.push_str(r#"<div class="link-row"><div>No links yet</div><div>0 clicks</div></div>"#);
    }
    for link in links {
        content.push_str(&format!(
            r#"<div class="link-row"><a class="link-name" href="/go/{id}" title="Short link">{name}</a><div>{clicks} clicks</div></div>
"#,
            id = link.id,
            name = escape(&link.name),
            clicks = format_int(link.clicks),
        ));
    }
    content.push_str(&format!(
        r#"</div><a class="back" href="/project/{}">← Back to project</a></section>"#,
        project.id,
    ));

    render_page(owner_name, me, None, &content)
}

pub fn render_members(
    me: &Me,
    ranked: &[RankedMember],
    team: &TeamStats,
    flash: Option<&str>,
) -> String {
    let mut content = String::new();
    content.push_str(r#"<section class="panel">"#);
    content.push_str(&kpi_card("Team members", &format_int(ranked.len() as u64)));
    content.push_str(&kpi_card("Total clicks", &format_int(team.total_clicks)));
    content.push_str(&kpi_card("Unique users", &format_int(team.unique_users)));
    content.push_str("</section>");

    content.push_str(r#"<section class="board"><h2>Members</h2><div class="rows">"#);
    if ranked.is_empty() {
        content.push_str(r#"<div class="row empty">No members yet</div>"#);
    }
    for (i, entry) in ranked.iter().enumerate() {
        // The last row after ranking is marked as the outsider.
        let outsider = if i + 1 == ranked.len() { " outsider" } else { "" };
        content.push_str(&format!(
            r#"<div class="row{outsider}"><div class="idx">{idx}</div><div class="name">{name}</div><div class="meta">Active in <b>{projects}</b> projects&nbsp;&nbsp;&nbsp;Unique users: <b>{uniques}</b>&nbsp;&nbsp;&nbsp;Total clicks: <b>{clicks}</b></div></div>
"#,
            idx = i + 1,
            name = escape(&entry.member.name),
            projects = format_int(entry.member.active_projects),
            uniques = format_int(entry.unique_users),
            clicks = format_int(entry.total_clicks),
        ));
    }
    content.push_str("</div></section>");

    if me.can_edit() {
        content.push_str(
            r#"<section class="board"><h2>Add new team member</h2>
<form class="stack" method="post" action="/members/create">
  <input name="name" placeholder="Member name" required />
  <button type="submit">Create</button>
</form></section>"#,
        );
    }

    render_page("Members", me, flash, &content)
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} · Trackboard</title>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .brand { font-weight: 600; font-size: 1.4rem; text-decoration: none; color: var(--ink); }
    nav a { margin-right: 14px; color: var(--accent-2); text-decoration: none; font-weight: 600; }
    .status { font-size: 0.95rem; color: #6b645d; }
    .muted { color: #8b857d; }

    .who { display: flex; align-items: center; gap: 8px; }
    .who input { width: 130px; }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value { font-size: 1.7rem; font-weight: 600; color: var(--accent-2); }

    .board { display: grid; gap: 14px; }
    .board h2 { margin: 0; font-size: 1.3rem; }

    .podium {
      display: flex;
      align-items: flex-end;
      justify-content: center;
      gap: 18px;
      min-height: 40px;
    }

    .pod-col { display: grid; justify-items: center; gap: 6px; }
    .pod-name { font-weight: 600; }
    .pod-step {
      width: 110px;
      border-radius: 12px 12px 0 0;
      display: grid;
      place-items: center;
      color: white;
      font-weight: 600;
    }
    .pod-step.gold { background: #d9a441; height: 96px; }
    .pod-step.silver { background: #9aa5ad; height: 72px; }
    .pod-step.bronze { background: #b0713c; height: 56px; }
    .pod-place { font-size: 1.6rem; }
    .pod-clicks { font-size: 0.9rem; color: #6b645d; }

    .rows, .others { display: grid; gap: 8px; }

    .other, .row, .project-row, .link-row {
      background: white;
      border-radius: 14px;
      padding: 12px 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    .other.last, .row.outsider { border-color: rgba(198, 59, 43, 0.45); }
    .rank { color: #8b857d; margin-right: 6px; }
    .row .idx { color: #8b857d; min-width: 2ch; }
    .row .name, .project-name { font-weight: 600; }
    .row .meta, .project-dates, .col.links, .col.clicks { color: #6b645d; font-size: 0.92rem; }
    .row.empty { justify-content: center; color: #8b857d; }

    .go-btn, .link-chip {
      text-decoration: none;
      background: var(--accent-2);
      color: white;
      border-radius: 999px;
      padding: 6px 12px;
      font-weight: 600;
    }

    .link-name { color: var(--accent-2); font-weight: 600; text-decoration: none; }
    .back { color: var(--accent-2); text-decoration: none; font-weight: 600; }

    form.stack { display: grid; gap: 10px; max-width: 340px; }
    input, select {
      border: 1px solid rgba(47, 72, 88, 0.2);
      border-radius: 10px;
      padding: 9px 12px;
      font: inherit;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    .alert {
      border-radius: 12px;
      padding: 10px 16px;
      font-weight: 600;
    }
    .alert.ok { background: rgba(45, 122, 75, 0.12); color: #2d7a4b; }
    .alert.err { background: rgba(198, 59, 43, 0.12); color: #c63b2b; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <a class="brand" href="/">Trackboard</a>
      <nav>
        <a href="/">Dashboard</a>
        <a href="/projects">Projects</a>
        <a href="/members">Members</a>
      </nav>
      <div class="status">{{STATUS}}</div>
      <div class="who">
        <form method="post" action="/login">
          <input name="name" placeholder="Your name" value="{{WHO}}" />
          <button type="submit">Sign in</button>
        </form>
        <form method="post" action="/logout">
          <button type="submit">Sign out</button>
        </form>
      </div>
    </header>
    {{FLASH}}
    {{CONTENT}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberRow;

    fn leaders(n: usize) -> Vec<LeaderRow> {
        (0..n)
            .map(|i| LeaderRow {
                id: i as u64 + 1,
                name: format!("member{}", i + 1),
                links: 1,
                clicks: (n - i) as u64 * 100,
            })
            .collect()
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(escape("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn dashboard_podium_renders_three_one_two() {
        let rows = leaders(5);
        let html = render_dashboard(
            &Me::default(),
            &Summary::default(),
            &TeamStats::default(),
            &rows,
            None,
        );

        let p3 = html.find("member3").expect("bronze name");
        let p1 = html.find("member1").expect("gold name");
        let p2 = html.find("member2").expect("silver name");
        assert!(p3 < p1 && p1 < p2, "podium order must be 3-1-2");

        // Ranks 4 and 5 appear in the descending list below.
        assert!(html.contains("4 –"));
        assert!(html.contains("member4"));
        assert!(html.contains("5 –"));
        assert!(html.contains("member5"));
    }

    #[test]
    fn dashboard_hides_podium_below_three() {
        let rows = leaders(2);
        let html = render_dashboard(
            &Me::default(),
            &Summary::default(),
            &TeamStats::default(),
            &rows,
            None,
        );
        assert!(!html.contains(r#"class="pod-step"#));
    }

    #[test]
    fn empty_leaderboard_placeholder_is_project_only() {
        let html = render_dashboard(
            &Me::default(),
            &Summary::default(),
            &TeamStats::default(),
            &[],
            None,
        );
        assert!(!html.contains("No members yet"));
        assert!(html.contains(r#"class="others"></div>"#));

        let project = ProjectBrief {
            id: 1,
            name: "quiet".into(),
            date_from: None,
            date_to: None,
        };
        let html = render_project(&Me::default(), &project, &[], &[], &[], None);
        assert!(html.contains("No members yet"));
    }

    #[test]
    fn project_podium_is_partial_below_three() {
        let rows = leaders(2);
        let project = ProjectBrief {
            id: 9,
            name: "launch".into(),
            date_from: Some("2025-01-01".into()),
            date_to: None,
        };
        let html = render_project(&Me::default(), &project, &rows, &rows, &[], None);
        assert!(html.contains("pod-step gold"));
        assert!(html.contains("pod-step silver"));
        assert!(!html.contains("pod-step bronze"));
        assert!(html.contains("01.01.2025"));
    }

    #[test]
    fn members_marks_outsider_and_formats_counts() {
        let ranked = vec![
            RankedMember {
                member: MemberRow {
                    name: "ana".into(),
                    active_projects: 2,
                    ..MemberRow::default()
                },
                unique_users: 12,
                total_clicks: 1200,
            },
            RankedMember {
                member: MemberRow {
                    name: "bo".into(),
                    ..MemberRow::default()
                },
                unique_users: 1,
                total_clicks: 3,
            },
        ];
        let html = render_members(&Me::default(), &ranked, &TeamStats::default(), None);
        assert!(html.contains("1,200"));
        let outsider = html.find(r#"class="row outsider""#).expect("outsider row");
        assert!(outsider > html.find(">ana<").unwrap());
        assert!(html.contains(">bo<"));
    }

    #[test]
    fn editor_sees_forms_viewer_does_not() {
        let editor = Me {
            role: Some("creator".into()),
            ..Me::default()
        };
        let viewer = Me::default();
        let projects = vec![];

        let editor_html = render_projects(&editor, &projects, None);
        assert!(editor_html.contains("/projects/create"));

        let viewer_html = render_projects(&viewer, &projects, None);
        assert!(!viewer_html.contains("/projects/create"));
        assert!(viewer_html.contains("Viewer"));
    }

    #[test]
    fn flash_banners() {
        assert!(flash_banner(Some("created")).contains("SUCCESSFULLY CREATED"));
        assert!(flash_banner(Some("forbidden")).contains("YOU CANNOT EDIT"));
        assert!(flash_banner(None).is_empty());
    }
}
