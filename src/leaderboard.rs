use crate::models::{LeaderRow, MemberRow, MemberStats};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A member row joined with its per-member click stats.
#[derive(Debug, Clone)]
pub struct RankedMember {
    pub member: MemberRow,
    pub unique_users: u64,
    pub total_clicks: u64,
}

impl RankedMember {
    /// When the stats endpoint could not be reached in any of its shapes,
    /// unique users read as zero and total clicks fall back to the count
    /// already present on the member row. The fallback count feeds the
    /// ranking as well, so a member with unreachable stats keeps a place
    /// matching the clicks shown on their row rather than sorting as zero.
    pub fn new(member: MemberRow, stats: Option<MemberStats>) -> Self {
        let (unique_users, total_clicks) = match stats {
            Some(stats) => (stats.unique_users, stats.total_clicks),
            None => (0, member.clicks),
        };
        Self {
            member,
            unique_users,
            total_clicks,
        }
    }
}

/// Orders the members leaderboard: total clicks desc, unique users desc,
/// then oldest member first. Stable, so equal rows keep backend order.
pub fn rank_members(members: &mut [RankedMember]) {
    members.sort_by(|a, b| {
        b.total_clicks
            .cmp(&a.total_clicks)
            .then(b.unique_users.cmp(&a.unique_users))
            .then(created_ts(&a.member).cmp(&created_ts(&b.member)))
    });
}

fn created_ts(member: &MemberRow) -> i64 {
    member
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(0)
}

/// Accepts the timestamp spellings the backend has used: RFC 3339 with or
/// without offset, and bare dates.
fn parse_timestamp(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
    }
    None
}

/// Podium display order for the top three rows: bronze, gold, silver
/// (3-1-2), with the winner in the middle column. Fewer than three rows
/// yield a shorter podium.
pub fn podium(rows: &[LeaderRow]) -> Vec<(u8, &LeaderRow)> {
    const DISPLAY: [(usize, u8); 3] = [(2, 3), (0, 1), (1, 2)];
    DISPLAY
        .iter()
        .filter_map(|&(idx, place)| rows.get(idx).map(|row| (place, row)))
        .collect()
}

pub fn below_podium(rows: &[LeaderRow]) -> &[LeaderRow] {
    rows.get(3..).unwrap_or(&[])
}

/// Project KPIs derived from its member rows: member count, link total,
/// click total.
pub fn project_totals(members: &[LeaderRow]) -> (u64, u64, u64) {
    let links = members.iter().map(|m| m.links).sum();
    let clicks = members.iter().map(|m| m.clicks).sum();
    (members.len() as u64, links, clicks)
}

/// Integer with `,` thousands separators, matching the original
/// `toLocaleString('en-US')` rendering.
pub fn format_int(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `dd.mm.yyyy`, used in project headers. Unparseable input renders empty.
pub fn format_date_dmy(iso: &str) -> String {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_default()
}

/// `yyyy.mm.dd`, used in the projects list. Falls back to swapping dashes
/// for dots, as the original page did.
pub fn format_date_ymd(iso: &str) -> String {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|d| d.format("%Y.%m.%d").to_string())
        .unwrap_or_else(|_| iso.replace('-', "."))
}

/// `from – to` with either side optional.
pub fn format_date_range(from: Option<&str>, to: Option<&str>, dmy: bool) -> String {
    let fmt: fn(&str) -> String = if dmy { format_date_dmy } else { format_date_ymd };
    let from = from.map(fmt).unwrap_or_default();
    let to = to.map(fmt).unwrap_or_default();
    match (from.is_empty(), to.is_empty()) {
        (true, true) => String::new(),
        (false, true) => from,
        (true, false) => to,
        (false, false) => format!("{from} – {to}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, clicks: u64, created_at: &str) -> MemberRow {
        MemberRow {
            id: 0,
            name: name.to_string(),
            is_editor: false,
            active_projects: 0,
            links: 0,
            clicks,
            created_at: Some(created_at.to_string()),
        }
    }

    fn ranked(name: &str, total: u64, unique: u64, created_at: &str) -> RankedMember {
        RankedMember {
            member: member(name, 0, created_at),
            unique_users: unique,
            total_clicks: total,
        }
    }

    fn leader(name: &str, clicks: u64) -> LeaderRow {
        LeaderRow {
            id: 0,
            name: name.to_string(),
            links: 1,
            clicks,
        }
    }

    #[test]
    fn rank_orders_by_clicks_then_uniques_then_age() {
        let mut rows = vec![
            ranked("young-tied", 10, 3, "2025-03-01T00:00:00Z"),
            ranked("few-uniques", 10, 1, "2024-01-01T00:00:00Z"),
            ranked("top", 20, 1, "2025-06-01T00:00:00Z"),
            ranked("old-tied", 10, 3, "2024-06-01T00:00:00Z"),
        ];
        rank_members(&mut rows);
        let names: Vec<&str> = rows.iter().map(|r| r.member.name.as_str()).collect();
        assert_eq!(names, ["top", "old-tied", "young-tied", "few-uniques"]);
    }

    #[test]
    fn rank_treats_bad_created_at_as_epoch() {
        let mut rows = vec![
            ranked("dated", 5, 0, "2024-01-01T00:00:00Z"),
            ranked("undated", 5, 0, "not a date"),
        ];
        rank_members(&mut rows);
        assert_eq!(rows[0].member.name, "undated");
    }

    #[test]
    fn stats_fallback_uses_row_clicks() {
        let with_stats = RankedMember::new(
            member("a", 7, "2024-01-01"),
            Some(MemberStats {
                unique_users: 2,
                total_clicks: 9,
            }),
        );
        assert_eq!(with_stats.total_clicks, 9);
        assert_eq!(with_stats.unique_users, 2);

        let degraded = RankedMember::new(member("b", 7, "2024-01-01"), None);
        assert_eq!(degraded.total_clicks, 7);
        assert_eq!(degraded.unique_users, 0);
    }

    #[test]
    fn podium_renders_three_one_two() {
        let rows = vec![leader("first", 30), leader("second", 20), leader("third", 10)];
        let podium = podium(&rows);
        let shown: Vec<(u8, &str)> = podium
            .iter()
            .map(|(place, row)| (*place, row.name.as_str()))
            .collect();
        assert_eq!(shown, [(3, "third"), (1, "first"), (2, "second")]);
    }

    #[test]
    fn podium_handles_short_leaderboards() {
        assert!(podium(&[]).is_empty());

        let one = vec![leader("only", 5)];
        let shown: Vec<u8> = podium(&one).iter().map(|(p, _)| *p).collect();
        assert_eq!(shown, [1]);

        let two = vec![leader("a", 5), leader("b", 3)];
        let shown: Vec<u8> = podium(&two).iter().map(|(p, _)| *p).collect();
        assert_eq!(shown, [1, 2]);
    }

    #[test]
    fn below_podium_starts_at_rank_four() {
        let rows: Vec<LeaderRow> = (0..5).map(|i| leader(&format!("m{i}"), 10 - i)).collect();
        let rest = below_podium(&rows);
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].name, "m3");
        assert!(below_podium(&rows[..2]).is_empty());
    }

    #[test]
    fn project_totals_sum_member_rows() {
        let members = vec![
            LeaderRow {
                id: 1,
                name: "a".into(),
                links: 2,
                clicks: 100,
            },
            LeaderRow {
                id: 2,
                name: "b".into(),
                links: 3,
                clicks: 50,
            },
        ];
        assert_eq!(project_totals(&members), (2, 5, 150));
    }

    #[test]
    fn int_formatting_groups_thousands() {
        assert_eq!(format_int(0), "0");
        assert_eq!(format_int(999), "999");
        assert_eq!(format_int(1_000), "1,000");
        assert_eq!(format_int(1_234_567), "1,234,567");
    }

    #[test]
    fn date_formats() {
        assert_eq!(format_date_dmy("2025-03-07"), "07.03.2025");
        assert_eq!(format_date_dmy("garbage"), "");
        assert_eq!(format_date_ymd("2025-03-07"), "2025.03.07");
        assert_eq!(
            format_date_range(Some("2025-01-01"), Some("2025-02-01"), true),
            "01.01.2025 – 01.02.2025"
        );
        assert_eq!(format_date_range(Some("2025-01-01"), None, true), "01.01.2025");
        assert_eq!(format_date_range(None, None, true), "");
    }
}
