//! HTML fragments for the panel. Pure functions of their inputs.

use crate::confirm::ConfirmDialog;
use crate::logic::{DashboardStats, PageItem, Pagination};
use crate::models::{Difficulty, FormFields, Prizes, TournamentRecord};
use crate::notify::{Notification, Phase};
use chrono::{DateTime, NaiveDateTime};
use std::fmt::Write;
use std::time::Instant;

/// Escape text for element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `$12,000` style amount.
pub fn format_money(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("$-{}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// `Nov 15, 2024, 10:00 AM`; "TBD" when empty; raw text when it does not parse.
pub fn format_start_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "TBD".to_string();
    }
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_local()));
    match parsed {
        Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// Card gradient colors for a difficulty. Unknown labels get Medium's pair.
pub fn difficulty_colors(difficulty: &Difficulty) -> (&'static str, &'static str) {
    match difficulty {
        Difficulty::Easy => ("#10b981", "#06b6d4"),
        Difficulty::Hard => ("#8b5cf6", "#ec4899"),
        Difficulty::Expert => ("#ef4444", "#f59e0b"),
        Difficulty::Medium | Difficulty::Other(_) => ("#3b82f6", "#06b6d4"),
    }
}

/// Whole-unit amount for one place, rounded half up. Computed wide and
/// clamped to the `i64` range.
pub fn prize_amount(prize_pool: i64, percentage: i64) -> i64 {
    let amount = (2 * i128::from(prize_pool) * i128::from(percentage) + 100).div_euclid(200);
    i64::try_from(amount).unwrap_or(if amount < 0 { i64::MIN } else { i64::MAX })
}

/// First, second and third place amounts, each rounded on its own.
/// Their sum may differ from the pool by a unit or two.
pub fn prize_amounts(prize_pool: i64, prizes: &Prizes) -> (i64, i64, i64) {
    (
        prize_amount(prize_pool, prizes.first),
        prize_amount(prize_pool, prizes.second),
        prize_amount(prize_pool, prizes.third),
    )
}

pub fn tournament_card(t: &TournamentRecord) -> String {
    let (primary, secondary) = difficulty_colors(&t.difficulty);
    let (first, second, third) = prize_amounts(t.prize_pool, &t.prizes);
    let id = escape(&t.id.to_string());
    let status = t.status.as_str();

    format!(
        r#"<div class="tournament-card" data-id="{id}" style="--card-color-1: {primary}; --card-color-2: {secondary};">
    <div class="tournament-header">
        <div class="tournament-info">
            <h3>{title}</h3>
            <p>{subtitle}</p>
        </div>
        <span class="tournament-status status-{status}">{status}</span>
    </div>
    <div class="tournament-details">
        <div class="detail-item"><i class="fas fa-calendar"></i><span>{start}</span></div>
        <div class="detail-item"><i class="fas fa-clock"></i><span>{duration}h</span></div>
        <div class="detail-item"><i class="fas fa-dollar-sign"></i><span>{pool}</span></div>
        <div class="detail-item"><i class="fas fa-users"></i><span>{participants}/{max}</span></div>
        <div class="detail-item"><i class="fas fa-signal"></i><span>{difficulty}</span></div>
        <div class="detail-item"><i class="fas fa-code"></i><span>{language}</span></div>
    </div>
    <div class="prize-preview">
        <small>Prize Distribution:</small>
        <div class="prize-amounts">
            <span>🥇 {first}</span>
            <span>🥈 {second}</span>
            <span>🥉 {third}</span>
        </div>
    </div>
    <div class="tournament-actions">
        <button class="action-btn edit" data-action="edit" data-id="{id}"><i class="fas fa-edit"></i> Edit</button>
        <button class="action-btn delete" data-action="delete" data-id="{id}"><i class="fas fa-trash"></i> Delete</button>
    </div>
</div>"#,
        title = escape(&t.title),
        subtitle = escape(&t.subtitle),
        start = escape(&format_start_date(&t.start_date)),
        duration = t.duration,
        pool = format_money(t.prize_pool),
        participants = t.participants,
        max = t.max_participants,
        difficulty = escape(t.difficulty.as_str()),
        language = escape(&t.language),
        first = format_money(first),
        second = format_money(second),
        third = format_money(third),
    )
}

/// The visible cards, or the empty state when there are none.
pub fn tournament_grid(visible: &[&TournamentRecord]) -> String {
    if visible.is_empty() {
        return r#"<div class="no-tournaments">
    <i class="fas fa-trophy"></i>
    <h3>No tournaments found</h3>
    <p>Create your first tournament to get started.</p>
</div>"#
            .to_string();
    }
    visible
        .iter()
        .map(|t| tournament_card(t))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn page_numbers(pagination: &Pagination) -> String {
    let mut out = String::new();
    for item in &pagination.items {
        match item {
            PageItem::Page { number, current } => {
                let active = if *current { " active" } else { "" };
                let _ = write!(
                    out,
                    r#"<button class="page-number{active}" data-page="{number}">{number}</button>"#
                );
            }
            PageItem::Ellipsis => out.push_str(r#"<span class="page-ellipsis">...</span>"#),
        }
    }
    out
}

/// Prev/next buttons around the page numbers.
pub fn pagination_controls(pagination: &Pagination) -> String {
    let disabled = |d: bool| if d { " disabled" } else { "" };
    format!(
        r#"<div class="pagination">
    <button id="prevPage"{prev}><i class="fas fa-chevron-left"></i></button>
    <div id="pageNumbers">{numbers}</div>
    <button id="nextPage"{next}><i class="fas fa-chevron-right"></i></button>
</div>"#,
        prev = disabled(pagination.prev_disabled),
        next = disabled(pagination.next_disabled),
        numbers = page_numbers(pagination),
    )
}

pub fn stats_panel(stats: &DashboardStats) -> String {
    format!(
        r#"<div class="stats-grid">
    <div class="stat-card"><h3 id="totalTournaments">{total}</h3><p>Total Tournaments</p></div>
    <div class="stat-card"><h3 id="totalParticipants">{participants}</h3><p>Total Participants</p></div>
    <div class="stat-card"><h3 id="totalPrizePool">{pool}</h3><p>Total Prize Pool</p></div>
    <div class="stat-card"><h3 id="activeTournaments">{active}</h3><p>Active Tournaments</p></div>
</div>"#,
        total = stats.total_tournaments,
        participants = stats.total_participants,
        pool = format_money(stats.total_prize_pool),
        active = stats.active_tournaments,
    )
}

pub fn recent_list(recent: &[TournamentRecord]) -> String {
    if recent.is_empty() {
        return "<p>No tournaments created yet.</p>".to_string();
    }
    let mut out = String::new();
    for t in recent {
        let _ = write!(
            out,
            r#"<div class="tournament-item">
    <div class="tournament-info">
        <h4>{title}</h4>
        <p>{subtitle}</p>
    </div>
    <div class="tournament-meta">
        <span class="status status-{status}">{status}</span>
        <span class="participants">{participants}/{max}</span>
    </div>
</div>
"#,
            title = escape(&t.title),
            subtitle = escape(&t.subtitle),
            status = t.status.as_str(),
            participants = t.participants,
            max = t.max_participants,
        );
    }
    out
}

pub fn notification(n: &Notification, now: Instant) -> String {
    let animation = match n.phase(now) {
        Phase::Visible => "slideInRight",
        Phase::Leaving => "slideOutRight",
    };
    format!(
        r#"<div class="notification notification-{kind}" data-id="{id}" style="background: {color}; animation: {animation} 0.3s ease;">
    <div class="notification-content">
        <i class="fas fa-{icon}-circle"></i>
        <span>{message}</span>
    </div>
    <button class="notification-close" data-dismiss="{id}">&times;</button>
</div>"#,
        kind = n.severity.as_str(),
        id = n.id,
        color = n.severity.color(),
        icon = n.severity.icon(),
        message = escape(&n.message),
    )
}

pub fn notifications(items: &[Notification], now: Instant) -> String {
    items
        .iter()
        .map(|n| notification(n, now))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn confirm_modal<A>(dialog: &ConfirmDialog<A>) -> String {
    match (dialog.title(), dialog.message()) {
        (Some(title), Some(message)) => format!(
            r#"<div class="modal active" id="confirmModal">
    <div class="modal-content">
        <h3 id="confirmTitle">{title}</h3>
        <p id="confirmMessage">{message}</p>
        <div class="modal-actions">
            <button id="confirmCancel" class="btn-secondary">Cancel</button>
            <button id="confirmDelete" class="btn-danger">Delete</button>
        </div>
    </div>
</div>"#,
            title = escape(title),
            message = escape(message),
        ),
        _ => String::new(),
    }
}

/// What the form modal needs to draw itself.
pub struct FormView<'a> {
    pub open: bool,
    pub heading: &'a str,
    pub fields: &'a FormFields,
    pub submit_label: &'a str,
    pub submit_disabled: bool,
    pub prize_border: &'a str,
}

pub fn tournament_form(view: &FormView<'_>) -> String {
    if !view.open {
        return String::new();
    }
    let f = view.fields;
    let text = |id: &str, label: &str, value: &str| {
        format!(
            r#"<label for="{id}">{label}</label><input type="text" id="{id}" name="{id}" value="{value}">"#,
            value = escape(value)
        )
    };
    let number = |id: &str, label: &str, value: &str, style: &str| {
        format!(
            r#"<label for="{id}">{label}</label><input type="number" id="{id}" name="{id}" value="{value}"{style}>"#,
            value = escape(value)
        )
    };
    let border = format!(r#" style="border-color: {}""#, view.prize_border);
    let difficulty_options: String = ["Easy", "Medium", "Hard", "Expert"]
        .iter()
        .map(|d| {
            let selected = if f.difficulty == *d { " selected" } else { "" };
            format!(r#"<option value="{d}"{selected}>{d}</option>"#)
        })
        .collect();

    format!(
        r#"<div class="modal active" id="tournamentModal">
    <div class="modal-content">
        <h2 id="modalTitle">{heading}</h2>
        <form id="tournamentForm">
            {title}
            {subtitle}
            <label for="startDate">Start Date</label><input type="datetime-local" id="startDate" name="startDate" value="{start}">
            {duration}
            {pool}
            {max}
            <label for="difficulty">Difficulty</label><select id="difficulty" name="difficulty">{difficulty_options}</select>
            {language}
            <label for="description">Description</label><textarea id="description" name="description">{description}</textarea>
            <label for="rules">Rules (one per line)</label><textarea id="rules" name="rules">{rules}</textarea>
            {first}
            {second}
            {third}
            <button type="button" id="cancelBtn">Cancel</button>
            <button type="submit" id="saveBtn"{disabled}>{submit}</button>
        </form>
    </div>
</div>"#,
        heading = escape(view.heading),
        title = text("tournamentTitle", "Title", &f.title),
        subtitle = text("tournamentSubtitle", "Subtitle", &f.subtitle),
        start = escape(&f.start_date),
        duration = number("duration", "Duration (hours)", &f.duration, ""),
        pool = number("prizePool", "Prize Pool", &f.prize_pool, ""),
        max = number("maxParticipants", "Max Participants", &f.max_participants, ""),
        language = text("language", "Language", &f.language),
        description = escape(&f.description),
        rules = escape(&f.rules),
        first = number("firstPrize", "1st Place %", &f.first_prize, &border),
        second = number("secondPrize", "2nd Place %", &f.second_prize, &border),
        third = number("thirdPrize", "3rd Place %", &f.third_prize, &border),
        disabled = if view.submit_disabled { " disabled" } else { "" },
        submit = escape(view.submit_label),
    )
}

/// Pre-rendered pieces of the full page.
pub struct PageFragments {
    pub title: String,
    pub dashboard_active: bool,
    pub stats: String,
    pub recent: String,
    pub grid: String,
    pub pagination: String,
    pub form: String,
    pub confirm: String,
    pub notifications: String,
}

pub fn page(p: &PageFragments) -> String {
    let active = |on: bool| if on { " active" } else { "" };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Tournament Admin</title>
</head>
<body>
<aside class="sidebar">
    <div class="menu-item{dash}" data-section="dashboard">Dashboard</div>
    <div class="menu-item{tour}" data-section="tournaments">Tournaments</div>
</aside>
<main>
    <h1 class="page-title">{title}</h1>
    <section id="dashboard" class="content-section{dash}">
        {stats}
        <div id="recentTournamentsList">{recent}</div>
    </section>
    <section id="tournaments" class="content-section{tour}">
        <button id="addTournamentBtn">Add Tournament</button>
        <input id="tournamentSearch" type="search" placeholder="Search tournaments">
        <select id="statusFilter">
            <option value="">All</option>
            <option value="open">Open</option>
            <option value="ongoing">Ongoing</option>
            <option value="closed">Closed</option>
        </select>
        <div id="tournamentsGrid" class="tournaments-grid">{grid}</div>
        {pagination}
    </section>
</main>
{form}
{confirm}
<div id="notifications">{notifications}</div>
</body>
</html>"#,
        title = escape(&p.title),
        dash = active(p.dashboard_active),
        tour = active(!p.dashboard_active),
        stats = p.stats,
        recent = p.recent,
        grid = p.grid,
        pagination = p.pagination,
        form = p.form,
        confirm = p.confirm,
        notifications = p.notifications,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_is_grouped_by_thousands() {
        assert_eq!(format_money(0), "$0");
        assert_eq!(format_money(999), "$999");
        assert_eq!(format_money(10000), "$10,000");
        assert_eq!(format_money(1234567), "$1,234,567");
    }

    #[test]
    fn start_date_formats_or_falls_back() {
        assert_eq!(format_start_date("2024-11-15T10:00"), "Nov 15, 2024, 10:00 AM");
        assert_eq!(format_start_date(""), "TBD");
        assert_eq!(format_start_date("soon"), "soon");
    }

    #[test]
    fn rounding_is_half_up_per_place() {
        assert_eq!(prize_amount(5, 50), 3);
        assert_eq!(prize_amounts(10, &Prizes::new(34, 33, 33)), (3, 3, 3));
    }

    #[test]
    fn rounding_survives_huge_pools() {
        assert_eq!(prize_amount(i64::MAX, 100), i64::MAX);
        assert_eq!(prize_amount(i64::MAX, -100), i64::MIN);
        assert_eq!(prize_amount(100_000_000_000_000_000, 50), 50_000_000_000_000_000);
    }

    #[test]
    fn difficulty_picks_card_colors() {
        let cases = [
            (Difficulty::Easy, ("#10b981", "#06b6d4")),
            (Difficulty::Medium, ("#3b82f6", "#06b6d4")),
            (Difficulty::Hard, ("#8b5cf6", "#ec4899")),
            (Difficulty::Expert, ("#ef4444", "#f59e0b")),
            (Difficulty::Other("Insane".into()), ("#3b82f6", "#06b6d4")),
        ];
        for (difficulty, colors) in cases {
            assert_eq!(difficulty_colors(&difficulty), colors, "{:?}", difficulty);
        }
    }

    #[test]
    fn last_page_disables_next() {
        let html = pagination_controls(&Pagination::new(3, 13, 6));
        assert!(html.contains(r#"<button id="prevPage">"#));
        assert!(html.contains(r#"<button id="nextPage" disabled>"#));
        assert!(html.contains(r#"<button class="page-number active" data-page="3">3</button>"#));
        assert!(html.contains(r#"<button class="page-number" data-page="1">1</button>"#));
        assert!(!html.contains("page-ellipsis"));
    }

    #[test]
    fn middle_page_has_ellipsis_on_both_sides() {
        let html = pagination_controls(&Pagination::new(5, 60, 6));
        assert!(!html.contains("disabled"));
        assert_eq!(html.matches(r#"<span class="page-ellipsis">...</span>"#).count(), 2);
        assert_eq!(html.matches("page-number active").count(), 1);
        let numbers: Vec<&str> = html
            .split(r#"data-page=""#)
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .collect();
        assert_eq!(numbers, vec!["1", "4", "5", "6", "10"]);

        let first = pagination_controls(&Pagination::new(1, 60, 6));
        assert!(first.contains(r#"<button id="prevPage" disabled>"#));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }
}
