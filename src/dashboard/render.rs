//! HTML rendering for the dashboard page.
//!
//! The page skeleton (styles and the client-side match checker) lives in
//! `templates/index.html`; this module fills its `{{...}}` slots.

use chrono::NaiveDate;
use std::fmt::Write;

use crate::types::{join_padded, Analysis, NumberStat, SquadSet};

/// The embedded dashboard template (compiled into the binary).
const DASHBOARD_TEMPLATE: &str = include_str!("templates/index.html");

/// Rows shown in the overall ranking table.
const RANKING_ROWS: usize = 20;

/// Render the full dashboard page.
pub fn render_dashboard(analysis: &Analysis, date: NaiveDate, generated_at: &str) -> String {
    let latest = analysis
        .latest_draw
        .as_ref()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "—".into());

    let content = if analysis.is_empty() {
        r#"<p class="no-data">No draw data available right now. Check the network or try again later.</p>"#
            .to_string()
    } else {
        let mut html = String::new();
        for set in &analysis.squad_sets {
            render_squad_set(&mut html, set, analysis);
        }
        render_ranking(&mut html, analysis);
        html
    };

    DASHBOARD_TEMPLATE
        .replace("{{generated_at}}", &escape(generated_at))
        .replace("{{date}}", &date.format("%Y-%m-%d").to_string())
        .replace("{{draws_analyzed}}", &analysis.draws_analyzed.to_string())
        .replace("{{latest_draw}}", &latest)
        .replace("{{content}}", &content)
}

fn render_squad_set(html: &mut String, set: &SquadSet, analysis: &Analysis) {
    let _ = write!(
        html,
        r#"<section class="squad-set"><h2>{} <small>{} × {}{}</small></h2>"#,
        escape(&set.plan.name),
        set.squads.len(),
        set.plan.size,
        if set.plan.exclusive { ", exclusive" } else { "" },
    );

    for (i, squad) in set.squads.iter().enumerate() {
        let _ = write!(
            html,
            r#"<div class="group-container"><div class="group-head"><h3>Squad {} <span class="nums">{}</span></h3><span class="hit-badge hidden"></span></div>"#,
            i + 1,
            join_padded(&squad.numbers),
        );
        html.push_str(
            "<table><thead><tr><th>No.</th><th>Score</th><th>Streak</th><th>Omission</th><th>Drag</th></tr></thead><tbody>",
        );
        for n in &squad.numbers {
            if let Some(stat) = analysis.scores.get(n) {
                render_stat_row(html, stat, *n == squad.seed);
            }
        }
        html.push_str("</tbody></table></div>");
    }

    html.push_str("</section>");
}

fn render_stat_row(html: &mut String, stat: &NumberStat, is_seed: bool) {
    let _ = write!(
        html,
        r#"<tr{}><td class="num-cell" data-val="{}">{:02}</td><td>{:.1}</td><td>{}</td><td>{}</td><td>{:.1}</td></tr>"#,
        if is_seed { r#" class="seed""# } else { "" },
        stat.number,
        stat.number,
        stat.score,
        stat.streak,
        stat.omission,
        stat.drag,
    );
}

fn render_ranking(html: &mut String, analysis: &Analysis) {
    html.push_str(r#"<section class="ranking"><h2>Top scores</h2><table><thead><tr><th>No.</th><th>Score</th><th>Base</th><th>Heat</th><th>Streak</th><th>Omission</th></tr></thead><tbody>"#);
    for stat in analysis.ranked().into_iter().take(RANKING_ROWS) {
        let _ = write!(
            html,
            "<tr><td>{:02}</td><td>{:.1}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            stat.number, stat.score, stat.base, stat.heat, stat.streak, stat.omission,
        );
    }
    html.push_str("</tbody></table></section>");
}

/// Minimal HTML escaping for text that comes from configuration.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
