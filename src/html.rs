//! Server-rendered HTML for the web front-end.

use std::fmt::Write as _;

use crate::view::{Align, Badge, DashboardView, MetricCard, Tone, TradeTable, COLUMNS, LOADING_MESSAGE};

const STYLES: &str = r#"
    body { margin: 0; min-height: 100vh; background: #f7fafc; font-family: system-ui, sans-serif; color: #1a202c; }
    .container { padding: 32px; }
    h1 { font-size: 1.6rem; margin: 0 0 24px; }
    h2 { font-size: 1.2rem; margin: 0 0 16px; }
    .grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 24px; margin-bottom: 32px; }
    .card { background: #fff; padding: 16px; border-radius: 8px; box-shadow: 0 4px 6px rgba(0,0,0,.1); }
    .label { font-size: .875rem; color: #718096; }
    .value { font-size: 1.5rem; font-weight: 700; }
    .caption { font-size: .875rem; color: #a0aec0; }
    .tone-positive { color: #48bb78; }
    .tone-negative { color: #f56565; }
    .badge { display: inline-block; padding: 0 6px; border-radius: 4px; font-size: .8rem; font-weight: 700; text-transform: uppercase; }
    .badge.tone-positive { background: #c6f6d5; color: #22543d; }
    .badge.tone-negative { background: #fed7d7; color: #822727; }
    .badge.tone-accent { background: #e9d8fd; color: #44337a; }
    .badge.tone-neutral { background: #edf2f7; color: #1a202c; }
    .panel { background: #fff; padding: 16px; border-radius: 8px; box-shadow: 0 4px 6px rgba(0,0,0,.1); overflow-x: auto; }
    table { width: 100%; border-collapse: collapse; }
    th, td { padding: 8px; }
    .left { text-align: left; }
    .right { text-align: right; }
    .empty { text-align: center; padding: 16px; }
    .center { display: flex; justify-content: center; align-items: center; min-height: 40vh; flex-direction: column; gap: 12px; }
    .spinner { width: 48px; height: 48px; border: 4px solid #e2e8f0; border-top-color: #3182ce; border-radius: 50%; animation: spin 1s linear infinite; }
    @keyframes spin { to { transform: rotate(360deg); } }
"#;

/// Reloads as soon as the server reports a state other than the rendered one.
/// The first message carries the current state, so a load that finished
/// before the socket connected still triggers a reload.
const LIVE_RELOAD: &str = r#"
    (function () {
        var rendered = document.body.dataset.state;
        var proto = location.protocol === 'https:' ? 'wss://' : 'ws://';
        var ws = new WebSocket(proto + location.host + '/ws');
        ws.onmessage = function (ev) {
            var next;
            try { next = JSON.parse(ev.data).state; } catch (e) { return; }
            if (next && next !== rendered) { location.reload(); }
        };
    })();
"#;

pub fn render_page(title: &str, view: &DashboardView) -> String {
    let mut body = String::new();
    let _ = write!(body, "<h1>{}</h1>", escape(title));

    match view {
        DashboardView::Loading => {
            let _ = write!(
                body,
                r#"<div class="center"><div class="spinner" role="status"></div><div>{LOADING_MESSAGE}</div></div>"#
            );
        }
        DashboardView::Failed { failure } => {
            let _ = write!(
                body,
                r#"<div class="center"><div class="value tone-negative">{}</div><div>{}</div><form method="post" action="/retry"><button type="submit">Retry</button></form></div>"#,
                escape(failure.kind.label()),
                escape(&failure.message)
            );
        }
        DashboardView::Loaded { summary, table } => {
            body.push_str(r#"<div class="grid">"#);
            for card in [&summary.balance, &summary.open_trades, &summary.daily_pnl] {
                push_card(&mut body, card);
            }
            let _ = write!(
                body,
                r#"<div class="card"><div class="label">Status</div>{}</div>"#,
                badge(&summary.running)
            );
            body.push_str("</div>");
            body.push_str(r#"<h2>Trade Log</h2><div class="panel">"#);
            push_table(&mut body, table);
            body.push_str("</div>");
        }
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLES}</style>
</head>
<body data-state="{state}">
<div class="container">{body}</div>
<script>{LIVE_RELOAD}</script>
</body>
</html>"#,
        title = escape(title),
        state = view.state_name(),
    )
}

fn push_card(out: &mut String, card: &MetricCard) {
    let _ = write!(
        out,
        r#"<div class="card"><div class="label">{}</div><div class="value {}">{}</div><div class="caption">{}</div></div>"#,
        card.label,
        tone_class(card.tone),
        escape(&card.value),
        card.caption
    );
}

fn push_table(out: &mut String, table: &TradeTable) {
    out.push_str("<table><thead><tr>");
    for col in COLUMNS {
        let _ = write!(out, r#"<th class="{}">{}</th>"#, align_class(col.align), col.title);
    }
    out.push_str("</tr></thead><tbody>");

    match table {
        TradeTable::Empty { message, colspan } => {
            let _ = write!(out, r#"<tr><td colspan="{colspan}" class="empty">{message}</td></tr>"#);
        }
        TradeTable::Rows { rows } => {
            for row in rows {
                out.push_str("<tr>");
                let cells = [
                    escape(&row.time),
                    badge(&row.pair),
                    escape(&row.price),
                    escape(&row.size),
                    escape(&row.volatility),
                    badge(&row.action),
                    escape(&row.stop_price),
                ];
                for (col, cell) in COLUMNS.iter().zip(cells) {
                    let _ = write!(out, r#"<td class="{}">{cell}</td>"#, align_class(col.align));
                }
                out.push_str("</tr>");
            }
        }
    }
    out.push_str("</tbody></table>");
}

fn badge(b: &Badge) -> String {
    format!(r#"<span class="badge {}">{}</span>"#, tone_class(b.tone), escape(&b.label))
}

fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "tone-positive",
        Tone::Negative => "tone-negative",
        Tone::Neutral => "tone-neutral",
        Tone::Accent => "tone-accent",
    }
}

fn align_class(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Right => "right",
    }
}

/// Minimal HTML text escaping for values that come from the status service.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
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
