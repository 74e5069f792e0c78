//! HTML rendering of the status table.

use crate::{
    Result,
    args::{MacroArgs, Options},
    datefmt::{format_datetime, format_iso8601, pretty_timedelta},
    host::MacroContext,
    revision::{PageRevision, RevisionQuery},
};
use core::fmt::Write as _;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};


/// The column headers of the table.
pub const HEADERS: [&str; 5] = ["Page", "Last modified", "Version", "Author", "Comment"];

/// Queries the current revisions selected by the arguments and renders them
/// as a table.
pub fn render_table(out: &mut String, ctx: &MacroContext<'_>, args: &MacroArgs) -> Result {
    let query = RevisionQuery::new(args.patterns.iter().map(String::as_str), args.options.order);
    let rows = ctx.store.current_revisions(&query)?;

    write!(
        out,
        r#"<table class="wikistatuslist" bgcolor="{}"><thead><tr>"#,
        attr(&args.options.bgcolor)
    )?;
    for header in HEADERS {
        write!(out, "<th>{header}</th>")?;
    }
    write!(out, "</tr></thead><tbody>")?;
    for row in &rows {
        render_row(out, ctx, &args.options, row)?;
    }
    write!(out, "</tbody></table>")?;
    Ok(())
}

/// Renders a single table row.
pub fn render_row(
    out: &mut String,
    ctx: &MacroContext<'_>,
    options: &Options,
    row: &PageRevision,
) -> Result {
    let href = ctx.href;
    let name = row.name.as_str();
    let version = row.version;

    write!(
        out,
        r#"<tr><td class="name"><a href="{}">{}</a></td>"#,
        attr(&href.wiki(name)),
        text(options.pagename.label(name))
    )?;

    let time = row.time.to_offset(ctx.tz);
    write!(
        out,
        r#"<td class="time">{} (<a href="{}">{}</a> ago)</td>"#,
        text(&format_datetime(&time, &options.date_format)?),
        attr(&href.timeline_from(&format_iso8601(&time)?)),
        pretty_timedelta(row.time, ctx.now)
    )?;

    write!(
        out,
        r#"<td class="version"><a href="{}">{version}</a> [<a href="{}" title="diff">d</a>|<a href="{}" title="history">h</a>]</td>"#,
        attr(&href.wiki_version(name, version)),
        attr(&href.wiki_diff(name, version)),
        attr(&href.wiki_history(name))
    )?;

    write!(
        out,
        r#"<td class="author">{}</td><td class="comment">{}</td></tr>"#,
        text(&row.author),
        text(&row.comment)
    )?;

    Ok(())
}
