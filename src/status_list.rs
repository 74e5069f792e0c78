//! The `WikiStatusList` macro.

use crate::{
    Result,
    args::MacroArgs,
    host::{Chrome, MacroContext, RequestFilter, StaticFile, TemplateProvider, WikiMacro},
    render::render_table,
};
use std::time::Instant;

/// The static asset directory prefix for this component.
pub const HTDOCS_PREFIX: &str = "wikistatuslist";

/// The stylesheet added to every response, relative to the static asset root.
pub const STYLESHEET: &str = "wikistatuslist/style.css";

/// The files in the static asset directory.
static HTDOCS: &[StaticFile] = &[StaticFile {
    path: "style.css",
    data: include_bytes!("../htdocs/style.css"),
}];

/// Renders a table of the current revision of a set of wiki pages.
#[derive(Clone, Copy, Debug, Default)]
pub struct WikiStatusList;

impl WikiMacro for WikiStatusList {
    fn name(&self) -> &'static str {
        "WikiStatusList"
    }

    fn description(&self) -> &'static str {
        "Lists the last modification of wiki pages.

Arguments are comma-separated. Arguments without `=` are page name patterns,
where `*` matches anything; with no patterns, every page is listed.

 order=reverse:: list the oldest changes first
 date_format=...:: `strftime` format of the modification time (default `%Y-%m-%d %H:%M:%S`),
   or one of `iso8601`, `iso8601date` and `iso8601time`
 pagename=short:: show only the last path segment of each page name
 bgcolor=...:: background colour of the table (default `#F0F0F0`)

Example:
{{{
[[WikiStatusList(Docs/*, Release*, order=reverse, pagename=short)]]
}}}"
    }

    fn expand(&self, ctx: &MacroContext<'_>, content: Option<&str>) -> Result<String> {
        let time = Instant::now();
        let args = MacroArgs::parse(content)?;
        log::debug!(
            "Expanding {} for {:?} with {:?}",
            self.name(),
            args.patterns,
            args.options
        );

        let mut out = String::new();
        render_table(&mut out, ctx, &args)?;

        log::trace!("Rendered {} in {:.2?}", self.name(), time.elapsed());
        Ok(out)
    }
}

impl RequestFilter for WikiStatusList {
    // This adds the stylesheet to every page, not only pages which use the
    // macro
    fn post_process_request(&self, chrome: &mut Chrome) {
        chrome.add_stylesheet(STYLESHEET);
    }
}

impl TemplateProvider for WikiStatusList {
    fn htdocs_dirs(&self) -> Vec<(&'static str, &'static [StaticFile])> {
        vec![(HTDOCS_PREFIX, HTDOCS)]
    }
}
