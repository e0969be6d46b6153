//! HTML report fragment
//!
//! The output is a single `<div class="broken_link_finder_report">` meant to be
//! embedded in a page. Every link is clickable; relative broken links point at
//! their absolute form.

use crate::finder::{ReportMap, SortMode};
use crate::report::{LinkReport, ReportOptions, NUM_VALUES};
use html_escape::{encode_double_quoted_attribute, encode_text};

#[derive(Clone, Copy)]
enum Section {
    Broken,
    Ignored,
}

impl Section {
    fn name(self) -> &'static str {
        match self {
            Self::Broken => "broken_links",
            Self::Ignored => "ignored_links",
        }
    }
}

/// Formats a report as an HTML fragment
pub fn format_html_report(report: &LinkReport, options: &ReportOptions) -> String {
    let mut out = String::new();

    out.push_str("<div class=\"broken_link_finder_report\">\n");
    push_crawl_summary(&mut out, report);
    push_broken_links(&mut out, report, options.broken_verbose);
    push_ignored_links(&mut out, report, options.ignored_verbose);
    out.push_str("</div>\n");

    out
}

fn anchor(report: &LinkReport, value: &str, class: Option<&str>) -> String {
    let href = encode_double_quoted_attribute(report.build_url(value));
    let text = encode_text(value);

    match class {
        Some(class) => format!("<a class=\"{}\" href=\"{}\">{}</a>", class, href, text),
        None => format!("<a href=\"{}\">{}</a>", href, text),
    }
}

fn push_crawl_summary(out: &mut String, report: &LinkReport) {
    out.push_str(&format!(
        "<p class=\"crawl_summary\">Crawled {}<br />{} page(s) containing {} unique link(s) in {} seconds</p>\n",
        anchor(report, &report.stats.url, None),
        report.stats.num_pages,
        report.stats.num_links,
        report.stats.duration_secs()
    ));
}

fn push_broken_links(out: &mut String, report: &LinkReport, verbose: bool) {
    out.push_str("<div class=\"broken_links\">\n");

    if report.broken_links.is_empty() {
        push_summary(out, Section::Broken, "Good news, there are no broken links!");
    } else {
        let (num_pages, num_links) = report.hash_stats(&report.broken_links);
        push_summary(
            out,
            Section::Broken,
            &format!(
                "Found {} unique broken link(s) across {} page(s):",
                num_links, num_pages
            ),
        );
        push_groups(out, report, &report.broken_links, Section::Broken, verbose);
    }

    out.push_str("</div>\n");
}

fn push_ignored_links(out: &mut String, report: &LinkReport, verbose: bool) {
    out.push_str("<div class=\"ignored_links\">\n");

    if !report.ignored_links.is_empty() {
        let (num_pages, num_links) = report.hash_stats(&report.ignored_links);
        push_summary(
            out,
            Section::Ignored,
            &format!(
                "Ignored {} unique unsupported link(s) across {} page(s), which you should check manually:",
                num_links, num_pages
            ),
        );
        push_groups(out, report, &report.ignored_links, Section::Ignored, verbose);
    }

    out.push_str("</div>\n");
}

fn push_summary(out: &mut String, section: Section, text: &str) {
    out.push_str(&format!(
        "<p class=\"{}_summary\">{}</p>\n",
        section.name(),
        text
    ));
}

fn push_groups(
    out: &mut String,
    report: &LinkReport,
    map: &ReportMap,
    section: Section,
    verbose: bool,
) {
    let item_class = format!("{}_group_item", section.name());

    for (key, values) in map {
        let a_element = anchor(report, key, None);
        let heading = match (section, report.sort) {
            (Section::Broken, SortMode::Page) => {
                format!("The following broken links were found on '{}':", a_element)
            }
            (Section::Broken, SortMode::Link) => format!(
                "The broken link '{}' was found on the following pages:",
                a_element
            ),
            (Section::Ignored, SortMode::Page) => {
                format!("The following links were ignored on '{}':", a_element)
            }
            (Section::Ignored, SortMode::Link) => format!(
                "The link '{}' was ignored on the following pages:",
                a_element
            ),
        };

        out.push_str(&format!("<p class=\"{}_group\">\n", section.name()));
        out.push_str(&heading);
        out.push_str("<br />\n");

        let shown = if verbose { values.len() } else { NUM_VALUES };
        for value in values.iter().take(shown) {
            out.push_str(&anchor(report, value, Some(&item_class)));
            out.push_str("<br />\n");
        }

        if values.len() > shown {
            let objects = match report.sort {
                SortMode::Page => "link(s)",
                SortMode::Link => "page(s)",
            };
            let hint = match section {
                Section::Broken => "remove --concise to see them all",
                Section::Ignored => "use --show-ignored to see them all",
            };
            out.push_str(&format!(
                "+ {} other {}, {}<br />\n",
                values.len() - shown,
                objects,
                hint
            ));
        }

        out.push_str("</p>\n");
    }
}
