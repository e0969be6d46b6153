use crate::finder::{ReportMap, SortMode};
use crate::report::{LinkReport, ReportOptions, NUM_VALUES};

/// Formats a report as plain text
pub fn format_text_report(report: &LinkReport, options: &ReportOptions) -> String {
    let mut out = String::new();

    push_crawl_summary(&mut out, report);
    push_broken_links(&mut out, report, options.broken_verbose);
    push_ignored_links(&mut out, report, options.ignored_verbose);

    out
}

fn push_crawl_summary(out: &mut String, report: &LinkReport) {
    out.push_str(&format!(
        "Crawled {} ({} page(s) in {} seconds)\n\n",
        report.stats.url,
        report.stats.num_pages,
        report.stats.duration_secs()
    ));
}

fn push_broken_links(out: &mut String, report: &LinkReport, verbose: bool) {
    if report.broken_links.is_empty() {
        out.push_str("Good news, there are no broken links!\n");
        return;
    }

    let (num_pages, num_links) = report.hash_stats(&report.broken_links);
    out.push_str(&format!(
        "Found {} unique broken link(s) across {} page(s):\n",
        num_links, num_pages
    ));

    push_groups(
        out,
        report.sort,
        &report.broken_links,
        verbose,
        |sort, key| match sort {
            SortMode::Page => format!("The following broken links were found on '{}':", key),
            SortMode::Link => format!("The broken link '{}' was found on the following pages:", key),
        },
        "remove --concise to see them all",
    );
}

fn push_ignored_links(out: &mut String, report: &LinkReport, verbose: bool) {
    if report.ignored_links.is_empty() {
        return;
    }

    let (num_pages, num_links) = report.hash_stats(&report.ignored_links);
    out.push_str(&format!(
        "\nIgnored {} unique unsupported link(s) across {} page(s), which you should check manually:\n",
        num_links, num_pages
    ));

    push_groups(
        out,
        report.sort,
        &report.ignored_links,
        verbose,
        |sort, key| match sort {
            SortMode::Page => format!("The following links were ignored on '{}':", key),
            SortMode::Link => format!("The link '{}' was ignored on the following pages:", key),
        },
        "use --show-ignored to see them all",
    );
}

fn push_groups(
    out: &mut String,
    sort: SortMode,
    map: &ReportMap,
    verbose: bool,
    heading: impl Fn(SortMode, &str) -> String,
    hint: &str,
) {
    for (key, values) in map {
        out.push('\n');
        out.push_str(&heading(sort, key));
        out.push('\n');

        if verbose || values.len() <= NUM_VALUES {
            for value in values {
                out.push_str(value);
                out.push('\n');
            }
        } else {
            for value in values.iter().take(NUM_VALUES) {
                out.push_str(value);
                out.push('\n');
            }

            let objects = match sort {
                SortMode::Page => "link(s)",
                SortMode::Link => "page(s)",
            };
            out.push_str(&format!(
                "+ {} other {}, {}\n",
                values.len() - NUM_VALUES,
                objects,
                hint
            ));
        }
    }
}
