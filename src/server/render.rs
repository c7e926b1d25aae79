//! HTML for the site pages. Every piece of dataset text goes through [`escape_html`].

use std::fmt::Write;

use crate::data::country::{CountryRecord, EnrichedHoliday};
use crate::data::transform::{group_by_year, matches_name, search_needle, sort_holidays_by_date};

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 2rem auto; padding: 0 1rem; }
    nav a { margin-right: 1rem; }
    ul.plain { list-style: none; padding: 0; }
    ul.plain li { padding: 0.6rem 0; border-bottom: 1px solid #eee; }
    .meta { opacity: 0.85; }
    .card { border: 1px solid #e5e5e5; border-radius: 8px; padding: 16px; margin: 1.25rem 0; }
    .card h2 { margin: 0; }
    label { display: block; font-weight: 600; margin-bottom: 6px; }
    input[type=search] { width: 100%; padding: 0.6rem 0.75rem; border-radius: 8px; border: 1px solid #ccc; box-sizing: border-box; }
"#;

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
  <nav><a href="/">Home</a><a href="/countries">Countries</a><a href="/holidays">All holidays</a></nav>
  <main>
{body}
  </main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// `/`: every country with its holidays. Expects countries already in display order.
pub fn home_page(countries: &[CountryRecord]) -> String {
    let mut body = String::from("    <h1>Countries &amp; Holidays</h1>\n");
    for country in countries {
        let _ = writeln!(
            body,
            r#"    <section class="card"><h2>{} <small>({})</small></h2>"#,
            escape_html(&country.name),
            escape_html(&country.code)
        );
        if country.holidays.is_empty() {
            body.push_str("      <p class=\"meta\">No holidays listed.</p>\n");
        } else {
            body.push_str("      <ul class=\"plain\">\n");
            for holiday in &country.holidays {
                let _ = writeln!(
                    body,
                    r#"        <li><a href="/countries/{}" aria-label="Details {}"><strong>{}</strong> • {} • {}</a></li>"#,
                    country.id,
                    escape_html(&country.name),
                    escape_html(&holiday.name),
                    escape_html(&holiday.date.label()),
                    escape_html(&holiday.kind)
                );
            }
            body.push_str("      </ul>\n");
        }
        body.push_str("    </section>\n");
    }
    layout("Holiday Planner • Home", &body)
}

/// `/countries`: name and code of every country, linking to the detail pages.
pub fn country_index_page(countries: &[CountryRecord]) -> String {
    let mut body = String::from("    <h1>Countries</h1>\n");
    if countries.is_empty() {
        body.push_str("    <p>No countries found.</p>\n");
    } else {
        body.push_str("    <ul class=\"plain\">\n");
        for country in countries {
            let _ = writeln!(
                body,
                r#"      <li><a href="/countries/{}">{}</a> <span class="meta">({})</span></li>"#,
                country.id,
                escape_html(&country.name),
                escape_html(&country.code)
            );
        }
        body.push_str("    </ul>\n");
    }
    layout("Countries", &body)
}

/// `/countries/{id}`: holidays in date order, sectioned per year.
pub fn country_detail_page(country: &CountryRecord) -> String {
    let mut body = format!(
        "    <h1>{} <small>({})</small></h1>\n",
        escape_html(&country.name),
        escape_html(&country.code)
    );
    let holidays = sort_holidays_by_date(&country.holidays);
    if holidays.is_empty() {
        body.push_str("    <p>No holidays found.</p>\n");
    }
    for (year, holidays) in group_by_year(&holidays) {
        let _ = writeln!(body, "    <h2>{year}</h2>\n    <ul class=\"plain\">");
        for holiday in holidays {
            let _ = writeln!(
                body,
                r#"      <li><div><strong>{}</strong></div><div class="meta">{} • {} • {}</div></li>"#,
                escape_html(&holiday.name),
                escape_html(&holiday.date.label()),
                escape_html(&holiday.kind),
                holiday.year
            );
        }
        body.push_str("    </ul>\n");
    }
    let title = format!("{} ({})", country.name, country.code);
    layout(&title, &body)
}

/// `/holidays/{year}`: expects the already date-ordered cross-country list.
pub fn holidays_by_year_page(year: i32, holidays: &[EnrichedHoliday]) -> String {
    let mut body = format!("    <h1>Holidays in {year}</h1>\n");
    if holidays.is_empty() {
        body.push_str("    <p>No holidays found.</p>\n");
    } else {
        body.push_str("    <ul class=\"plain\">\n");
        for entry in holidays {
            let _ = writeln!(
                body,
                r#"      <li><div><strong>{}</strong></div><div class="meta">{} ({}) • {} • {}</div></li>"#,
                escape_html(&entry.holiday.name),
                escape_html(&entry.country_name),
                escape_html(&entry.country_code),
                escape_html(&entry.holiday.date.label()),
                escape_html(&entry.holiday.kind)
            );
        }
        body.push_str("    </ul>\n");
    }
    layout(&format!("Holidays {year}"), &body)
}

/// `/holidays`: the whole name-ordered list. Entries not matching `query` are
/// rendered hidden so the inline script can bring them back without a refetch.
pub fn all_holidays_page(holidays: &[EnrichedHoliday], years: &[i32], query: &str) -> String {
    let needle = search_needle(query);
    let shown = holidays
        .iter()
        .filter(|entry| matches_name(entry, &needle))
        .count();

    let mut body = String::from("    <h1>All Holidays</h1>\n");
    if !years.is_empty() {
        body.push_str("    <p>By year:");
        for year in years {
            let _ = write!(body, r#" <a href="/holidays/{year}">{year}</a>"#);
        }
        body.push_str("</p>\n");
    }
    let _ = writeln!(
        body,
        r#"    <form method="get" action="/holidays">
      <label for="q">Search by holiday name</label>
      <input id="q" name="q" type="search" placeholder="e.g. Independence, Armistice…" value="{}" aria-describedby="count" />
      <div id="count" class="meta">Showing <strong id="shown">{shown}</strong> of {total}</div>
    </form>"#,
        escape_html(query),
        total = holidays.len()
    );
    let _ = writeln!(
        body,
        r#"    <p id="no-match"{}>No holidays match your search.</p>"#,
        if shown == 0 { "" } else { " hidden" }
    );
    body.push_str("    <ul id=\"holiday-list\" class=\"plain\">\n");
    for entry in holidays {
        let hidden = if matches_name(entry, &needle) { "" } else { " hidden" };
        let _ = writeln!(
            body,
            r#"      <li data-name="{}"{hidden}><strong>{}</strong> — {} ({})</li>"#,
            escape_html(&entry.holiday.name.to_lowercase()),
            escape_html(&entry.holiday.name),
            escape_html(&entry.country_name),
            escape_html(&entry.country_code)
        );
    }
    body.push_str("    </ul>\n");
    body.push_str(SEARCH_SCRIPT);
    layout("All Holidays", &body)
}

const SEARCH_SCRIPT: &str = r#"    <script>
      const input = document.getElementById('q');
      const items = Array.from(document.querySelectorAll('#holiday-list li'));
      const shown = document.getElementById('shown');
      const noMatch = document.getElementById('no-match');
      function applyFilter() {
        const needle = input.value.trim().toLowerCase();
        let count = 0;
        for (const item of items) {
          const match = !needle || item.dataset.name.includes(needle);
          item.hidden = !match;
          if (match) count++;
        }
        shown.textContent = count;
        noMatch.hidden = count !== 0;
      }
      input.addEventListener('input', applyFilter);
    </script>
"#;

pub fn not_found_page() -> String {
    layout(
        "Not found",
        "    <h1>404 - Page not found</h1>\n    <p>There is nothing at this address.</p>\n",
    )
}

pub fn error_page() -> String {
    layout(
        "Something went wrong",
        "    <h1>500 - Failed to load data</h1>\n    <p>The holiday dataset could not be loaded. Please try again later.</p>\n",
    )
}
