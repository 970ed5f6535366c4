//! Table and text rendering

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use imshelf_core::display::{author_line, card_description, detail_cover, strip_html};
use imshelf_core::{CatalogRecord, Mode, SessionSnapshot, Suggestion};

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn summary_line(snapshot: &SessionSnapshot) -> String {
    let view = match snapshot.mode {
        Mode::Browse => "Popular books".to_string(),
        Mode::Search => format!("Results for \"{}\"", snapshot.query.trim()),
    };
    let more = if snapshot.has_more {
        "more available"
    } else {
        "end of results"
    };
    format!(
        "{}: {} books, page {} ({})",
        view,
        snapshot.results.len(),
        snapshot.page + 1,
        more
    )
}

pub fn results_table(snapshot: &SessionSnapshot) -> Table {
    let mut table = table();
    table.set_header(vec!["#", "ID", "Title", "Authors", "Description"]);
    for (i, record) in snapshot.results.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            record.id.clone(),
            record.title.clone(),
            author_line(record),
            card_description(record),
        ]);
    }
    table
}

pub fn suggestion_table(suggestions: &[Suggestion]) -> Table {
    let mut table = table();
    table.set_header(vec!["Title", "ID"]);
    for suggestion in suggestions {
        table.add_row(vec![suggestion.title.clone(), suggestion.id.clone()]);
    }
    table
}

pub fn detail_view(record: &CatalogRecord) -> Table {
    let mut table = table();
    let mut title = record.title.clone();
    if let Some(subtitle) = &record.subtitle {
        title = format!("{}: {}", title, subtitle);
    }

    let mut rows: Vec<(&str, String)> = vec![
        ("Title", title),
        ("Authors", author_line(record)),
    ];
    let optional = [
        ("Publisher", record.publisher.clone()),
        ("Published", record.published_date.clone()),
        ("Pages", record.page_count.map(|p| p.to_string())),
        ("Language", record.language.clone()),
        ("ISBN", record.isbn().map(str::to_string)),
        ("Categories", record.categories.as_ref().map(|c| c.join(", "))),
        (
            "Rating",
            record.average_rating.map(|avg| match record.ratings_count {
                Some(count) => format!("{:.1} ({} ratings)", avg, count),
                None => format!("{:.1}", avg),
            }),
        ),
        ("Cover", detail_cover(&record.image_links)),
        ("Preview", record.preview_link.clone()),
    ];
    rows.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| (label, v))),
    );
    rows.push(("Description", strip_html(&record.description).trim().to_string()));

    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    table
}
