use chrono::NaiveDate;

use crate::document::{DATE_FORMAT, DayBlock, DayKind, Row};

const TABLE_HEADER: &str = "| Player | Decks Used | Fame |\n|--------|------------|------|";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub tag: String,
    pub name: String,
    pub decks: u32,
    pub max_decks: u32,
    pub fame: u32,
}

/// Decks desc, fame desc, case-insensitive name asc, then tag.
pub fn sort_tallies(tallies: &mut [Tally]) {
    tallies.sort_by(|a, b| {
        b.decks
            .cmp(&a.decks)
            .then_with(|| b.fame.cmp(&a.fame))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.tag.cmp(&b.tag))
    });
}

/// Renders one collapsible day-block.
///
/// `date` is the date carried in the title. For the training block that is the
/// day the span opened, so `updated` is shown inside the block when it differs.
#[must_use]
pub fn render(kind: DayKind, date: NaiveDate, updated: NaiveDate, mut tallies: Vec<Tally>) -> DayBlock {
    sort_tallies(&mut tallies);

    let mut text = String::new();
    text.push_str("<details>\n");
    text.push_str(&format!("<summary>{}</summary>\n\n", kind.summary_title(date)));
    text.push_str(TABLE_HEADER);
    text.push('\n');
    for t in &tallies {
        text.push_str(&format!(
            "| {} | {}/{} | {} |\n",
            escape_cell(&t.name),
            t.decks,
            t.max_decks,
            t.fame
        ));
    }
    if kind == DayKind::Training && updated != date {
        text.push_str(&format!(
            "\n_Last updated: {}_\n",
            updated.format(DATE_FORMAT)
        ));
    }
    text.push_str("\n</details>");

    let rows = tallies
        .into_iter()
        .map(|t| Row {
            name: t.name,
            decks: t.decks,
            max_decks: t.max_decks,
            fame: t.fame,
        })
        .collect();

    DayBlock::new(kind, date, rows, text)
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).expect("valid test date")
    }

    fn tally(tag: &str, name: &str, decks: u32, fame: u32) -> Tally {
        Tally {
            tag: tag.to_owned(),
            name: name.to_owned(),
            decks,
            max_decks: 4,
            fame,
        }
    }

    fn names(block: &DayBlock) -> Vec<&str> {
        block.rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn sorts_by_decks_then_fame_then_name() {
        let d = date("2024-05-01");
        let block = render(
            DayKind::Battle(2),
            d,
            d,
            vec![
                tally("#A", "A", 2, 50),
                tally("#C", "C", 3, 10),
                tally("#B", "B", 3, 10),
            ],
        );
        assert_eq!(names(&block), vec!["B", "C", "A"]);
    }

    #[test]
    fn name_tiebreak_ignores_case_and_tag_breaks_exact_ties() {
        let mut tallies = vec![
            tally("#2", "bob", 1, 1),
            tally("#9", "Alice", 1, 1),
            tally("#1", "bob", 1, 1),
        ];
        sort_tallies(&mut tallies);
        let order = tallies
            .iter()
            .map(|t| (t.name.as_str(), t.tag.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(order, vec![("Alice", "#9"), ("bob", "#1"), ("bob", "#2")]);
    }

    #[test]
    fn renders_the_table_layout() {
        let d = date("2024-05-01");
        let block = render(DayKind::Battle(2), d, d, vec![tally("#A", "Alice", 3, 700)]);
        assert_eq!(
            block.text(),
            "<details>\n<summary>⚔️ Battle Day 5 — 2024-05-01</summary>\n\n| Player | Decks Used | Fame |\n|--------|------------|------|\n| Alice | 3/4 | 700 |\n\n</details>"
        );
    }

    #[test]
    fn training_block_shows_last_update_only_after_its_first_day() {
        let opened = date("2024-05-01");
        let first = render(DayKind::Training, opened, opened, Vec::new());
        assert!(!first.text().contains("Last updated"));

        let later = render(DayKind::Training, opened, date("2024-05-02"), Vec::new());
        assert!(later.text().contains("Training Days (1–3) — 2024-05-01"));
        assert!(later.text().contains("_Last updated: 2024-05-02_"));
    }

    #[test]
    fn rendered_blocks_parse_back() {
        let d = date("2024-05-03");
        let block = render(
            DayKind::Colosseum(3),
            d,
            d,
            vec![tally("#A", "Pipe|Name", 2, 10)],
        );
        let text = format!("# Season 9\n\n## Colosseum Week\n\n{}\n", block.text());
        let doc = Document::parse(&text);

        let parsed = &doc.seasons[0].weeks[0].days[0];
        assert_eq!(parsed.kind, DayKind::Colosseum(3));
        assert_eq!(parsed.date, d);
        assert_eq!(parsed.rows, block.rows);
    }
}
