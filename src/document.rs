use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Battle or colosseum days per week, on cycle days 4–7.
pub const BATTLE_DAYS: u8 = 4;

const TRAINING_LABEL: &str = "Training Days (1–3)";
const TRAINING_EMOJI: &str = "🎯";
const BATTLE_EMOJI: &str = "⚔️";
const COLOSSEUM_EMOJI: &str = "🏟️";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekKind {
    Numbered(u32),
    Colosseum,
}

impl WeekKind {
    pub fn header(&self) -> String {
        match self {
            Self::Numbered(n) => format!("## Week {n}"),
            Self::Colosseum => "## Colosseum Week".to_owned(),
        }
    }

    pub fn accepts(&self, day: DayKind) -> bool {
        match (self, day) {
            (_, DayKind::Training) => true,
            (Self::Numbered(_), DayKind::Battle(_)) => true,
            (Self::Colosseum, DayKind::Colosseum(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for WeekKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numbered(n) => write!(f, "Week {n}"),
            Self::Colosseum => f.write_str("Colosseum Week"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayKind {
    Training,
    Battle(u8),
    Colosseum(u8),
}

impl DayKind {
    pub fn battle_index(&self) -> Option<u8> {
        match self {
            Self::Training => None,
            Self::Battle(n) | Self::Colosseum(n) => Some(*n),
        }
    }

    /// 1-based position in the 7-day cycle of the first day this block covers.
    pub fn cycle_day(&self) -> u8 {
        match self.battle_index() {
            Some(n) => 3 + n,
            None => 1,
        }
    }

    /// Battle titles carry the cycle day (4–7), not the battle index.
    pub fn summary_title(&self, date: NaiveDate) -> String {
        let date = date.format(DATE_FORMAT);
        let day = self.cycle_day();
        match self {
            Self::Training => format!("{TRAINING_EMOJI} {TRAINING_LABEL} — {date}"),
            Self::Battle(_) => format!("{BATTLE_EMOJI} Battle Day {day} — {date}"),
            Self::Colosseum(_) => format!("{COLOSSEUM_EMOJI} Battle Day {day} — {date}"),
        }
    }

    // Battle days first (newest on top), training last.
    fn display_rank(&self) -> u8 {
        self.battle_index().unwrap_or(0)
    }
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Training => f.write_str("Training"),
            Self::Battle(_) => write!(f, "Battle Day {}", self.cycle_day()),
            Self::Colosseum(_) => write!(f, "Colosseum Battle Day {}", self.cycle_day()),
        }
    }
}

pub fn parse_summary_title(title: &str) -> Option<(DayKind, NaiveDate)> {
    let (label, date) = title
        .rsplit_once('—')
        .or_else(|| title.rsplit_once(" - "))?;
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;

    let start = label
        .char_indices()
        .find(|(_, ch)| ch.is_ascii_alphanumeric())
        .map(|(idx, _)| idx)?;
    let colosseum = label[..start].contains('🏟');
    let label = label[start..].trim();

    if strip_prefix_ci(label, "training days").is_some() {
        return Some((DayKind::Training, date));
    }
    let index = parse_battle_index(strip_prefix_ci(label, "battle day")?)?;
    let kind = if colosseum {
        DayKind::Colosseum(index)
    } else {
        DayKind::Battle(index)
    };
    Some((kind, date))
}

fn parse_battle_index(rest: &str) -> Option<u8> {
    let day: u8 = rest.trim().parse().ok()?;
    (4..4 + BATTLE_DAYS).contains(&day).then(|| day - 3)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    pub decks: u32,
    pub max_decks: u32,
    pub fame: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBlock {
    pub kind: DayKind,
    pub date: NaiveDate,
    pub rows: Vec<Row>,
    text: String,
}

impl DayBlock {
    pub(crate) fn new(kind: DayKind, date: NaiveDate, rows: Vec<Row>, text: String) -> Self {
        Self {
            kind,
            date,
            rows,
            text,
        }
    }

    /// The block exactly as it appears in the document, `<details>` to `</details>`.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn parse(text: String) -> Option<Self> {
        let title = extract_summary(&text)?;
        let (kind, date) = parse_summary_title(title)?;
        let rows = text.lines().filter_map(parse_table_row).collect();
        Some(Self::new(kind, date, rows, text))
    }
}

fn extract_summary(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    let open = lower.find("<summary>")? + "<summary>".len();
    let close = open + lower[open..].find("</summary>")?;
    Some(text[open..close].trim())
}

fn parse_table_row(line: &str) -> Option<Row> {
    let inner = line.trim().strip_prefix('|')?.strip_suffix('|')?;
    let mut cells = inner.rsplitn(3, '|');
    let fame = cells.next()?.trim();
    let decks = cells.next()?.trim();
    let name = cells.next()?.trim();

    let (used, max) = decks.split_once('/')?;
    Some(Row {
        name: name.replace("\\|", "|"),
        decks: used.trim().parse().ok()?,
        max_decks: max.trim().parse().ok()?,
        fame: fame.parse().ok()?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    pub kind: WeekKind,
    pub days: Vec<DayBlock>,
    pub notes: Vec<String>,
}

impl Week {
    pub fn new(kind: WeekKind) -> Self {
        Self {
            kind,
            days: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn day(&self, kind: DayKind) -> Option<&DayBlock> {
        self.days.iter().find(|d| d.kind == kind)
    }

    pub fn training(&self) -> Option<&DayBlock> {
        self.day(DayKind::Training)
    }

    pub(crate) fn sort_days(&mut self) {
        self.days
            .sort_by(|a, b| b.kind.display_rank().cmp(&a.kind.display_rank()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub number: u32,
    pub weeks: Vec<Week>,
    pub notes: Vec<String>,
}

impl Season {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            weeks: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn top_week(&self) -> Option<&Week> {
        self.weeks.iter().max_by_key(|w| w.kind)
    }

    pub fn week(&self, kind: WeekKind) -> Option<&Week> {
        self.weeks.iter().find(|w| w.kind == kind)
    }

    pub(crate) fn week_mut(&mut self, kind: WeekKind) -> &mut Week {
        let idx = match self.weeks.iter().position(|w| w.kind == kind) {
            Some(idx) => idx,
            None => {
                self.weeks.push(Week::new(kind));
                self.weeks.len() - 1
            }
        };
        &mut self.weeks[idx]
    }

    pub(crate) fn sort_weeks(&mut self) {
        self.weeks.sort_by(|a, b| b.kind.cmp(&a.kind));
        for week in &mut self.weeks {
            week.sort_days();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub preamble: Vec<String>,
    pub seasons: Vec<Season>,
    /// Content that could not be placed in any season; written last.
    pub trailing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("season {0} appears more than once")]
    DuplicateSeason(u32),
    #[error("seasons are not in descending order ({upper} above {lower})")]
    SeasonOrder { upper: u32, lower: u32 },
    #[error("season {season}: {week} appears more than once")]
    DuplicateWeek { season: u32, week: WeekKind },
    #[error("season {season}: weeks are out of order ({upper} above {lower})")]
    WeekOrder {
        season: u32,
        upper: WeekKind,
        lower: WeekKind,
    },
    #[error("season {season}, {week}: {day} appears more than once")]
    DuplicateDay {
        season: u32,
        week: WeekKind,
        day: DayKind,
    },
    #[error("season {season}, {week}: {upper} sits above {lower}")]
    DayOrder {
        season: u32,
        week: WeekKind,
        upper: DayKind,
        lower: DayKind,
    },
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let doc = fold(tokenize(text));
        if doc.seasons.is_empty() && !doc.trailing.is_empty() {
            tracing::warn!(
                chunks = doc.trailing.len(),
                "war log has no season header; keeping its content as trailing text"
            );
        }
        doc
    }

    pub fn is_empty(&self) -> bool {
        self.preamble.is_empty() && self.seasons.is_empty() && self.trailing.is_empty()
    }

    pub fn top_season(&self) -> Option<&Season> {
        self.seasons.iter().max_by_key(|s| s.number)
    }

    pub fn season(&self, number: u32) -> Option<&Season> {
        self.seasons.iter().find(|s| s.number == number)
    }

    pub(crate) fn season_mut(&mut self, number: u32) -> &mut Season {
        let idx = match self.seasons.iter().position(|s| s.number == number) {
            Some(idx) => idx,
            None => {
                self.seasons.push(Season::new(number));
                self.seasons.len() - 1
            }
        };
        &mut self.seasons[idx]
    }

    pub(crate) fn sort(&mut self) {
        self.seasons.sort_by(|a, b| b.number.cmp(&a.number));
        for season in &mut self.seasons {
            season.sort_weeks();
        }
    }

    pub fn to_markdown(&self) -> String {
        let mut units: Vec<String> = Vec::new();
        units.extend(self.preamble.iter().cloned());
        for season in &self.seasons {
            units.push(format!("# Season {}", season.number));
            units.extend(season.notes.iter().cloned());
            for week in &season.weeks {
                units.push(week.kind.header());
                units.extend(week.days.iter().map(|d| d.text.clone()));
                units.extend(week.notes.iter().cloned());
            }
        }
        units.extend(self.trailing.iter().cloned());

        if units.is_empty() {
            return String::new();
        }
        let mut out = units.join("\n\n");
        out.push('\n');
        out
    }

    /// Checks the ordering and uniqueness rules every written document obeys.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for pair in self.seasons.windows(2) {
            let (upper, lower) = (pair[0].number, pair[1].number);
            if upper == lower {
                return Err(InvariantViolation::DuplicateSeason(upper));
            }
            if upper < lower {
                return Err(InvariantViolation::SeasonOrder { upper, lower });
            }
        }

        for season in &self.seasons {
            for pair in season.weeks.windows(2) {
                let (upper, lower) = (pair[0].kind, pair[1].kind);
                if upper == lower {
                    return Err(InvariantViolation::DuplicateWeek {
                        season: season.number,
                        week: upper,
                    });
                }
                if upper < lower {
                    return Err(InvariantViolation::WeekOrder {
                        season: season.number,
                        upper,
                        lower,
                    });
                }
            }

            for week in &season.weeks {
                for pair in week.days.windows(2) {
                    let (upper, lower) = (pair[0].kind, pair[1].kind);
                    if upper.display_rank() == lower.display_rank() {
                        return Err(InvariantViolation::DuplicateDay {
                            season: season.number,
                            week: week.kind,
                            day: upper,
                        });
                    }
                    if upper.display_rank() < lower.display_rank() {
                        return Err(InvariantViolation::DayOrder {
                            season: season.number,
                            week: week.kind,
                            upper,
                            lower,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Season(u32),
    Week { kind: WeekKind, line: String },
    Day(DayBlock),
    Opaque(String),
}

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chunk: Vec<&str> = Vec::new();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush_chunk(&mut chunk, &mut tokens);
            continue;
        }

        if let Some(number) = parse_season_header(trimmed) {
            flush_chunk(&mut chunk, &mut tokens);
            tokens.push(Token::Season(number));
            continue;
        }

        if let Some(kind) = parse_week_header(trimmed) {
            flush_chunk(&mut chunk, &mut tokens);
            tokens.push(Token::Week {
                kind,
                line: trimmed.to_owned(),
            });
            continue;
        }

        if starts_with_ci(trimmed, "<details") {
            let mut block = vec![line.trim_end()];
            let mut closed = contains_ci(trimmed, "</details>");
            while !closed {
                let Some(next) = lines.next() else {
                    break;
                };
                block.push(next.trim_end());
                closed = contains_ci(next, "</details>");
            }

            if !closed {
                // Unterminated block: keep it as plain text.
                chunk.extend(block);
                continue;
            }

            flush_chunk(&mut chunk, &mut tokens);
            let text = block.join("\n");
            match DayBlock::parse(text.clone()) {
                Some(day) => tokens.push(Token::Day(day)),
                None => {
                    tracing::debug!("unrecognized <details> block; keeping it verbatim");
                    tokens.push(Token::Opaque(text));
                }
            }
            continue;
        }

        chunk.push(line.trim_end());
    }
    flush_chunk(&mut chunk, &mut tokens);

    tokens
}

fn flush_chunk(chunk: &mut Vec<&str>, tokens: &mut Vec<Token>) {
    if chunk.is_empty() {
        return;
    }
    tokens.push(Token::Opaque(chunk.join("\n")));
    chunk.clear();
}

fn fold(tokens: Vec<Token>) -> Document {
    let mut doc = Document::default();
    let mut before_first_season: Vec<String> = Vec::new();
    let mut season: Option<u32> = None;
    let mut week: Option<WeekKind> = None;

    for token in tokens {
        match token {
            Token::Season(number) => {
                // A repeated header folds into the season already seen.
                doc.season_mut(number);
                season = Some(number);
                week = None;
            }
            Token::Week { kind, line } => match season {
                Some(number) => {
                    doc.season_mut(number).week_mut(kind);
                    week = Some(kind);
                }
                None => before_first_season.push(line),
            },
            Token::Day(day) => match (season, week) {
                (Some(number), Some(kind)) => {
                    let target = doc.season_mut(number).week_mut(kind);
                    if !target.kind.accepts(day.kind) || target.day(day.kind).is_some() {
                        tracing::warn!(
                            season = number,
                            week = %kind,
                            day = %day.kind,
                            "day-block does not fit its week; keeping it verbatim"
                        );
                        target.notes.push(day.text);
                    } else {
                        target.days.push(day);
                    }
                }
                (Some(number), None) => doc.season_mut(number).notes.push(day.text),
                (None, _) => before_first_season.push(day.text),
            },
            Token::Opaque(text) => match (season, week) {
                (Some(number), Some(kind)) => {
                    doc.season_mut(number).week_mut(kind).notes.push(text)
                }
                (Some(number), None) => doc.season_mut(number).notes.push(text),
                (None, _) => before_first_season.push(text),
            },
        }
    }

    if doc.seasons.is_empty() {
        doc.trailing = before_first_season;
    } else {
        doc.preamble = before_first_season;
    }
    doc.sort();
    doc
}

fn parse_season_header(line: &str) -> Option<u32> {
    let rest = line.strip_prefix('#')?;
    if rest.starts_with('#') {
        return None;
    }
    let rest = strip_prefix_ci(rest.trim_start(), "season")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    rest.trim().parse().ok()
}

fn parse_week_header(line: &str) -> Option<WeekKind> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    let rest = rest.trim();

    if let Some(number) = strip_prefix_ci(rest, "week") {
        if !number.starts_with(char::is_whitespace) {
            return None;
        }
        return number.trim().parse().ok().map(WeekKind::Numbered);
    }

    let rest = strip_prefix_ci(rest, "colosseum")?;
    let words = rest.split_whitespace().collect::<Vec<_>>();
    (rest.starts_with(char::is_whitespace)
        && words.len() == 1
        && words[0].eq_ignore_ascii_case("week"))
    .then_some(WeekKind::Colosseum)
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

fn starts_with_ci(s: &str, prefix: &str) -> bool {
    strip_prefix_ci(s, prefix).is_some()
}

fn contains_ci(s: &str, needle: &str) -> bool {
    s.to_ascii_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).expect("valid test date")
    }

    fn block(kind: DayKind, day: &str) -> String {
        format!(
            "<details>\n<summary>{}</summary>\n\n| Player | Decks Used | Fame |\n|--------|------------|------|\n| Alice | 4/4 | 900 |\n\n</details>",
            kind.summary_title(date(day))
        )
    }

    #[test]
    fn summary_titles_parse_back() {
        let d = date("2024-05-01");
        for kind in [
            DayKind::Training,
            DayKind::Battle(1),
            DayKind::Battle(4),
            DayKind::Colosseum(2),
        ] {
            assert_eq!(
                parse_summary_title(&kind.summary_title(d)),
                Some((kind, d)),
                "kind={kind}"
            );
        }
    }

    #[test]
    fn battle_titles_use_the_cycle_day() {
        let d = date("2024-05-01");
        assert_eq!(
            DayKind::Battle(1).summary_title(d),
            "⚔️ Battle Day 4 — 2024-05-01"
        );
        assert_eq!(
            DayKind::Colosseum(4).summary_title(d),
            "🏟️ Battle Day 7 — 2024-05-01"
        );
        assert_eq!(
            parse_summary_title("🏟️ Battle Day 6 — 2024-05-01"),
            Some((DayKind::Colosseum(3), d))
        );
    }

    #[test]
    fn titles_without_a_date_are_not_day_blocks() {
        assert_eq!(parse_summary_title("⚔️ Battle Day 5"), None);
        assert_eq!(parse_summary_title("Notes — 2024-05-01"), None);
    }

    #[test]
    fn battle_days_outside_the_cycle_are_not_day_blocks() {
        for title in [
            "⚔️ Battle Day 0 — 2024-05-01",
            "⚔️ Battle Day 3 — 2024-05-01",
            "⚔️ Battle Day 8 — 2024-05-01",
            "🏟️ Battle Day 255 — 2024-05-01",
            "🏟️ Colosseum Day 1 — 2024-05-01",
        ] {
            assert_eq!(parse_summary_title(title), None, "title={title}");
        }
    }

    #[test]
    fn existing_log_with_cycle_day_titles_is_read() {
        let text = "# Season 120

## Colosseum Week

<details>
<summary>🏟️ Battle Day 7 — 2024-06-02</summary>

| Player | Decks Used | Fame |
|--------|------------|------|
| Alice | 16/16 | 3200 |

</details>

## Week 4

<details>
<summary>⚔️ Battle Day 4 — 2024-05-23</summary>

| Player | Decks Used | Fame |
|--------|------------|------|
| Bob | 4/4 | 900 |

</details>

<details>
<summary>🎯 Training Days (1–3) — 2024-05-20</summary>

| Player | Decks Used | Fame |
|--------|------------|------|
| Bob | 3/12 | 0 |

</details>
";
        let doc = Document::parse(text);
        let season = &doc.seasons[0];

        assert_eq!(season.number, 120);
        assert_eq!(season.weeks[0].kind, WeekKind::Colosseum);
        assert_eq!(season.weeks[0].days[0].kind, DayKind::Colosseum(4));
        assert_eq!(season.weeks[0].days[0].rows[0].decks, 16);
        assert_eq!(season.weeks[1].kind, WeekKind::Numbered(4));
        assert_eq!(season.weeks[1].days[0].kind, DayKind::Battle(1));
        assert_eq!(season.weeks[1].days[1].kind, DayKind::Training);
        assert!(doc.check_invariants().is_ok());
        assert_eq!(doc.to_markdown(), text);
    }

    #[test]
    fn headers_are_matched_case_insensitively() {
        assert_eq!(parse_season_header("# season 12"), Some(12));
        assert_eq!(parse_season_header("#Season 12  "), Some(12));
        assert_eq!(parse_season_header("## Season 12"), None);
        assert_eq!(parse_season_header("# Seasons 12"), None);
        assert_eq!(parse_week_header("## week 3"), Some(WeekKind::Numbered(3)));
        assert_eq!(
            parse_week_header("##  Colosseum   Week"),
            Some(WeekKind::Colosseum)
        );
        assert_eq!(parse_week_header("### Week 3"), None);
        assert_eq!(parse_week_header("## Weekend"), None);
    }

    #[test]
    fn table_rows_are_recovered() {
        let text = block(DayKind::Battle(1), "2024-05-01");
        let day = DayBlock::parse(text).expect("day block");
        assert_eq!(
            day.rows,
            vec![Row {
                name: "Alice".to_owned(),
                decks: 4,
                max_decks: 4,
                fame: 900,
            }]
        );
    }

    #[test]
    fn escaped_pipes_in_names_survive() {
        let row = parse_table_row("| A\\|B | 2/4 | 10 |").expect("row");
        assert_eq!(row.name, "A|B");
        assert_eq!(row.decks, 2);
    }

    #[test]
    fn parse_builds_the_tree() {
        let text = format!(
            "# Season 5\n\n## Week 2\n\n{}\n\n{}\n\n## Week 1\n\n{}\n",
            block(DayKind::Battle(1), "2024-05-04"),
            block(DayKind::Training, "2024-05-01"),
            block(DayKind::Training, "2024-04-24"),
        );
        let doc = Document::parse(&text);

        assert_eq!(doc.seasons.len(), 1);
        let season = &doc.seasons[0];
        assert_eq!(season.number, 5);
        assert_eq!(season.weeks.len(), 2);
        assert_eq!(season.top_week().map(|w| w.kind), Some(WeekKind::Numbered(2)));
        assert_eq!(season.weeks[0].days.len(), 2);
        assert_eq!(season.weeks[0].days[0].kind, DayKind::Battle(1));
        assert_eq!(season.weeks[0].days[1].kind, DayKind::Training);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn serialization_reproduces_a_canonical_document() {
        let text = format!(
            "# Season 5\n\n## Colosseum Week\n\n{}\n\n## Week 4\n\n{}\n",
            block(DayKind::Colosseum(1), "2024-05-29"),
            block(DayKind::Training, "2024-05-22"),
        );
        assert_eq!(Document::parse(&text).to_markdown(), text);
    }

    #[test]
    fn duplicate_season_headers_collapse() {
        let text = format!(
            "# Season 5\n\n# Season 5\n\n## Week 1\n\n{}\n",
            block(DayKind::Training, "2024-05-01"),
        );
        let out = Document::parse(&text).to_markdown();
        assert_eq!(out.matches("# Season 5").count(), 1);
    }

    #[test]
    fn out_of_order_sections_are_sorted() {
        let text = format!(
            "# Season 4\n\n## Week 1\n\n{}\n\n# Season 5\n\n## Week 1\n\n{}\n\n{}\n",
            block(DayKind::Training, "2024-04-01"),
            block(DayKind::Training, "2024-05-01"),
            block(DayKind::Battle(1), "2024-05-04"),
        );
        let doc = Document::parse(&text);

        assert_eq!(doc.seasons[0].number, 5);
        assert_eq!(doc.seasons[0].weeks[0].days[0].kind, DayKind::Battle(1));
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn unknown_content_is_preserved() {
        let text = format!(
            "Clan war history\n\n# Season 5\n\nSeason notes here.\n\n## Week 1\n\n{}\n\n<details>\n<summary>Rules</summary>\nBe nice.\n</details>\n",
            block(DayKind::Training, "2024-05-01"),
        );
        let doc = Document::parse(&text);

        assert_eq!(doc.preamble, vec!["Clan war history".to_owned()]);
        assert_eq!(doc.seasons[0].notes, vec!["Season notes here.".to_owned()]);
        assert_eq!(doc.seasons[0].weeks[0].notes.len(), 1);
        assert_eq!(doc.to_markdown(), text);
    }

    #[test]
    fn document_without_seasons_becomes_trailing_text() {
        let doc = Document::parse("random notes\n\n## Week 1\n");
        assert!(doc.seasons.is_empty());
        assert_eq!(
            doc.trailing,
            vec!["random notes".to_owned(), "## Week 1".to_owned()]
        );
    }

    #[test]
    fn duplicate_day_blocks_keep_the_first_and_preserve_the_rest() {
        let first = block(DayKind::Battle(1), "2024-05-04");
        let second = block(DayKind::Battle(1), "2024-05-03");
        let text = format!("# Season 5\n\n## Week 1\n\n{first}\n\n{second}\n");
        let doc = Document::parse(&text);

        let week = &doc.seasons[0].weeks[0];
        assert_eq!(week.days.len(), 1);
        assert_eq!(week.days[0].date, date("2024-05-04"));
        assert_eq!(week.notes, vec![second]);
        assert_eq!(Document::parse(&doc.to_markdown()), doc);
    }

    #[test]
    fn unterminated_details_is_opaque() {
        let text = "# Season 5\n\n## Week 1\n\n<details>\n<summary>⚔️ Battle Day 4 — 2024-05-04</summary>\n";
        let doc = Document::parse(text);
        let week = &doc.seasons[0].weeks[0];

        assert!(week.days.is_empty());
        assert_eq!(week.notes.len(), 1);
    }

    #[test]
    fn invariant_check_reports_misordered_days() {
        let mut doc = Document::parse(&format!(
            "# Season 5\n\n## Week 1\n\n{}\n\n{}\n",
            block(DayKind::Battle(2), "2024-05-05"),
            block(DayKind::Battle(1), "2024-05-04"),
        ));
        doc.seasons[0].weeks[0].days.reverse();

        assert!(matches!(
            doc.check_invariants(),
            Err(InvariantViolation::DayOrder { .. })
        ));
    }
}
