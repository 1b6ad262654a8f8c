use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}/\d{1,2}/\d{2}),").expect("date prefix pattern"));

/// Date of a header line, if it starts with a parseable `M/D/YY,` prefix.
pub fn line_date(line: &str) -> Option<NaiveDate> {
    let caps = DATE_PREFIX.captures(line.trim_start())?;
    NaiveDate::parse_from_str(&caps[1], "%m/%d/%y").ok()
}

/// Trimmed header lines dated with the latest date in `lines`, in file order.
///
/// Continuation lines carry no date and are not selected. Returns `None`
/// when no line has a parseable date.
pub fn last_day_lines<I, S>(lines: I) -> Option<(NaiveDate, Vec<String>)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let dated: Vec<(NaiveDate, String)> = lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            line_date(line).map(|date| (date, line.to_string()))
        })
        .collect();

    let latest = dated.iter().map(|(date, _)| *date).max()?;
    let selected: Vec<String> = dated
        .into_iter()
        .filter(|(date, _)| *date == latest)
        .map(|(_, line)| line)
        .collect();

    debug!("Selected {} lines for {}", selected.len(), latest);
    Some((latest, selected))
}

/// Rewrite `- old:` author markers to `- new:` for every `(old, new)` pair.
pub fn replace_names(lines: &[String], mapping: &[(String, String)]) -> Vec<String> {
    lines
        .iter()
        .map(|line| {
            mapping.iter().fold(line.clone(), |acc, (old, new)| {
                acc.replace(&format!("- {}:", old), &format!("- {}:", new))
            })
        })
        .collect()
}

/// Split `"old name new"` into the original name and its replacement.
///
/// The last whitespace-separated token is the replacement. Fewer than two
/// tokens yields `None`.
pub fn parse_name_mapping(raw: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let (new, old) = tokens.split_last()?;
    if old.is_empty() {
        return None;
    }
    Some((old.join(" "), new.to_string()))
}
