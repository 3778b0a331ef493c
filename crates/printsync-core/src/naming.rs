// ── Printer naming scheme ──
//
// Printer names follow `SITE_BUILDING_FLOOR_NN`. Only names with exactly
// three underscores take part in site listings and number allocation.

use serde::Serialize;

const PART_SEPARATOR: char = '_';

/// Suggested name for a partially or fully selected location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameSuggestion {
    /// Placeholder-filled hint, e.g. `SE_XX_XX_XX`.
    pub hint: String,
    /// Complete name with the first free number, once site, building
    /// and floor are all chosen.
    pub name: Option<String>,
}

fn parts(name: &str) -> Option<[&str; 4]> {
    let mut split = name.split(PART_SEPARATOR);
    let parts = [split.next()?, split.next()?, split.next()?, split.next()?];
    split.next().is_none().then_some(parts)
}

/// Standard names split into parts, ordered by name.
fn standard_names<S: AsRef<str>>(names: &[S]) -> impl Iterator<Item = [&str; 4]> {
    let mut sorted: Vec<&str> = names.iter().map(|n| n.as_ref()).collect();
    sorted.sort_unstable();
    sorted.into_iter().filter_map(parts)
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_owned());
        }
    }
    seen
}

/// Distinct sites in name order.
pub fn sites<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    distinct(standard_names(names).map(|p| p[0]))
}

/// Distinct buildings of `site` in name order.
pub fn buildings<S: AsRef<str>>(names: &[S], site: &str) -> Vec<String> {
    distinct(
        standard_names(names)
            .filter(|p| p[0] == site)
            .map(|p| p[1]),
    )
}

/// Distinct floors of `site`/`building` in name order.
pub fn floors<S: AsRef<str>>(names: &[S], site: &str, building: &str) -> Vec<String> {
    distinct(
        standard_names(names)
            .filter(|p| p[0] == site && p[1] == building)
            .map(|p| p[2]),
    )
}

/// First free two-digit number on a floor. Taken names are ordered by
/// name, then stably by length, and their numbers compared against `01, 02, ...` until the
/// first gap.
pub fn next_number<S: AsRef<str>>(names: &[S], site: &str, building: &str, floor: &str) -> String {
    let mut taken: Vec<[&str; 4]> = standard_names(names)
        .filter(|p| p[0] == site && p[1] == building && p[2] == floor)
        .collect();
    taken.sort_by_key(|p| p.iter().map(|s| s.len()).sum::<usize>());

    let mut count = 0;
    while count < taken.len() && taken[count][3] == format!("{:02}", count + 1) {
        count += 1;
    }
    format!("{:02}", count + 1)
}

/// Build the hint (and, with every part chosen, the full name) for the
/// given selection.
pub fn suggest<S: AsRef<str>>(
    names: &[S],
    site: Option<&str>,
    building: Option<&str>,
    floor: Option<&str>,
) -> NameSuggestion {
    match (site, building, floor) {
        (Some(site), Some(building), Some(floor)) => {
            let name = format!(
                "{site}_{building}_{floor}_{}",
                next_number(names, site, building, floor)
            );
            NameSuggestion {
                hint: name.clone(),
                name: Some(name),
            }
        }
        (Some(site), Some(building), None) => NameSuggestion {
            hint: format!("{site}_{building}_XX_XX"),
            name: None,
        },
        (Some(site), None, _) => NameSuggestion {
            hint: format!("{site}_XX_XX_XX"),
            name: None,
        },
        (None, _, _) => NameSuggestion {
            hint: "XX_XX_XX_XX".into(),
            name: None,
        },
    }
}
