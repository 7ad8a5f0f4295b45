//! Choosing which extracted entities to render.
//!
//! Either an explicit list of names (`--entity`, repeatable) or an interactive
//! numbered prompt where an empty answer means every entity.

use std::collections::{BTreeSet, HashSet};
use std::io::{BufRead, Write};

use crate::error::SelectionError;
use crate::extractor::DiagramIndex;
use crate::model::Entity;

/// Heading for entities that appear on no diagram.
pub const UNGROUPED_HEADING: &str = "(no diagram)";

/// Keep the entities named in `names`, in document order.
///
/// An empty `names` keeps everything. Names that match nothing are logged;
/// if none match at all the selection fails.
pub fn select_by_names<'a>(
    entities: &'a [Entity],
    names: &[String],
) -> Result<Vec<&'a Entity>, SelectionError> {
    if names.is_empty() {
        return Ok(entities.iter().collect());
    }

    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    let selected: Vec<&Entity> = entities
        .iter()
        .filter(|e| wanted.contains(e.name.as_str()))
        .collect();

    if selected.is_empty() {
        return Err(SelectionError::NothingMatched {
            requested: names.to_vec(),
        });
    }

    for name in names {
        if !selected.iter().any(|e| &e.name == name) {
            tracing::warn!(entity = %name, "Requested entity not found in design file");
        }
    }

    Ok(selected)
}

/// Parse a comma-separated list of 1-based indices.
///
/// Returns `None` for blank input (meaning "all"), otherwise the distinct
/// valid zero-based indices in ascending order. Non-numeric and out-of-range
/// parts are skipped.
pub fn parse_selection(input: &str, count: usize) -> Option<Vec<usize>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let picked: BTreeSet<usize> = input
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
        .collect();

    Some(picked.into_iter().collect())
}

/// Display order for the prompt: `(heading, entity index)` pairs.
///
/// Without diagrams every entity is listed once in document order under an
/// empty heading. With diagrams, entities are grouped per diagram (diagrams
/// and members alphabetical); an entity on several diagrams is listed under
/// each, and entities on none come last.
pub fn listing(entities: &[Entity], diagrams: &DiagramIndex) -> Vec<(String, usize)> {
    if diagrams.is_empty() {
        return (0..entities.len()).map(|i| (String::new(), i)).collect();
    }

    let mut rows = Vec::new();
    let mut shown = HashSet::new();

    for (diagram, members) in diagrams {
        for member in members {
            if let Some(i) = entities.iter().position(|e| &e.name == member) {
                rows.push((diagram.clone(), i));
                shown.insert(i);
            }
        }
    }

    for i in (0..entities.len()).filter(|i| !shown.contains(i)) {
        rows.push((UNGROUPED_HEADING.to_string(), i));
    }

    rows
}

/// Print the numbered entity list to `output`, read one line from `input`,
/// and return the chosen entities.
///
/// A blank answer (or end of input) selects every entity.
pub fn prompt_selection<'a, R: BufRead, W: Write>(
    entities: &'a [Entity],
    diagrams: &DiagramIndex,
    mut input: R,
    mut output: W,
) -> std::io::Result<Vec<&'a Entity>> {
    let rows = listing(entities, diagrams);

    writeln!(output, "\nFound the following entities:")?;
    let mut heading: Option<&str> = None;
    for (number, (group, index)) in rows.iter().enumerate() {
        if !group.is_empty() && heading != Some(group.as_str()) {
            writeln!(output, "\n{}:", group)?;
            heading = Some(group.as_str());
        }
        writeln!(output, "  {:3}. {}", number + 1, entities[*index].name)?;
    }

    writeln!(output, "\nEnter the numbers of the entities you want to export,")?;
    writeln!(output, "separated by commas (or press Enter to export ALL):")?;
    write!(output, "Selection: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let selected: Vec<&Entity> = match parse_selection(&line, rows.len()) {
        None => entities.iter().collect(),
        Some(picked) => {
            let indices: BTreeSet<usize> = picked.into_iter().map(|n| rows[n].1).collect();
            indices.into_iter().map(|i| &entities[i]).collect()
        }
    };

    let names: Vec<&str> = selected.iter().map(|e| e.name.as_str()).collect();
    writeln!(
        output,
        "\n→ Will export: {}\n",
        if names.len() == entities.len() { "ALL".to_string() } else { names.join(", ") }
    )?;

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn entity(name: &str) -> Entity {
        Entity {
            id: name.to_string(),
            name: name.to_string(),
            description: String::new(),
            table_options: String::new(),
            sources: vec![],
            partition_columns: vec![],
            cluster_columns: vec![],
            fields: vec![],
        }
    }

    fn entities() -> Vec<Entity> {
        vec![entity("Party"), entity("SalesOrder"), entity("Address")]
    }

    #[test]
    fn test_select_by_names_preserves_document_order() {
        let all = entities();
        let names = vec!["Address".to_string(), "Party".to_string()];

        let selected = select_by_names(&all, &names).unwrap();

        let picked: Vec<&str> = selected.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(picked, vec!["Party", "Address"]);
    }

    #[test]
    fn test_select_by_names_nothing_matched() {
        let all = entities();
        let names = vec!["Invoice".to_string()];

        let err = select_by_names(&all, &names).unwrap_err();
        assert_eq!(
            err,
            SelectionError::NothingMatched {
                requested: vec!["Invoice".to_string()]
            }
        );
    }

    #[test]
    fn test_select_by_names_empty_means_all() {
        let all = entities();
        assert_eq!(select_by_names(&all, &[]).unwrap().len(), 3);
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("", 3), None);
        assert_eq!(parse_selection("   \n", 3), None);
        assert_eq!(parse_selection("3, 1", 3), Some(vec![0, 2]));
        assert_eq!(parse_selection("1,1,x,,7,0,-2", 3), Some(vec![0]));
        assert_eq!(parse_selection("abc", 3), Some(vec![]));
    }

    #[test]
    fn test_prompt_selection_blank_is_all() {
        let all = entities();
        let mut out = Vec::new();

        let selected = prompt_selection(&all, &BTreeMap::new(), "\n".as_bytes(), &mut out).unwrap();

        assert_eq!(selected.len(), 3);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("    1. Party"));
        assert!(printed.contains("Will export: ALL"));
    }

    #[test]
    fn test_prompt_selection_grouped_by_diagram() {
        let all = entities();
        let mut diagrams = BTreeMap::new();
        diagrams.insert(
            "Sales".to_string(),
            vec!["Party".to_string(), "SalesOrder".to_string()],
        );
        let mut out = Vec::new();

        // listing: 1 Party, 2 SalesOrder (Sales), 3 Address (no diagram)
        let selected = prompt_selection(&all, &diagrams, "3,2".as_bytes(), &mut out).unwrap();

        let picked: Vec<&str> = selected.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(picked, vec!["SalesOrder", "Address"]);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Sales:"));
        assert!(printed.contains(UNGROUPED_HEADING));
    }

    proptest! {
        #[test]
        fn prop_parse_selection_sorted_and_in_range(parts in proptest::collection::vec(0usize..20, 1..10), count in 0usize..15) {
            let input = parts.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(",");

            let picked = parse_selection(&input, count).unwrap();

            prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(picked.iter().all(|i| *i < count));
        }
    }
}
