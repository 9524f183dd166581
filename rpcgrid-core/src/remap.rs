//! Project parsed rows onto a fixed target schema.

use std::collections::HashMap;

use crate::parse::StructuredRow;

/// Reorder `rows` into `schema` order by column name.
///
/// For each schema column the value is looked up, in order: under the same name,
/// under any source column aliased to it, then case-insensitively. Columns with no
/// match are `None`; source columns outside the schema are dropped. Every output
/// row has exactly `schema.len()` cells.
#[must_use]
pub fn remap_rows(
    rows: &[StructuredRow],
    schema: &[String],
    aliases: &HashMap<String, String>,
) -> Vec<Vec<Option<String>>> {
    let mut sources: HashMap<&str, Vec<&str>> = HashMap::new();
    for (source, target) in aliases {
        sources
            .entry(target.as_str())
            .or_default()
            .push(source.as_str());
    }
    for names in sources.values_mut() {
        names.sort_unstable();
    }

    rows.iter()
        .map(|row| {
            schema
                .iter()
                .map(|col| lookup(row, col, sources.get(col.as_str())).map(ToString::to_string))
                .collect()
        })
        .collect()
}

fn lookup<'r>(row: &'r StructuredRow, col: &str, aliases: Option<&Vec<&str>>) -> Option<&'r str> {
    if row.contains(col) {
        return row.get(col);
    }
    if let Some(names) = aliases
        && let Some(name) = names.iter().find(|n| row.contains(n))
    {
        return row.get(name);
    }
    row.get_ignore_case(col)
}
