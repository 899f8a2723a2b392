//! Plain-text rendering of cached resources.

use agrihub_model::Resource;
use std::io::{self, Write};

const ID_WIDTH: usize = 26;
const NAME_WIDTH: usize = 32;

/// Writes one `ID  NAME  KEY` row per item, or a placeholder line when
/// there is nothing to show.
pub fn render_table<E: Resource>(out: &mut impl Write, items: &[E]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "(no records)");
    }
    writeln!(out, "{:<ID_WIDTH$} {:<NAME_WIDTH$} KEY", "ID", "NAME")?;
    for item in items {
        writeln!(
            out,
            "{:<ID_WIDTH$} {:<NAME_WIDTH$} {}",
            item.id(),
            truncate(item.display_name(), NAME_WIDTH),
            item.foreign_key().unwrap_or("-")
        )?;
    }
    Ok(())
}

/// Writes `item` as pretty-printed JSON.
pub fn render_show<E: Resource>(out: &mut impl Write, item: &E) -> io::Result<()> {
    let json = serde_json::to_string_pretty(item).map_err(io::Error::other)?;
    writeln!(out, "{json}")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrihub_model::DomainEntity;

    fn rendered(items: &[DomainEntity]) -> String {
        let mut buf = Vec::new();
        render_table(&mut buf, items).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_table_has_placeholder() {
        assert_eq!(rendered(&[]), "(no records)\n");
    }

    #[test]
    fn rows_show_foreign_key_or_dash() {
        let items = vec![
            DomainEntity::new("1", "Rice").with_type("t1"),
            DomainEntity::new("2", "Maize"),
        ];
        let text = rendered(&items);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with('1') && lines[1].ends_with("t1"));
        assert!(lines[2].ends_with('-'));
    }

    #[test]
    fn long_names_are_truncated() {
        let long = "x".repeat(40);
        let out = truncate(&long, 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with('…'));
        assert_eq!(truncate("short", 10), "short");
    }
}
