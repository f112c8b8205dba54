use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use donego_shared::view::preview;
use donego_shared::{Checklist, Segment, Stats, Theme, highlight};
use unicode_width::UnicodeWidthStr;

use crate::config::Config;

const TIPS: &[&str] = &[
    "Create checklists, add tasks, check them off and reset them when you start over.",
    "`donego rename LIST TASK TEXT` edits a task in place.",
    "`donego remove LIST TASK` deletes a task after asking first.",
    "Search with `-q`: matches in titles and tasks are highlighted.",
];

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    preview: usize,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => io::stdout().is_terminal(),
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self {
            color,
            preview: cfg.library_preview()?,
        })
    }

    pub fn plain(preview: usize) -> Self {
        Self {
            color: false,
            preview,
        }
    }

    /// `lists` pairs each checklist with its 1-based position in my lists.
    #[tracing::instrument(skip_all, fields(count = lists.len()))]
    pub fn print_checklists(
        &self,
        lists: &[(usize, &Checklist)],
        query: &str,
        empty_message: &str,
    ) -> anyhow::Result<()> {
        self.write_checklists(io::stdout().lock(), lists, query, empty_message)
    }

    pub fn write_checklists<W: Write>(
        &self,
        mut out: W,
        lists: &[(usize, &Checklist)],
        query: &str,
        empty_message: &str,
    ) -> anyhow::Result<()> {
        if lists.is_empty() {
            writeln!(out, "{empty_message}")?;
            return Ok(());
        }

        let headers = ["#", "ID", "Title", "Category", "Done"]
            .map(str::to_string)
            .to_vec();
        let rows = lists
            .iter()
            .map(|(position, checklist)| {
                vec![
                    self.paint(&position.to_string(), "33"),
                    checklist.id.clone(),
                    self.highlighted(&checklist.title, query),
                    checklist.category.clone(),
                    format!("{}/{}", checklist.done_count(), checklist.tasks.len()),
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(checklist = %checklist.id))]
    pub fn print_checklist(
        &self,
        position: usize,
        checklist: &Checklist,
        query: &str,
    ) -> anyhow::Result<()> {
        self.write_checklist(io::stdout().lock(), position, checklist, query)
    }

    pub fn write_checklist<W: Write>(
        &self,
        mut out: W,
        position: usize,
        checklist: &Checklist,
        query: &str,
    ) -> anyhow::Result<()> {
        writeln!(
            out,
            "{} {} [{}] ({} tasks)",
            self.paint(&position.to_string(), "33"),
            self.highlighted(&checklist.title, query),
            checklist.category,
            checklist.tasks.len()
        )?;

        if checklist.tasks.is_empty() {
            writeln!(out, "No tasks yet.")?;
            return Ok(());
        }

        let headers = ["#", "ID", "Done", "Task"].map(str::to_string).to_vec();
        let rows = checklist
            .tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| {
                let text = self.highlighted(&task.text, query);
                vec![
                    self.paint(&(idx + 1).to_string(), "33"),
                    task.id.clone(),
                    if task.done { "[x]" } else { "[ ]" }.to_string(),
                    if task.done { self.paint(&text, "9") } else { text },
                ]
            })
            .collect();

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(count = entries.len()))]
    pub fn print_library(&self, entries: &[&Checklist], query: &str) -> anyhow::Result<()> {
        self.write_library(io::stdout().lock(), entries, query)
    }

    pub fn write_library<W: Write>(
        &self,
        mut out: W,
        entries: &[&Checklist],
        query: &str,
    ) -> anyhow::Result<()> {
        if entries.is_empty() {
            writeln!(out, "No checklists in the library.")?;
            return Ok(());
        }

        for (idx, entry) in entries.iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            writeln!(
                out,
                "{} {} [{}]",
                self.paint(&entry.id, "33"),
                self.highlighted(&entry.title, query),
                entry.category_or_default()
            )?;

            let cut = preview(entry, self.preview);
            for task in cut.shown {
                writeln!(out, "  [ ] {}", self.highlighted(&task.text, query))?;
            }
            if let Some(label) = cut.remaining_label() {
                writeln!(out, "  {label}")?;
            }
        }

        Ok(())
    }

    pub fn write_stats<W: Write>(&self, mut out: W, stats: Stats) -> anyhow::Result<()> {
        writeln!(out, "Lists: {}", stats.lists)?;
        writeln!(out, "Tasks: {}", stats.tasks)?;
        Ok(())
    }

    pub fn write_categories<W: Write>(&self, mut out: W, categories: &[String]) -> anyhow::Result<()> {
        for category in categories {
            writeln!(out, "{category}")?;
        }
        Ok(())
    }

    pub fn write_theme<W: Write>(&self, mut out: W, theme: Theme) -> anyhow::Result<()> {
        writeln!(out, "Theme: {}", theme.as_str())?;
        Ok(())
    }

    pub fn write_tips<W: Write>(&self, mut out: W) -> anyhow::Result<()> {
        writeln!(out, "{}", self.paint("Tip:", "1"))?;
        for tip in TIPS {
            writeln!(out, "  - {tip}")?;
        }
        writeln!(out, "Run `donego tips dismiss` to hide these.")?;
        Ok(())
    }

    fn highlighted(&self, text: &str, query: &str) -> String {
        highlight(text, query)
            .into_iter()
            .map(|segment| match segment {
                Segment::Plain(plain) => plain.to_string(),
                Segment::Match(hit) if self.color => self.paint(hit, "7"),
                Segment::Match(hit) => hit.to_string(),
            })
            .collect()
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let last = column_count.saturating_sub(1);
    for (idx, header) in headers.iter().enumerate() {
        if idx == last {
            write!(writer, "{header}")?;
        } else {
            write!(writer, "{:width$} ", header, width = widths[idx])?;
        }
    }
    writeln!(writer)?;

    for (idx, width) in widths.iter().enumerate() {
        let sep = if idx == last { "" } else { " " };
        write!(writer, "{:-<width$}{sep}", "", width = width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if idx == last {
                write!(writer, "{cell}")?;
                continue;
            }
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use donego_shared::Task;

    use super::*;

    fn trip() -> Checklist {
        let mut checklist = Checklist::new_mine("c_1".to_string(), "Trip".to_string());
        checklist.tasks = vec![
            Task::new("t_2".to_string(), "Pack bags".to_string()),
            Task::new("t_3".to_string(), "Book hotel".to_string()),
        ];
        checklist.tasks[1].done = true;
        checklist
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn checklist_table_aligns_columns() {
        let renderer = Renderer::plain(6);
        let checklist = trip();
        let out = render(|buf| renderer.write_checklists(buf, &[(1, &checklist)], "", "empty"));

        assert_eq!(
            out,
            "# ID  Title Category Done\n\
             - --- ----- -------- ----\n\
             1 c_1 Trip  Mine     1/2\n"
        );
    }

    #[test]
    fn empty_list_prints_message() {
        let renderer = Renderer::plain(6);
        let out = render(|buf| renderer.write_checklists(buf, &[], "", "No lists yet."));
        assert_eq!(out, "No lists yet.\n");
    }

    #[test]
    fn checklist_detail_marks_done_tasks() {
        let renderer = Renderer::plain(6);
        let out = render(|buf| renderer.write_checklist(buf, 1, &trip(), ""));

        assert!(out.starts_with("1 Trip [Mine] (2 tasks)\n"));
        assert!(out.contains("1 t_2 [ ]  Pack bags\n"));
        assert!(out.contains("2 t_3 [x]  Book hotel\n"));
    }

    #[test]
    fn library_preview_reports_remaining() {
        let renderer = Renderer::plain(1);
        let mut entry = trip();
        entry.id = "lib_trip".to_string();
        entry.category = "Travel".to_string();

        let out = render(|buf| renderer.write_library(buf, &[&entry], ""));
        assert_eq!(
            out,
            "lib_trip Trip [Travel]\n  [ ] Pack bags\n  ...1 more item\n"
        );
    }

    #[test]
    fn highlight_is_plain_without_color() {
        let renderer = Renderer::plain(6);
        assert_eq!(renderer.highlighted("Pack bags", "bag"), "Pack bags");

        let colored = Renderer {
            color: true,
            preview: 6,
        };
        assert_eq!(
            colored.highlighted("Pack bags", "bag"),
            "Pack \x1b[7mbag\x1b[0ms"
        );
        assert_eq!(strip_ansi(&colored.highlighted("Pack bags", "bag")), "Pack bags");
    }
}
