use crate::model::{
  Checklist,
  MINE_CATEGORY,
  Store,
  Task
};

/// Label of the catch-all category chip.
pub const ALL_CATEGORIES: &str = "All";

/// Tasks shown per library card before
/// the "more items" line.
pub const LIBRARY_PREVIEW: usize = 6;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum ViewMode {
  #[default]
  Mine,
  Library
}

impl ViewMode {
  pub fn toggle(self) -> Self {
    match self {
      | Self::Mine => Self::Library,
      | Self::Library => Self::Mine
    }
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Mine => "mine",
      | Self::Library => "library"
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      | Self::Mine => "My lists",
      | Self::Library => "Library"
    }
  }

  pub fn empty_message(
    self
  ) -> &'static str {
    match self {
      | Self::Mine => {
        "No lists yet. Create one or \
         copy it from the library."
      }
      | Self::Library => {
        "No checklists in the library."
      }
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub enum CategoryFilter {
  #[default]
  All,
  Named(String)
}

impl CategoryFilter {
  pub fn parse(raw: &str) -> Self {
    let raw = raw.trim();
    if raw.is_empty()
      || raw.eq_ignore_ascii_case(
        ALL_CATEGORIES
      )
    {
      Self::All
    } else {
      Self::Named(raw.to_string())
    }
  }

  pub fn label(&self) -> &str {
    match self {
      | Self::All => ALL_CATEGORIES,
      | Self::Named(name) => name
    }
  }

  /// Case-insensitive. `"Mine"` is an
  /// ordinary category value, so it only
  /// ever matches user-authored
  /// checklists.
  pub fn matches(
    &self,
    checklist: &Checklist
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Named(name) => {
        checklist
          .category_or_default()
          .to_lowercase()
          == name.to_lowercase()
      }
    }
  }
}

/// Trimmed, case-insensitive substring
/// match on the title or any task text.
pub fn matches_query(
  checklist: &Checklist,
  query: &str
) -> bool {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return true;
  }

  checklist
    .title
    .to_lowercase()
    .contains(&needle)
    || checklist.tasks.iter().any(|task| {
      task
        .text
        .to_lowercase()
        .contains(&needle)
    })
}

/// Transient filter state. Never
/// persisted.
#[derive(
  Debug, Clone, PartialEq, Eq, Default,
)]
pub struct ViewState {
  pub mode:     ViewMode,
  pub query:    String,
  pub category: CategoryFilter
}

impl ViewState {
  pub fn new(mode: ViewMode) -> Self {
    Self {
      mode,
      ..Self::default()
    }
  }

  /// Changing the mode clears the query
  /// and the category selection.
  pub fn switch_mode(
    &mut self,
    mode: ViewMode
  ) {
    if self.mode == mode {
      return;
    }
    self.mode = mode;
    self.query.clear();
    self.category = CategoryFilter::All;
  }

  pub fn toggle_mode(&mut self) {
    self.switch_mode(self.mode.toggle());
  }

  pub fn source<'a>(
    &self,
    store: &'a Store
  ) -> &'a [Checklist] {
    match self.mode {
      | ViewMode::Mine => &store.my_lists,
      | ViewMode::Library => {
        &store.library
      }
    }
  }

  pub fn matches(
    &self,
    checklist: &Checklist
  ) -> bool {
    self.category.matches(checklist)
      && matches_query(
        checklist,
        &self.query
      )
  }

  pub fn visible<'a>(
    &self,
    store: &'a Store
  ) -> Vec<&'a Checklist> {
    self
      .source(store)
      .iter()
      .filter(|checklist| {
        self.matches(checklist)
      })
      .collect()
  }
}

/// Category chips for a mode: `"All"`
/// first, then each distinct category in
/// first-seen order.
pub fn categories(
  store: &Store,
  mode: ViewMode
) -> Vec<String> {
  let mut out =
    vec![ALL_CATEGORIES.to_string()];
  if mode == ViewMode::Mine {
    out.push(MINE_CATEGORY.to_string());
  }

  let source = match mode {
    | ViewMode::Mine => &store.my_lists,
    | ViewMode::Library => &store.library
  };
  for checklist in source {
    let category =
      checklist.category_or_default();
    if !out.iter().any(|seen| seen == category)
    {
      out.push(category.to_string());
    }
  }
  out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview<'a> {
  pub shown:     &'a [Task],
  pub remaining: usize
}

impl Preview<'_> {
  pub fn remaining_label(
    &self
  ) -> Option<String> {
    match self.remaining {
      | 0 => None,
      | 1 => {
        Some("...1 more item".to_string())
      }
      | n => {
        Some(format!("...{n} more items"))
      }
    }
  }
}

pub fn preview(
  checklist: &Checklist,
  limit: usize
) -> Preview<'_> {
  let shown_len =
    checklist.tasks.len().min(limit);
  Preview {
    shown:     &checklist.tasks
      [..shown_len],
    remaining: checklist.tasks.len()
      - shown_len
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::default_library;
  use crate::ids::SequentialIds;

  fn sample() -> Store {
    let mut ids = SequentialIds::new();
    let store = Store::default()
      .create("Groceries", &mut ids)
      .copy_from_library(
        "lib_move", &mut ids
      );
    let groceries = store.my_lists[1]
      .id
      .clone();
    store.add_task(
      &groceries,
      "Buy OAT milk",
      &mut ids
    )
  }

  #[test]
  fn query_matches_title_or_task_text() {
    let store = sample();
    let mut view = ViewState::default();

    view.query = "  oat  ".to_string();
    let hits: Vec<&str> = view
      .visible(&store)
      .into_iter()
      .map(|c| c.title.as_str())
      .collect();
    assert_eq!(hits, ["Groceries"]);

    view.query = "MOVING".to_string();
    let hits: Vec<&str> = view
      .visible(&store)
      .into_iter()
      .map(|c| c.title.as_str())
      .collect();
    assert_eq!(hits, ["Moving house"]);

    view.query = String::new();
    assert_eq!(view.visible(&store).len(), 2);
  }

  #[test]
  fn query_folds_non_ascii_case() {
    let mut store = sample();
    store.my_lists[0].title =
      "ПЕРЕЕЗД".to_string();
    let view = ViewState {
      query: "переезд".to_string(),
      ..ViewState::default()
    };
    assert_eq!(view.visible(&store).len(), 1);
  }

  #[test]
  fn category_filter_selects_exact_category()
  {
    let store = sample();
    let mut view = ViewState::default();

    view.category =
      CategoryFilter::parse("Mine");
    let hits = view.visible(&store);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Groceries");

    view.category =
      CategoryFilter::parse("Home");
    let hits = view.visible(&store);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Moving house");

    view.category =
      CategoryFilter::parse("all");
    assert_eq!(view.visible(&store).len(), 2);
  }

  #[test]
  fn category_filter_ignores_case() {
    let store = sample();
    let mut view = ViewState::default();

    view.category =
      CategoryFilter::parse("mine");
    let hits = view.visible(&store);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Groceries");

    view.category =
      CategoryFilter::parse("HOME");
    assert_eq!(view.visible(&store).len(), 1);

    let library =
      ViewState {
        mode:     ViewMode::Library,
        query:    String::new(),
        category: CategoryFilter::parse(
          "travel"
        )
      };
    assert!(
      library
        .visible(&store)
        .iter()
        .all(|c| c.category == "Travel")
    );
    assert!(!library.visible(&store).is_empty());
  }

  #[test]
  fn switching_mode_resets_filters() {
    let mut view = ViewState {
      mode:     ViewMode::Mine,
      query:    "trip".to_string(),
      category: CategoryFilter::Named(
        "Travel".to_string()
      )
    };

    view.toggle_mode();
    assert_eq!(view.mode, ViewMode::Library);
    assert!(view.query.is_empty());
    assert_eq!(
      view.category,
      CategoryFilter::All
    );

    view.query = "keep".to_string();
    view.switch_mode(ViewMode::Library);
    assert_eq!(view.query, "keep");
  }

  #[test]
  fn library_mode_reads_library() {
    let store = sample();
    let view =
      ViewState::new(ViewMode::Library);
    assert_eq!(
      view.visible(&store).len(),
      default_library().len()
    );
  }

  #[test]
  fn categories_follow_the_mode() {
    let store = sample();
    assert_eq!(
      categories(&store, ViewMode::Mine),
      ["All", "Mine", "Home"]
    );

    let library =
      categories(&store, ViewMode::Library);
    assert_eq!(library[0], "All");
    assert!(
      library.contains(&"Travel".to_string())
    );
    assert!(
      !library.contains(&"Mine".to_string())
    );
  }

  #[test]
  fn preview_truncates_with_remaining_count()
  {
    let library = default_library();
    let trip = library
      .iter()
      .find(|entry| entry.id == "lib_trip")
      .expect("trip template");

    let cut = preview(trip, LIBRARY_PREVIEW);
    assert_eq!(cut.shown.len(), 6);
    assert_eq!(cut.remaining, 2);
    assert_eq!(
      cut.remaining_label().as_deref(),
      Some("...2 more items")
    );

    let whole = preview(trip, 20);
    assert_eq!(whole.remaining, 0);
    assert!(whole.remaining_label().is_none());
  }
}
