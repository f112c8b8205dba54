use serde::{
  Deserialize,
  Serialize
};

use crate::catalog;

/// Category given to checklists the user
/// creates from scratch.
pub const MINE_CATEGORY: &str = "Mine";

/// Category assumed for library entries
/// (and their copies) that carry none.
pub const LIBRARY_CATEGORY: &str =
  "Library";

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Task {
  pub id:   String,
  pub text: String,
  #[serde(default)]
  pub done: bool
}

impl Task {
  pub fn new(
    id: String,
    text: String
  ) -> Self {
    Self {
      id,
      text,
      done: false
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct Checklist {
  pub id:       String,
  pub title:    String,
  #[serde(default = "default_category")]
  pub category: String,
  #[serde(default)]
  pub tasks:    Vec<Task>
}

impl Checklist {
  pub fn new_mine(
    id: String,
    title: String
  ) -> Self {
    Self {
      id,
      title,
      category: MINE_CATEGORY
        .to_string(),
      tasks: Vec::new()
    }
  }

  /// The category used for filtering;
  /// blank categories count as
  /// `"Library"`.
  pub fn category_or_default(
    &self
  ) -> &str {
    if self.category.trim().is_empty()
    {
      LIBRARY_CATEGORY
    } else {
      &self.category
    }
  }

  pub fn task(
    &self,
    task_id: &str
  ) -> Option<&Task> {
    self
      .tasks
      .iter()
      .find(|task| task.id == task_id)
  }

  pub fn has_completed(&self) -> bool {
    self.tasks.iter().any(|task| task.done)
  }

  pub fn done_count(&self) -> usize {
    self
      .tasks
      .iter()
      .filter(|task| task.done)
      .count()
  }
}

/// The whole persisted state tree.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct Store {
  #[serde(default)]
  pub my_lists: Vec<Checklist>,
  #[serde(
    default = "catalog::default_library"
  )]
  pub library:  Vec<Checklist>
}

impl Default for Store {
  fn default() -> Self {
    Self {
      my_lists: Vec::new(),
      library:  catalog::default_library()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub struct Stats {
  pub lists: usize,
  pub tasks: usize
}

impl Store {
  pub fn with_library(
    library: Vec<Checklist>
  ) -> Self {
    Self {
      my_lists: Vec::new(),
      library
    }
  }

  pub fn checklist(
    &self,
    checklist_id: &str
  ) -> Option<&Checklist> {
    self.my_lists.iter().find(
      |checklist| {
        checklist.id == checklist_id
      }
    )
  }

  pub fn library_entry(
    &self,
    library_id: &str
  ) -> Option<&Checklist> {
    self.library.iter().find(|entry| {
      entry.id == library_id
    })
  }

  pub fn stats(&self) -> Stats {
    Stats {
      lists: self.my_lists.len(),
      tasks: self
        .my_lists
        .iter()
        .map(|checklist| {
          checklist.tasks.len()
        })
        .sum()
    }
  }
}

fn default_category() -> String {
  LIBRARY_CATEGORY.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_fields_decode_with_defaults()
  {
    let raw = r#"{
      "myLists": [
        {"id": "c_1", "title": "Trip", "tasks": [{"id": "t_1", "text": "Pack"}]}
      ],
      "library": [{"id": "L1", "title": "Move"}]
    }"#;

    let store: Store =
      serde_json::from_str(raw)
        .expect("decode store");

    assert_eq!(
      store.my_lists[0].category,
      LIBRARY_CATEGORY
    );
    assert!(!store.my_lists[0].tasks[0].done);
    assert!(store.library[0].tasks.is_empty());
  }

  #[test]
  fn store_uses_camel_case_on_disk() {
    let json = serde_json::to_string(
      &Store::with_library(vec![])
    )
    .expect("encode store");

    assert_eq!(
      json,
      r#"{"myLists":[],"library":[]}"#
    );
  }

  #[test]
  fn blank_category_counts_as_library() {
    let checklist = Checklist {
      id:       "L1".to_string(),
      title:    "Move".to_string(),
      category: "  ".to_string(),
      tasks:    vec![]
    };
    assert_eq!(
      checklist.category_or_default(),
      LIBRARY_CATEGORY
    );
  }

  #[test]
  fn stats_count_only_my_lists() {
    let mut store = Store::default();
    let mut first = Checklist::new_mine(
      "c_1".to_string(),
      "One".to_string()
    );
    first.tasks.push(Task::new(
      "t_1".to_string(),
      "a".to_string()
    ));
    first.tasks.push(Task::new(
      "t_2".to_string(),
      "b".to_string()
    ));
    store.my_lists.push(first);
    store.my_lists.push(
      Checklist::new_mine(
        "c_2".to_string(),
        "Two".to_string()
      )
    );

    assert_eq!(
      store.stats(),
      Stats {
        lists: 2,
        tasks: 2
      }
    );
  }
}
