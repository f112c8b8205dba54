//! Built-in library of template
//! checklists offered for copying.

use crate::model::{
  Checklist,
  Task
};

struct Template {
  id:       &'static str,
  title:    &'static str,
  category: &'static str,
  tasks:    &'static [&'static str]
}

const TEMPLATES: &[Template] = &[
  Template {
    id:       "lib_trip",
    title:    "Trip packing",
    category: "Travel",
    tasks:    &[
      "Passport and tickets",
      "Phone charger",
      "Toiletries",
      "Change of clothes",
      "Medications",
      "Headphones",
      "Travel adapter",
      "Snacks for the road"
    ]
  },
  Template {
    id:       "lib_weekend",
    title:    "Weekend getaway",
    category: "Travel",
    tasks:    &[
      "Book accommodation",
      "Check the weather",
      "Water the plants",
      "Pack a day bag"
    ]
  },
  Template {
    id:       "lib_move",
    title:    "Moving house",
    category: "Home",
    tasks:    &[
      "Book a moving truck",
      "Collect boxes",
      "Label boxes by room",
      "Transfer utilities",
      "Update postal address",
      "Defrost the fridge",
      "Hand over old keys"
    ]
  },
  Template {
    id:       "lib_cleaning",
    title:    "Weekly cleaning",
    category: "Home",
    tasks:    &[
      "Vacuum floors",
      "Clean the bathroom",
      "Change bed linen",
      "Take out recycling",
      "Wipe kitchen surfaces"
    ]
  },
  Template {
    id:       "lib_first_day",
    title:    "First day at work",
    category: "Work",
    tasks:    &[
      "Set up laptop",
      "Meet the team",
      "Read onboarding docs",
      "Request system access",
      "Schedule one-on-one"
    ]
  },
  Template {
    id:       "lib_groceries",
    title:    "Grocery run",
    category: "Shopping",
    tasks:    &[
      "Milk",
      "Bread",
      "Eggs",
      "Fruit",
      "Vegetables",
      "Coffee"
    ]
  },
  Template {
    id:       "lib_morning",
    title:    "Morning routine",
    category: "Health",
    tasks:    &[
      "Drink a glass of water",
      "Stretch for ten minutes",
      "Eat breakfast",
      "Plan the day"
    ]
  }
];

/// Materializes the built-in library.
/// Task ids are derived from the entry id
/// so the seed is stable across runs.
pub fn default_library() -> Vec<Checklist> {
  TEMPLATES
    .iter()
    .map(|template| Checklist {
      id:       template.id.to_string(),
      title:    template
        .title
        .to_string(),
      category: template
        .category
        .to_string(),
      tasks:    template
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, text)| {
          Task::new(
            format!(
              "{}_t{}",
              template.id,
              idx + 1
            ),
            (*text).to_string()
          )
        })
        .collect()
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;

  #[test]
  fn library_ids_are_unique() {
    let library = default_library();
    let ids: BTreeSet<&str> = library
      .iter()
      .map(|entry| entry.id.as_str())
      .collect();
    assert_eq!(ids.len(), library.len());

    for entry in &library {
      let task_ids: BTreeSet<&str> = entry
        .tasks
        .iter()
        .map(|task| task.id.as_str())
        .collect();
      assert_eq!(
        task_ids.len(),
        entry.tasks.len(),
        "duplicate task id in {}",
        entry.id
      );
    }
  }

  #[test]
  fn library_starts_unchecked() {
    assert!(default_library().iter().all(
      |entry| {
        !entry.title.is_empty()
          && !entry.tasks.is_empty()
          && !entry.has_completed()
      }
    ));
  }
}
