use tracing::debug;

use crate::ids::{
  CHECKLIST_PREFIX,
  IdSource,
  TASK_PREFIX
};
use crate::model::{
  Checklist,
  Store,
  Task
};
use crate::view::ViewMode;

// Every operation returns a new `Store`;
// invalid input or unknown ids hand back
// an unchanged copy.
impl Store {
  pub fn create(
    &self,
    title: &str,
    ids: &mut impl IdSource
  ) -> Self {
    let title = title.trim();
    if title.is_empty() {
      return self.clone();
    }

    let checklist = Checklist::new_mine(
      ids.next_id(CHECKLIST_PREFIX),
      title.to_string()
    );
    let mut my_lists =
      Vec::with_capacity(
        self.my_lists.len() + 1
      );
    my_lists.push(checklist);
    my_lists
      .extend(self.my_lists.iter().cloned());

    Self {
      my_lists,
      library: self.library.clone()
    }
  }

  pub fn remove(
    &self,
    checklist_id: &str
  ) -> Self {
    Self {
      my_lists: self
        .my_lists
        .iter()
        .filter(|checklist| {
          checklist.id != checklist_id
        })
        .cloned()
        .collect(),
      library:  self.library.clone()
    }
  }

  pub fn add_task(
    &self,
    checklist_id: &str,
    text: &str,
    ids: &mut impl IdSource
  ) -> Self {
    let text = text.trim();
    if text.is_empty()
      || self
        .checklist(checklist_id)
        .is_none()
    {
      return self.clone();
    }

    let task = Task::new(
      ids.next_id(TASK_PREFIX),
      text.to_string()
    );
    self.map_checklist(
      checklist_id,
      |checklist| {
        let mut tasks =
          Vec::with_capacity(
            checklist.tasks.len() + 1
          );
        tasks.push(task);
        tasks.extend(
          checklist.tasks.iter().cloned()
        );
        Checklist {
          tasks,
          ..checklist.clone()
        }
      }
    )
  }

  pub fn toggle_task(
    &self,
    checklist_id: &str,
    task_id: &str
  ) -> Self {
    self.map_task(
      checklist_id,
      task_id,
      |task| Task {
        done: !task.done,
        ..task.clone()
      }
    )
  }

  pub fn remove_task(
    &self,
    checklist_id: &str,
    task_id: &str
  ) -> Self {
    self.map_checklist(
      checklist_id,
      |checklist| Checklist {
        tasks: checklist
          .tasks
          .iter()
          .filter(|task| task.id != task_id)
          .cloned()
          .collect(),
        ..checklist.clone()
      }
    )
  }

  pub fn rename_task(
    &self,
    checklist_id: &str,
    task_id: &str,
    text: &str
  ) -> Self {
    let text = text.trim();
    if text.is_empty() {
      return self.clone();
    }

    self.map_task(
      checklist_id,
      task_id,
      |task| Task {
        text: text.to_string(),
        ..task.clone()
      }
    )
  }

  pub fn edit_title(
    &self,
    checklist_id: &str,
    title: &str
  ) -> Self {
    let title = title.trim();
    if title.is_empty() {
      return self.clone();
    }

    self.map_checklist(
      checklist_id,
      |checklist| Checklist {
        title: title.to_string(),
        ..checklist.clone()
      }
    )
  }

  pub fn reset_tasks(
    &self,
    checklist_id: &str
  ) -> Self {
    self.map_checklist(
      checklist_id,
      |checklist| Checklist {
        tasks: checklist
          .tasks
          .iter()
          .map(|task| Task {
            done: false,
            ..task.clone()
          })
          .collect(),
        ..checklist.clone()
      }
    )
  }

  pub fn clear_completed(
    &self,
    checklist_id: &str
  ) -> Self {
    self.map_checklist(
      checklist_id,
      |checklist| Checklist {
        tasks: checklist
          .tasks
          .iter()
          .filter(|task| !task.done)
          .cloned()
          .collect(),
        ..checklist.clone()
      }
    )
  }

  /// Deep-copies a library entry into
  /// `my_lists` with fresh ids. The
  /// library itself is left untouched.
  pub fn copy_from_library(
    &self,
    library_id: &str,
    ids: &mut impl IdSource
  ) -> Self {
    let Some(entry) =
      self.library_entry(library_id)
    else {
      return self.clone();
    };

    let clone = Checklist {
      id:       ids
        .next_id(CHECKLIST_PREFIX),
      title:    entry.title.clone(),
      category: entry
        .category_or_default()
        .to_string(),
      tasks:    entry
        .tasks
        .iter()
        .map(|task| {
          Task::new(
            ids.next_id(TASK_PREFIX),
            task.text.clone()
          )
        })
        .collect()
    };

    let mut my_lists =
      Vec::with_capacity(
        self.my_lists.len() + 1
      );
    my_lists.push(clone);
    my_lists
      .extend(self.my_lists.iter().cloned());

    Self {
      my_lists,
      library: self.library.clone()
    }
  }

  fn map_checklist(
    &self,
    checklist_id: &str,
    update: impl FnOnce(
      &Checklist
    ) -> Checklist
  ) -> Self {
    let mut update = Some(update);
    Self {
      my_lists: self
        .my_lists
        .iter()
        .map(|checklist| {
          if checklist.id == checklist_id
            && let Some(update) =
              update.take()
          {
            update(checklist)
          } else {
            checklist.clone()
          }
        })
        .collect(),
      library:  self.library.clone()
    }
  }

  fn map_task(
    &self,
    checklist_id: &str,
    task_id: &str,
    update: impl FnOnce(&Task) -> Task
  ) -> Self {
    self.map_checklist(
      checklist_id,
      |checklist| {
        let mut update = Some(update);
        Checklist {
          tasks: checklist
            .tasks
            .iter()
            .map(|task| {
              if task.id == task_id
                && let Some(update) =
                  update.take()
              {
                update(task)
              } else {
                task.clone()
              }
            })
            .collect(),
          ..checklist.clone()
        }
      }
    )
  }
}

/// A user intent, dispatched through
/// [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Create {
    title: String
  },
  Remove {
    checklist: String
  },
  AddTask {
    checklist: String,
    text:      String
  },
  ToggleTask {
    checklist: String,
    task:      String
  },
  RemoveTask {
    checklist: String,
    task:      String
  },
  RenameTask {
    checklist: String,
    task:      String,
    text:      String
  },
  EditTitle {
    checklist: String,
    title:     String
  },
  ResetTasks {
    checklist: String
  },
  ClearCompleted {
    checklist: String
  },
  CopyFromLibrary {
    library: String
  }
}

impl Command {
  /// Destructive commands the front-end
  /// must confirm with the user before
  /// dispatching.
  pub fn needs_confirmation(
    &self
  ) -> bool {
    matches!(
      self,
      Self::Remove { .. }
        | Self::RemoveTask { .. }
        | Self::ResetTasks { .. }
    )
  }

  pub fn confirmation_prompt(
    &self
  ) -> Option<&'static str> {
    match self {
      | Self::Remove { .. } => {
        Some("Delete this checklist?")
      }
      | Self::RemoveTask { .. } => {
        Some("Delete this task?")
      }
      | Self::ResetTasks { .. } => {
        Some(
          "Uncheck every task in this \
           checklist?"
        )
      }
      | _ => None
    }
  }

  pub fn name(&self) -> &'static str {
    match self {
      | Self::Create { .. } => "create",
      | Self::Remove { .. } => "remove",
      | Self::AddTask { .. } => {
        "add_task"
      }
      | Self::ToggleTask { .. } => {
        "toggle_task"
      }
      | Self::RemoveTask { .. } => {
        "remove_task"
      }
      | Self::RenameTask { .. } => {
        "rename_task"
      }
      | Self::EditTitle { .. } => {
        "edit_title"
      }
      | Self::ResetTasks { .. } => {
        "reset_tasks"
      }
      | Self::ClearCompleted { .. } => {
        "clear_completed"
      }
      | Self::CopyFromLibrary {
        ..
      } => "copy_from_library"
    }
  }

  fn effects(&self) -> Vec<Effect> {
    match self {
      | Self::Create { .. } => {
        vec![Effect::Track(
          TrackEvent::ChecklistCreate
        )]
      }
      | Self::Remove { .. } => {
        vec![Effect::Track(
          TrackEvent::ChecklistDelete
        )]
      }
      | Self::AddTask { .. } => {
        vec![Effect::Track(
          TrackEvent::TaskAdd
        )]
      }
      | Self::ToggleTask { .. } => {
        vec![Effect::Haptic]
      }
      | Self::RemoveTask { .. } => {
        vec![Effect::Track(
          TrackEvent::TaskDelete
        )]
      }
      | Self::RenameTask { .. } => {
        vec![Effect::Track(
          TrackEvent::TaskRename
        )]
      }
      | Self::CopyFromLibrary {
        ..
      } => vec![
        Effect::Track(
          TrackEvent::LibraryCopy
        ),
        Effect::ShowView(ViewMode::Mine),
      ],
      | Self::EditTitle { .. }
      | Self::ResetTasks { .. }
      | Self::ClearCompleted { .. } => {
        Vec::new()
      }
    }
  }
}

/// Usage events a front-end may record
/// after a successful command.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum TrackEvent {
  ChecklistCreate,
  ChecklistDelete,
  TaskAdd,
  TaskRename,
  TaskDelete,
  LibraryCopy
}

impl TrackEvent {
  pub fn name(self) -> &'static str {
    match self {
      | Self::ChecklistCreate => {
        "checklist_create"
      }
      | Self::ChecklistDelete => {
        "checklist_delete"
      }
      | Self::TaskAdd => "task_add",
      | Self::TaskRename => "task_rename",
      | Self::TaskDelete => "task_delete",
      | Self::LibraryCopy => "library_copy"
    }
  }
}

/// Post-conditions the caller performs
/// once a command has changed the state.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Effect {
  Haptic,
  Track(TrackEvent),
  ShowView(ViewMode)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
  pub store:   Store,
  pub changed: bool,
  pub effects: Vec<Effect>
}

pub fn reduce(
  state: &Store,
  command: &Command,
  ids: &mut impl IdSource
) -> Transition {
  let next = match command {
    | Command::Create { title } => {
      state.create(title, ids)
    }
    | Command::Remove { checklist } => {
      state.remove(checklist)
    }
    | Command::AddTask {
      checklist,
      text
    } => state.add_task(checklist, text, ids),
    | Command::ToggleTask {
      checklist,
      task
    } => state.toggle_task(checklist, task),
    | Command::RemoveTask {
      checklist,
      task
    } => state.remove_task(checklist, task),
    | Command::RenameTask {
      checklist,
      task,
      text
    } => {
      state.rename_task(checklist, task, text)
    }
    | Command::EditTitle {
      checklist,
      title
    } => state.edit_title(checklist, title),
    | Command::ResetTasks { checklist } => {
      state.reset_tasks(checklist)
    }
    | Command::ClearCompleted {
      checklist
    } => state.clear_completed(checklist),
    | Command::CopyFromLibrary {
      library
    } => {
      state.copy_from_library(library, ids)
    }
  };

  let changed = next != *state;
  let effects = if changed {
    command.effects()
  } else {
    Vec::new()
  };

  debug!(
    command = command.name(),
    changed,
    lists = next.my_lists.len(),
    "reduced command"
  );

  Transition {
    store: next,
    changed,
    effects
  }
}
