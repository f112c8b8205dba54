mod storage;

use donego_shared::view::categories;
use donego_shared::{
  CategoryFilter,
  Command,
  Effect,
  TimestampIds,
  ViewMode,
  ViewState,
  reduce
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html,
  use_effect_with,
  use_state
};

use crate::components::{
  CategoryChips,
  ChecklistCard,
  CreateForm,
  Header,
  LibraryCard,
  Onboarding,
  SearchBar
};

#[function_component(App)]
pub fn app() -> Html {
  let store = use_state(|| {
    storage::persistence().load_store()
  });
  let view = use_state(ViewState::default);
  let theme = use_state(storage::load_theme);
  let onboarded = use_state(|| {
    storage::persistence()
      .onboarding_dismissed()
  });

  {
    use_effect_with((), move |_| {
      tracing::debug!(
        "frontend mounted and hooks \
         initialized"
      );
      || ()
    });
  }

  {
    let store = store.clone();
    use_effect_with(
      (*store).clone(),
      move |store| {
        storage::persistence()
          .save_store(store);
        tracing::debug!(
          lists = store.my_lists.len(),
          "persisted checklists"
        );
        || ()
      }
    );
  }

  {
    let theme = theme.clone();
    use_effect_with(
      *theme,
      move |theme| {
        storage::apply_theme(*theme);
        storage::persistence()
          .save_theme(*theme);
        tracing::debug!(
          theme = theme.as_str(),
          "persisted theme"
        );
        || ()
      }
    );
  }

  let on_command = {
    let store = store.clone();
    let view = view.clone();
    Callback::from(
      move |command: Command| {
        if let Some(prompt) =
          command.confirmation_prompt()
          && !storage::confirm(prompt)
        {
          tracing::info!(
            command = command.name(),
            "canceled by user"
          );
          return;
        }

        let transition = reduce(
          &store,
          &command,
          &mut TimestampIds
        );
        if !transition.changed {
          tracing::debug!(
            command = command.name(),
            "command left state unchanged"
          );
          return;
        }

        for effect in &transition.effects
        {
          match effect {
            | Effect::Haptic => {
              storage::haptic()
            }
            | Effect::Track(event) => {
              tracing::info!(
                event = event.name(),
                "track"
              );
            }
            | Effect::ShowView(mode) => {
              let mut next =
                (*view).clone();
              next.switch_mode(*mode);
              view.set(next);
            }
          }
        }
        store.set(transition.store);
      }
    )
  };

  let on_toggle_view = {
    let view = view.clone();
    Callback::from(move |_: MouseEvent| {
      let mut next = (*view).clone();
      next.toggle_mode();
      view.set(next);
    })
  };

  let on_toggle_theme = {
    let theme = theme.clone();
    Callback::from(move |_: MouseEvent| {
      theme.set(theme.toggle());
    })
  };

  let on_dismiss_tips = {
    let onboarded = onboarded.clone();
    Callback::from(move |_: MouseEvent| {
      storage::persistence()
        .dismiss_onboarding();
      onboarded.set(true);
    })
  };

  let on_query = {
    let view = view.clone();
    Callback::from(move |query: String| {
      let mut next = (*view).clone();
      next.query = query;
      view.set(next);
    })
  };

  let on_category = {
    let view = view.clone();
    Callback::from(
      move |category: CategoryFilter| {
        let mut next = (*view).clone();
        next.category = category;
        view.set(next);
      }
    )
  };

  let chips = categories(&store, view.mode);
  let visible = view.visible(&store);
  let query = view.query.clone();

  let body = if visible.is_empty() {
    html! {
      <p class="empty">{ view.mode.empty_message() }</p>
    }
  } else {
    match view.mode {
      | ViewMode::Mine => html! {
        <div class="cards">
          {
            for visible.iter().map(|checklist| html! {
              <ChecklistCard
                key={checklist.id.clone()}
                checklist={(*checklist).clone()}
                query={query.clone()}
                on_command={on_command.clone()}
              />
            })
          }
        </div>
      },
      | ViewMode::Library => html! {
        <div class="cards">
          {
            for visible.iter().map(|entry| html! {
              <LibraryCard
                key={entry.id.clone()}
                entry={(*entry).clone()}
                query={query.clone()}
                on_command={on_command.clone()}
              />
            })
          }
        </div>
      }
    }
  };

  html! {
    <main class="app">
      <Header
        stats={store.stats()}
        mode={view.mode}
        theme={*theme}
        on_toggle_view={on_toggle_view}
        on_toggle_theme={on_toggle_theme}
      />
      if !*onboarded {
        <Onboarding on_dismiss={on_dismiss_tips} />
      }
      <CreateForm on_command={on_command.clone()} />
      <SearchBar query={view.query.clone()} on_query={on_query} />
      <CategoryChips
        chips={chips}
        selected={view.category.clone()}
        on_select={on_category}
      />
      { body }
    </main>
  }
}
