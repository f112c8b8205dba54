use anyhow::anyhow;
use donego_shared::{
  KeyValueStore,
  Persistence,
  Theme
};

/// `window.localStorage` as a key/value
/// slot store.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
  fn storage(
    &self
  ) -> anyhow::Result<web_sys::Storage> {
    web_sys::window()
      .ok_or_else(|| anyhow!("no window"))?
      .local_storage()
      .map_err(|error| {
        anyhow!(
          "localStorage denied: \
           {error:?}"
        )
      })?
      .ok_or_else(|| {
        anyhow!(
          "localStorage unavailable"
        )
      })
  }
}

impl KeyValueStore for LocalStorage {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    self.storage()?.get_item(key).map_err(
      |error| {
        anyhow!(
          "failed reading {key}: \
           {error:?}"
        )
      }
    )
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .storage()?
      .set_item(key, value)
      .map_err(|error| {
        anyhow!(
          "failed writing {key}: \
           {error:?}"
        )
      })
  }
}

pub fn persistence()
-> Persistence<LocalStorage> {
  Persistence::new(LocalStorage)
}

/// The saved theme, else the system
/// colour-scheme preference.
pub fn load_theme() -> Theme {
  if let Some(theme) =
    persistence().stored_theme()
  {
    return theme;
  }

  let prefers_dark = web_sys::window()
    .and_then(|window| {
      window
        .match_media(
          "(prefers-color-scheme: \
           dark)"
        )
        .ok()
        .flatten()
    })
    .is_some_and(|query| query.matches());

  if prefers_dark {
    Theme::Dark
  } else {
    Theme::Light
  }
}

pub fn apply_theme(theme: Theme) {
  let root =
    gloo::utils::document_element();
  if let Err(error) = root.set_attribute(
    "data-theme",
    theme.as_str()
  ) {
    tracing::warn!(
      ?error,
      "failed applying theme"
    );
  }
}

/// Short vibration after a toggle;
/// silently ignored where unsupported.
pub fn haptic() {
  let navigator =
    gloo::utils::window().navigator();
  if !navigator.vibrate_with_duration(10)
  {
    tracing::trace!(
      "vibration not available"
    );
  }
}

pub fn confirm(prompt: &str) -> bool {
  gloo::utils::window()
    .confirm_with_message(prompt)
    .unwrap_or(false)
}
