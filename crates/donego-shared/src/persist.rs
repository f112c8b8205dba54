//! Best-effort persistence of the store
//! and the two preference flags.
//!
//! Each value lives in its own string
//! slot of a [`KeyValueStore`]. Reads that
//! fail or do not parse fall back to
//! defaults; writes that fail are logged
//! and otherwise ignored.

use std::collections::BTreeMap;

use anyhow::Context;
use tracing::{
  debug,
  warn
};

use crate::model::Store;

pub const STATE_KEY: &str = "donego.v1";
pub const ONBOARD_KEY: &str =
  "donego.onboarded";
pub const THEME_KEY: &str =
  "donego.theme";

/// A string-keyed slot storage such as
/// `localStorage` or a data directory.
pub trait KeyValueStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: BTreeMap<String, String>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entry(
    mut self,
    key: &str,
    value: &str
  ) -> Self {
    self
      .entries
      .insert(key.to_string(), value.to_string());
    self
  }
}

impl KeyValueStore for MemoryStore {
  fn get(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .entries
      .insert(key.to_string(), value.to_string());
    Ok(())
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
pub enum Theme {
  #[default]
  Light,
  Dark
}

impl Theme {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Light => "light",
      | Self::Dark => "dark"
    }
  }

  pub fn parse(raw: &str) -> Option<Self> {
    match raw.trim() {
      | "light" => Some(Self::Light),
      | "dark" => Some(Self::Dark),
      | _ => None
    }
  }

  pub fn toggle(self) -> Self {
    match self {
      | Self::Light => Self::Dark,
      | Self::Dark => Self::Light
    }
  }
}

pub fn encode_store(
  store: &Store
) -> anyhow::Result<String> {
  serde_json::to_string(store)
    .context("failed to encode store")
}

pub fn decode_store(
  raw: &str
) -> anyhow::Result<Store> {
  serde_json::from_str(raw)
    .context("failed to decode store")
}

#[derive(Debug, Clone)]
pub struct Persistence<S> {
  storage: S
}

impl<S: KeyValueStore> Persistence<S> {
  pub fn new(storage: S) -> Self {
    Self { storage }
  }

  pub fn into_inner(self) -> S {
    self.storage
  }

  /// Reads the store slot. Missing or
  /// unreadable state yields
  /// [`Store::default`].
  #[tracing::instrument(skip(self))]
  pub fn load_store(&self) -> Store {
    let raw = match self
      .storage
      .get(STATE_KEY)
    {
      | Ok(Some(raw)) => raw,
      | Ok(None) => {
        debug!(
          key = STATE_KEY,
          "no saved state; starting \
           from defaults"
        );
        return Store::default();
      }
      | Err(error) => {
        warn!(
          key = STATE_KEY,
          error = %format!("{error:#}"),
          "failed reading saved state"
        );
        return Store::default();
      }
    };

    match decode_store(&raw) {
      | Ok(store) => {
        debug!(
          lists = store.my_lists.len(),
          library = store.library.len(),
          "loaded saved state"
        );
        store
      }
      | Err(error) => {
        warn!(
          key = STATE_KEY,
          error = %format!("{error:#}"),
          "saved state is malformed; \
           starting from defaults"
        );
        Store::default()
      }
    }
  }

  #[tracing::instrument(skip(
    self, store
  ))]
  pub fn save_store(
    &mut self,
    store: &Store
  ) {
    let result = encode_store(store)
      .and_then(|json| {
        self.storage.set(STATE_KEY, &json)
      });
    match result {
      | Ok(()) => {
        debug!(
          lists = store.my_lists.len(),
          "saved state"
        );
      }
      | Err(error) => {
        warn!(
          key = STATE_KEY,
          error = %format!("{error:#}"),
          "failed saving state"
        );
      }
    }
  }

  pub fn onboarding_dismissed(
    &self
  ) -> bool {
    matches!(
      self.storage.get(ONBOARD_KEY),
      Ok(Some(value)) if !value.is_empty()
    )
  }

  pub fn dismiss_onboarding(&mut self) {
    self.write_flag(ONBOARD_KEY, "1");
  }

  /// The saved theme, if one was ever
  /// chosen.
  pub fn stored_theme(
    &self
  ) -> Option<Theme> {
    match self.storage.get(THEME_KEY) {
      | Ok(Some(raw)) => Theme::parse(&raw),
      | Ok(None) => None,
      | Err(error) => {
        warn!(
          key = THEME_KEY,
          error = %format!("{error:#}"),
          "failed reading theme"
        );
        None
      }
    }
  }

  pub fn save_theme(
    &mut self,
    theme: Theme
  ) {
    self.write_flag(
      THEME_KEY,
      theme.as_str()
    );
  }

  fn write_flag(
    &mut self,
    key: &str,
    value: &str
  ) {
    if let Err(error) =
      self.storage.set(key, value)
    {
      warn!(
        key,
        error = %format!("{error:#}"),
        "failed saving preference"
      );
    }
  }
}
