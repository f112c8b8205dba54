use std::collections::HashMap;
use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use donego_shared::Theme;
use donego_shared::view::LIBRARY_PREVIEW;
use tracing::{
  debug,
  info,
  trace,
  warn
};

const KNOWN_KEYS: &[&str] = &[
  "data.location",
  "default.command",
  "color",
  "confirm",
  "theme",
  "library.preview"
];

#[derive(Debug, Clone)]
pub struct Config {
  map: HashMap<String, String>,
  pub loaded_files: Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    let mut map = HashMap::new();
    for (key, value) in [
      ("data.location", "~/.donego"),
      ("default.command", "list"),
      ("color", "on"),
      ("confirm", "on"),
      ("theme", "light")
    ] {
      map.insert(
        key.to_string(),
        value.to_string()
      );
    }
    map.insert(
      "library.preview".to_string(),
      LIBRARY_PREVIEW.to_string()
    );

    Self {
      map,
      loaded_files: vec![]
    }
  }
}

impl Config {
  #[tracing::instrument(skip(
    rc_override
  ))]
  pub fn load(
    rc_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut cfg = Config::default();

    let rc = resolve_rc_path(
      rc_override
    )?;
    if let Some(path) = rc {
      info!(donegorc = %path.display(), "loading donegorc");
      cfg.load_file(&path)?;
    } else {
      debug!(
        "no donegorc found; using \
         defaults"
      );
    }

    Ok(cfg)
  }

  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.map.insert(key, v);
    }
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.map.get(key).cloned()
  }

  pub fn get_bool(
    &self,
    key: &str
  ) -> Option<bool> {
    self
      .map
      .get(key)
      .and_then(|v| parse_bool(v))
  }

  pub fn get_usize(
    &self,
    key: &str
  ) -> anyhow::Result<Option<usize>> {
    self
      .map
      .get(key)
      .map(|v| {
        v.trim().parse::<usize>().map_err(
          |_| {
            anyhow!(
              "invalid value for {key}: \
               {v}"
            )
          }
        )
      })
      .transpose()
  }

  /// The `theme` key, used when no theme
  /// preference has been saved yet.
  pub fn default_theme(
    &self
  ) -> anyhow::Result<Theme> {
    let raw = self
      .get("theme")
      .unwrap_or_else(|| {
        "light".to_string()
      });
    Theme::parse(&raw).ok_or_else(|| {
      anyhow!(
        "invalid theme setting: {raw}"
      )
    })
  }

  /// Rejects values DoneGo cannot use and
  /// warns about keys it does not know.
  #[tracing::instrument(skip(self))]
  pub fn validate(
    &self
  ) -> anyhow::Result<()> {
    for key in self.map.keys() {
      if !KNOWN_KEYS.contains(&key.as_str())
      {
        warn!(key = %key, "unknown donegorc key; ignoring");
      }
    }

    for key in ["color", "confirm"] {
      if let Some(raw) = self.get(key)
        && parse_bool(&raw).is_none()
      {
        return Err(anyhow!(
          "invalid value for {key}: \
           {raw} (expected on or off)"
        ));
      }
    }

    self.default_theme()?;
    if self.library_preview()? == 0 {
      return Err(anyhow!(
        "library.preview must be at \
         least 1"
      ));
    }
    Ok(())
  }

  pub fn library_preview(
    &self
  ) -> anyhow::Result<usize> {
    Ok(
      self
        .get_usize("library.preview")?
        .unwrap_or(LIBRARY_PREVIEW)
    )
  }

  #[tracing::instrument(skip(self))]
  fn load_file(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let path = expand_tilde(path);
    let text =
      fs::read_to_string(&path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;

    self
      .loaded_files
      .push(path.clone());

    let base_dir = path
      .parent()
      .map(|p| p.to_path_buf())
      .unwrap_or_else(|| {
        PathBuf::from(".")
      });

    for (line_num, raw_line) in
      text.lines().enumerate()
    {
      let mut line = raw_line.trim();
      if line.is_empty()
        || line.starts_with('#')
      {
        continue;
      }

      if let Some((before, _)) =
        line.split_once('#')
      {
        line = before.trim();
      }

      if line.is_empty() {
        continue;
      }

      if let Some(include_rest) =
        line.strip_prefix("include ")
      {
        let include_path =
          resolve_include_path(
            &base_dir,
            include_rest.trim()
          )?;
        debug!(
            file = %path.display(),
            include = %include_path.display(),
            line = line_num + 1,
            "processing include"
        );

        if include_path.exists() {
          self
            .load_file(&include_path)?;
        } else {
          warn!(include = %include_path.display(), "include file does not exist; skipping");
        }
        continue;
      }

      let (k, v) = line
        .split_once('=')
        .ok_or_else(|| {
          anyhow!(
            "invalid config line \
             {}:{}: {}",
            path.display(),
            line_num + 1,
            raw_line
          )
        })?;

      let key = k.trim().to_string();
      let value = v.trim().to_string();
      trace!(key = %key, value = %value, "loaded config key");
      self.map.insert(key, value);
    }

    Ok(())
  }
}

#[tracing::instrument(skip(
  cfg,
  override_dir
))]
pub fn resolve_data_dir(
  cfg: &Config,
  override_dir: Option<&Path>
) -> anyhow::Result<PathBuf> {
  let dir = if let Some(path) =
    override_dir
  {
    path.to_path_buf()
  } else if let Some(cfg_value) =
    cfg.get("data.location")
  {
    expand_tilde(Path::new(&cfg_value))
  } else {
    default_data_dir()?
  };

  if !dir.exists() {
    info!(dir = %dir.display(), "creating data directory");
    fs::create_dir_all(&dir)
      .with_context(|| {
        format!(
          "failed to create {}",
          dir.display()
        )
      })?;
  }

  Ok(dir)
}

#[tracing::instrument(skip(
  override_path
))]
fn resolve_rc_path(
  override_path: Option<&Path>
) -> anyhow::Result<Option<PathBuf>> {
  if let Some(path) = override_path {
    if path == Path::new("/dev/null") {
      return Ok(None);
    }
    return Ok(Some(path.to_path_buf()));
  }

  if let Ok(rc_env) =
    std::env::var("DONEGORC")
  {
    if rc_env == "/dev/null" {
      return Ok(None);
    }
    return Ok(Some(PathBuf::from(
      rc_env
    )));
  }

  let Some(home) = dirs::home_dir()
  else {
    warn!(
      "cannot determine home \
       directory; skipping donegorc"
    );
    return Ok(None);
  };
  let candidate = home.join(".donegorc");
  if candidate.exists() {
    return Ok(Some(candidate));
  }

  Ok(None)
}

fn default_data_dir()
-> anyhow::Result<PathBuf> {
  let home = dirs::home_dir()
    .ok_or_else(|| {
      anyhow!(
        "cannot determine home \
         directory"
      )
    })?;
  Ok(home.join(".donego"))
}

fn resolve_include_path(
  base_dir: &Path,
  include: &str
) -> anyhow::Result<PathBuf> {
  if include.trim().is_empty() {
    return Err(anyhow!(
      "include path cannot be empty"
    ));
  }

  let raw = PathBuf::from(include);
  let expanded = expand_tilde(&raw);
  if expanded.is_absolute() {
    Ok(expanded)
  } else {
    Ok(base_dir.join(expanded))
  }
}

fn expand_tilde(
  path: &Path
) -> PathBuf {
  let text = path.to_string_lossy();
  if let Some(rest) =
    text.strip_prefix("~/")
    && let Some(home) = dirs::home_dir()
  {
    return home.join(rest);
  }
  path.to_path_buf()
}

fn parse_bool(s: &str) -> Option<bool> {
  match s
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "y" | "yes" | "on"
    | "true" => Some(true),
    | "0" | "n" | "no" | "off"
    | "false" => Some(false),
    | _ => None
  }
}

#[cfg(test)]
mod tests {
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn defaults_cover_every_key() {
    let cfg = Config::default();
    assert_eq!(
      cfg.get("default.command").as_deref(),
      Some("list")
    );
    assert_eq!(cfg.get_bool("color"), Some(true));
    assert_eq!(
      cfg.library_preview().expect("preview"),
      LIBRARY_PREVIEW
    );
    assert_eq!(
      cfg.default_theme().expect("theme"),
      Theme::Light
    );
  }

  #[test]
  fn rc_file_with_include_and_comments() {
    let temp = tempdir().expect("tempdir");
    let extra = temp.path().join("extra.rc");
    fs::write(&extra, "theme = dark\n")
      .expect("write include");
    let rc = temp.path().join("donegorc");
    fs::write(
      &rc,
      "# settings\ncolor = off  # plain output\nlibrary.preview=3\ninclude extra.rc\ninclude missing.rc\n"
    )
    .expect("write rc");

    let cfg = Config::load(Some(&rc))
      .expect("load config");
    assert_eq!(cfg.get_bool("color"), Some(false));
    assert_eq!(
      cfg.library_preview().expect("preview"),
      3
    );
    assert_eq!(
      cfg.default_theme().expect("theme"),
      Theme::Dark
    );
    assert_eq!(cfg.loaded_files.len(), 2);
  }

  #[test]
  fn malformed_line_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let rc = temp.path().join("donegorc");
    fs::write(&rc, "color on\n")
      .expect("write rc");

    let err = Config::load(Some(&rc))
      .expect_err("should fail");
    assert!(
      format!("{err:#}")
        .contains("invalid config line")
    );
  }

  #[test]
  fn overrides_strip_rc_prefix() {
    let mut cfg = Config::default();
    cfg.apply_overrides([
      (
        "rc.confirm".to_string(),
        "off".to_string()
      ),
      (
        "library.preview".to_string(),
        "many".to_string()
      )
    ]);

    assert_eq!(
      cfg.get_bool("confirm"),
      Some(false)
    );
    assert!(cfg.library_preview().is_err());
  }

  #[test]
  fn validate_rejects_unusable_values() {
    assert!(
      Config::default().validate().is_ok()
    );

    for (key, value) in [
      ("theme", "sepia"),
      ("confirm", "maybe"),
      ("library.preview", "0"),
      ("library.preview", "six")
    ] {
      let mut cfg = Config::default();
      cfg.apply_overrides([(
        key.to_string(),
        value.to_string()
      )]);
      assert!(
        cfg.validate().is_err(),
        "{key}={value} should be rejected"
      );
    }

    let mut cfg = Config::default();
    cfg.apply_overrides([(
      "rc.unknown.key".to_string(),
      "x".to_string()
    )]);
    assert!(cfg.validate().is_ok());
  }

  #[test]
  fn dev_null_disables_rc_loading() {
    let cfg =
      Config::load(Some(Path::new(
        "/dev/null"
      )))
      .expect("load config");
    assert!(cfg.loaded_files.is_empty());
  }
}
