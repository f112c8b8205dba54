use chrono::Utc;
use uuid::Uuid;

pub const CHECKLIST_PREFIX: &str = "c_";
pub const TASK_PREFIX: &str = "t_";

const BASE36: &[u8; 36] =
  b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 6;

/// Source of fresh identifiers for
/// checklists and tasks.
pub trait IdSource {
  fn next_id(
    &mut self,
    prefix: &str
  ) -> String;
}

/// Millisecond timestamp plus a short
/// random tail, both in base 36. There
/// is no collision check.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIds;

impl IdSource for TimestampIds {
  fn next_id(
    &mut self,
    prefix: &str
  ) -> String {
    let millis = u128::try_from(
      Utc::now().timestamp_millis()
    )
    .unwrap_or(0);
    let random =
      Uuid::new_v4().as_u128();

    format!(
      "{prefix}{}{}",
      to_base36(millis),
      random_suffix(random)
    )
  }
}

/// Deterministic ids (`c_1`, `t_2`, ...)
/// for tests and fixtures.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
  next: u64
}

impl SequentialIds {
  pub fn new() -> Self {
    Self::default()
  }
}

impl IdSource for SequentialIds {
  fn next_id(
    &mut self,
    prefix: &str
  ) -> String {
    self.next =
      self.next.saturating_add(1);
    format!("{prefix}{}", self.next)
  }
}

fn to_base36(mut value: u128) -> String {
  if value == 0 {
    return "0".to_string();
  }

  let mut digits = Vec::new();
  while value > 0 {
    digits.push(
      BASE36[(value % 36) as usize]
    );
    value /= 36;
  }
  digits.reverse();
  String::from_utf8_lossy(&digits)
    .into_owned()
}

fn random_suffix(
  mut random: u128
) -> String {
  let mut out =
    String::with_capacity(
      RANDOM_SUFFIX_LEN
    );
  for _ in 0..RANDOM_SUFFIX_LEN {
    out.push(char::from(
      BASE36[(random % 36) as usize]
    ));
    random /= 36;
  }
  out
}
