/// A run of text, either outside or
/// inside a search match.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Segment<'a> {
  Plain(&'a str),
  Match(&'a str)
}

impl<'a> Segment<'a> {
  pub fn text(self) -> &'a str {
    match self {
      | Self::Plain(text)
      | Self::Match(text) => text
    }
  }
}

/// Splits `text` around every
/// case-insensitive occurrence of the
/// trimmed `query`.
pub fn highlight<'a>(
  text: &'a str,
  query: &str
) -> Vec<Segment<'a>> {
  let needle: Vec<char> =
    query.trim().chars().collect();
  if needle.is_empty() || text.is_empty()
  {
    return vec![Segment::Plain(text)];
  }

  let mut segments = Vec::new();
  let mut plain_start = 0;
  let mut pos = 0;

  while pos < text.len() {
    if let Some(len) =
      match_len(&text[pos..], &needle)
    {
      if plain_start < pos {
        segments.push(Segment::Plain(
          &text[plain_start..pos]
        ));
      }
      segments.push(Segment::Match(
        &text[pos..pos + len]
      ));
      pos += len;
      plain_start = pos;
    } else {
      pos += text[pos..]
        .chars()
        .next()
        .map_or(1, char::len_utf8);
    }
  }

  if plain_start < text.len() {
    segments.push(Segment::Plain(
      &text[plain_start..]
    ));
  }
  segments
}

fn match_len(
  haystack: &str,
  needle: &[char]
) -> Option<usize> {
  let mut chars = haystack.char_indices();
  for expected in needle {
    let (_, actual) = chars.next()?;
    if !actual
      .to_lowercase()
      .eq(expected.to_lowercase())
    {
      return None;
    }
  }
  Some(
    chars
      .next()
      .map_or(haystack.len(), |(idx, _)| idx)
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn marks_every_occurrence_ignoring_case()
  {
    assert_eq!(
      highlight("Pack bags, pack snacks", "PACK"),
      vec![
        Segment::Match("Pack"),
        Segment::Plain(" bags, "),
        Segment::Match("pack"),
        Segment::Plain(" snacks"),
      ]
    );
  }

  #[test]
  fn empty_query_is_one_plain_segment() {
    assert_eq!(
      highlight("Pack bags", "   "),
      vec![Segment::Plain("Pack bags")]
    );
  }

  #[test]
  fn handles_multibyte_text() {
    let segments =
      highlight("Купить хлеб", "хлеб");
    assert_eq!(
      segments,
      vec![
        Segment::Plain("Купить "),
        Segment::Match("хлеб"),
      ]
    );
    let joined: String = segments
      .iter()
      .map(|segment| segment.text())
      .collect();
    assert_eq!(joined, "Купить хлеб");
  }

  #[test]
  fn no_match_returns_original_text() {
    assert_eq!(
      highlight("Milk", "eggs"),
      vec![Segment::Plain("Milk")]
    );
  }
}
