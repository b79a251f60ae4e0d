use std::{
  char::{ToLowercase, ToUppercase},
  collections::{BTreeSet, HashSet},
  iter::Peekable,
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

pub(crate) static FORBIDDEN_IDENTIFIERS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self", "Self",
  ]
  .into_iter()
  .collect()
});

/// Type names that would shadow prelude items or support types inside the generated modules.
static RESERVED_PASCAL_CASE: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "Box", "ByteStream", "Clone", "Copy", "Default", "Display", "FormFile", "Option", "Result", "Self", "Send",
    "String", "Sync", "Type", "Vec",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Upper-camel form of a document name.
///
/// Drops everything up to the last `/`. Names containing `_` or `-` are split on those
/// separators and each segment is capitalized with its remainder lower-cased; any other
/// name only has its first character upper-cased. Empty input is returned unchanged.
///
/// ```text
/// "pet_store"              -> "PetStore"
/// "X-RATE-limit"           -> "XRateLimit"
/// "#/components/schemas/o" -> "O"
/// "getUserById"            -> "GetUserById"
/// ```
pub(crate) fn to_upper_identifier(input: &str) -> String {
  if input.is_empty() {
    return input.to_string();
  }

  let name = input.rsplit('/').next().unwrap_or(input);

  if name.contains(['_', '-']) {
    name
      .split(['_', '-'])
      .map(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
          None => String::new(),
          Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        }
      })
      .collect()
  } else {
    upper_first(name)
  }
}

/// [`to_upper_identifier`] with its first character lower-cased.
pub(crate) fn to_lower_identifier(input: &str) -> String {
  let upper = to_upper_identifier(input);
  let mut chars = upper.chars();
  match chars.next() {
    None => upper,
    Some(first) => first.to_lowercase().chain(chars).collect(),
  }
}

fn upper_first(name: &str) -> String {
  let mut chars = name.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_uppercase().chain(chars).collect(),
  }
}

/// Transliterates to ASCII, replaces invalid characters with underscores, collapses
/// consecutive underscores, and trims leading or trailing underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Appends a numeric suffix until `base_name` no longer collides with `used_names`.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  (2..)
    .map(|i| format!("{base_name}{i}"))
    .find(|candidate| !used_names.contains(candidate))
    .unwrap_or_else(|| base_name.to_string())
}

/// Converts a string into a valid Rust field, method or parameter name (`snake_case`).
///
/// # Rules:
/// 1. A leading `-` is stripped and "negative_" is prepended to the result.
/// 2. The remainder is sanitized and converted to `snake_case`.
/// 3. `self`, `crate` and `super` get a trailing underscore, other keywords a raw prefix (`r#`).
/// 4. A leading digit is prefixed with `_`; an empty result becomes `_`.
pub(crate) fn to_rust_field_name(name: &str) -> String {
  let has_leading_minus = name.starts_with('-');
  let name_without_minus = name.strip_prefix('-').unwrap_or(name);

  let mut ident = sanitize(name_without_minus).to_snake_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if has_leading_minus {
    ident = format!("negative_{ident}");
  }

  if matches!(ident.as_str(), "self" | "crate" | "super") {
    ident.push('_');
    return ident;
  }

  if FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    return format!("r#{ident}");
  }

  prefix_if_digit_start(&mut ident, '_');
  ident
}

/// File stem and module name for a generated model (`PetOwner` -> `pet_owner`).
///
/// Keywords get a trailing underscore instead of a raw prefix (`Match` -> `match_`).
pub(crate) fn to_module_file_stem(type_name: &str) -> String {
  let stem = to_rust_field_name(type_name);
  match stem.strip_prefix("r#") {
    Some(keyword) => format!("{keyword}_"),
    None => stem,
  }
}

/// Converts a string into a valid Rust type name (`PascalCase`).
///
/// # Rules:
/// 1. A leading `-` is stripped and "Negative" is prepended to the result.
/// 2. Mixed-case input without separators keeps its capitalization.
/// 3. Anything else is sanitized and capitalized word by word.
/// 4. Names that shadow prelude or support types get a `Model` suffix.
/// 5. A leading digit is prefixed with `T`; an empty result becomes `Unnamed`.
pub(crate) fn to_rust_type_name(name: &str) -> String {
  let has_leading_minus = name.starts_with('-');
  let name_without_minus = name.strip_prefix('-').unwrap_or(name);

  let has_separators = name_without_minus.contains(['-', '_', '.', ' ']);
  let has_upper = name_without_minus.chars().any(|c| c.is_ascii_uppercase());
  let has_lower = name_without_minus.chars().any(|c| c.is_ascii_lowercase());
  let appears_mixed_case = !has_separators && has_upper && has_lower;

  let ascii = any_ascii(name_without_minus);
  let mut ident = if appears_mixed_case {
    let cleaned: String = ascii.chars().filter(char::is_ascii_alphanumeric).collect();
    upper_first(&cleaned)
  } else {
    ascii
      .chars()
      .capitalize_words_with_boundaries()
      .filter(char::is_ascii_alphanumeric)
      .collect()
  };

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if has_leading_minus {
    ident = format!("Negative{ident}");
  }

  if RESERVED_PASCAL_CASE.contains(ident.as_str()) {
    ident.push_str("Model");
  }

  prefix_if_digit_start(&mut ident, 'T');
  ident
}

fn prefix_if_digit_start(ident: &mut String, prefix: char) {
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, prefix);
  }
}

/// Word capitalization over a char iterator.
pub trait CapitalizeWordsExt: Iterator<Item = char> {
  fn capitalize_words_with_boundaries(self) -> CapitalizeWordsWithBoundaries<Self>
  where
    Self: Sized;
}

impl<I> CapitalizeWordsExt for I
where
  I: Iterator<Item = char>,
{
  fn capitalize_words_with_boundaries(self) -> CapitalizeWordsWithBoundaries<Self>
  where
    Self: Sized,
  {
    CapitalizeWordsWithBoundaries {
      iter: self.peekable(),
      capitalize_next: true,
      prev_was_lower: false,
      pending_upper: None,
      pending_lower: None,
    }
  }
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts after a non-alphanumeric character, at a lower-to-upper transition, or at
/// the last capital of an acronym run that precedes a lower-case letter.
pub struct CapitalizeWordsWithBoundaries<I>
where
  I: Iterator<Item = char>,
{
  iter: Peekable<I>,
  capitalize_next: bool,
  prev_was_lower: bool,
  pending_upper: Option<ToUppercase>,
  pending_lower: Option<ToLowercase>,
}

impl<I> Iterator for CapitalizeWordsWithBoundaries<I>
where
  I: Iterator<Item = char>,
{
  type Item = char;

  fn next(&mut self) -> Option<Self::Item> {
    if let Some(c) = self.pending_upper.as_mut().and_then(Iterator::next) {
      return Some(c);
    }
    self.pending_upper = None;

    if let Some(c) = self.pending_lower.as_mut().and_then(Iterator::next) {
      return Some(c);
    }
    self.pending_lower = None;

    let c = self.iter.next()?;

    if !c.is_ascii_alphanumeric() {
      self.capitalize_next = self.iter.peek().is_some_and(char::is_ascii_alphanumeric);
      self.prev_was_lower = false;
      return Some(c);
    }

    let is_lower = c.is_ascii_lowercase();
    let is_upper = c.is_ascii_uppercase();

    let should_capitalize = self.capitalize_next
      || (self.prev_was_lower && is_upper)
      || (is_upper && self.iter.peek().is_some_and(char::is_ascii_lowercase));

    self.prev_was_lower = is_lower;
    self.capitalize_next = false;

    if should_capitalize {
      let mut upper = c.to_uppercase();
      let first = upper.next();
      self.pending_upper = Some(upper);
      first
    } else {
      let mut lower = c.to_lowercase();
      let first = lower.next();
      self.pending_lower = Some(lower);
      first
    }
  }
}
