use std::{
  collections::{BTreeSet, HashSet},
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
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen",
  ]
  .into_iter()
  .collect()
});

static RESERVED_TYPE_NAMES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "Box", "Client", "Clone", "Copy", "Default", "Display", "Option", "Result", "Self", "Send", "String", "Sync",
    "Type", "Vec",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Transliterates to ASCII, replaces invalid characters with underscores,
/// collapses consecutive underscores and trims them from both ends.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Splits a PascalCase or camelCase string into words.
/// Adjacent uppercase letters stay together (`"XMLParser"` -> `["XML", "Parser"]`).
pub(crate) fn split_pascal_case(name: &str) -> Vec<String> {
  if name.is_empty() {
    return vec![];
  }

  let mut words = vec![];
  let mut current_word = String::new();
  let chars: Vec<char> = name.chars().collect();

  for (i, &ch) in chars.iter().enumerate() {
    let starts_word = if ch.is_ascii_uppercase() && !current_word.is_empty() {
      let prev_is_lower = i > 0 && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
      let next_is_lower = i + 1 < chars.len() && chars[i + 1].is_ascii_lowercase();
      prev_is_lower || next_is_lower
    } else {
      false
    };

    if starts_word {
      words.push(std::mem::take(&mut current_word));
    }
    current_word.push(ch);
  }

  if !current_word.is_empty() {
    words.push(current_word);
  }

  words
}

/// Ensures a name is unique within a set of used names, appending a numeric suffix if needed.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  let mut i = 2;
  loop {
    let new_name = format!("{base_name}{i}");
    if !used_names.contains(&new_name) {
      return new_name;
    }
    i += 1;
  }
}

/// Converts a wire name into a valid Rust field or argument name (`snake_case`).
///
/// Keywords become raw identifiers. `self`, `Self`, `crate` and `super` cannot
/// be raw, so they get a `_` suffix instead. A leading digit gets an
/// underscore prefix and an empty result becomes `_`.
pub(crate) fn to_rust_field_name(name: &str) -> String {
  let mut ident = sanitize(name).to_snake_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if matches!(ident.as_str(), "self" | "Self" | "crate" | "super") {
    return format!("{ident}_");
  }

  if FORBIDDEN_IDENTIFIERS.contains(ident.as_str()) {
    return format!("r#{ident}");
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }

  ident
}

/// Converts a schema, property or operation name into a type identifier.
///
/// Words are capitalized and joined. A trailing `id` word is always rendered
/// as the `ID` acronym, so `pet_id`, `petId` and `petID` all become `PetID`,
/// while a word merely ending in those letters (`paid`) is left alone.
pub(crate) fn to_type_ident(name: &str) -> String {
  let sanitized = sanitize(name);
  let normalized = if sanitized.chars().any(|c| c.is_ascii_lowercase()) {
    sanitized
  } else {
    sanitized.to_lowercase()
  };

  let mut words: Vec<String> = normalized
    .split('_')
    .flat_map(split_pascal_case)
    .filter(|word| !word.is_empty())
    .collect();

  if let Some(last) = words.last_mut()
    && last.eq_ignore_ascii_case("id")
  {
    *last = "ID".to_string();
  }

  let mut ident: String = words.iter().map(|word| capitalize(word)).collect();

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if RESERVED_TYPE_NAMES.contains(ident.as_str()) {
    ident.push_str("Type");
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }

  ident
}

/// Derives a method name for an operation that declares no `operationId`.
///
/// `GET /pets/{petId}/owner` becomes `get_pets_by_pet_id_owner`.
pub(crate) fn derive_operation_name(method: &str, path: &str) -> String {
  let parts: Vec<String> = path
    .split('/')
    .filter(|segment| !segment.is_empty())
    .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(param) => format!("by_{param}"),
      None => segment.to_string(),
    })
    .collect();

  let raw = if parts.is_empty() {
    method.to_lowercase()
  } else {
    format!("{}_{}", method.to_lowercase(), parts.join("_"))
  };

  to_rust_field_name(&raw)
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
    None => String::new(),
  }
}
