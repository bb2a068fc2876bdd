//! Text normalization shared by the readers and the merger.
//!
//! # Comparison
//!
//! Case-insensitive comparison folds both sides to upper case, char by char,
//! and then compares code points. Sorting therefore places `_` after letters,
//! matching the ordering the catalog data was originally published with.
//!
//! # Examples
//!
//! ```
//! use pvc_core::text::{canonical_name, slug, to_display_version};
//!
//! assert_eq!(slug("WinForms Controls"), "winforms-controls");
//! assert_eq!(canonical_name("  WinForms \t Controls "), "WinForms Controls");
//! assert_eq!(to_display_version("20251.1.710"), "2025v1(710)");
//! ```

use std::cmp::Ordering;

use smallvec::SmallVec;
use unicode_general_category::{GeneralCategory, get_general_category};

/// Fallback identifier used when a name has no letters or digits at all.
pub const DEFAULT_SLUG: &str = "product";

/// Returns `true` if the string is empty or only whitespace.
#[inline]
#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Returns `true` if the option is `None` or holds a blank string.
#[inline]
#[must_use]
pub fn is_blank_opt(s: Option<&str>) -> bool {
    s.is_none_or(is_blank)
}

/// Upper-case form of `c` under simple (one-to-one) case mapping.
///
/// Characters whose upper case spans several chars (`ß` → `SS`) are kept
/// as they are, so folding never changes the length of a string.
#[inline]
#[must_use]
pub fn fold_char(c: char) -> char {
    single(c.to_uppercase()).unwrap_or(c)
}

#[inline]
fn lower_char(c: char) -> char {
    single(c.to_lowercase()).unwrap_or(c)
}

fn single(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Compares two strings ignoring case.
#[must_use]
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars().map(fold_char).cmp(b.chars().map(fold_char))
}

/// Returns `true` if two strings are equal ignoring case.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    cmp_ignore_case(a, b) == Ordering::Equal
}

/// Case-folded form of a string, for use as a hash key.
#[must_use]
pub fn fold_case(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Derives an identifier-safe slug from a display name.
///
/// The input is lowercased char by char, every run of characters that are not
/// letters (`L*`) or decimal digits (`Nd`) becomes a single `-`, and
/// leading/trailing hyphens are removed. A name without any letters or digits
/// yields [`DEFAULT_SLUG`].
///
/// Applying `slug` to its own output returns the same string.
///
/// # Examples
///
/// ```
/// use pvc_core::text::slug;
///
/// assert_eq!(slug("WinFormControls"), "winformcontrols");
/// assert_eq!(slug("  ASP.NET  MVC!! "), "asp-net-mvc");
/// assert_eq!(slug("---"), "product");
/// ```
#[must_use]
pub fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for c in raw.trim().chars().map(lower_char) {
        if is_slug_char(c) {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if out.is_empty() {
        DEFAULT_SLUG.to_owned()
    } else {
        out
    }
}

fn is_slug_char(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

/// Normalizes a product name for grouping: trimmed, inner whitespace runs
/// collapsed to one space. Blank input yields an empty string.
///
/// Case is preserved; callers compare the result case-insensitively.
#[must_use]
pub fn canonical_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes a raw version token for grouping (trimmed).
#[must_use]
pub fn canonical_version(version: Option<&str>) -> String {
    version.map(str::trim).unwrap_or_default().to_owned()
}

/// Best-effort conversion of a raw build number into a display label.
///
/// `"20251.1.710"` becomes `"2025v1(710)"`: the year is the first four
/// characters of the first segment, the quarter its fifth character, the build
/// the last segment. Inputs with fewer than three dot-separated segments, or a
/// first segment shorter than five characters, are returned unchanged.
///
/// # Examples
///
/// ```
/// use pvc_core::text::to_display_version;
///
/// assert_eq!(to_display_version("20243.2.655"), "2024v3(655)");
/// assert_eq!(to_display_version("4.8.20251"), "4.8.20251");
/// assert_eq!(to_display_version("20251.710"), "20251.710");
/// ```
#[must_use]
pub fn to_display_version(version: &str) -> String {
    let parts: SmallVec<[&str; 4]> = version.split('.').filter(|p| !p.is_empty()).collect();
    if parts.len() < 3 {
        return version.to_owned();
    }

    let head: SmallVec<[char; 8]> = parts[0].chars().collect();
    if head.len() < 5 {
        return version.to_owned();
    }

    let year: String = head[..4].iter().collect();
    let quarter = head[4];
    let build = parts[parts.len() - 1];
    format!("{year}v{quarter}({build})")
}

/// Splits a comma-joined framework list into its non-empty entries.
///
/// # Examples
///
/// ```
/// use pvc_core::text::split_frameworks;
///
/// let list = split_frameworks("v8.0, v4.8,,v4.6.2");
/// assert_eq!(list.as_slice(), ["v8.0", "v4.8", "v4.6.2"]);
/// ```
#[must_use]
pub fn split_frameworks(csv: &str) -> SmallVec<[&str; 4]> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// The default framework of a comma-joined list: its first entry, trimmed.
///
/// Returns `None` for a blank list or when the first entry is only whitespace.
#[must_use]
pub fn first_framework(csv: &str) -> Option<String> {
    if is_blank(csv) {
        return None;
    }
    csv.split(',')
        .find(|s| !s.is_empty())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
