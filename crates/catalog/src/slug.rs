//! Slug normalization and uniqueness resolution.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use vitrine_core::{CatalogError, CatalogResult};

/// Normalize display text into a URL-safe slug.
///
/// Steps, in order: trim, collapse internal whitespace runs to single
/// hyphens, canonical decomposition (NFD) with combining marks stripped,
/// lowercase, map anything outside `[a-z0-9-]` to `-`, collapse repeated
/// hyphens, trim leading/trailing hyphens. An input that normalizes to
/// nothing is rejected.
pub fn normalize(input: &str) -> CatalogResult<String> {
    let mut hyphenated = String::with_capacity(input.len());
    let mut pending_ws = false;
    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            pending_ws = true;
            continue;
        }
        if pending_ws {
            hyphenated.push('-');
            pending_ws = false;
        }
        hyphenated.push(ch);
    }

    let mut slug = String::with_capacity(hyphenated.len());
    let mut prev_hyphen = false;
    for ch in hyphenated.nfd().filter(|c| !is_combining_mark(*c)) {
        for lower in ch.to_lowercase() {
            let mapped = if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
                lower
            } else {
                '-'
            };
            if mapped == '-' {
                if prev_hyphen {
                    continue;
                }
                prev_hyphen = true;
            } else {
                prev_hyphen = false;
            }
            slug.push(mapped);
        }
    }

    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        return Err(CatalogError::invalid_slug(format!(
            "{input:?} normalizes to an empty slug"
        )));
    }
    Ok(slug.to_string())
}

/// Resolve `candidate` to a slug unused according to `exists`.
///
/// Probes `base`, `base-1`, `base-2`, ... and returns the first free
/// candidate. Always probes upward from 1; gaps left by deleted slugs are
/// not reused. When updating an entity, `exists` must ignore the entity's
/// own current slug.
pub fn unique(candidate: &str, mut exists: impl FnMut(&str) -> bool) -> CatalogResult<String> {
    let base = normalize(candidate)?;
    if !exists(&base) {
        return Ok(base);
    }
    let mut n: u64 = 1;
    loop {
        let probe = format!("{base}-{n}");
        if !exists(&probe) {
            return Ok(probe);
        }
        n += 1;
    }
}
