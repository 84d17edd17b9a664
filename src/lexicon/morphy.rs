//! Base-form reduction over WordNet's exception lists and detachment rules.

use std::collections::{HashMap, HashSet};

use super::PartOfSpeech;

/// Suffix detachment rules, `(inflected, base)`, tried in order.
fn substitutions(pos: PartOfSpeech) -> &'static [(&'static str, &'static str)] {
    match pos {
        PartOfSpeech::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("ves", "f"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        PartOfSpeech::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        PartOfSpeech::Adjective => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        PartOfSpeech::Adverb | PartOfSpeech::Other => &[],
    }
}

fn apply_rules(forms: &[String], pos: PartOfSpeech) -> Vec<String> {
    let mut out = Vec::new();
    for form in forms {
        for (old, new) in substitutions(pos) {
            if let Some(stem) = form.strip_suffix(old) {
                out.push(format!("{}{}", stem, new));
            }
        }
    }
    out
}

/// Keep forms the lexicon knows, first occurrence only.
fn filter_forms<F>(forms: Vec<String>, known: &F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let mut seen = HashSet::new();
    forms
        .into_iter()
        .filter(|f| known(f.as_str()) && seen.insert(f.clone()))
        .collect()
}

/// Candidate lemmas for a lowercase `form` under `pos`, in lookup order.
///
/// An exception-list hit wins outright. Otherwise the form itself and its
/// single-step reductions are tried, then reductions are re-applied until
/// something known turns up.
pub fn base_forms<F>(
    form: &str,
    pos: PartOfSpeech,
    exceptions: &HashMap<String, Vec<String>>,
    known: F,
) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    if let Some(bases) = exceptions.get(form) {
        let mut forms = vec![form.to_string()];
        forms.extend(bases.iter().cloned());
        return filter_forms(forms, &known);
    }

    let mut forms = apply_rules(&[form.to_string()], pos);
    let mut first = vec![form.to_string()];
    first.extend(forms.iter().cloned());
    let results = filter_forms(first, &known);
    if !results.is_empty() {
        return results;
    }

    while !forms.is_empty() {
        forms = apply_rules(&forms, pos);
        let results = filter_forms(forms.clone(), &known);
        if !results.is_empty() {
            return results;
        }
    }
    Vec::new()
}
