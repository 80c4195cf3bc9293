//! Small text helpers shared by the keyword classifiers.

/// Lowercase `text` and fold Portuguese diacritics to their base letter.
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Byte offsets where `keyword` occurs at the start of a word.
///
/// The keyword may run into the rest of the word, so stems like `cresce`
/// also match `crescem`, while `alta` does not match inside `falta`.
fn word_starts<'a>(haystack: &'a str, keyword: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack
        .match_indices(keyword)
        .map(|(at, _)| at)
        .filter(move |&at| {
            haystack[..at]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric())
        })
}

/// Count how many entries of `keywords` start a word in already-folded `haystack`.
///
/// Each keyword counts at most once.
pub fn count_hits(haystack: &str, keywords: &[&str]) -> u32 {
    keywords
        .iter()
        .filter(|k| word_starts(haystack, k).next().is_some())
        .count() as u32
}

/// [`count_hits`] for several lexicons over the same text, one count each.
///
/// Longer keywords match first and blank out the text they cover, so the
/// phrase `queda do diesel` in one lexicon hides `queda` from the others.
pub fn count_hits_exclusive(haystack: &str, lexicons: &[&[&str]]) -> Vec<u32> {
    let mut text = haystack.to_string();
    let mut keywords: Vec<(usize, &str)> = lexicons
        .iter()
        .enumerate()
        .flat_map(|(idx, lexicon)| lexicon.iter().map(move |k| (idx, *k)))
        .collect();
    keywords.sort_by_key(|(_, k)| std::cmp::Reverse(k.len()));

    let mut counts = vec![0; lexicons.len()];
    for (idx, keyword) in keywords {
        let starts: Vec<usize> = word_starts(&text, keyword).collect();
        if starts.is_empty() {
            continue;
        }
        counts[idx] += 1;
        for at in starts {
            text.replace_range(at..at + keyword.len(), &" ".repeat(keyword.len()));
        }
    }
    counts
}

/// Truncate to at most `max` characters, appending an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("Agronegócio em ALTA, Caminhões"), "agronegocio em alta, caminhoes");
    }

    #[test]
    fn count_hits_counts_each_keyword_once() {
        assert_eq!(count_hits("frete frete diesel", &["frete", "diesel", "soja"]), 2);
    }

    #[test]
    fn count_hits_only_matches_at_word_start() {
        assert_eq!(count_hits("falta de diesel", &["alta"]), 0);
        assert_eq!(count_hits("feira vai reunir", &["ai"]), 0);
        assert_eq!(count_hits("lucros crescem", &["cresce", "lucro"]), 2);
        assert_eq!(count_hits("(alta) no preco", &["alta"]), 1);
    }

    #[test]
    fn exclusive_hits_prefer_the_longer_phrase() {
        let counts = count_hits_exclusive(
            "queda do diesel anima frotistas",
            &[&["queda do diesel"], &["queda"]],
        );
        assert_eq!(counts, vec![1, 0]);

        let counts = count_hits_exclusive("nova queda na safra", &[&["queda do diesel"], &["queda"]]);
        assert_eq!(counts, vec![0, 1]);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
