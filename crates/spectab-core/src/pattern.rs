//! Shell-style glob matching (`*`, `?`, `[...]`, `[!...]`), used by the
//! allocation and footnote predicates that reporting code filters with.

/// Match `text` against a shell-style `pattern`.
///
/// Semantics follow `fnmatch`: `*` matches any run, `?` any single
/// character, `[abc]`/`[a-z]` a class, `[!abc]` a negated class. A `[` with
/// no closing `]` is a literal.
pub fn glob_match(pattern: &str, text: &str, case_sensitive: bool) -> bool {
    let (pattern, text) = if case_sensitive {
        (pattern.to_string(), text.to_string())
    } else {
        (pattern.to_lowercase(), text.to_lowercase())
    };
    let pat: Vec<char> = pattern.chars().collect();
    let txt: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0usize, 0usize);
    // Pattern index after the last `*`, and the text index it is anchored to.
    let mut star: Option<(usize, usize)> = None;

    while t < txt.len() {
        if p < pat.len() {
            if pat[p] == '*' {
                star = Some((p + 1, t));
                p += 1;
                continue;
            }
            let step = match pat[p] {
                '?' => Some(p + 1),
                '[' => match match_class(&pat, p, txt[t]) {
                    Some((true, next)) => Some(next),
                    Some((false, _)) => None,
                    None => (txt[t] == '[').then_some(p + 1),
                },
                c => (c == txt[t]).then_some(p + 1),
            };
            if let Some(next) = step {
                p = next;
                t += 1;
                continue;
            }
        }
        match star {
            Some((after_star, anchor)) => {
                p = after_star;
                t = anchor + 1;
                star = Some((after_star, anchor + 1));
            }
            None => return false,
        }
    }
    while p < pat.len() && pat[p] == '*' {
        p += 1;
    }
    p == pat.len()
}

/// Evaluate the class starting at `pat[start] == '['` against `c`.
///
/// Returns `(matched, index after ']')`, or `None` if the class never closes.
fn match_class(pat: &[char], start: usize, c: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negated = pat.get(i) == Some(&'!');
    if negated {
        i += 1;
    }
    let mut matched = false;
    let mut first = true;
    while i < pat.len() {
        let lo = pat[i];
        if lo == ']' && !first {
            return Some((matched != negated, i + 1));
        }
        first = false;
        if pat.get(i + 1) == Some(&'-') && pat.get(i + 2).is_some_and(|hi| *hi != ']') {
            let hi = pat[i + 2];
            if lo <= c && c <= hi {
                matched = true;
            }
            i += 3;
        } else {
            if lo == c {
                matched = true;
            }
            i += 1;
        }
    }
    None
}
