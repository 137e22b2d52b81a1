use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Collapse a multi-line API value ("Artist\nFrench, 1859-1891") onto one
/// line so it fits a table cell.
pub(crate) fn one_line(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fit `s` into exactly `width` display columns: pad short text with
/// spaces, cut long text at a char boundary and end it with "..".
pub(crate) fn fit(s: &str, width: usize) -> String {
    let s = one_line(s);
    let sw = display_width(&s);
    if sw <= width {
        return format!("{}{}", s, " ".repeat(width - sw));
    }
    if width < 3 {
        return ".".repeat(width);
    }

    let budget = width - 2;
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    // A wide char may leave one column short of the budget.
    format!("{}..{}", out, " ".repeat(budget - used))
}

/// Share `available` columns between weighted columns. Every column gets at
/// least `min`; leftovers go to the earliest columns.
pub(crate) fn split_widths(available: usize, weights: &[usize], min: usize) -> Vec<usize> {
    let total: usize = weights.iter().sum();
    if total == 0 {
        return vec![min; weights.len()];
    }
    let mut widths: Vec<usize> = weights
        .iter()
        .map(|w| (available * w / total).max(min))
        .collect();
    let used: usize = widths.iter().sum();
    let mut spare = available.saturating_sub(used);
    for w in widths.iter_mut() {
        if spare == 0 {
            break;
        }
        *w += 1;
        spare -= 1;
    }
    widths
}
