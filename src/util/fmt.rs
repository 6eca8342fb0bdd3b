use std::fmt::Display;

/// Formats every item with [`Display`] and concatenates them with `sep` in between.
pub fn join_display<'a, T, I>(items: I, sep: &str) -> String
where
    T: Display + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(&item.to_string());
    }
    out
}
