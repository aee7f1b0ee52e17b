//! Message templates with `{identifier}` placeholders.
//!
//! `{{` and `}}` stand for literal braces. A placeholder with no matching
//! parameter is copied through unchanged, as is any brace that does not open
//! a well-formed placeholder.

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    /// A literal `{` or `}` written doubled in the template.
    Brace(char),
    Placeholder(&'a str),
}

/// Split `template` into literal text and placeholders.
#[must_use]
pub fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let bytes = template.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b @ (b'{' | b'}') if bytes.get(i + 1) == Some(&b) => {
                push_literal(&mut out, &template[literal_start..i]);
                out.push(Segment::Brace(char::from(b)));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                if let Some(len) = placeholder_len(&bytes[i + 1..]) {
                    push_literal(&mut out, &template[literal_start..i]);
                    out.push(Segment::Placeholder(&template[i + 1..i + 1 + len]));
                    i += len + 2;
                    literal_start = i;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    push_literal(&mut out, &template[literal_start..]);
    out
}

/// Distinct placeholder names in order of first use.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in segments(template) {
        if let Segment::Placeholder(name) = segment
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    names
}

/// Substitute `params` into `template`.
#[must_use]
pub fn render<K, V>(template: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::with_capacity(template.len());
    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Brace(c) => out.push(c),
            Segment::Placeholder(name) => {
                if let Some((_, value)) = params.iter().find(|(key, _)| key.as_ref() == name) {
                    out.push_str(value.as_ref());
                } else {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
        }
    }
    out
}

fn push_literal<'a>(out: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        out.push(Segment::Literal(text));
    }
}

/// Length of an identifier directly followed by `}`, if `rest` starts with one.
fn placeholder_len(rest: &[u8]) -> Option<usize> {
    let first = rest.first()?;
    if !(first.is_ascii_alphabetic() || *first == b'_') {
        return None;
    }
    let len = rest
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))?;
    (rest[len] == b'}').then_some(len)
}
