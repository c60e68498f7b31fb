/// The fixed entity vocabulary the decoder understands. Anything else,
/// including a bare `&`, passes through as literal text.
const ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("#39", '\''),
    ("nbsp", '\u{a0}'),
];

// Longest recognized entity name.
const MAX_ENTITY_LEN: usize = 4;

pub(crate) fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let mut replaced = false;
        if let Some(semi) = rest[1..]
            .find(';')
            .filter(|&idx| idx <= MAX_ENTITY_LEN)
        {
            let name = &rest[1..1 + semi];
            if let Some((_, ch)) = ENTITIES.iter().find(|(entity, _)| *entity == name) {
                out.push(*ch);
                rest = &rest[semi + 2..];
                replaced = true;
            }
        }
        if !replaced {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::decode_entities;

    #[test]
    fn known_entities_decode() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&quot;&apos;&#39;"), "\"''");
        assert_eq!(decode_entities("x&nbsp;y"), "x\u{a0}y");
    }

    #[test]
    fn unknown_entities_pass_through() {
        assert_eq!(decode_entities("&copy; & &unknownname;"), "&copy; & &unknownname;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
        assert_eq!(decode_entities("&amp"), "&amp");
    }
}
