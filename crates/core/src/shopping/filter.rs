/// Dropped for every category: second-hand goods and finished systems.
pub const COMMON_EXCLUDES: &[&str] = &[
    "중고",
    "리퍼",
    "used",
    "refurbished",
    "완제품",
    "조립PC",
    "조립컴퓨터",
    "노트북",
    "미니PC",
    "브랜드PC",
    "세트PC",
    "올인원",
];

/// Removes emphasis tags (`<b>`, `</b>`, ...) and decodes the common HTML entities.
///
/// A `<` only opens a tag when a `>` follows before the next `<`; otherwise it is
/// kept as text (`<3D NAND`).
pub fn strip_markup(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut rest = title;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(|c: char| c == '>' || c == '<') {
            Some(end) if after[end..].starts_with('>') => rest = &after[end + 1..],
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    let decoded = out
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive substring match against both keyword lists.
pub fn is_blacklisted(name: &str, extra: &[&str]) -> bool {
    let haystack = name.to_lowercase();
    COMMON_EXCLUDES
        .iter()
        .chain(extra.iter())
        .any(|kw| haystack.contains(&kw.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_emphasis_and_entities() {
        assert_eq!(
            strip_markup("AMD <b>라이젠</b> 5 &amp; <b>5600X</b>  정품"),
            "AMD 라이젠 5 & 5600X 정품"
        );
        assert_eq!(strip_markup("&lt;b&gt;"), "<b>");
    }

    #[test]
    fn unclosed_angle_bracket_stays_literal() {
        assert_eq!(
            strip_markup("<b>SSD</b> 1TB <3D NAND"),
            "SSD 1TB <3D NAND"
        );
        assert_eq!(strip_markup("RAM < 2x16GB <b>DDR5</b>"), "RAM < 2x16GB DDR5");
        assert_eq!(strip_markup("trailing <"), "trailing <");
    }

    #[test]
    fn blacklist_is_case_insensitive() {
        assert!(is_blacklisted("Used RTX 3060 12GB", &[]));
        assert!(is_blacklisted("라이젠 5600X 중고", &[]));
        assert!(is_blacklisted("DEEPCOOL AK400 CPU Cooler", &["cooler"]));
        assert!(!is_blacklisted("AMD 라이젠 5 5600X 정품 멀티팩", &["cooler"]));
    }
}
