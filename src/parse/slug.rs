use chrono::{DateTime, Local};

/// Timestamp prefix of every task filename
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Normalize a title into a filesystem-safe slug.
///
/// Lower-cases, turns spaces into hyphens, strips anything outside
/// `[a-z0-9-]`, collapses hyphen runs and trims hyphens at both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        let c = if c == ' ' { '-' } else { c };
        if c == '-' {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Build `<YYYYMMDD-HHMMSS>-<slug>.md` for a title saved at `now`.
pub fn generate_file_name(title: &str, now: DateTime<Local>) -> String {
    format!("{}-{}.md", now.format(FILE_TIMESTAMP_FORMAT), slugify(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn slug_basic() {
        assert_eq!(slugify("Buy milk"), "buy-milk");
        assert_eq!(slugify("Write   the  Report"), "write-the-report");
        assert_eq!(slugify("v2.0 release"), "v20-release");
    }

    #[test]
    fn slashes_are_stripped_not_hyphenated() {
        assert_eq!(
            generate_file_name("Test/With/Slashes", at()),
            "20250102-030405-testwithslashes.md"
        );
    }

    #[test]
    fn punctuation_collapses() {
        assert!(generate_file_name("a!!b", at()).ends_with("-ab.md"));
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("a!-!b"), "a-b");
    }

    #[test]
    fn no_leading_or_trailing_hyphens() {
        for title in ["  padded  ", "-dash-", "!?trailing ?!", "--", "émoji 🎉 party"] {
            let slug = slugify(title);
            assert!(!slug.starts_with('-'), "{title:?} -> {slug:?}");
            assert!(!slug.ends_with('-'), "{title:?} -> {slug:?}");
            assert!(!slug.contains("--"), "{title:?} -> {slug:?}");
        }
        assert_eq!(slugify("émoji 🎉 party"), "moji-party");
    }

    #[test]
    fn timestamp_prefix_is_fifteen_chars() {
        let name = generate_file_name("x", at());
        assert_eq!(&name[..15], "20250102-030405");
        assert_eq!(name.as_bytes()[15], b'-');
    }
}
