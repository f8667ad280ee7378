/// File name pattern where `*` stands for any run of characters, possibly empty.
#[must_use]
#[derive(Clone, Debug)]
pub struct FilePattern<'a> {
    prefix: &'a str,
    middle: Vec<&'a str>,
    suffix: Option<&'a str>,
}

impl<'a> FilePattern<'a> {
    pub fn new(pattern: &'a str) -> Self {
        let mut parts = pattern.split('*').collect::<Vec<_>>();
        let prefix = parts.remove(0);
        let suffix = parts.pop();
        Self { prefix, middle: parts, suffix }
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let Some(mut rest) = name.strip_prefix(self.prefix) else {
            return false;
        };
        let Some(suffix) = self.suffix else {
            // No wildcard at all.
            return rest.is_empty();
        };
        for part in &self.middle {
            match rest.find(part) {
                Some(index) => rest = &rest[index + part.len()..],
                None => return false,
            }
        }
        rest.ends_with(suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_documents() {
        let pattern = FilePattern::new("rates_*.json");
        assert!(pattern.matches("rates_2026_10_15.json"));
        assert!(pattern.matches("rates_.json"));
        assert!(!pattern.matches("rates_2026_10_15.json.bak"));
        assert!(!pattern.matches("rates_2026_10_15.json.tmp"));
        assert!(!pattern.matches("load_2026_10_15.json"));
        assert!(!pattern.matches("rates.json"));
    }

    #[test]
    fn test_without_wildcard() {
        let pattern = FilePattern::new("rates.json");
        assert!(pattern.matches("rates.json"));
        assert!(!pattern.matches("rates.json.bak"));
    }

    #[test]
    fn test_multiple_wildcards() {
        let pattern = FilePattern::new("*_2026_*.json");
        assert!(pattern.matches("rates_2026_10_15.json"));
        assert!(pattern.matches("_2026_.json"));
        assert!(!pattern.matches("rates_2025_10_15.json"));
    }

    #[test]
    fn test_suffix_does_not_overlap_prefix() {
        assert!(!FilePattern::new("ab*ba").matches("aba"));
        assert!(FilePattern::new("ab*ba").matches("abba"));
    }
}
