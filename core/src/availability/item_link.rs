use hashbrown::HashMap;

/// Display name embedded in an item link: the bracketed text of
/// `…|h[Name]|h…`. Falls back to the first `[...]` pair.
pub fn name_from_link(link: &str) -> Option<&str> {
    if let Some(open) = link.find("|h[") {
        let start = open + 3;
        if let Some(len) = link[start..].find("]|h") {
            return non_empty(&link[start..start + len]);
        }
    }

    let start = link.find('[')? + 1;
    let len = link[start..].find(']')?;
    non_empty(&link[start..start + len])
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Memoized link -> display name lookups.
///
/// Bag scans see the same few links over and over; parsing each once is enough.
#[derive(Debug, Clone, Default)]
pub struct LinkNameCache {
    names: HashMap<String, Option<String>>,
}

impl LinkNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_for(&mut self, link: &str) -> Option<String> {
        if let Some(cached) = self.names.get(link) {
            return cached.clone();
        }
        let parsed = name_from_link(link).map(str::to_string);
        self.names.insert(link.to_string(), parsed.clone());
        parsed
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_bracketed_name() {
        let link = "|cff1eff00|Hitem:6049:0:0:0|h[Fire Protection Potion]|h|r";
        assert_eq!(name_from_link(link), Some("Fire Protection Potion"));
    }

    #[test]
    fn test_plain_brackets_fallback() {
        assert_eq!(name_from_link("[Hearthstone]"), Some("Hearthstone"));
    }

    #[test]
    fn test_malformed_links() {
        assert_eq!(name_from_link("item:1234"), None);
        assert_eq!(name_from_link("|h[]|h"), None);
        assert_eq!(name_from_link("[unterminated"), None);
    }

    #[test]
    fn test_cache_parses_each_link_once() {
        let mut cache = LinkNameCache::new();
        let link = "|Hitem:1|h[Healing Potion]|h";
        assert_eq!(cache.name_for(link).as_deref(), Some("Healing Potion"));
        assert_eq!(cache.name_for(link).as_deref(), Some("Healing Potion"));
        assert_eq!(cache.name_for("garbage"), None);
        assert_eq!(cache.len(), 2);
    }
}
