use crate::summary::types::SummarizationResult;
use std::collections::HashMap;

/// Last summary per article for the lifetime of one bridge session.
///
/// Keys depend on the article id only, so a different style or length for
/// the same article needs an explicit regenerate.
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: HashMap<String, SummarizationResult>,
}

pub fn cache_key(article_id: &str) -> String {
    format!("readeck:summary:{article_id}")
}

impl SessionCache {
    pub fn get(&self, article_id: &str) -> Option<&SummarizationResult> {
        self.entries.get(&cache_key(article_id))
    }

    pub fn insert(&mut self, article_id: &str, result: SummarizationResult) {
        self.entries.insert(cache_key(article_id), result);
    }

    pub fn invalidate(&mut self, article_id: &str) -> bool {
        self.entries.remove(&cache_key(article_id)).is_some()
    }
}
