use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::scheduler::VocabularyItem;
use crate::storage::{StorageError, StorageResult, VocabularyCatalog};

const WORD_ID_DIGITS: usize = 6;

/// One entry of a vocabulary file. `hiragana`/`japanese` and `french` are the
/// field names of older exports.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(alias = "hiragana", alias = "japanese")]
    text: String,
    #[serde(alias = "french")]
    answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<CatalogEntry>),
    Keyed(BTreeMap<String, CatalogEntry>),
}

/// Vocabulary file in either list form (position gives the default id) or
/// keyed by id (ordered by id).
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse(contents: &str) -> StorageResult<Vec<VocabularyItem>> {
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let document: CatalogDocument = serde_json::from_str(contents)?;
        let items = match document {
            CatalogDocument::List(entries) => entries
                .into_iter()
                .enumerate()
                .map(|(i, entry)| {
                    let id = entry
                        .id
                        .unwrap_or_else(|| format!("{:0width$}", i + 1, width = WORD_ID_DIGITS));
                    VocabularyItem::new(id, entry.text.trim(), entry.answer.trim())
                })
                .collect(),
            CatalogDocument::Keyed(entries) => entries
                .into_iter()
                .map(|(key, entry)| {
                    if let Some(inner) = entry.id.as_deref().filter(|inner| *inner != key) {
                        return Err(StorageError::integrity(
                            key.clone(),
                            format!("entry id {inner:?} does not match its key"),
                        ));
                    }
                    Ok(VocabularyItem::new(key, entry.text.trim(), entry.answer.trim()))
                })
                .collect::<StorageResult<Vec<_>>>()?,
        };
        Ok(items)
    }
}

impl VocabularyCatalog for JsonCatalog {
    fn list_items(&self) -> StorageResult<Vec<VocabularyItem>> {
        let contents = fs::read_to_string(&self.path)?;
        let items = Self::parse(&contents)?;
        tracing::info!(path = %self.path.display(), items = items.len(), "loaded vocabulary");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_form_assigns_positional_ids() {
        let items = JsonCatalog::parse(
            r#"[{"text": "ねこ", "answer": "chat"}, {"id": "x1", "text": "いぬ", "answer": " chien "}]"#,
        )
        .unwrap();
        assert_eq!(items[0].id, "000001");
        assert_eq!(items[1].id, "x1");
        assert_eq!(items[1].answer, "chien");
    }

    #[test]
    fn test_keyed_legacy_form() {
        let items = JsonCatalog::parse(
            r#"{
                "word_000002": {"hiragana": "いぬ", "kanji": "犬", "french": "chien"},
                "word_000001": {"hiragana": "ねこ", "kanji": "猫", "french": "chat"}
            }"#,
        )
        .unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["word_000001", "word_000002"]);
        assert_eq!(items[0].text, "ねこ");
        assert_eq!(items[0].answer, "chat");
    }

    #[test]
    fn test_mismatched_key_is_integrity_fault() {
        let err = JsonCatalog::parse(r#"{"a": {"id": "b", "text": "t", "answer": "x"}}"#).unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_missing_answer_is_rejected() {
        assert!(JsonCatalog::parse(r#"[{"text": "ねこ"}]"#).is_err());
    }
}
