use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tokio::fs;

/// Top-level field that changes on every run and is ignored when deciding
/// whether a stored document is out of date.
pub const VOLATILE_FIELD: &str = "generatedAt";

/// Writes pretty-printed JSON documents below a root directory.
#[derive(Debug)]
pub struct FileStore(PathBuf);

impl FileStore {
    pub async fn open(p: impl AsRef<Path>) -> crate::Result<Self> {
        let p = p.as_ref();
        fs::create_dir_all(p).await?;
        Ok(Self(p.to_owned()))
    }

    pub fn root(&self) -> &Path {
        &self.0
    }

    /// Writes `document` to `relative` unless the stored file already holds the
    /// same content. Returns whether the file was written.
    pub async fn write_if_changed<T: Serialize>(
        &self,
        relative: impl AsRef<Path>,
        document: &T,
    ) -> crate::Result<bool> {
        let path = self.0.join(relative);
        let value = serde_json::to_value(document)?;

        if fs::try_exists(&path).await? {
            let stored = fs::read_to_string(&path).await?;
            match serde_json::from_str::<Value>(&stored) {
                Ok(stored) if same_content(&stored, &value) => return Ok(false),
                Ok(_) => {}
                Err(e) => log::warn!("{} is not valid json, replacing it: {e}", path.display()),
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut text = serde_json::to_string_pretty(document)?;
        text.push('\n');
        fs::write(&path, text).await?;
        Ok(true)
    }
}

fn same_content(stored: &Value, fresh: &Value) -> bool {
    match (stored, fresh) {
        (Value::Object(a), Value::Object(b)) => {
            let stable = |(k, _): &(&String, &Value)| k.as_str() != VOLATILE_FIELD;
            a.iter().filter(stable).eq(b.iter().filter(stable))
        }
        _ => stored == fresh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct WeekDoc {
        week: &'static str,
        generated_at: &'static str,
        canteens: Vec<u32>,
    }

    #[tokio::test]
    async fn test_write_if_changed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let doc = json!({"generatedAt": "2025-01-06T06:00:00Z", "days": {"2025-01-06": 1.5}});

        assert!(store.write_if_changed("days/2025-W02.json", &doc).await.unwrap());
        let path = store.root().join("days/2025-W02.json");
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("}\n"));
        let modified = std::fs::metadata(&path).unwrap().modified().unwrap();

        assert!(!store.write_if_changed("days/2025-W02.json", &doc).await.unwrap());
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), modified);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), written);
    }

    #[tokio::test]
    async fn test_new_timestamp_alone_is_not_a_change() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let first = json!({"generatedAt": "2025-01-06T06:00:00Z", "days": {}});
        let later = json!({"generatedAt": "2025-01-07T06:00:00Z", "days": {}});
        let changed = json!({"generatedAt": "2025-01-07T06:00:00Z", "days": {"2025-01-07": {}}});

        assert!(store.write_if_changed("w.json", &first).await.unwrap());
        assert!(!store.write_if_changed("w.json", &later).await.unwrap());
        let stored = std::fs::read_to_string(dir.path().join("w.json")).unwrap();
        assert!(stored.contains("2025-01-06T06:00:00Z"));

        assert!(store.write_if_changed("w.json", &changed).await.unwrap());
    }

    #[tokio::test]
    async fn test_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("w.json"), "{ not json").unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(store.write_if_changed("w.json", &json!({"days": {}})).await.unwrap());
    }

    #[tokio::test]
    async fn test_keeps_field_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        let doc = WeekDoc {
            week: "2025-W02",
            generated_at: "2025-01-06T06:00:00Z",
            canteens: vec![1],
        };
        assert!(store.write_if_changed("w.json", &doc).await.unwrap());
        let stored = std::fs::read_to_string(dir.path().join("w.json")).unwrap();
        let week = stored.find("\"week\"").unwrap();
        let generated_at = stored.find("\"generatedAt\"").unwrap();
        let canteens = stored.find("\"canteens\"").unwrap();
        assert!(week < generated_at && generated_at < canteens);
        assert!(!store.write_if_changed("w.json", &doc).await.unwrap());
    }
}
