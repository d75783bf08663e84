use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub copy_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

impl FeedbackEntry {
    pub fn new(copy_id: impl Into<String>, rating: u8, comment: impl Into<String>) -> Self {
        Self {
            copy_id: copy_id.into(),
            rating,
            comment: comment.into(),
        }
    }
}

pub trait FeedbackSource {
    fn load_all(&self) -> Result<Vec<FeedbackEntry>, StoreError>;

    fn add(&self, entry: FeedbackEntry) -> Result<(), StoreError>;
}

/// Feedback kept as a JSON array, rewritten on every add.
pub struct JsonFeedback {
    path: PathBuf,
}

impl JsonFeedback {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl FeedbackSource for JsonFeedback {
    fn load_all(&self) -> Result<Vec<FeedbackEntry>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn add(&self, entry: FeedbackEntry) -> Result<(), StoreError> {
        let mut all = self.load_all()?;
        all.push(entry);
        super::write_json_atomic(&self.path, &all)
    }
}

#[derive(Debug, Default)]
pub struct MemFeedback {
    entries: Mutex<Vec<FeedbackEntry>>,
}

impl MemFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<FeedbackEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn entries(&self) -> Result<MutexGuard<'_, Vec<FeedbackEntry>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::CollaboratorPoisoned("feedback"))
    }
}

impl FeedbackSource for MemFeedback {
    fn load_all(&self) -> Result<Vec<FeedbackEntry>, StoreError> {
        Ok(self.entries()?.clone())
    }

    fn add(&self, entry: FeedbackEntry) -> Result<(), StoreError> {
        self.entries()?.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn json_feedback_appends_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.json");
        let feedback = JsonFeedback::new(path.clone());

        feedback.add(FeedbackEntry::new("fifa07", 4, "Great!")).unwrap();
        feedback.add(FeedbackEntry::new("fifa07", 2, "")).unwrap();

        let reread = JsonFeedback::new(path).load_all().unwrap();
        assert_eq!(reread.len(), 2);
        assert_eq!(reread[0].comment, "Great!");
        assert_eq!(reread[1].rating, 2);
    }

    #[test]
    fn missing_comment_defaults_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.json");
        fs::write(&path, r#"[{"copy_id": "cod01", "rating": 3}]"#).unwrap();
        let all = JsonFeedback::new(path).load_all().unwrap();
        assert_eq!(all, vec![FeedbackEntry::new("cod01", 3, "")]);
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFeedback::new(path).load_all(),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn mem_feedback_surfaces_a_poisoned_lock() {
        let feedback = std::sync::Arc::new(MemFeedback::new());
        let poisoner = std::sync::Arc::clone(&feedback);
        let _ = std::thread::spawn(move || {
            let _held = poisoner.entries.lock().unwrap();
            panic!("poison the feedback lock");
        })
        .join();

        assert!(matches!(
            feedback.load_all(),
            Err(StoreError::CollaboratorPoisoned("feedback"))
        ));
        assert!(matches!(
            feedback.add(FeedbackEntry::new("g1", 3, "")),
            Err(StoreError::CollaboratorPoisoned(_))
        ));
    }
}
