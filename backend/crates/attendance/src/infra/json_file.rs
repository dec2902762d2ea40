//! JSON File Catalog
//!
//! Class and timetable reference data, held in memory and rewritten to
//! `classes.json` / `timetables.json` in the data directory after every
//! mutation. Files are replaced via write-to-temp + rename, and memory is
//! only updated once the write succeeded.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kernel::id::{ClassId, TimetableId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::domain::entities::{ClassInfo, TimetableEntry};
use crate::domain::repository::CatalogRepository;
use crate::error::AttendanceResult;

const CLASSES_FILE: &str = "classes.json";
const TIMETABLES_FILE: &str = "timetables.json";

#[derive(Debug, Default)]
struct CatalogState {
    classes: Vec<ClassInfo>,
    timetables: Vec<TimetableEntry>,
}

/// File-backed catalog repository
#[derive(Clone)]
pub struct JsonFileCatalog {
    dir: Arc<PathBuf>,
    state: Arc<Mutex<CatalogState>>,
}

impl JsonFileCatalog {
    /// Open (creating if needed) the catalog in `dir`
    pub async fn open(dir: impl Into<PathBuf>) -> AttendanceResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let classes: Vec<ClassInfo> = load_list(&dir.join(CLASSES_FILE)).await?;
        let timetables: Vec<TimetableEntry> = load_list(&dir.join(TIMETABLES_FILE)).await?;

        tracing::info!(
            dir = %dir.display(),
            classes = classes.len(),
            timetables = timetables.len(),
            "Catalog loaded"
        );

        Ok(Self {
            dir: Arc::new(dir),
            state: Arc::new(Mutex::new(CatalogState {
                classes,
                timetables,
            })),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Missing or blank files read as empty lists
async fn load_list<T: DeserializeOwned>(path: &Path) -> AttendanceResult<Vec<T>> {
    match tokio::fs::read(path).await {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

async fn write_list<T: Serialize>(path: &Path, items: &[T]) -> AttendanceResult<()> {
    let bytes = serde_json::to_vec_pretty(items)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

impl CatalogRepository for JsonFileCatalog {
    async fn list_classes(&self) -> AttendanceResult<Vec<ClassInfo>> {
        Ok(self.state.lock().await.classes.clone())
    }

    async fn save_class(&self, class: ClassInfo) -> AttendanceResult<()> {
        let mut state = self.state.lock().await;
        let mut classes = state.classes.clone();
        match classes.iter_mut().find(|c| c.id == class.id) {
            Some(existing) => *existing = class,
            None => classes.push(class),
        }

        write_list(&self.dir.join(CLASSES_FILE), &classes).await?;
        state.classes = classes;
        Ok(())
    }

    async fn delete_class(&self, class_id: ClassId) -> AttendanceResult<bool> {
        let mut state = self.state.lock().await;
        let mut classes = state.classes.clone();
        let before = classes.len();
        classes.retain(|c| c.id != class_id);
        if classes.len() == before {
            return Ok(false);
        }

        write_list(&self.dir.join(CLASSES_FILE), &classes).await?;
        state.classes = classes;
        Ok(true)
    }

    async fn list_timetables(&self) -> AttendanceResult<Vec<TimetableEntry>> {
        Ok(self.state.lock().await.timetables.clone())
    }

    async fn find_timetable(
        &self,
        timetable_id: TimetableId,
    ) -> AttendanceResult<Option<TimetableEntry>> {
        Ok(self
            .state
            .lock()
            .await
            .timetables
            .iter()
            .find(|t| t.id == timetable_id)
            .cloned())
    }

    async fn save_timetable(&self, entry: TimetableEntry) -> AttendanceResult<()> {
        let mut state = self.state.lock().await;
        let mut timetables = state.timetables.clone();
        match timetables.iter_mut().find(|t| t.id == entry.id) {
            Some(existing) => *existing = entry,
            None => timetables.push(entry),
        }

        write_list(&self.dir.join(TIMETABLES_FILE), &timetables).await?;
        state.timetables = timetables;
        Ok(())
    }

    async fn delete_timetable(&self, timetable_id: TimetableId) -> AttendanceResult<bool> {
        let mut state = self.state.lock().await;
        let mut timetables = state.timetables.clone();
        let before = timetables.len();
        timetables.retain(|t| t.id != timetable_id);
        if timetables.len() == before {
            return Ok(false);
        }

        write_list(&self.dir.join(TIMETABLES_FILE), &timetables).await?;
        state.timetables = timetables;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttendanceError;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("attendance-catalog-{}", uuid::Uuid::new_v4()))
    }

    fn algebra() -> ClassInfo {
        ClassInfo {
            id: ClassId::new(),
            name: "Algebra I".into(),
            room: "Room 101".into(),
            instructor: "Ms. Rivera".into(),
            subject: "Mathematics".into(),
        }
    }

    #[tokio::test]
    async fn test_missing_files_open_empty() {
        let dir = scratch_dir();
        let catalog = JsonFileCatalog::open(&dir).await.unwrap();

        assert!(catalog.list_classes().await.unwrap().is_empty());
        assert!(catalog.list_timetables().await.unwrap().is_empty());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = scratch_dir();
        let class = algebra();
        let slot = TimetableEntry {
            id: TimetableId::new(),
            class_id: Some(class.id),
            class_name: class.name.clone(),
            subject: class.subject.clone(),
            instructor: class.instructor.clone(),
            room: class.room.clone(),
            day: "Monday".into(),
            time_slot: "09:00-10:30".into(),
        };

        {
            let catalog = JsonFileCatalog::open(&dir).await.unwrap();
            catalog.save_class(class.clone()).await.unwrap();
            catalog.save_timetable(slot.clone()).await.unwrap();
        }

        let reopened = JsonFileCatalog::open(&dir).await.unwrap();
        assert_eq!(reopened.list_classes().await.unwrap(), vec![class.clone()]);
        assert_eq!(reopened.find_timetable(slot.id).await.unwrap(), Some(slot.clone()));

        assert!(reopened.delete_timetable(slot.id).await.unwrap());
        assert!(!reopened.delete_timetable(slot.id).await.unwrap());
        assert!(reopened.delete_class(class.id).await.unwrap());

        let reopened = JsonFileCatalog::open(&dir).await.unwrap();
        assert!(reopened.list_classes().await.unwrap().is_empty());
        assert!(reopened.list_timetables().await.unwrap().is_empty());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_save_replaces_same_id() {
        let dir = scratch_dir();
        let catalog = JsonFileCatalog::open(&dir).await.unwrap();
        let mut class = algebra();

        catalog.save_class(class.clone()).await.unwrap();
        class.room = "Room 102".into();
        catalog.save_class(class.clone()).await.unwrap();

        assert_eq!(catalog.list_classes().await.unwrap(), vec![class]);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = scratch_dir();
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join(CLASSES_FILE), b"{not json").await.unwrap();

        let result = JsonFileCatalog::open(&dir).await;
        assert!(matches!(result, Err(AttendanceError::Serialization(_))));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
