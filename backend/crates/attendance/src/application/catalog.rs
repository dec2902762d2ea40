//! Catalog Use Case
//!
//! Maintenance of class and timetable reference data. Timetable entries may
//! point at a class; blank descriptive fields are then filled from it.

use crate::domain::entities::{ClassInfo, TimetableEntry};
use crate::domain::repository::CatalogRepository;
use crate::error::{AttendanceError, AttendanceResult};
use kernel::id::{ClassId, TimetableId};
use std::sync::Arc;

/// Input DTO for a new class
#[derive(Debug, Clone, Default)]
pub struct NewClass {
    pub name: String,
    pub room: Option<String>,
    pub instructor: Option<String>,
    pub subject: Option<String>,
}

/// Input DTO for a new timetable entry
#[derive(Debug, Clone, Default)]
pub struct NewTimetable {
    pub class_id: Option<ClassId>,
    pub class_name: Option<String>,
    pub subject: Option<String>,
    pub instructor: Option<String>,
    pub room: Option<String>,
    pub day: String,
    pub time_slot: String,
}

fn required(field: &str, value: &str) -> AttendanceResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AttendanceError::InvalidInput(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Explicit input wins over the linked class
fn fill(explicit: Option<String>, from_class: Option<&String>) -> String {
    optional(explicit)
        .or_else(|| from_class.cloned())
        .unwrap_or_default()
}

/// Catalog Use Case
pub struct CatalogUseCase<C>
where
    C: CatalogRepository,
{
    catalog_repo: Arc<C>,
}

impl<C> CatalogUseCase<C>
where
    C: CatalogRepository,
{
    pub fn new(catalog_repo: Arc<C>) -> Self {
        Self { catalog_repo }
    }

    pub async fn list_classes(&self) -> AttendanceResult<Vec<ClassInfo>> {
        self.catalog_repo.list_classes().await
    }

    pub async fn create_class(&self, input: NewClass) -> AttendanceResult<ClassInfo> {
        let class = ClassInfo {
            id: ClassId::new(),
            name: required("name", &input.name)?,
            room: optional(input.room).unwrap_or_default(),
            instructor: optional(input.instructor).unwrap_or_default(),
            subject: optional(input.subject).unwrap_or_default(),
        };
        self.catalog_repo.save_class(class.clone()).await?;

        tracing::info!(class_id = %class.id, name = %class.name, "Class created");
        Ok(class)
    }

    pub async fn delete_class(&self, class_id: ClassId) -> AttendanceResult<()> {
        if !self.catalog_repo.delete_class(class_id).await? {
            return Err(AttendanceError::NotFound("Class".to_string()));
        }
        tracing::info!(class_id = %class_id, "Class deleted");
        Ok(())
    }

    pub async fn list_timetables(&self) -> AttendanceResult<Vec<TimetableEntry>> {
        self.catalog_repo.list_timetables().await
    }

    pub async fn create_timetable(&self, input: NewTimetable) -> AttendanceResult<TimetableEntry> {
        let day = required("day", &input.day)?;
        let time_slot = required("timeSlot", &input.time_slot)?;

        let class = match input.class_id {
            Some(class_id) => Some(
                self.catalog_repo
                    .list_classes()
                    .await?
                    .into_iter()
                    .find(|c| c.id == class_id)
                    .ok_or_else(|| AttendanceError::NotFound("Class".to_string()))?,
            ),
            None => None,
        };

        let class = class.as_ref();
        let entry = TimetableEntry {
            id: TimetableId::new(),
            class_id: input.class_id,
            class_name: fill(input.class_name, class.map(|c| &c.name)),
            subject: fill(input.subject, class.map(|c| &c.subject)),
            instructor: fill(input.instructor, class.map(|c| &c.instructor)),
            room: fill(input.room, class.map(|c| &c.room)),
            day,
            time_slot,
        };
        if entry.class_name.is_empty() {
            return Err(AttendanceError::InvalidInput(
                "className is required".to_string(),
            ));
        }

        self.catalog_repo.save_timetable(entry.clone()).await?;
        tracing::info!(
            timetable_id = %entry.id,
            class_name = %entry.class_name,
            day = %entry.day,
            "Timetable entry created"
        );
        Ok(entry)
    }

    pub async fn delete_timetable(&self, timetable_id: TimetableId) -> AttendanceResult<()> {
        if !self.catalog_repo.delete_timetable(timetable_id).await? {
            return Err(AttendanceError::NotFound("Timetable entry".to_string()));
        }
        tracing::info!(timetable_id = %timetable_id, "Timetable entry deleted");
        Ok(())
    }
}
