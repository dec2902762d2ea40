//! Issue Token Use Case

use crate::application::config::AttendanceConfig;
use crate::domain::clock::Clock;
use crate::domain::entities::{SessionToken, TimetableEntry, TokenMetadata};
use crate::domain::repository::{CatalogRepository, TokenRepository};
use crate::error::AttendanceResult;
use kernel::id::TimetableId;
use std::sync::Arc;

/// Input DTO for issue token. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct IssueTokenInput {
    pub class_name: Option<String>,
    pub classroom: Option<String>,
    pub instructor: Option<String>,
    pub subject: Option<String>,
    pub time_slot: Option<String>,
    pub day: Option<String>,
    pub timetable_id: Option<TimetableId>,
}

/// Output DTO for issue token
#[derive(Debug, Clone)]
pub struct IssueTokenOutput {
    pub token: SessionToken,
    pub check_in_url: String,
}

/// Issue Token Use Case
///
/// Not rate limited and never consults the ledger.
pub struct IssueTokenUseCase<T, C>
where
    T: TokenRepository,
    C: CatalogRepository,
{
    token_repo: Arc<T>,
    catalog_repo: Arc<C>,
    clock: Arc<dyn Clock>,
    config: Arc<AttendanceConfig>,
}

impl<T, C> IssueTokenUseCase<T, C>
where
    T: TokenRepository,
    C: CatalogRepository,
{
    pub fn new(
        token_repo: Arc<T>,
        catalog_repo: Arc<C>,
        clock: Arc<dyn Clock>,
        config: Arc<AttendanceConfig>,
    ) -> Self {
        Self {
            token_repo,
            catalog_repo,
            clock,
            config,
        }
    }

    pub async fn execute(&self, input: IssueTokenInput) -> AttendanceResult<IssueTokenOutput> {
        let timetable = self.timetable_for(input.timetable_id).await;
        let metadata = self.resolve_metadata(input, timetable.as_ref());

        let token = SessionToken::new(metadata, self.clock.now(), self.config.token_ttl_delta());
        self.token_repo.save_token(&token).await?;

        tracing::info!(
            token_id = %token.id,
            class_name = %token.metadata.class_name,
            expires_at = %token.expires_at,
            "Issued attendance token"
        );

        Ok(IssueTokenOutput {
            check_in_url: self.config.check_in_url(token.id),
            token,
        })
    }

    /// Unknown ids and catalog failures are logged and ignored
    async fn timetable_for(&self, timetable_id: Option<TimetableId>) -> Option<TimetableEntry> {
        let timetable_id = timetable_id?;
        match self.catalog_repo.find_timetable(timetable_id).await {
            Ok(Some(entry)) => Some(entry),
            Ok(None) => {
                tracing::warn!(timetable_id = %timetable_id, "Unknown timetable for token");
                None
            }
            Err(e) => {
                tracing::warn!(
                    timetable_id = %timetable_id,
                    error = %e,
                    "Timetable lookup failed, issuing with placeholders"
                );
                None
            }
        }
    }

    fn resolve_metadata(
        &self,
        input: IssueTokenInput,
        timetable: Option<&TimetableEntry>,
    ) -> TokenMetadata {
        let placeholders = &self.config.placeholders;

        TokenMetadata {
            class_name: pick(
                input.class_name,
                timetable.map(|t| &t.class_name),
                &placeholders.class_name,
            ),
            classroom: pick(
                input.classroom,
                timetable.map(|t| &t.room),
                &placeholders.classroom,
            ),
            instructor: pick(
                input.instructor,
                timetable.map(|t| &t.instructor),
                &placeholders.instructor,
            ),
            subject: pick(
                input.subject,
                timetable.map(|t| &t.subject),
                &placeholders.subject,
            ),
            time_slot: pick(
                input.time_slot,
                timetable.map(|t| &t.time_slot),
                &placeholders.time_slot,
            ),
            day: pick(input.day, timetable.map(|t| &t.day), &placeholders.day),
            timetable_id: input.timetable_id,
        }
    }
}

/// Explicit input wins, then the timetable entry, then the placeholder.
/// Blank input counts as absent.
fn pick(explicit: Option<String>, from_timetable: Option<&String>, placeholder: &str) -> String {
    explicit
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| from_timetable.cloned())
        .unwrap_or_else(|| placeholder.to_string())
}
