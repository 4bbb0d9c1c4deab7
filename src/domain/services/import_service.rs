use std::sync::Arc;
use serde::Serialize;
use tracing::{info, debug, warn};

use crate::domain::models::guest::GuestDetails;
use crate::domain::models::import_draft::ImportDraft;
use crate::domain::models::workbook::{Sheet, Workbook};
use crate::domain::ports::{EventRepository, GuestRepository, ImportDraftRepository, SpreadsheetDecoder};
use crate::domain::services::access::{owned_draft, owned_event};
use crate::domain::services::guest_import::{detect_columns, normalize_rows, ColumnMapping};
use crate::domain::services::guests::insert_guests;
use crate::error::AppError;

const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub sheet: Option<String>,
    pub mapping: Option<ColumnMapping>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    /// Several sheets and none chosen: nothing was imported.
    SheetSelectionRequired { draft_id: String, sheets: Vec<String> },
    Imported(ImportSummary),
}

#[derive(Debug, Serialize)]
pub struct SheetPreview {
    pub sheet: String,
    pub headers: Vec<String>,
    pub suggested_mapping: ColumnMapping,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
}

impl SheetPreview {
    fn of(sheet: &Sheet) -> Self {
        Self {
            sheet: sheet.name.clone(),
            headers: sheet.headers.clone(),
            suggested_mapping: detect_columns(&sheet.headers),
            rows: sheet.rows.iter().take(PREVIEW_ROWS).cloned().collect(),
            row_count: sheet.row_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DraftSummary {
    pub draft_id: String,
    pub file_name: Option<String>,
    pub sheets: Vec<String>,
    pub requires_sheet_selection: bool,
    pub preview: Option<SheetPreview>,
}

pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Picks the sheet to work on. `Ok(None)` means the host must choose first.
fn select_sheet<'a>(workbook: &'a Workbook, requested: Option<&str>) -> Result<Option<&'a Sheet>, AppError> {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => workbook
            .sheet(name)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Sheet '{}' not found", name))),
        None if workbook.requires_sheet_selection() => Ok(None),
        None => workbook.sheets.first().map(Some).ok_or(AppError::EmptyInput),
    }
}

/// Guest-list ingestion: decode, pick sheet, map columns, normalize, batch insert.
pub struct ImportService {
    event_repo: Arc<dyn EventRepository>,
    guest_repo: Arc<dyn GuestRepository>,
    draft_repo: Arc<dyn ImportDraftRepository>,
    decoder: Arc<dyn SpreadsheetDecoder>,
}

impl ImportService {
    pub fn new(
        event_repo: Arc<dyn EventRepository>,
        guest_repo: Arc<dyn GuestRepository>,
        draft_repo: Arc<dyn ImportDraftRepository>,
        decoder: Arc<dyn SpreadsheetDecoder>,
    ) -> Self {
        Self { event_repo, guest_repo, draft_repo, decoder }
    }

    fn decode(&self, file: &UploadedFile) -> Result<Workbook, AppError> {
        if file.bytes.is_empty() {
            return Err(AppError::EmptyInput);
        }
        let workbook = self.decoder.decode(&file.bytes, file.file_name.as_deref())?;
        if workbook.sheets.is_empty() {
            return Err(AppError::EmptyInput);
        }
        debug!("Decoded upload into {} sheet(s)", workbook.sheets.len());
        Ok(workbook)
    }

    async fn park(&self, owner_id: &str, event_id: &str, file_name: Option<String>, workbook: &Workbook) -> Result<ImportDraft, AppError> {
        let purged = self.draft_repo.delete_expired().await?;
        if purged > 0 {
            debug!("Purged {} expired import drafts", purged);
        }
        let draft = ImportDraft::new(owner_id.to_string(), event_id.to_string(), file_name, workbook)?;
        self.draft_repo.create(&draft).await
    }

    async fn commit_sheet(&self, event_id: &str, sheet: &Sheet, mapping: Option<ColumnMapping>) -> Result<ImportSummary, AppError> {
        if sheet.rows.is_empty() {
            return Err(AppError::EmptyInput);
        }

        let mapping = match mapping {
            Some(explicit) => {
                explicit.validate_against(sheet)?;
                explicit
            }
            None => detect_columns(&sheet.headers),
        };

        let normalized = normalize_rows(sheet, &mapping, event_id);
        if normalized.guests.is_empty() {
            return Err(AppError::NoValidRows);
        }

        let imported = insert_guests(self.guest_repo.as_ref(), normalized.guests).await?;
        info!(
            event_id = %event_id,
            sheet = %sheet.name,
            imported,
            skipped = normalized.skipped,
            "Guest import committed"
        );

        Ok(ImportSummary {
            imported,
            skipped: normalized.skipped,
            sheet: Some(sheet.name.clone()),
            mapping: Some(mapping),
        })
    }

    /// One-shot import. Multi-sheet files without a chosen sheet are parked as a draft.
    pub async fn import_file(
        &self,
        owner_id: &str,
        event_id: &str,
        file: UploadedFile,
        sheet: Option<&str>,
        mapping: Option<ColumnMapping>,
    ) -> Result<ImportOutcome, AppError> {
        let event = owned_event(self.event_repo.as_ref(), owner_id, event_id).await?;
        let workbook = self.decode(&file)?;

        match select_sheet(&workbook, sheet)? {
            Some(selected) => {
                let summary = self.commit_sheet(&event.id, selected, mapping).await?;
                Ok(ImportOutcome::Imported(summary))
            }
            None => {
                let draft = self.park(owner_id, &event.id, file.file_name, &workbook).await?;
                info!("Import for event {} awaits sheet selection (draft {})", event.id, draft.id);
                Ok(ImportOutcome::SheetSelectionRequired {
                    draft_id: draft.id,
                    sheets: workbook.sheet_names(),
                })
            }
        }
    }

    /// First wizard step: parse and park, nothing is imported.
    pub async fn stage_file(&self, owner_id: &str, event_id: &str, file: UploadedFile) -> Result<DraftSummary, AppError> {
        let event = owned_event(self.event_repo.as_ref(), owner_id, event_id).await?;
        let workbook = self.decode(&file)?;
        let draft = self.park(owner_id, &event.id, file.file_name, &workbook).await?;

        let preview = match workbook.requires_sheet_selection() {
            true => None,
            false => workbook.sheets.first().map(SheetPreview::of),
        };

        Ok(DraftSummary {
            draft_id: draft.id,
            file_name: draft.file_name,
            sheets: workbook.sheet_names(),
            requires_sheet_selection: workbook.requires_sheet_selection(),
            preview,
        })
    }

    pub async fn preview(&self, owner_id: &str, draft_id: &str, sheet: Option<&str>) -> Result<SheetPreview, AppError> {
        let draft = owned_draft(self.draft_repo.as_ref(), owner_id, draft_id).await?;
        let workbook = draft.workbook()?;

        let selected = select_sheet(&workbook, sheet)?
            .ok_or(AppError::Validation("This file has several sheets; choose one to preview".into()))?;

        Ok(SheetPreview::of(selected))
    }

    pub async fn commit_draft(
        &self,
        owner_id: &str,
        draft_id: &str,
        sheet: Option<&str>,
        mapping: Option<ColumnMapping>,
    ) -> Result<ImportSummary, AppError> {
        let draft = owned_draft(self.draft_repo.as_ref(), owner_id, draft_id).await?;
        let event = owned_event(self.event_repo.as_ref(), owner_id, &draft.event_id).await?;
        let workbook = draft.workbook()?;

        let selected = select_sheet(&workbook, sheet)?
            .ok_or(AppError::Validation("This file has several sheets; choose one to import".into()))?;

        let summary = self.commit_sheet(&event.id, selected, mapping).await?;

        // Guests are already in; a leftover draft simply expires.
        if let Err(e) = self.draft_repo.delete(owner_id, &draft.id).await {
            warn!(draft_id = %draft.id, "Failed to delete committed import draft: {}", e);
        }

        Ok(summary)
    }

    pub async fn discard_draft(&self, owner_id: &str, draft_id: &str) -> Result<(), AppError> {
        let draft = owned_draft(self.draft_repo.as_ref(), owner_id, draft_id).await?;
        self.draft_repo.delete(owner_id, &draft.id).await
    }

    /// Rows the client already mapped to guest fields. `None` entries had no usable name.
    pub async fn import_mapped(
        &self,
        owner_id: &str,
        event_id: &str,
        rows: Vec<Option<GuestDetails>>,
    ) -> Result<ImportSummary, AppError> {
        let event = owned_event(self.event_repo.as_ref(), owner_id, event_id).await?;
        if rows.is_empty() {
            return Err(AppError::EmptyInput);
        }

        let total = rows.len();
        let guests: Vec<_> = rows
            .into_iter()
            .flatten()
            .map(|details| details.into_guest(event.id.clone()))
            .collect();
        let skipped = total - guests.len();

        if guests.is_empty() {
            return Err(AppError::NoValidRows);
        }

        let imported = insert_guests(self.guest_repo.as_ref(), guests).await?;
        info!(event_id = %event.id, imported, skipped, "Mapped guest rows imported");

        Ok(ImportSummary { imported, skipped, sheet: None, mapping: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str) -> Sheet {
        Sheet::new(name.into(), vec!["Name".into()], vec![vec!["Ana".into()]])
    }

    #[test]
    fn test_single_sheet_is_selected_implicitly() {
        let wb = Workbook { sheets: vec![sheet("Only")] };
        assert_eq!(select_sheet(&wb, None).unwrap().unwrap().name, "Only");
    }

    #[test]
    fn test_multi_sheet_requires_choice() {
        let wb = Workbook { sheets: vec![sheet("A"), sheet("B")] };
        assert!(select_sheet(&wb, None).unwrap().is_none());
        assert!(select_sheet(&wb, Some("  ")).unwrap().is_none());
        assert_eq!(select_sheet(&wb, Some("B")).unwrap().unwrap().name, "B");
        assert!(matches!(select_sheet(&wb, Some("C")), Err(AppError::Validation(_))));
    }
}
