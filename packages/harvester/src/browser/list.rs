//! Project list page.

use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;

use crate::config::{
    LIST_LOADER_SELECTOR, LIST_NAME_COLUMN, LIST_REGISTRATION_COLUMN, PROJECT_ROWS_SELECTOR,
    RENDER_SETTLE_MS, STATUS_FILTER_SELECTOR,
};
use crate::error::{HarvesterError, Result};
use crate::types::ProjectListing;

use super::session::BrowserSession;
use super::wait::{settle, timed_out};

/// Build a listing from the cell texts of one table row.
///
/// Returns `None` if the row lacks the name or registration column.
#[must_use]
pub fn listing_from_cells(index: usize, cells: &[String]) -> Option<ProjectListing> {
    let name = cells.get(LIST_NAME_COLUMN)?;
    let registration = cells.get(LIST_REGISTRATION_COLUMN)?;
    Some(ProjectListing::new(index, name.trim(), registration.trim()))
}

impl BrowserSession {
    /// Make sure the list page is shown and its table has rows.
    ///
    /// The loader overlay counts as gone once no displayed copy is left,
    /// whether it was removed or only hidden. That wait is best effort;
    /// missing rows are an error.
    pub(crate) async fn load_list(&self) -> Result<()> {
        let current = self.driver.current_url().await?;
        if current.as_str() != self.list_url {
            self.driver.goto(&self.list_url).await?;
            tracing::debug!(url = %self.list_url, "Navigated to project list");
        }

        // A stale overlay element is treated as hidden
        match self
            .driver
            .query(By::Css(LIST_LOADER_SELECTOR))
            .ignore_errors(true)
            .and_displayed()
            .wait(self.waits.page, self.waits.poll)
            .not_exists()
            .await
        {
            Ok(true) => tracing::debug!("List loader hidden"),
            Ok(false) => tracing::warn!("List loader still visible, proceeding anyway"),
            Err(e) => tracing::warn!(error = %e, "Could not check list loader, proceeding anyway"),
        }

        self.driver
            .query(By::Css(PROJECT_ROWS_SELECTOR))
            .wait(self.waits.page, self.waits.poll)
            .first()
            .await
            .map_err(|_| timed_out("project list rows", self.waits.page))?;

        settle(RENDER_SETTLE_MS).await;
        Ok(())
    }

    /// Select `value` in the status filter and wait for the list to reload.
    async fn apply_status_filter(&self, value: &str) -> Result<()> {
        let Ok(element) = self
            .driver
            .query(By::Css(STATUS_FILTER_SELECTOR))
            .wait(self.waits.page, self.waits.poll)
            .first()
            .await
        else {
            tracing::warn!("Status filter not found, using current list");
            return Ok(());
        };

        let select = SelectElement::new(&element).await?;
        let current = select.first_selected_option().await?.value().await?;
        if current.as_deref() == Some(value) {
            tracing::info!(status = value, "Status filter already active");
            return Ok(());
        }

        tracing::info!(from = ?current, to = value, "Changing status filter");
        select.select_by_value(value).await?;
        self.load_list().await
    }

    /// Fetch the first `count` projects of the list.
    pub async fn fetch_project_list(&self, count: usize) -> Result<Vec<ProjectListing>> {
        self.load_list().await?;

        if let Some(status) = &self.status_filter {
            if let Err(e) = self.apply_status_filter(status).await {
                tracing::warn!(error = %e, "Status filter failed, using current list");
            }
        }

        let rows = self.driver.find_all(By::Css(PROJECT_ROWS_SELECTOR)).await?;
        if rows.is_empty() {
            return Err(HarvesterError::ProjectTableEmpty);
        }

        let mut listings = Vec::new();
        for (index, row) in rows.iter().take(count).enumerate() {
            let mut cells = Vec::new();
            for cell in row.find_all(By::Tag("td")).await? {
                cells.push(cell.text().await?);
            }

            match listing_from_cells(index, &cells) {
                Some(listing) => listings.push(listing),
                None => tracing::warn!(
                    row = index,
                    cells = cells.len(),
                    "Row has too few columns, skipping"
                ),
            }
        }

        tracing::info!(count = listings.len(), rows = rows.len(), "Projects identified");
        Ok(listings)
    }
}
