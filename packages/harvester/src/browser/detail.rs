//! Project detail view.

use thirtyfour::prelude::*;

use crate::config::{
    DETAILS_BUTTON_XPATH, OVERVIEW_READY_XPATH, PROJECT_ROWS_SELECTOR, PROMOTER_READY_XPATH,
    PROMOTER_TAB_SELECTOR, RENDER_SETTLE_MS, SCROLL_SETTLE_MS,
};
use crate::error::{HarvesterError, Result};
use crate::types::ProjectListing;

use super::session::BrowserSession;
use super::wait::{settle, timed_out};

/// Page sources captured from one project's detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSnapshots {
    /// Source with the overview tab rendered.
    pub overview: String,

    /// Source with the promoter tab rendered, or a copy of `overview`.
    pub promoter: String,

    /// Whether `promoter` came from the promoter tab.
    pub promoter_tab: bool,
}

impl BrowserSession {
    /// Open the detail view of `listing` and snapshot both tabs.
    ///
    /// The list is reloaded first so the row is fresh. A promoter tab that
    /// fails to open is logged and replaced by the overview snapshot.
    ///
    /// # Errors
    /// `ProjectRowMissing` if the row is gone, `Timeout` if the button or
    /// the project name never appears, `WebDriver` for command failures.
    pub async fn open_project_detail(&self, listing: &ProjectListing) -> Result<DetailSnapshots> {
        self.load_list().await?;
        settle(SCROLL_SETTLE_MS).await;

        let rows = self.driver.find_all(By::Css(PROJECT_ROWS_SELECTOR)).await?;
        let row = rows
            .get(listing.index)
            .ok_or(HarvesterError::ProjectRowMissing {
                index: listing.index,
                rows: rows.len(),
            })?;

        let button = row
            .query(By::XPath(DETAILS_BUTTON_XPATH))
            .wait(self.waits.button, self.waits.poll)
            .and_clickable()
            .first()
            .await
            .map_err(|_| timed_out("Details button", self.waits.button))?;

        button.scroll_into_view().await?;
        settle(SCROLL_SETTLE_MS).await;
        button.click().await?;
        tracing::debug!(project = %listing.name, "Details clicked");

        self.driver
            .query(By::XPath(OVERVIEW_READY_XPATH))
            .wait(self.waits.detail, self.waits.poll)
            .and_displayed()
            .first()
            .await
            .map_err(|_| timed_out("project name", self.waits.detail))?;

        settle(RENDER_SETTLE_MS).await;
        let overview = self.driver.source().await?;

        let (promoter, promoter_tab) = match self.open_promoter_tab().await {
            Ok(source) => (source, true),
            Err(e) => {
                tracing::warn!(
                    project = %listing.name,
                    error = %e,
                    "Promoter tab unavailable, reusing overview snapshot"
                );
                (overview.clone(), false)
            }
        };

        Ok(DetailSnapshots {
            overview,
            promoter,
            promoter_tab,
        })
    }

    async fn open_promoter_tab(&self) -> Result<String> {
        let tab = self
            .driver
            .query(By::Css(PROMOTER_TAB_SELECTOR))
            .wait(self.waits.tab, self.waits.poll)
            .and_clickable()
            .first()
            .await
            .map_err(|_| timed_out("promoter tab", self.waits.tab))?;

        tab.scroll_into_view().await?;
        settle(SCROLL_SETTLE_MS).await;
        tab.click().await?;

        self.driver
            .query(By::XPath(PROMOTER_READY_XPATH))
            .wait(self.waits.detail, self.waits.poll)
            .first()
            .await
            .map_err(|_| timed_out("promoter details", self.waits.detail))?;

        settle(RENDER_SETTLE_MS).await;
        Ok(self.driver.source().await?)
    }
}
