//! Main harvester service that ties all components together.

use crate::assemble::RecordAssembler;
use crate::browser::{BrowserSession, DetailSnapshots};
use crate::config::{ExtractorConfig, ScrapeConfig};
use crate::error::Result;
use crate::html::DocumentFragment;
use crate::http::{create_client, wait_for_webdriver};
use crate::types::{ProjectListing, ProjectRecord};

/// Attempts per project detail view.
const DETAIL_ATTEMPTS: u32 = 2;

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Assembled records, in list order.
    pub records: Vec<ProjectRecord>,

    /// Projects taken from the list.
    pub listed: usize,

    /// Projects dropped after a failure.
    pub skipped: usize,
}

/// Progress notifications emitted during a run.
#[derive(Debug, Clone, Copy)]
pub enum HarvestProgress<'a> {
    /// The list has been read.
    Listed { count: usize },

    /// Work on one project starts. `position` is 1-based.
    Project {
        position: usize,
        total: usize,
        listing: &'a ProjectListing,
    },
}

/// Opens a project's detail view and captures its page sources.
pub trait DetailSource {
    fn open_detail(
        &self,
        listing: &ProjectListing,
    ) -> impl std::future::Future<Output = Result<DetailSnapshots>>;
}

impl DetailSource for BrowserSession {
    async fn open_detail(&self, listing: &ProjectListing) -> Result<DetailSnapshots> {
        self.open_project_detail(listing).await
    }
}

/// Parse raw page sources and assemble one record.
///
/// An empty overview source counts as absent. The passthrough list values
/// are not set.
#[must_use]
pub fn assemble_snapshots(
    assembler: &RecordAssembler,
    overview_html: &str,
    promoter_html: Option<&str>,
) -> Option<ProjectRecord> {
    let overview =
        (!overview_html.trim().is_empty()).then(|| DocumentFragment::parse(overview_html));
    let promoter = promoter_html.map(DocumentFragment::parse);
    assembler.assemble(overview.as_ref(), promoter.as_ref())
}

/// Scrape the projects at the top of the configured list.
pub async fn scrape_projects(config: &ScrapeConfig) -> Result<HarvestReport> {
    scrape_projects_with(config, |_| {}).await
}

/// Scrape the projects at the top of the configured list, reporting progress.
///
/// A failure on one project is logged and the project skipped. The
/// browser session is closed whether or not the run succeeds.
pub async fn scrape_projects_with<F>(
    config: &ScrapeConfig,
    mut on_progress: F,
) -> Result<HarvestReport>
where
    F: FnMut(HarvestProgress<'_>),
{
    // Validate inputs before starting a browser
    config.validate()?;
    let assembler = RecordAssembler::new(ExtractorConfig::default())?;

    let client = create_client()?;
    wait_for_webdriver(&client, &config.webdriver_url).await?;

    let session = BrowserSession::connect(config).await?;
    let result = harvest(&session, &assembler, config, &mut on_progress).await;

    if let Err(e) = session.quit().await {
        tracing::warn!(error = %e, "Failed to close browser session");
    }

    result
}

async fn harvest<F>(
    session: &BrowserSession,
    assembler: &RecordAssembler,
    config: &ScrapeConfig,
    on_progress: &mut F,
) -> Result<HarvestReport>
where
    F: FnMut(HarvestProgress<'_>),
{
    let listings = session.fetch_project_list(config.project_count).await?;
    on_progress(HarvestProgress::Listed {
        count: listings.len(),
    });

    Ok(harvest_listings(session, assembler, &listings, on_progress).await)
}

/// Build a record for each listing, in order.
///
/// A listing whose detail view cannot be opened or has an empty overview
/// is counted in `skipped`; the rest of the batch carries on.
async fn harvest_listings<S, F>(
    source: &S,
    assembler: &RecordAssembler,
    listings: &[ProjectListing],
    on_progress: &mut F,
) -> HarvestReport
where
    S: DetailSource,
    F: FnMut(HarvestProgress<'_>),
{
    let mut report = HarvestReport {
        listed: listings.len(),
        ..HarvestReport::default()
    };

    for (position, listing) in listings.iter().enumerate() {
        on_progress(HarvestProgress::Project {
            position: position + 1,
            total: listings.len(),
            listing,
        });
        tracing::info!(project = %listing.name, row = listing.index, "Processing project");

        let snapshots = match open_with_retry(source, listing).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                tracing::warn!(project = %listing.name, error = %e, "Skipping project");
                report.skipped += 1;
                continue;
            }
        };

        let Some(record) = assemble_snapshots(
            assembler,
            &snapshots.overview,
            Some(&snapshots.promoter),
        ) else {
            tracing::warn!(project = %listing.name, "Empty overview snapshot, skipping project");
            report.skipped += 1;
            continue;
        };

        let record = record.with_listing(listing);
        for mismatch in record.cross_check() {
            tracing::warn!(project = %listing.name, %mismatch, "List and detail values differ");
        }
        report.records.push(record);
    }

    tracing::info!(
        listed = report.listed,
        scraped = report.records.len(),
        skipped = report.skipped,
        "Run finished"
    );
    report
}

async fn open_with_retry<S: DetailSource>(
    source: &S,
    listing: &ProjectListing,
) -> Result<DetailSnapshots> {
    let mut attempt = 1;
    loop {
        match source.open_detail(listing).await {
            Ok(snapshots) => return Ok(snapshots),
            Err(e) if e.is_retryable() && attempt < DETAIL_ATTEMPTS => {
                tracing::warn!(
                    project = %listing.name,
                    attempt,
                    error = %e,
                    "Detail view failed, retrying"
                );
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarvesterError;
    use crate::types::FieldResult;
    use pretty_assertions::assert_eq;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    const OVERVIEW: &str = r#"<app-project-overview><div class="card"><div class="card-body"><div class="row">
        <div class="details-project"><label class="label-control">Project Name</label><strong>Lotus Enclave</strong></div>
        </div></div></div></app-project-overview>"#;

    fn assembler() -> RecordAssembler {
        RecordAssembler::new(ExtractorConfig::default()).unwrap()
    }

    fn overview_for(name: &str) -> String {
        OVERVIEW.replace("Lotus Enclave", name)
    }

    fn snapshots(name: &str) -> DetailSnapshots {
        let overview = overview_for(name);
        DetailSnapshots {
            promoter: overview.clone(),
            overview,
            promoter_tab: false,
        }
    }

    fn stale_element() -> HarvesterError {
        HarvesterError::from(thirtyfour::error::no_such_element(
            "stale Details button".to_string(),
        ))
    }

    /// Replays scripted outcomes per list row and counts the attempts.
    #[derive(Default)]
    struct ScriptedDetails {
        outcomes: Mutex<HashMap<usize, VecDeque<Result<DetailSnapshots>>>>,
        attempts: Mutex<HashMap<usize, usize>>,
    }

    impl ScriptedDetails {
        fn script(self, index: usize, outcomes: Vec<Result<DetailSnapshots>>) -> Self {
            self.outcomes.lock().unwrap().insert(index, outcomes.into());
            self
        }

        fn attempts(&self, index: usize) -> usize {
            self.attempts.lock().unwrap().get(&index).copied().unwrap_or(0)
        }
    }

    impl DetailSource for ScriptedDetails {
        async fn open_detail(&self, listing: &ProjectListing) -> Result<DetailSnapshots> {
            *self.attempts.lock().unwrap().entry(listing.index).or_default() += 1;
            self.outcomes
                .lock()
                .unwrap()
                .get_mut(&listing.index)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Err(stale_element()))
        }
    }

    fn listings() -> Vec<ProjectListing> {
        vec![
            ProjectListing::new(0, "Green Valley", "RP/01/2024/00001"),
            ProjectListing::new(1, "Lake View", "RP/01/2024/00002"),
            ProjectListing::new(2, "Sunrise Heights", "RP/01/2024/00003"),
        ]
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_batch() {
        let source = ScriptedDetails::default()
            .script(
                0,
                vec![Err(HarvesterError::Timeout {
                    what: "project name".to_string(),
                    secs: 20,
                })],
            )
            .script(1, vec![Err(stale_element()), Ok(snapshots("Lake View"))])
            .script(2, vec![Ok(snapshots("Sunrise Heights"))]);

        let mut seen = Vec::new();
        let report = harvest_listings(&source, &assembler(), &listings(), &mut |progress| {
            if let HarvestProgress::Project { position, total, .. } = progress {
                seen.push((position, total));
            }
        })
        .await;

        assert_eq!(report.listed, 3);
        assert_eq!(report.skipped, 1);
        let names: Vec<_> = report
            .records
            .iter()
            .map(|r| r.project_name.to_string())
            .collect();
        assert_eq!(names, vec!["Lake View", "Sunrise Heights"]);
        assert_eq!(report.records[0].list_name.as_deref(), Some("Lake View"));
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);

        // Timeouts are not retried, WebDriver errors once
        assert_eq!(source.attempts(0), 1);
        assert_eq!(source.attempts(1), 2);
        assert_eq!(source.attempts(2), 1);
    }

    #[tokio::test]
    async fn test_retry_is_attempted_only_once() {
        let source = ScriptedDetails::default()
            .script(0, vec![Err(stale_element()), Err(stale_element())])
            .script(1, vec![Ok(snapshots("Lake View"))]);

        let report = harvest_listings(&source, &assembler(), &listings()[..2], &mut |_| {}).await;

        assert_eq!(source.attempts(0), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.records.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_row_and_blank_overview_are_skipped() {
        let blank = DetailSnapshots {
            overview: String::new(),
            promoter: String::new(),
            promoter_tab: false,
        };
        let source = ScriptedDetails::default()
            .script(
                0,
                vec![Err(HarvesterError::ProjectRowMissing { index: 0, rows: 0 })],
            )
            .script(1, vec![Ok(blank)])
            .script(2, vec![Ok(snapshots("Sunrise Heights"))]);

        let report = harvest_listings(&source, &assembler(), &listings(), &mut |_| {}).await;

        assert_eq!(source.attempts(0), 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(
            report.records[0].project_name,
            FieldResult::Value("Sunrise Heights".to_string())
        );
    }

    #[test]
    fn test_assemble_snapshots() {
        let record = assemble_snapshots(&assembler(), OVERVIEW, Some(OVERVIEW)).unwrap();
        assert_eq!(
            record.project_name,
            FieldResult::Value("Lotus Enclave".to_string())
        );
        assert_eq!(record.promoter_name, FieldResult::NotFound);
    }

    #[test]
    fn test_blank_overview_is_absent() {
        assert_eq!(assemble_snapshots(&assembler(), "  \n", Some(OVERVIEW)), None);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_connecting() {
        // Nothing listens on port 9, so any connection attempt would surface as WebDriverUnavailable
        let config = ScrapeConfig::default()
            .with_webdriver_url("http://127.0.0.1:9")
            .with_project_count(0);

        let err = scrape_projects(&config).await.unwrap_err();
        assert!(matches!(err, HarvesterError::InvalidCount(0)), "{err}");
    }

    #[test]
    fn test_report_default() {
        let report = HarvestReport::default();
        assert!(report.records.is_empty());
        assert_eq!(report.listed, 0);
        assert_eq!(report.skipped, 0);
    }
}
