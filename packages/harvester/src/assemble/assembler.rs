use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::extract::{FieldExtractor, SearchContext};
use crate::html::DocumentFragment;
use crate::types::{FieldName, FieldResult, ProjectRecord};

use super::context::{overview_context_rule, promoter_context_rule, ContextRule};

/// Builds one [`ProjectRecord`] from a project's two detail snapshots.
#[derive(Debug)]
pub struct RecordAssembler {
    extractor: FieldExtractor,
    overview_rule: ContextRule,
    promoter_rule: ContextRule,
}

impl RecordAssembler {
    /// Create an assembler with a default-observer extractor.
    ///
    /// # Errors
    /// Returns `Selector` if the extractor's label selector is invalid.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Self::with_extractor(FieldExtractor::new(config)?)
    }

    /// Create an assembler around a preconfigured extractor.
    ///
    /// # Errors
    /// Only fails if the built-in context selectors stop compiling.
    pub fn with_extractor(extractor: FieldExtractor) -> Result<Self> {
        Ok(Self {
            extractor,
            overview_rule: overview_context_rule()?,
            promoter_rule: promoter_context_rule()?,
        })
    }

    /// Extract the five fields.
    ///
    /// Returns `None` when there is no overview snapshot. A missing
    /// promoter snapshot leaves the promoter fields `NotFound`. The
    /// passthrough list values are left for the caller to fill.
    #[must_use]
    pub fn assemble(
        &self,
        overview: Option<&DocumentFragment>,
        promoter: Option<&DocumentFragment>,
    ) -> Option<ProjectRecord> {
        let overview = overview?;
        let mut record = ProjectRecord::not_found();

        let overview_context = self.overview_rule.resolve(overview);
        tracing::debug!(context = overview_context.origin(), "Overview context");
        self.fill(&mut record, &overview_context, false);

        match promoter {
            Some(promoter) => {
                let promoter_context = self.promoter_rule.resolve(promoter);
                tracing::debug!(context = promoter_context.origin(), "Promoter context");
                self.fill(&mut record, &promoter_context, true);
            }
            None => tracing::debug!("No promoter snapshot, promoter fields left empty"),
        }

        Some(record)
    }

    fn fill(&self, record: &mut ProjectRecord, context: &SearchContext<'_>, promoter: bool) {
        for field in FieldName::ALL
            .into_iter()
            .filter(|f| f.is_promoter_field() == promoter)
        {
            let value = self.extractor.extract(context, field.label());
            if value == FieldResult::NotFound {
                tracing::debug!(field = field.key(), "Field not found");
            }
            record.set(field, value);
        }
    }
}
