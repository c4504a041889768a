use crate::core::dedup::deduplicate;
use crate::core::formatter::FormatterPipeline;
use crate::core::loader::{ContactLoader, LoaderOptions, CONTACT_COLUMNS};
use crate::core::report::{sort_for_report, HtmlReport};
use crate::core::{ConfigProvider, Contact, DirectoryStats, Pipeline, Storage, TransformResult};
use crate::utils::error::Result;

pub struct DirectoryPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    formatter: FormatterPipeline,
}

impl<S: Storage, C: ConfigProvider> DirectoryPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let formatter = FormatterPipeline::new(config.format_steps());
        Self {
            storage,
            config,
            formatter,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            delimiter: self.config.delimiter(),
            has_header: self.config.has_header(),
        }
    }

    fn write_stats_json(&self, path: &str, stats: &DirectoryStats) -> Result<()> {
        let json = serde_json::to_string_pretty(stats)?;
        self.storage.write_file(path, json.as_bytes())?;
        tracing::info!("📈 Statistics written to {}", path);
        Ok(())
    }

    fn export_csv(&self, path: &str, contacts: &[Contact]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter() as u8)
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(Vec::new());

        writer.write_record(CONTACT_COLUMNS)?;
        for contact in contacts {
            writer.serialize(contact.to_row())?;
        }

        let data = writer.into_inner().map_err(|e| e.into_error())?;
        self.storage.write_file(path, &data)?;
        tracing::info!("📤 Exported {} unique contacts to {}", contacts.len(), path);
        Ok(())
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for DirectoryPipeline<S, C> {
    fn extract(&self) -> Result<Vec<Contact>> {
        let loader = ContactLoader::new(&self.storage, self.loader_options());
        let contacts = loader.load_all(self.config.input_files());

        tracing::debug!(
            "Extracted {} contacts from {} sources",
            contacts.len(),
            self.config.input_files().len()
        );
        Ok(contacts)
    }

    fn transform(&self, data: Vec<Contact>) -> Result<TransformResult> {
        let raw_count = data.len();
        let unique = deduplicate(data);
        let stats = DirectoryStats::collect(raw_count, &unique);

        tracing::debug!(
            "Formatting {} contacts with steps [{}]",
            unique.len(),
            self.formatter
                .steps()
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut formatted = self.formatter.apply_all(unique.clone());
        sort_for_report(&mut formatted);

        Ok(TransformResult {
            formatted,
            unique,
            stats,
        })
    }

    fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();

        let html = HtmlReport::new(self.config.title())
            .generated_at(chrono::Local::now())
            .render(&result.formatted, &result.stats);

        tracing::debug!("Writing HTML report ({} bytes)", html.len());
        self.storage.write_file(output_path, html.as_bytes())?;

        // 附加輸出失敗不影響已寫出的 HTML
        if let Some(path) = self.config.stats_json_path() {
            if let Err(e) = self.write_stats_json(path, &result.stats) {
                tracing::warn!("⚠️ Skipping statistics JSON {}: {}", path, e);
            }
        }

        if let Some(path) = self.config.export_csv_path() {
            if let Err(e) = self.export_csv(path, &result.unique) {
                tracing::warn!("⚠️ Skipping CSV export {}: {}", path, e);
            }
        }

        Ok(output_path.to_string())
    }
}
