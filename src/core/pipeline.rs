use crate::core::emitter::emit;
use crate::core::ingest::ingest;
use crate::core::matcher::build_association;
use crate::core::{Association, Catalogs, ConfigProvider, Diagnostics, Pipeline, Storage};
use crate::domain::model::RecordKind;
use crate::utils::error::Result;
use std::io::Cursor;

/// Reads both catalogs, joins them, and writes the grouped result to storage.
pub struct MatchPipeline<S: Storage, C: ConfigProvider, D: Diagnostics> {
    storage: S,
    config: C,
    diagnostics: D,
}

impl<S: Storage, C: ConfigProvider, D: Diagnostics> MatchPipeline<S, C, D> {
    pub fn new(storage: S, config: C, diagnostics: D) -> Self {
        Self {
            storage,
            config,
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, D: Diagnostics> Pipeline for MatchPipeline<S, C, D> {
    async fn extract(&self) -> Result<Catalogs> {
        let mut catalogs = Catalogs::default();
        let sources = [
            (self.config.products_file(), RecordKind::Product),
            (self.config.listings_file(), RecordKind::Listing),
        ];

        for (path, kind) in sources {
            tracing::debug!("Reading {} records from: {}", kind, path);
            let data = self.storage.read_file(path).await?;
            ingest(Cursor::new(data), path, kind, &mut catalogs, &self.diagnostics)?;
        }

        Ok(catalogs)
    }

    async fn transform(&self, catalogs: Catalogs) -> Result<Association> {
        Ok(build_association(
            &catalogs.products,
            catalogs.listings,
            &self.diagnostics,
        ))
    }

    async fn load(&self, association: Association) -> Result<String> {
        let name = self.storage.create_unique(self.config.output_prefix()).await?;
        let location = self.storage.location(&name);
        self.diagnostics
            .info(&format!("Results are stored in {}", location));

        let mut buffer = Vec::new();
        let report = emit(&association, &mut buffer, &self.diagnostics)?;
        tracing::debug!("Writing {} bytes to {}", buffer.len(), location);
        self.storage.write_file(&name, &buffer).await?;

        self.diagnostics.info(&format!(
            "{} results written, {} skipped",
            report.written, report.skipped
        ));
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::diagnostics::RecordingDiagnostics;
    use crate::utils::error::EtlError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn put(&self, path: &str, data: &str) {
            self.files
                .lock()
                .await
                .insert(path.to_string(), data.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .await
                .insert(name.to_string(), data.to_vec());
            Ok(())
        }

        async fn create_unique(&self, prefix: &str) -> Result<String> {
            let mut files = self.files.lock().await;
            let name = format!("{}_{}_TEST", prefix, files.len());
            files.insert(name.clone(), Vec::new());
            Ok(name)
        }

        fn location(&self, name: &str) -> String {
            format!("mem://{}", name)
        }
    }

    struct TestConfig;

    impl ConfigProvider for TestConfig {
        fn products_file(&self) -> &str {
            "products.txt"
        }

        fn listings_file(&self) -> &str {
            "listings.txt"
        }

        fn output_prefix(&self) -> &str {
            "results_file"
        }
    }

    const PRODUCTS: &str = concat!(
        r#"{"manufacturer":"Acme","product_name":"Widget","model":"W1","announced-date":"2010-01-06T19:00:00.000-05:00"}"#,
        "\n"
    );

    const LISTINGS: &str = concat!(
        r#"{"title":"Acme Widget","manufacturer":"Acme","currency":"USD","price":10}"#,
        "\n",
        r#"{"title":"Globex thing","manufacturer":"Globex","currency":"USD","price":5}"#,
        "\n",
        r#"{"title":"Acme Widget Pro","manufacturer":"Acme","currency":"USD","price":20.5}"#,
        "\n",
    );

    #[tokio::test]
    async fn test_pipeline_stages() {
        let storage = MockStorage::default();
        storage.put("products.txt", PRODUCTS).await;
        storage.put("listings.txt", LISTINGS).await;

        let pipeline = MatchPipeline::new(storage.clone(), TestConfig, RecordingDiagnostics::new());

        let catalogs = pipeline.extract().await.unwrap();
        assert_eq!(catalogs.products.len(), 1);
        assert_eq!(catalogs.listings.listing_count(), 3);

        let association = pipeline.transform(catalogs).await.unwrap();
        assert_eq!(association.len(), 1);

        let location = pipeline.load(association).await.unwrap();
        assert_eq!(location, "mem://results_file_2_TEST");

        let written = storage.get_file("results_file_2_TEST").await.unwrap();
        let text = String::from_utf8(written).unwrap();
        assert_eq!(
            text,
            concat!(
                r#"{"product_name":"Widget","listings":[{"title":"Acme Widget","manufacturer":"Acme","currency":"USD","price":"10"},{"title":"Acme Widget Pro","manufacturer":"Acme","currency":"USD","price":"20.5"}]}"#,
                "\n"
            )
        );
        assert!(pipeline.diagnostics().errors().is_empty());
    }

    #[tokio::test]
    async fn test_missing_input_is_fatal() {
        let storage = MockStorage::default();
        storage.put("products.txt", PRODUCTS).await;

        let pipeline = MatchPipeline::new(storage, TestConfig, RecordingDiagnostics::new());
        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, EtlError::IoError(_)));
    }
}
