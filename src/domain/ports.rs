use crate::domain::model::{Association, Catalogs};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// Reads a whole input file.
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Writes `data` to `name` inside the output location.
    fn write_file(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Atomically reserves a fresh, empty output file whose name starts with `prefix`
    /// and returns that name.
    fn create_unique(&self, prefix: &str)
        -> impl std::future::Future<Output = Result<String>> + Send;

    /// Human readable location of an output name, as reported to the user.
    fn location(&self, name: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn products_file(&self) -> &str;
    fn listings_file(&self) -> &str;
    fn output_prefix(&self) -> &str;
}

/// Line sink for run diagnostics, handed to each component instead of a global logger.
pub trait Diagnostics: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);

    /// High-volume per-line progress. Defaults to `info`.
    fn line(&self, message: &str) {
        self.info(message);
    }

    /// An error with its cause attached. The default appends the cause and
    /// every `source()` below it to the message.
    fn error_with(&self, message: &str, cause: &(dyn std::error::Error + 'static)) {
        let mut text = format!("{}: {}", message, cause);
        let mut next = cause.source();
        while let Some(inner) = next {
            text.push_str(&format!(": {}", inner));
            next = inner.source();
        }
        self.error(&text);
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Catalogs>;
    async fn transform(&self, catalogs: Catalogs) -> Result<Association>;
    async fn load(&self, association: Association) -> Result<String>;
}
