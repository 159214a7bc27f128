use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use rand::Rng;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const SUFFIX_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 4;
const MAX_ATTEMPTS: usize = 16;

/// Filesystem storage. Inputs are read from the given paths as-is;
/// outputs are created inside `output_dir`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    output_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    async fn count_with_prefix(&self, prefix: &str) -> Result<usize> {
        let marker = format!("{}_", prefix);
        let mut entries = fs::read_dir(&self.output_dir).await?;
        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with(&marker) {
                count += 1;
            }
        }
        Ok(count)
    }
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARS[rng.random_range(0..SUFFIX_CHARS.len())] as char)
        .collect()
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(path).await?;
        Ok(data)
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        let full_path = self.output_dir.join(name);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(full_path, data).await?;
        Ok(())
    }

    /// `<prefix>_<existing count>_<random suffix>`, claimed with create-new so
    /// two runs can never end up sharing a file.
    async fn create_unique(&self, prefix: &str) -> Result<String> {
        fs::create_dir_all(&self.output_dir).await?;
        let sequence = self.count_with_prefix(prefix).await?;

        for _ in 0..MAX_ATTEMPTS {
            let name = format!("{}_{}_{}", prefix, sequence, random_suffix());
            let claimed = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.output_dir.join(&name))
                .await;

            match claimed {
                Ok(_) => return Ok(name),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!("Output name {} already taken, retrying", name);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(EtlError::OutputAllocationError {
            directory: self.output_dir.display().to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }

    fn location(&self, name: &str) -> String {
        if self.output_dir == Path::new(".") || self.output_dir.as_os_str().is_empty() {
            name.to_string()
        } else {
            self.output_dir.join(name).display().to_string()
        }
    }
}
