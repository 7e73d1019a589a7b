// src/services/materials_service.rs

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use serde_json::Value;

use crate::models::{
    listing::Listing,
    materials::{MaterialFiles, MaterialsResponse},
};

/// O manifest é opcional; não vale segurar a tela por ele.
pub const MANIFEST_TIMEOUT: Duration = Duration::from_secs(5);

// Mesmo conjunto do encodeURIComponent
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Clone)]
pub struct MaterialsService {
    client: Client,
    base_url: String,
}

impl MaterialsService {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(MANIFEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Pasta do anunciante no bucket, com `/` no fim. Vazia sem advertiserCode.
    pub fn folder_url(&self, advertiser_code: Option<&str>) -> String {
        match advertiser_code {
            Some(code) if !code.is_empty() => {
                format!("{}/{}/", self.base_url, utf8_percent_encode(code, COMPONENT))
            }
            _ => String::new(),
        }
    }

    /// Lê `manifest.json`. Qualquer falha resulta em listas vazias.
    pub async fn fetch_files(&self, folder_url: &str) -> MaterialFiles {
        if folder_url.is_empty() {
            return MaterialFiles::default();
        }
        let manifest_url = format!("{folder_url}manifest.json");

        let response = match self.client.get(&manifest_url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!(url = %manifest_url, status = %response.status(), "manifest ausente");
                return MaterialFiles::default();
            }
            Err(e) => {
                tracing::debug!(url = %manifest_url, error = %e, "manifest indisponível");
                return MaterialFiles::default();
            }
        };

        match response.json::<Value>().await {
            Ok(manifest) => MaterialFiles::from_manifest(&manifest),
            Err(e) => {
                tracing::warn!(url = %manifest_url, error = %e, "manifest com JSON inválido");
                MaterialFiles::default()
            }
        }
    }

    pub async fn materials_for(&self, listing: &Listing) -> MaterialsResponse {
        let base_url = self.folder_url(listing.advertiser_code());
        let files = self.fetch_files(&base_url).await;
        let urls = files.resolved(&base_url);

        MaterialsResponse {
            base_url,
            files,
            urls,
            listing: listing.to_summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_url_encodes_the_advertiser_code() {
        let service = MaterialsService::new("https://bucket.example.com/imob/").unwrap();
        assert_eq!(
            service.folder_url(Some("CA 25/98")),
            "https://bucket.example.com/imob/CA%2025%2F98/"
        );
        assert_eq!(
            service.folder_url(Some("CA2598")),
            "https://bucket.example.com/imob/CA2598/"
        );
    }

    #[test]
    fn no_advertiser_code_means_no_folder() {
        let service = MaterialsService::new("https://bucket.example.com/imob").unwrap();
        assert_eq!(service.folder_url(None), "");
        assert_eq!(service.folder_url(Some("")), "");
    }

    #[tokio::test]
    async fn empty_folder_skips_the_fetch() {
        let service = MaterialsService::new("https://bucket.example.com/imob").unwrap();
        assert_eq!(service.fetch_files("").await, MaterialFiles::default());
    }
}
