use reqwest::blocking::{Client, Response};

use crate::models::HealthInfo;

pub struct HTTPClient {
    pub base_url: String,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|err| err.to_string())?;
        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    fn get(&self, path: &str) -> Result<Response, String> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let resp = self.client.get(url).send().map_err(|err| err.to_string())?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            Err(format!("http {}: {}", status.as_u16(), body))
        }
    }

    pub fn word(&self) -> Result<String, String> {
        let text = self.get("/word")?.text().map_err(|err| err.to_string())?;
        // Also accept the word as a bare JSON string.
        let word = match serde_json::from_str::<String>(&text) {
            Ok(word) => word,
            Err(_) => text,
        };
        Ok(word.trim().to_string())
    }

    pub fn valid_words(&self) -> Result<Vec<String>, String> {
        self.get("/validWords")?
            .json::<Vec<String>>()
            .map_err(|err| err.to_string())
    }

    pub fn health(&self) -> Result<HealthInfo, String> {
        self.get("/health")?
            .json::<HealthInfo>()
            .map_err(|err| err.to_string())
    }
}
