use crate::NotificationChannel;
use anyhow::Result;
use async_trait::async_trait;
use stormwatch_common::types::TriggeredAlert;

pub struct WebhookChannel {
    client: reqwest::Client,
    urls: Vec<String>,
    body_template: Option<String>,
}

impl WebhookChannel {
    pub fn new(urls: Vec<String>, body_template: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            urls,
            body_template,
        }
    }

    fn render_body(&self, alert: &TriggeredAlert) -> String {
        if let Some(template) = &self.body_template {
            template
                .replace("{{location}}", &alert.location)
                .replace("{{condition}}", &alert.condition.to_string())
                .replace("{{value}}", &format!("{:.2}", alert.current_value))
                .replace("{{threshold}}", &format!("{:.2}", alert.threshold))
                .replace("{{message}}", &alert.message)
                .replace("{{timestamp}}", &alert.timestamp.to_rfc3339())
        } else {
            serde_json::json!({
                "location": alert.location,
                "condition": alert.condition.to_string(),
                "threshold": alert.threshold,
                "current_value": alert.current_value,
                "message": alert.message,
                "timestamp": alert.timestamp.to_rfc3339(),
            })
            .to_string()
        }
    }
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    async fn send(&self, alert: &TriggeredAlert) -> Result<()> {
        let body = self.render_body(alert);

        for url in &self.urls {
            let mut last_err = None;
            for attempt in 0..3u32 {
                match self
                    .client
                    .post(url.as_str())
                    .header("Content-Type", "application/json")
                    .body(body.clone())
                    .send()
                    .await
                {
                    Ok(resp) if resp.status().is_success() => {
                        last_err = None;
                        break;
                    }
                    Ok(resp) => {
                        let status = resp.status();
                        tracing::warn!(
                            attempt = attempt + 1,
                            status = %status,
                            "Webhook returned non-success status, retrying"
                        );
                        last_err = Some(anyhow::anyhow!("HTTP {status}"));
                    }
                    Err(e) => {
                        tracing::warn!(
                            attempt = attempt + 1,
                            error = %e,
                            "Webhook send failed, retrying"
                        );
                        last_err = Some(e.into());
                    }
                }
                if attempt < 2 {
                    tokio::time::sleep(std::time::Duration::from_millis(100 * 2u64.pow(attempt)))
                        .await;
                }
            }

            if let Some(e) = last_err {
                return Err(e.context(format!("webhook {url} failed after 3 attempts")));
            }
        }

        Ok(())
    }

    fn channel_name(&self) -> &str {
        "webhook"
    }
}
