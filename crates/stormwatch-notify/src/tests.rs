use crate::format::{condition_display_name, condition_units, render_alert};
use crate::manager::NotificationManager;
use crate::NotificationChannel;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use stormwatch_common::types::{Condition, TriggeredAlert};

fn heat_alert() -> TriggeredAlert {
    TriggeredAlert {
        location: "Springfield".to_string(),
        condition: Condition::Temperature,
        threshold: 30.0,
        current_value: 31.2,
        message: "Heat warning".to_string(),
        timestamp: Utc::now(),
    }
}

#[test]
fn display_names_are_title_cased() {
    assert_eq!(condition_display_name(&Condition::Temperature), "Temperature");
    assert_eq!(condition_display_name(&Condition::FeelsLike), "Feels Like");
}

#[test]
fn units_follow_condition_and_system() {
    assert_eq!(condition_units(&Condition::Temperature, "metric"), "°C");
    assert_eq!(condition_units(&Condition::Temperature, "imperial"), "°F");
    assert_eq!(condition_units(&Condition::Humidity, "metric"), "%");
    assert_eq!(condition_units(&Condition::Pressure, "metric"), " hPa");
    assert_eq!(condition_units(&Condition::Wind, "imperial"), " mph");
    assert_eq!(condition_units(&Condition::Rain, "metric"), " mm");
    assert_eq!(
        condition_units(&Condition::Unrecognized("foo".to_string()), "metric"),
        ""
    );
}

#[test]
fn rendered_alert_includes_value_threshold_and_unit() {
    let body = render_alert(&heat_alert(), "metric");
    assert_eq!(body, "Temperature is 31.2°C (Threshold: 30°C)");
}

struct CountingChannel {
    sent: Arc<AtomicUsize>,
}

#[async_trait]
impl NotificationChannel for CountingChannel {
    async fn send(&self, _alert: &TriggeredAlert) -> Result<()> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "counting"
    }
}

struct FailingChannel;

#[async_trait]
impl NotificationChannel for FailingChannel {
    async fn send(&self, _alert: &TriggeredAlert) -> Result<()> {
        anyhow::bail!("endpoint unreachable")
    }

    fn channel_name(&self) -> &str {
        "failing"
    }
}

#[tokio::test]
async fn manager_continues_past_failing_channel() {
    let sent = Arc::new(AtomicUsize::new(0));
    let manager = NotificationManager::new(vec![
        Box::new(FailingChannel),
        Box::new(CountingChannel { sent: Arc::clone(&sent) }),
        Box::new(CountingChannel { sent: Arc::clone(&sent) }),
    ]);

    let delivered = manager.notify(&heat_alert()).await;
    assert_eq!(delivered, 2);
    assert_eq!(sent.load(Ordering::SeqCst), 2);
}
