use crate::event::{EventProxy, UserEvent};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::{env, thread, time::Duration};

const DEFAULT_ENDPOINT: &str = "https://api.monkeytype.com/users/stats";
const ENDPOINT_ENV: &str = "WGRAIN_STATS_URL";
const APE_KEY_ENV: &str = "WGRAIN_APE_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifetime typing statistics, either live from the provider or the canned
/// fallback. Consumers never see the difference in shape.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypingStats {
    pub accuracy: f32,
    pub best_wpm: f32,
    pub streak_days: u32,
    pub tests_completed: u32,
    pub time_typing_secs: u64,
}

#[derive(Deserialize)]
struct Payload {
    data: TypingStats,
}

impl TypingStats {
    /// Shown whenever the provider is unreachable, the credential is
    /// missing, or the payload does not parse.
    pub fn fallback() -> Self {
        Self {
            accuracy: 96.2,
            best_wpm: 128.4,
            streak_days: 23,
            tests_completed: 2148,
            time_typing_secs: 183_600,
        }
    }
}

/// Fires the one outbound request on a background thread and always
/// delivers a complete payload through the proxy; failures degrade to
/// [`TypingStats::fallback`] and are only logged.
pub fn spawn_fetch(proxy: impl EventProxy<UserEvent> + Send + 'static) {
    thread::spawn(move || {
        let stats = match fetch() {
            Ok(stats) => stats,
            Err(err) => {
                log::warn!("Falling back to canned typing stats: {}", err);
                TypingStats::fallback()
            }
        };

        proxy.send_event(UserEvent::StatsLoaded(stats));
    });
}

fn fetch() -> Result<TypingStats> {
    let key = env::var(APE_KEY_ENV).map_err(|_| anyhow!("{} is not set", APE_KEY_ENV))?;
    let endpoint = env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_owned());

    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let body = client
        .get(endpoint)
        .header("Authorization", format!("ApeKey {}", key))
        .send()?
        .error_for_status()?
        .text()?;

    parse(&body).ok_or_else(|| anyhow!("malformed stats payload"))
}

fn parse(raw: &str) -> Option<TypingStats> {
    serde_json::from_str::<Payload>(raw)
        .map(|payload| payload.data)
        .ok()
}
