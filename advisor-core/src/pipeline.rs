//! Request orchestration: geocode, fetch, classify or resolve, then notify.
//!
//! Every request ends in an [`Outcome`]; provider and transport failures are
//! logged and turned into the generic error message, never returned.

use async_trait::async_trait;
use std::{future::Future, time::Duration};

use crate::{
    advisory::{AdvisoryKey, classify},
    error::{AdvisorError, Result},
    geocode::Geocoder,
    messages,
    model::{Query, RequestContext, WeatherReading},
    places::PlaceStore,
    provider::WeatherProvider,
    resolver::{Match, Resolver},
};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Where rendered messages go. One call per message, awaited in order.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, user_id: &str, text: &str) -> anyhow::Result<()>;
}

/// Terminal state of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Weather found; summary plus advisories.
    Advised {
        location: String,
        reading: WeatherReading,
        advisories: Vec<AdvisoryKey>,
    },
    /// Place unknown to the provider, but close reference entries exist.
    Suggested(Vec<Match>),
    /// Place unknown and nothing in the reference set is close.
    NoMatch,
    /// Upstream, transport or data failure.
    Failed,
}

impl Outcome {
    /// User-facing messages for this outcome, in sending order.
    pub fn messages(&self, language: messages::Language) -> Vec<String> {
        match self {
            Outcome::Advised { location, reading, advisories } => {
                let mut out = Vec::with_capacity(advisories.len() + 1);
                out.push(messages::conditions_summary(location, reading, language));
                out.extend(advisories.iter().map(|k| messages::render(*k, language).to_string()));
                out
            }
            Outcome::Suggested(matches) => vec![messages::suggestions(matches, language)],
            Outcome::NoMatch | Outcome::Failed => {
                vec![messages::error_message(language).to_string()]
            }
        }
    }
}

#[derive(Debug)]
pub struct AdvisoryPipeline<P, G, S> {
    provider: P,
    geocoder: G,
    places: S,
    resolver: Resolver,
    call_timeout: Duration,
}

impl<P, G, S> AdvisoryPipeline<P, G, S>
where
    P: WeatherProvider,
    G: Geocoder,
    S: PlaceStore,
{
    pub fn new(provider: P, geocoder: G, places: S, resolver: Resolver) -> Self {
        Self { provider, geocoder, places, resolver, call_timeout: DEFAULT_CALL_TIMEOUT }
    }

    /// Upper bound for each provider or geocoder call, retries included.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Work out the outcome and deliver its messages to `sink`.
    ///
    /// Delivery stops at the first failed send; messages already sent stay sent.
    pub async fn handle(
        &self,
        ctx: &RequestContext,
        query: &Query,
        sink: &dyn NotificationSink,
    ) -> Outcome {
        let outcome = self.evaluate(ctx, query).await;

        for (sent, text) in outcome.messages(ctx.language).iter().enumerate() {
            if let Err(e) = sink.send(&ctx.user_id, text).await {
                tracing::warn!(user = %ctx.user_id, sent, "Delivery interrupted: {e:#}");
                break;
            }
        }

        outcome
    }

    /// Work out the outcome without sending anything.
    pub async fn evaluate(&self, ctx: &RequestContext, query: &Query) -> Outcome {
        let place = match query {
            Query::Place(name) => name.trim().to_string(),
            Query::Coordinates { latitude, longitude } => {
                match self.bounded(self.geocoder.place_name(*latitude, *longitude)).await {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::warn!(user = %ctx.user_id, "Reverse geocoding failed: {e}");
                        return Outcome::Failed;
                    }
                }
            }
        };

        if place.is_empty() {
            return Outcome::NoMatch;
        }

        let observation = match self.bounded(self.provider.current(&place, ctx.language)).await {
            Ok(obs) => obs,
            Err(AdvisorError::NotFound(_)) => return self.suggest(&place),
            Err(e) => {
                tracing::warn!(user = %ctx.user_id, place = %place, "Weather lookup failed: {e}");
                return Outcome::Failed;
            }
        };

        let location = observation.location_name.clone();
        let reading = match WeatherReading::try_from(observation) {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!(place = %place, "Rejected provider data: {e}");
                return Outcome::Failed;
            }
        };

        let advisories = classify(&reading);
        tracing::info!(place = %place, count = advisories.len(), "Classified weather");

        Outcome::Advised { location, reading, advisories }
    }

    fn suggest(&self, place: &str) -> Outcome {
        let matches = self.resolver.resolve(place, self.places.all());
        tracing::info!(place, candidates = matches.len(), "Place not found, resolved fallback");

        if matches.is_empty() { Outcome::NoMatch } else { Outcome::Suggested(matches) }
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.call_timeout, call).await.map_err(|_| AdvisorError::Timeout)?
    }
}
