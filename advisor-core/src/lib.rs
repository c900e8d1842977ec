//! Core library for the weather advisor.
//!
//! This crate defines:
//! - The weather reading model and its normalization from provider data
//! - The advisory classifier (reading → ordered advisory keys)
//! - The approximate place resolver used when a location is unknown
//! - Providers for current weather and reverse geocoding
//! - The request pipeline tying them together
//!
//! It is used by `advisor-cli`, but can also back a chat bot or any other front end.

pub mod advisory;
pub mod config;
pub mod error;
pub mod geocode;
pub mod messages;
pub mod model;
pub mod pipeline;
pub mod places;
pub mod provider;
pub mod resolver;
pub mod retry;

pub use advisory::{AdvisoryKey, classify};
pub use config::Config;
pub use error::AdvisorError;
pub use geocode::{Geocoder, NominatimGeocoder};
pub use messages::Language;
pub use model::{Observation, Query, RequestContext, WeatherReading};
pub use pipeline::{AdvisoryPipeline, NotificationSink, Outcome};
pub use places::{LocationCandidate, PlaceIndex, PlaceStore};
pub use provider::{WeatherProvider, provider_from_config};
pub use resolver::{Match, Resolver, ResolverStrategy};
pub use retry::RetryPolicy;
