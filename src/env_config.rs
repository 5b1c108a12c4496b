//!
//! Optional module for configuring a client from the environment

/// Create a client from environment variables
/// * `NEW_RELIC_API_KEY` - API key, required
/// * `NEW_RELIC_API_URL` - optional, defaults to [`crate::DEFAULT_BASE_URL`]
///
/// **NOTE** Deleting deployments requires an admin API key.
pub fn client() -> crate::Result<crate::Client> {
    let api_key = std::env::var("NEW_RELIC_API_KEY")
        .map_err(|_| crate::Error::MissingEnv("NEW_RELIC_API_KEY".into()))?;

    let builder = crate::ClientBuilder::new(&api_key);

    let builder = if let Ok(url) = std::env::var("NEW_RELIC_API_URL") {
        tracing::info!("Using api at address {}", url);
        builder.base_url(&url)
    } else {
        builder
    };

    builder.build()
}
