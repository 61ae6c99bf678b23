use thiserror::Error;

/// Expected lookup failures. These are reported to the model, not raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("City '{city}' not found. Please check the spelling.")]
    CityNotFound { city: String },

    #[error("Failed to fetch weather data for '{city}'.")]
    ProviderFailed { city: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "Missing credentials: {}.\n\
         Hint: run `askweather configure` or set the matching environment variables.",
        .0.join(", ")
    )]
    MissingCredentials(Vec<&'static str>),
}
