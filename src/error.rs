//! Error types for the collaborators around the map core.
//!
//! Nothing here is fatal to the map: the view turns route failures into "no
//! path" and location failures into the fallback coordinate.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum RouteError {
    /// The engine has not been initialised yet.
    NotReady,
    InvalidGraph(serde_json::Error),
    Http(reqwest::Error),
    UnexpectedResponse(String),
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        RouteError::InvalidGraph(err)
    }
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        RouteError::Http(err)
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::NotReady => write!(f, "route engine not ready"),
            RouteError::InvalidGraph(err) => write!(f, "invalid graph payload: {}", err),
            RouteError::Http(err) => write!(f, "route service request failed: {}", err),
            RouteError::UnexpectedResponse(msg) => write!(f, "unexpected route response: {}", msg),
        }
    }
}

impl Error for RouteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RouteError::InvalidGraph(err) => Some(err),
            RouteError::Http(err) => Some(err),
            RouteError::NotReady | RouteError::UnexpectedResponse(_) => None,
        }
    }
}

/// Why a geolocation lookup produced no position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    Unsupported,
    PermissionDenied,
    Unavailable,
    Timeout,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            LocationError::Unsupported => "geolocation unsupported",
            LocationError::PermissionDenied => "geolocation permission denied",
            LocationError::Unavailable => "position unavailable",
            LocationError::Timeout => "geolocation timed out",
        };
        f.write_str(msg)
    }
}

impl Error for LocationError {}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "invalid map config: {}", err),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
        }
    }
}
