//! Client identity rotation
//!
//! Generates user agents with consistent client hints and header sets,
//! keeps a bounded history to avoid repeating them, and picks viewports and
//! geolocations for browser sessions.

mod agents;
mod geo;
mod history;
mod identity;
mod pool;

pub use agents::{
    agent_space_size, build_agent, BrowserFamily, ClientHints, GeneratedAgent, Platform,
    RandomAgentSource, UserAgentSource,
};
pub use geo::{GeoLocation, CITIES};
pub use history::IdentityHistory;
pub use identity::{BrowserProfile, Identity, SessionConfig, Viewport, DEFAULT_VIEWPORT, VIEWPORTS};
pub use pool::IdentityPool;
