//! Startup configuration: the section inventory and the route price table.
//!
//! Both have a compact textual form so they can be supplied through CLI flags
//! or environment variables:
//!
//! - sections: `A:50,B:50` (order is the round-robin order)
//! - routes: `London-France=20.00,London-Paris=35.5`

use std::collections::HashMap;
use std::str::FromStr;

/// Errors raised while parsing or validating a configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("at least one section must be configured")]
    NoSections,

    #[error("at least one route must be configured")]
    NoRoutes,

    #[error("malformed section definition `{0}`, expected `name:capacity`")]
    MalformedSection(String),

    #[error("section `{0}` is defined more than once")]
    DuplicateSection(String),

    #[error("section `{0}` must have a capacity greater than 0")]
    EmptySection(String),

    #[error("malformed route definition `{0}`, expected `origin-destination=price`")]
    MalformedRoute(String),

    #[error("route `{route}` has an invalid price {price}")]
    InvalidPrice { route: String, price: f64 },
}

/// A named partition of the seat inventory.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionConfig {
    pub name: String,
    pub capacity: u32,
}

impl SectionConfig {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

impl FromStr for SectionConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, capacity) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedSection(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::MalformedSection(s.to_string()));
        }
        let capacity = capacity
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::MalformedSection(s.to_string()))?;
        Ok(Self::new(name, capacity))
    }
}

/// Parses a comma separated list of `name:capacity` definitions.
pub fn parse_sections(s: &str) -> Result<Vec<SectionConfig>, ConfigError> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(SectionConfig::from_str)
        .collect()
}

/// Fixed ticket prices keyed by `"origin-destination"`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RouteTable {
    prices: HashMap<String, f64>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the lookup key for a route.
    pub fn route_key(origin: &str, destination: &str) -> String {
        format!("{origin}-{destination}")
    }

    /// Adds or replaces the price of a route.
    pub fn with_route(mut self, origin: &str, destination: &str, price: f64) -> Self {
        self.prices
            .insert(Self::route_key(origin, destination), price);
        self
    }

    /// Returns the price of a serviceable route, or `None` if the pair is not
    /// served.
    pub fn price(&self, origin: &str, destination: &str) -> Option<f64> {
        self.prices
            .get(&Self::route_key(origin, destination))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.prices.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.prices.is_empty() {
            return Err(ConfigError::NoRoutes);
        }
        for (route, &price) in &self.prices {
            match route.split_once('-') {
                Some((origin, destination)) if !origin.is_empty() && !destination.is_empty() => {}
                _ => return Err(ConfigError::MalformedRoute(route.clone())),
            }
            if !price.is_finite() || price < 0.0 {
                return Err(ConfigError::InvalidPrice {
                    route: route.clone(),
                    price,
                });
            }
        }
        Ok(())
    }
}

impl FromStr for RouteTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut prices = HashMap::new();
        for part in s.split(',').filter(|part| !part.trim().is_empty()) {
            let (route, price) = part
                .trim()
                .rsplit_once('=')
                .ok_or_else(|| ConfigError::MalformedRoute(part.to_string()))?;
            let price = price
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::MalformedRoute(part.to_string()))?;
            prices.insert(route.trim().to_string(), price);
        }
        let table = Self { prices };
        table.validate()?;
        Ok(table)
    }
}

/// Everything needed to construct a [`ReservationLedger`].
///
/// The default reproduces the reference deployment: two 50-seat sections
/// `A` and `B`, and a single `London-France` route priced at 20.00.
///
/// [`ReservationLedger`]: crate::ReservationLedger
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedgerConfig {
    pub sections: Vec<SectionConfig>,
    pub routes: RouteTable,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            sections: vec![SectionConfig::new("A", 50), SectionConfig::new("B", 50)],
            routes: RouteTable::new().with_route("London", "France", 20.00),
        }
    }
}

impl LedgerConfig {
    /// Checks that the configuration describes a usable inventory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sections(&self.sections)?;
        self.routes.validate()
    }
}

pub(crate) fn validate_sections(sections: &[SectionConfig]) -> Result<(), ConfigError> {
    if sections.is_empty() {
        return Err(ConfigError::NoSections);
    }
    let mut seen = std::collections::HashSet::with_capacity(sections.len());
    for section in sections {
        if section.name.is_empty() {
            return Err(ConfigError::MalformedSection(format!(
                ":{}",
                section.capacity
            )));
        }
        if section.capacity == 0 {
            return Err(ConfigError::EmptySection(section.name.clone()));
        }
        if !seen.insert(section.name.as_str()) {
            return Err(ConfigError::DuplicateSection(section.name.clone()));
        }
    }
    Ok(())
}
