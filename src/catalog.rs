//! Discovery-response catalog models and loading.
//!
//! Only the fields the scheduler reads are modelled; everything else in the
//! response is ignored on deserialization.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::sched::placer::Placement;

/// Full `on_discover` response as delivered by the catalog provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverResponse {
    #[serde(default)]
    pub context: Option<DiscoverContext>,
    #[serde(default)]
    pub message: DiscoverMessage,
}

/// Transaction metadata attached to a discovery response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverContext {
    pub transaction_id: Option<String>,
    pub bap_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverMessage {
    #[serde(default)]
    pub catalogs: Vec<Catalog>,
}

/// One provider's catalog of energy items and the offers pricing them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(rename = "beckn:providerId", default)]
    pub provider_id: Option<String>,
    #[serde(rename = "beckn:items", default)]
    pub items: Vec<Item>,
    #[serde(rename = "beckn:offers", default)]
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(rename = "beckn:id", default)]
    pub id: String,
    #[serde(rename = "beckn:descriptor", default)]
    pub descriptor: Descriptor,
    #[serde(rename = "beckn:itemAttributes", default)]
    pub attributes: ItemAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    #[serde(rename = "schema:name", default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemAttributes {
    #[serde(rename = "beckn:timeWindow", default)]
    pub time_window: TimeWindow,
    #[serde(rename = "beckn:gridParameters", default)]
    pub grid: GridParameters,
}

/// Wall-clock availability window, e.g. `"06:00:00Z"` to `"12:00:00Z"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeWindow {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridParameters {
    pub carbon_intensity: Option<f64>,
    pub carbon_intensity_unit: Option<String>,
    pub renewable_mix: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Offer {
    #[serde(rename = "beckn:id", default)]
    pub id: Option<String>,
    /// Referenced item ids; only the first one is priced by this offer.
    #[serde(rename = "beckn:items", default)]
    pub items: Vec<String>,
    #[serde(rename = "beckn:price", default)]
    pub price: Price,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Price {
    pub value: Option<f64>,
    pub currency: Option<String>,
}

impl DiscoverResponse {
    /// Parses a discovery response from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the document is not a valid response.
    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads and parses a discovery response from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the file cannot be read, or [`Error::Json`]
    /// if it does not parse.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// The catalog used for scheduling: the first one in the response.
    pub fn primary_catalog(&self) -> Option<&Catalog> {
        self.message.catalogs.first()
    }
}

impl Item {
    /// Generator label, `"<descriptor name> (<item id>)"`.
    pub fn generator_name(&self) -> String {
        let name = self.descriptor.name.as_deref().unwrap_or("Unnamed");
        format!("{name} ({})", self.id)
    }
}

/// Extracts the catalog item id from a `"<name> (<item id>)"` generator label.
///
/// The id starts after the first `(` of the label's trailing `)`-free run,
/// so `"X (a(b)"` yields `"a(b"`.
pub fn item_id_from_generator(name: &str) -> Option<&str> {
    let inner = name.strip_suffix(')')?;
    let tail = inner.rfind(')').map_or(inner, |close| &inner[close + 1..]);
    let open = tail.find('(')?;
    let id = &tail[open + 1..];
    if id.is_empty() {
        return None;
    }
    Some(id)
}

/// Distinct catalog item ids used by a placement, in sorted order.
///
/// This is the item selection a downstream order builder confirms with the
/// provider. Unavailable hours contribute nothing.
pub fn selected_item_ids(placement: &Placement) -> Vec<String> {
    placement
        .hours()
        .flat_map(|(_, entries)| entries.iter())
        .filter_map(|entry| item_id_from_generator(&entry.generator))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
