use hashbrown::HashMap;
use log::debug;

use crate::{Error, YardModel};

/// Yards available for navigation, looked up by key with a fallback to a
/// default yard
#[derive(Debug, Clone)]
pub struct YardCatalog {
    yards: Vec<YardModel>,
    by_key: HashMap<String, usize>,
    default_idx: usize,
}

impl YardCatalog {
    /// Builds a catalog; the first yard is the default unless `default_key`
    /// names another one
    ///
    /// # Errors
    ///
    /// Returns an error for an empty yard list, duplicate keys or an unknown
    /// default key
    pub fn new(yards: Vec<YardModel>, default_key: Option<&str>) -> Result<Self, Error> {
        if yards.is_empty() {
            return Err(Error::InvalidData(
                "No yards provided in the configuration".to_string(),
            ));
        }

        let mut by_key = HashMap::with_capacity(yards.len());
        for (idx, yard) in yards.iter().enumerate() {
            if by_key.insert(yard.meta.key.clone(), idx).is_some() {
                return Err(Error::InvalidData(format!(
                    "Duplicate yard key: {}",
                    yard.meta.key
                )));
            }
        }

        let default_idx = match default_key {
            Some(key) => *by_key
                .get(key)
                .ok_or_else(|| Error::InvalidData(format!("Default yard {key} is not configured")))?,
            None => 0,
        };

        Ok(Self {
            yards,
            by_key,
            default_idx,
        })
    }

    pub fn get(&self, key: &str) -> Option<&YardModel> {
        self.by_key.get(key).map(|&idx| &self.yards[idx])
    }

    /// The yard named `key`, or the default yard when the key is absent or
    /// unknown
    pub fn get_or_default(&self, key: Option<&str>) -> &YardModel {
        match key {
            Some(key) => self.get(key).unwrap_or_else(|| {
                debug!("Unknown yard {key}, falling back to the default yard");
                self.default_yard()
            }),
            None => self.default_yard(),
        }
    }

    pub fn default_yard(&self) -> &YardModel {
        &self.yards[self.default_idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &YardModel> {
        self.yards.iter()
    }

    pub fn len(&self) -> usize {
        self.yards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.yards.is_empty()
    }
}
