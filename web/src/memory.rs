use geoplace_core::PointMemory;
use serde::{Deserialize, Serialize};

use crate::utils::*;

/// Ids of the last start points, kept across page loads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct StartPointIds(Vec<String>);

impl StorageKey for StartPointIds {
    const KEY: &'static str = "geoplace:start-points:v1";
}

/// [`PointMemory`] backed by the browser's local storage.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalPointMemory;

impl PointMemory for LocalPointMemory {
    fn remembered_ids(&self) -> Vec<String> {
        Option::<StartPointIds>::local_or_default()
            .map(|StartPointIds(ids)| ids)
            .unwrap_or_default()
    }

    fn remember(&mut self, ids: &[String]) {
        Some(StartPointIds(ids.to_vec())).local_save();
    }

    fn forget(&mut self) {
        None::<StartPointIds>.local_save();
    }
}
