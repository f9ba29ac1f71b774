use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::*;

/// Point data of one area, loaded once before any game starts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AreaData {
    pub name: String,
    pub points: Vec<Point>,
    pub bounds: Bounds,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AreaFile {
    Area {
        #[serde(default)]
        name: String,
        points: Vec<Point>,
        #[serde(default)]
        bounds: Option<Bounds>,
    },
    Points(Vec<Point>),
}

impl AreaData {
    pub fn new(
        name: impl Into<String>,
        points: Vec<Point>,
        bounds: Option<Bounds>,
    ) -> Result<Self> {
        check_unique_ids(&points)?;
        for point in &points {
            point.position.validate()?;
        }

        let bounds = match bounds {
            Some(bounds) => bounds,
            None => Bounds::from_coords(points.iter().map(|point| point.position))
                .ok_or_else(|| GameError::InvalidAreaData("area has no points".into()))?,
        };

        Ok(Self {
            name: name.into(),
            points,
            bounds,
        })
    }

    /// Accepts `{ "name", "points", "bounds"? }` or a bare array of points.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: AreaFile =
            serde_json::from_str(json).map_err(|err| GameError::InvalidAreaData(err.to_string()))?;

        match file {
            AreaFile::Area {
                name,
                points,
                bounds,
            } => Self::new(name, points, bounds),
            AreaFile::Points(points) => Self::new(String::new(), points, None),
        }
    }

    pub fn point(&self, id: &str) -> Option<&Point> {
        self.points.iter().find(|point| point.id == id)
    }
}

pub(crate) fn check_unique_ids(points: &[Point]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for point in points {
        if !seen.insert(point.id.as_str()) {
            return Err(GameError::DuplicatePointId(point.id.clone()));
        }
    }
    Ok(())
}
