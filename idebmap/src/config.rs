use serde::{Deserialize, Serialize};

/// Where the map view is centered, in WGS84. Consumed by the external
/// renderer; the core only carries it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dataset_path: String,
    pub boundaries_path: String,
    pub map_center: MapCenter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_path: "data/ideb_regioes_ufs_2019.csv".into(),
            boundaries_path: "geojson/brazil_geo.json".into(),
            map_center: MapCenter {
                lat: -14.272572694355336,
                lon: -51.25567404158474,
            },
        }
    }
}
