//! Map layer descriptors.
//!
//! These describe remote tile sources; fetching tiles is the host widget's
//! job.

use serde::{Deserialize, Serialize};

/// The base street map drawn under everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseTileLayer {
    /// Tile URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for BaseTileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
            max_zoom: 19,
        }
    }
}

impl BaseTileLayer {
    /// Resolve the template for one tile. `subdomain` replaces `{s}`.
    pub fn tile_url(&self, subdomain: &str, z: u8, x: u32, y: u32) -> String {
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// WMS satellite imagery rendered transparently over the base map.
///
/// Toggled on and off at runtime, never reconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageryLayer {
    pub url: String,
    pub layer: String,
    pub format: String,
    pub transparent: bool,
    pub attribution: String,
}

impl Default for ImageryLayer {
    fn default() -> Self {
        Self {
            url: "https://www.wms.nrw.de/geobasis/wms_nw_dop".to_string(),
            layer: "nw_dop_rgb".to_string(),
            format: "image/png".to_string(),
            transparent: true,
            attribution: "© NRW DOP".to_string(),
        }
    }
}

impl ImageryLayer {
    /// WMS `GetMap` query for an EPSG:3857 bounding box.
    pub fn get_map_url(&self, bbox: [f64; 4], width: u32, height: u32) -> String {
        format!(
            "{}?service=WMS&request=GetMap&version=1.1.1&layers={}&styles=&format={}&transparent={}&srs=EPSG:3857&bbox={},{},{},{}&width={}&height={}",
            self.url,
            self.layer,
            self.format,
            self.transparent,
            bbox[0],
            bbox[1],
            bbox[2],
            bbox[3],
            width,
            height
        )
    }
}
