//! Bounding-box filter carried from the inbound query to the upstream call.

use url::form_urlencoded;

/// Optional latitude/longitude bounds, kept as the raw strings the client sent.
///
/// Values are never parsed as numbers; whatever the client sent is what the
/// upstream receives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundingBoxQuery {
    pub lamin: Option<String>,
    pub lomin: Option<String>,
    pub lamax: Option<String>,
    pub lomax: Option<String>,
}

impl BoundingBoxQuery {
    /// Extract the four bounds from a raw (still encoded) query string.
    ///
    /// Empty values count as absent and the first occurrence of a repeated
    /// key wins. Unknown keys are ignored.
    pub fn from_query_str(query: &str) -> Self {
        let mut bbox = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "lamin" => &mut bbox.lamin,
                "lomin" => &mut bbox.lomin,
                "lamax" => &mut bbox.lamax,
                "lomax" => &mut bbox.lomax,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        bbox
    }

    /// Present bounds in upstream order: lamin, lomin, lamax, lomax.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("lamin", &self.lamin),
            ("lomin", &self.lomin),
            ("lamax", &self.lamax),
            ("lomax", &self.lomax),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }
}
