use eagle_core::models::Layer;
use serde::Serialize;
use tabled::Tabled;

/// One row of the layer summary table
#[derive(Debug, Tabled)]
pub struct LayerRow {
    #[tabled(rename = "Layer")]
    pub id: String,
    #[tabled(rename = "Color")]
    pub color: String,
    #[tabled(rename = "Features")]
    pub features: usize,
    #[tabled(rename = "Changes")]
    pub changes: String,
}

impl From<&Layer> for LayerRow {
    fn from(layer: &Layer) -> Self {
        let changes = layer
            .geojson
            .features
            .iter()
            .filter_map(|f| {
                let change = f.property("change")?.as_str()?;
                let intensity = f.property("intensity")?.as_u64()?;
                Some(format!("{change} ({intensity})"))
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: layer.id.clone(),
            color: layer.style.color.clone(),
            features: layer.geojson.features.len(),
            changes,
        }
    }
}

/// One diagnostic performed by `eagle doctor`
#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

impl Check {
    pub fn pass(name: &str, detail: impl Into<String>) -> Self {
        Self { name: name.to_string(), ok: true, detail: detail.into() }
    }

    pub fn fail(name: &str, detail: impl Into<String>) -> Self {
        Self { name: name.to_string(), ok: false, detail: detail.into() }
    }
}

/// Output for doctor command
#[derive(Debug, Serialize)]
pub struct DoctorOutput {
    pub geocoder: String,
    pub analyzer: String,
    pub model_path: String,
    pub checks: Vec<Check>,
}

#[derive(Debug, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use eagle_core::models::{BBox, ChangeTarget, LayerStyle};
    use eagle_inference::synth::{collection, simulated_feature};

    #[test]
    fn test_layer_row_lists_changes() {
        let bbox = BBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let feature = simulated_feature(&bbox, None, 12, ChangeTarget::LandUse);
        let layer = Layer::change("sim-change-1", LayerStyle::warm(), collection(vec![feature]));

        let row = LayerRow::from(&layer);
        assert_eq!(row.id, "sim-change-1");
        assert_eq!(row.color, "#ff6b6b");
        assert_eq!(row.features, 1);
        assert_eq!(row.changes, "simulated (12)");
    }
}
