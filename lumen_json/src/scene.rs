use log::debug;
use lumen_elements::*;

use super::*;

impl JsonSer for RayPath {
    /// ```json
    /// {
    ///     "color": [r, g, b, a],
    ///     "points": [[x, y], ...]
    /// }
    /// ```
    fn to_json(&self) -> serde_json::Value {
        let color = self.points().first().map(|w| w.color).unwrap_or_default();

        serde_json::json!({
            "color": color.to_json(),
            "points": Vec::from_iter(self.iter().map(|p| [p.x, p.y])),
        })
    }
}

/// Serialize a scene, and the settings to trace it with, into a JSON object.
///
/// The format of the returned object is explained in [`deserialize_scene`]
pub fn serialize_scene(scene: &Scene<Element>, config: &TraceConfig) -> serde_json::Value {
    serde_json::json!({
        "trace": config.to_json(),
        "elements": scene.elements().to_json(),
    })
}

/// Deserialize a scene, and the settings to trace it with, from a JSON object.
///
/// ```json
/// {
///     "trace": { "max_ray_length": 2000.0, "default_bounces": 5 }, // optional
///     "elements": [
///         { "type": "point_source", "data": { "position": [100, 400] } },
///         ...
///     ]
/// }
/// ```
///
/// Sources that don't specify their own `"bounces"` get `trace.default_bounces`.
pub fn deserialize_scene(
    json: &serde_json::Value,
) -> Result<(Scene<Element>, TraceConfig), JsonError> {
    let config = json
        .get("trace")
        .map(TraceConfig::from_json)
        .transpose()?
        .unwrap_or_default();

    let elements_json = field(json, "elements")?
        .as_array()
        .ok_or(JsonError::invalid("elements", "an array of elements"))?;

    let elements = elements_json
        .iter()
        .enumerate()
        .map(|(index, element_json)| {
            let mut element = Element::from_json(element_json).map_err(|e| JsonError::Element {
                index,
                source: Box::new(e),
            })?;

            if let Element::Source(source) = &mut element {
                let explicit = element_json
                    .get("data")
                    .is_some_and(|data| data.get("bounces").is_some());
                if !explicit {
                    source.bounces = config.default_bounces;
                }
            }

            Ok(element)
        })
        .collect::<Result<Vec<_>, JsonError>>()?;

    let scene = Scene::from_elements(elements);
    debug!(
        "loaded scene: {} elements, {} sources",
        scene.len(),
        scene.emitter_indices().len()
    );

    Ok((scene, config))
}

pub fn serialize_paths(paths: &[RayPath]) -> serde_json::Value {
    paths.to_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scene_roundtrip() {
        let scene = default_scene();
        let config = TraceConfig {
            max_ray_length: 500.,
            default_bounces: 3,
        };

        let json = serialize_scene(&scene, &config);
        let (back, back_config) = deserialize_scene(&json).unwrap();

        assert_eq!(back_config, config);
        assert_eq!(back.elements(), scene.elements());
        assert_eq!(back.emitter_indices(), &[0]);
    }

    #[test]
    fn sources_inherit_the_default_budget() {
        let json = json!({
            "trace": { "default_bounces": 2 },
            "elements": [
                { "type": "point_source", "data": { "position": [0, 0] } },
                { "type": "point_source", "data": { "position": [0, 0], "bounces": 7 } },
                { "type": "mirror", "data": { "center": [50, 0], "length": 10, "angle": 1.57 } },
            ]
        });

        let (scene, config) = deserialize_scene(&json).unwrap();
        assert_eq!(config.max_ray_length, MAX_RAY_LENGTH);

        let bounces: Vec<_> = scene
            .elements()
            .iter()
            .filter_map(Element::as_source)
            .map(|s| s.bounces)
            .collect();
        assert_eq!(bounces, [2, 7]);
    }

    #[test]
    fn errors_name_the_element() {
        let json = json!({
            "elements": [
                { "type": "mirror", "data": { "center": [0, 0], "length": 1, "angle": 0 } },
                { "type": "lens", "data": { "center": [0, 0] } },
            ]
        });

        let err = deserialize_scene(&json).unwrap_err();
        assert!(matches!(err, JsonError::Element { index: 1, .. }));
        assert_eq!(
            err.to_string(),
            "invalid element #1: missing field \"height\""
        );

        assert!(matches!(
            deserialize_scene(&json!({})),
            Err(JsonError::MissingField("elements"))
        ));
    }

    #[test]
    fn paths() {
        let scene = Scene::from_iter([Element::from(PointSource::new(
            [0., 0.],
            1,
            Color::RED,
            0.,
            0.5,
        ))]);
        let tracer = Tracer::new(TraceConfig {
            max_ray_length: 10.,
            ..Default::default()
        });

        let paths = tracer.trace(&scene);
        let json = serialize_paths(&paths);

        let path = &json[0];
        assert_eq!(path["color"], json!([255, 0, 0, 255]));
        assert_eq!(path["points"][0], json!([0., 0.]));

        let end = path["points"][1].as_array().unwrap();
        let end = json_array_to_vector(end).unwrap();
        assert!((end - Vector::new(0.25f64.cos(), 0.25f64.sin()) * 10.).norm() < 1e-9);
    }
}
