//! Built-in plugin that outlines each region of interest on the frame.

use {
    crate::{InvokeError, Plugin, Value},
    bytes::Bytes,
    image::{Rgb, draw_polygon, jpeg_to_rgb, rgb_to_jpeg},
};

pub const MODEL: &str = "roi_overlay";

const LABELED_COLOR: Rgb = [0, 255, 0];
const UNLABELED_COLOR: Rgb = [255, 200, 0];

struct Roi {
    label: Option<String>,
    points: Vec<(f32, f32)>,
}

fn rois(payload: &Value) -> Result<Vec<Roi>, InvokeError> {
    let Some(rois) = payload.get("context").and_then(|c| c.get("rois")) else {
        return Ok(Vec::new());
    };
    let rois = rois
        .as_array()
        .ok_or_else(|| InvokeError::InvalidPayload("context.rois is not an array".to_string()))?;
    rois.iter()
        .map(|roi| -> Result<Roi, InvokeError> {
            let points = roi
                .get("coordinates")
                .and_then(Value::as_array)
                .unwrap_or_default()
                .iter()
                .map(|point| match point.as_array() {
                    Some([x, y]) => match (x.as_f64(), y.as_f64()) {
                        (Some(x), Some(y)) => Ok((x as f32, y as f32)),
                        _ => Err(InvokeError::InvalidPayload(
                            "roi point is not numeric".to_string(),
                        )),
                    },
                    _ => Err(InvokeError::InvalidPayload(
                        "roi point is not an [x, y] pair".to_string(),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?;
            let label = roi.get("label").and_then(Value::as_str).map(str::to_string);
            Ok(Roi { label, points })
        })
        .collect()
}

fn annotate(payload: Value, quality: u8) -> Result<Value, InvokeError> {
    let jpeg = payload
        .get("image")
        .and_then(Value::to_bytes)
        .ok_or_else(|| InvokeError::InvalidPayload("missing image".to_string()))?;
    let rois = rois(&payload)?;
    let mut frame =
        jpeg_to_rgb(&jpeg).map_err(|e| InvokeError::InvalidPayload(e.to_string()))?;
    for roi in &rois {
        let color = if roi.label.is_some() {
            LABELED_COLOR
        } else {
            UNLABELED_COLOR
        };
        draw_polygon(&mut frame, &roi.points, color);
    }
    let jpeg = rgb_to_jpeg(&frame, quality)?;
    Ok(Value::map()
        .with("image", Bytes::from(jpeg))
        .with("roi_count", rois.len()))
}

fn describe(payload: Value) -> Result<Value, InvokeError> {
    let rois = rois(&payload)?;
    let labels: Vec<Value> = rois.into_iter().map(|roi| Value::from(roi.label)).collect();
    Ok(Value::map()
        .with("roi_count", labels.len())
        .with("labels", Value::Array(labels)))
}

/// The `roi_overlay` plugin, re-encoding annotated frames at `quality`.
pub fn plugin(quality: u8) -> Plugin {
    Plugin::new(MODEL)
        .with_info(
            Value::map()
                .with("name", MODEL)
                .with("description", "draws region of interest outlines")
                .with("actions", vec!["annotate", "describe"]),
        )
        .with_action("annotate", move |payload| annotate(payload, quality))
        .with_action("describe", describe)
}
