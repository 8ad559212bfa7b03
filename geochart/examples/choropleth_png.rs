//! Render a small choropleth with a bubble overlay to `choropleth.png`

use geochart::{CanvasDimensions, Chart, Registry, UpdateMode};
use serde_json::{json, Value};

fn region(name: &str, lon: f64, lat: f64, value: f64) -> Value {
    json!({
        "feature": {
            "type": "Feature",
            "properties": {"name": name},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [lon, lat],
                    [lon + 20.0, lat],
                    [lon + 20.0, lat + 15.0],
                    [lon, lat + 15.0],
                    [lon, lat]
                ]]
            }
        },
        "value": value
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let regions: Vec<Value> = (0..6)
        .flat_map(|i| {
            (0..3).map(move |j| {
                let lon = -60.0 + 20.0 * i as f64;
                let lat = -20.0 + 15.0 * j as f64;
                region(&format!("r{i}{j}"), lon, lat, (i * 3 + j) as f64)
            })
        })
        .collect();

    let config = json!({
        "type": "choropleth",
        "data": {
            "datasets": [
                {
                    "label": "regions",
                    "data": regions,
                    "showOutline": true,
                    "showGraticule": true
                },
                {
                    "type": "bubbleMap",
                    "label": "cities",
                    "backgroundColor": "rgba(255, 120, 0, 0.6)",
                    "borderColor": "white",
                    "data": [
                        {"longitude": -25, "latitude": 5, "value": 120},
                        {"longitude": 10, "latitude": 12, "value": 40},
                        {"longitude": 38, "latitude": -8, "value": 300}
                    ]
                }
            ]
        },
        "options": {
            "padding": 10,
            "scales": {
                "projection": {"projection": "equalEarth"},
                "color": {"interpolate": "viridis", "legend": {"position": "bottom-right"}},
                "size": {"range": [3, 18], "legend": {"position": "top-right"}}
            }
        }
    });

    let mut chart = Chart::from_json(
        config,
        &Registry::with_defaults(),
        CanvasDimensions::new(800.0, 450.0, 2.0),
    )?;
    chart.update(UpdateMode::Default)?;
    let pixmap = chart.render_to_pixmap()?;
    std::fs::write("choropleth.png", pixmap.encode_png()?)?;
    println!("wrote choropleth.png ({}x{})", pixmap.width(), pixmap.height());
    Ok(())
}
