//! Bundled agricultural sample dataset
//!
//! Thirty maize plots with yield, rainfall, soil pH and elevation.

use super::{Dataset, SamplePoint};

/// (lat, lng, yield_kg, rainfall_mm, soil_ph, elevation_m)
const PLOTS: [(f64, f64, f64, f64, f64, f64); 30] = [
    (9.082, 8.675, 2500.0, 1200.0, 6.5, 350.0),
    (9.095, 8.690, 2800.0, 1250.0, 6.8, 360.0),
    (9.070, 8.660, 2200.0, 1180.0, 6.2, 340.0),
    (9.110, 8.705, 3100.0, 1300.0, 7.0, 380.0),
    (9.088, 8.680, 2650.0, 1220.0, 6.6, 355.0),
    (9.100, 8.695, 2900.0, 1270.0, 6.9, 370.0),
    (9.075, 8.670, 2400.0, 1190.0, 6.4, 345.0),
    (9.105, 8.700, 3000.0, 1290.0, 6.95, 375.0),
    (9.092, 8.685, 2750.0, 1240.0, 6.7, 362.0),
    (9.078, 8.665, 2350.0, 1170.0, 6.3, 342.0),
    (9.115, 8.710, 3200.0, 1320.0, 7.1, 385.0),
    (9.085, 8.678, 2600.0, 1210.0, 6.55, 352.0),
    (9.098, 8.692, 2850.0, 1260.0, 6.85, 368.0),
    (9.072, 8.668, 2300.0, 1185.0, 6.35, 343.0),
    (9.108, 8.703, 3050.0, 1295.0, 6.98, 378.0),
    (9.090, 8.683, 2700.0, 1230.0, 6.65, 358.0),
    (9.080, 8.673, 2450.0, 1195.0, 6.45, 348.0),
    (9.112, 8.708, 3150.0, 1310.0, 7.05, 382.0),
    (9.087, 8.681, 2620.0, 1215.0, 6.58, 354.0),
    (9.095, 8.688, 2820.0, 1255.0, 6.82, 365.0),
    (9.073, 8.662, 2250.0, 1175.0, 6.25, 338.0),
    (9.103, 8.698, 2950.0, 1280.0, 6.92, 372.0),
    (9.084, 8.676, 2550.0, 1205.0, 6.52, 350.0),
    (9.097, 8.691, 2880.0, 1265.0, 6.88, 367.0),
    (9.077, 8.671, 2380.0, 1188.0, 6.38, 346.0),
    (9.107, 8.702, 3020.0, 1292.0, 6.96, 376.0),
    (9.089, 8.682, 2680.0, 1225.0, 6.62, 356.0),
    (9.101, 8.696, 2920.0, 1275.0, 6.90, 371.0),
    (9.074, 8.664, 2280.0, 1178.0, 6.28, 341.0),
    (9.113, 8.707, 3180.0, 1315.0, 7.08, 384.0),
];

/// The demo dataset, targeting `yield_kg` with no predictors selected.
pub fn demo_dataset() -> Dataset {
    let points = PLOTS
        .iter()
        .enumerate()
        .map(|(i, &(lat, lng, yield_kg, rainfall, ph, elevation))| {
            SamplePoint::new(lat, lng)
                .with("id", (i + 1) as f64)
                .with("yield_kg", yield_kg)
                .with("rainfall_mm", rainfall)
                .with("soil_ph", ph)
                .with("elevation_m", elevation)
                .with("crop_type", "Maize")
        })
        .collect();
    Dataset::new(points, "yield_kg")
}
